#[allow(dead_code)]
mod common;

use fairway_core::events::{BallKind, GolfEvent};
use fairway_core::level::parse_level;
use fairway_core::math::Vec3;
use fairway_core::test_helpers::course_without_hole;
use fairway_sim::course::builtin_levels;
use fairway_sim::session::decode_snapshot;
use fairway_sim::{AimAtHole, PhysicsConfig, Scripted, Shot, encode_snapshot};

use common::{pad, run_session, session};

#[test]
fn ghost_finishes_straight_shot() {
    let level = builtin_levels().remove(0);
    let mut session = session(level);
    let cfg = PhysicsConfig::default();
    session.spawn_ghost(Box::new(AimAtHole::new(11, &cfg)));

    // Thirty seconds of play is far more than a par-2 hole needs.
    let events = run_session(&mut session, 30 * 60);
    let captured = events.iter().any(|e| {
        matches!(
            e,
            GolfEvent::HoleCaptured {
                ball: BallKind::Ghost,
                ..
            }
        )
    });
    assert!(captured, "ghost never holed out: {events:?}");
    assert!(session.ghost().is_some_and(|g| g.ball().in_hole()));
    // The player never moved.
    assert_eq!(session.player().strokes, 0);
    assert!(session.player().at_rest());
}

#[test]
fn every_builtin_level_runs_cleanly() {
    let cfg = PhysicsConfig::default();
    for (i, level) in builtin_levels().into_iter().enumerate() {
        let name = level.name.clone();
        let mut session = session(level);
        session.spawn_ghost(Box::new(AimAtHole::new(i as u64, &cfg)));
        for _ in 0..20 * 60 {
            session.update(common::DT);
            let ghost = session.ghost().map(|g| g.ball().position);
            assert!(session.player().position.is_finite(), "{name}: player diverged");
            assert!(ghost.is_some_and(Vec3::is_finite), "{name}: ghost diverged");
        }
        let ghost = session.ghost().map(|g| g.ball().strokes).unwrap_or_default();
        assert!(ghost > 0, "{name}: ghost never played");
    }
}

#[test]
fn player_and_ghost_events_are_tagged() {
    let pads = vec![pad(20.0, 12.0, 3), pad(20.0, 60.0, 3)];
    let mut session = session(course_without_hole(pads));
    // Ghost waits one think delay, then plays the same straight shot.
    session.spawn_ghost(Box::new(Scripted::new([Shot {
        angle: std::f32::consts::FRAC_PI_2,
        power: 0.4,
    }])));
    session.stroke(Shot {
        angle: std::f32::consts::FRAC_PI_2,
        power: 0.4,
    });

    let events = run_session(&mut session, 3 * 60);
    let teleports: Vec<(BallKind, bool)> = events
        .iter()
        .filter_map(|e| match e {
            GolfEvent::Teleported {
                ball, narrative, ..
            } => Some((*ball, *narrative)),
            _ => None,
        })
        .collect();
    assert_eq!(
        teleports,
        vec![(BallKind::Player, true), (BallKind::Ghost, false)]
    );
}

#[test]
fn json_level_drives_a_session() {
    let json = r#"{
        "name": "From JSON",
        "bounds": { "shape": "rect", "min_x": 0.0, "max_x": 20.0, "min_z": 0.0, "max_z": 40.0 },
        "hole": { "position": { "x": 10.0, "y": 0.0, "z": 34.0 } },
        "start": { "x": 10.0, "y": 0.0, "z": 5.0 },
        "obstacles": [
            { "type": "bumper", "position": { "x": 5.0, "y": 0.0, "z": 20.0 }, "radius": 1.5, "tube_radius": 0.5 },
            { "type": "fan", "x": 15.0, "z": 20.0, "radius": 3.0, "height": 2.0, "num_blades": 3,
              "rotation_speed": 2.0, "push_strength": 8.0 },
            { "type": "fan", "x": 15.0, "z": 30.0, "radius": 3.0, "height": 2.0, "num_blades": 0,
              "rotation_speed": 2.0, "push_strength": 8.0 }
        ]
    }"#;
    let level = parse_level(json).unwrap();
    assert_eq!(level.par, 3);
    let mut session = session(level);

    // The zero-blade fan is dropped at load; the rest is live.
    assert_eq!(session.world().bumpers().len(), 1);
    assert_eq!(session.world().fans().len(), 1);
    assert_eq!(session.world().fans()[0].fan.blade_length_multiplier, 1.0);

    session.update(0.5);
    let angle = session.world().fans()[0].angle;
    assert!((angle - 0.2).abs() < 1e-5, "fan angle {angle}");
}

#[test]
fn snapshot_reports_both_balls() {
    let mut session = session(builtin_levels().remove(0));
    let cfg = PhysicsConfig::default();
    session.spawn_ghost(Box::new(AimAtHole::new(3, &cfg)));
    session.stroke(Shot {
        angle: 0.0,
        power: 0.2,
    });
    run_session(&mut session, 90);

    let snapshot = session.snapshot();
    assert_eq!(snapshot.level, "Straight Shot");
    assert_eq!(snapshot.player.kind, BallKind::Player);
    assert_eq!(snapshot.player.strokes, 1);
    let ghost = snapshot.ghost.as_ref().unwrap();
    assert_eq!(ghost.kind, BallKind::Ghost);
    assert_eq!(ghost.strokes, 1);

    let decoded = decode_snapshot(&encode_snapshot(&snapshot)).unwrap();
    assert_eq!(decoded, snapshot);

    // The JSON form is what a browser bridge would log.
    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["player"]["strokes"], 1);
}
