use serde::{Deserialize, Serialize};

/// Golf name for a finished hole relative to par.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreTerm {
    HoleInOne,
    Albatross,
    Eagle,
    Birdie,
    Par,
    Bogey,
    DoubleBogey,
    /// Three or more over par.
    Over(u32),
}

impl ScoreTerm {
    /// Classify a finished hole. A hole in one always wins over the
    /// relative-to-par name.
    pub fn classify(strokes: u32, par: u8) -> Self {
        if strokes == 1 {
            return Self::HoleInOne;
        }
        let diff = strokes as i64 - par as i64;
        match diff {
            i64::MIN..=-3 => Self::Albatross,
            -2 => Self::Eagle,
            -1 => Self::Birdie,
            0 => Self::Par,
            1 => Self::Bogey,
            2 => Self::DoubleBogey,
            over => Self::Over(over as u32),
        }
    }
}

/// Compare two finished holes: negative when `a` beat `b`.
pub fn stroke_margin(a: u32, b: u32) -> i64 {
    a as i64 - b as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hole_in_one_beats_relative_name() {
        assert_eq!(ScoreTerm::classify(1, 3), ScoreTerm::HoleInOne);
        assert_eq!(ScoreTerm::classify(1, 5), ScoreTerm::HoleInOne);
    }

    #[test]
    fn under_par() {
        // Par 5, 2 strokes: three under.
        assert_eq!(ScoreTerm::classify(2, 5), ScoreTerm::Albatross);
        assert_eq!(ScoreTerm::classify(2, 4), ScoreTerm::Eagle);
        assert_eq!(ScoreTerm::classify(2, 3), ScoreTerm::Birdie);
    }

    #[test]
    fn at_and_over_par() {
        assert_eq!(ScoreTerm::classify(3, 3), ScoreTerm::Par);
        assert_eq!(ScoreTerm::classify(4, 3), ScoreTerm::Bogey);
        assert_eq!(ScoreTerm::classify(5, 3), ScoreTerm::DoubleBogey);
        // Out-of-bounds penalties push scores well over.
        assert_eq!(ScoreTerm::classify(9, 3), ScoreTerm::Over(6));
    }

    #[test]
    fn margin_sign() {
        assert_eq!(stroke_margin(3, 5), -2);
        assert_eq!(stroke_margin(4, 4), 0);
    }
}
