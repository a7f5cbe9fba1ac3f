use fairway_core::level::Terrain;

/// Ground height lookup. The integrator only needs point samples; slope is
/// estimated by finite differences.
pub trait HeightField {
    fn height_at(&self, x: f32, z: f32) -> f32;
}

impl HeightField for Terrain {
    fn height_at(&self, x: f32, z: f32) -> f32 {
        match *self {
            Terrain::Flat => 0.0,
            Terrain::Plane {
                base,
                slope_x,
                slope_z,
            } => base + slope_x * x + slope_z * z,
        }
    }
}

/// Forward-difference gradient `(dh/dx, dh/dz)` sampled `offset` units along
/// each axis independently.
pub fn slope_gradient(field: &impl HeightField, x: f32, z: f32, offset: f32) -> (f32, f32) {
    let here = field.height_at(x, z);
    let gx = (field.height_at(x + offset, z) - here) / offset;
    let gz = (field.height_at(x, z + offset) - here) / offset;
    (gx, gz)
}
