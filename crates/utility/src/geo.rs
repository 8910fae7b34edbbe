/// Scale of fixed-point E7 coordinates (degrees multiplied by 10^7).
pub const E7_SCALE: f64 = 10_000_000.0;

/// Converts a fixed-point E7 coordinate into floating point degrees.
pub fn e7_to_degrees(value_e7: i64) -> f64 {
    value_e7 as f64 / E7_SCALE
}

/// Converts degrees back into the nearest E7 fixed-point value.
pub fn degrees_to_e7(degrees: f64) -> i64 {
    (degrees * E7_SCALE).round() as i64
}

/// Snaps an E7 value to the nearest multiple of `grid_e7`.
/// A grid of one (or less) leaves the value untouched.
pub fn snap_to_grid(value_e7: i64, grid_e7: i64) -> i64 {
    if grid_e7 <= 1 {
        return value_e7;
    }
    (value_e7 + grid_e7 / 2).div_euclid(grid_e7) * grid_e7
}

/// Key identifying a grid cell for a coordinate given in degrees.
pub fn grid_key(latitude: f64, longitude: f64, grid_e7: i64) -> (i64, i64) {
    (
        snap_to_grid(degrees_to_e7(latitude), grid_e7),
        snap_to_grid(degrees_to_e7(longitude), grid_e7),
    )
}
