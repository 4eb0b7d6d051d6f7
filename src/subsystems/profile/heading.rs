//! Heading math
//!
//! Gyro headings arrive in [0, 360); error terms live in [-180, 180]
//! so the sign encodes the shortest steering direction (negative steers
//! left).

/// Normalize a heading to [-180, 180]
///
/// Total over all finite inputs and idempotent.
pub fn wrap_180(heading: f32) -> f32 {
    let mut h = heading;
    while h > 180.0 {
        h -= 360.0;
    }
    while h < -180.0 {
        h += 360.0;
    }
    h
}

/// Signed shortest angular delta from `heading` to `target`, in degrees
///
/// Negative steers left, positive steers right.
pub fn heading_error(heading: f32, target: f32) -> f32 {
    wrap_180(wrap_180(target) - wrap_180(heading))
}
