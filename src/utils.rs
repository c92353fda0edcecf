//! Safe numeric conversions for pixel coordinates.

/// Clamp and convert f64 to i32 for pixel coordinates.
///
/// Non-finite values map to `min`.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // Clamping ensures safe truncation
pub fn f64_to_i32_clamp(value: f64, min: i32, max: i32) -> i32 {
    let (min, max) = if min <= max { (min, max) } else { (max, min) };

    if !value.is_finite() {
        return min;
    }

    let clamped = value.round().clamp(f64::from(min), f64::from(max));
    (clamped as i32).clamp(min, max)
}

/// Round a canvas position to the nearest pixel.
///
/// Returns `None` for non-finite input. Positions off the canvas are kept
/// (clamped to a margin) so partially visible markers still draw their
/// visible part.
#[must_use]
pub fn pixel_center(x: f64, y: f64, width: u32, height: u32) -> Option<(i32, i32)> {
    if !x.is_finite() || !y.is_finite() {
        return None;
    }
    let margin = i32::try_from(width.max(height)).unwrap_or(i32::MAX / 4);
    let limit = |extent: u32| i32::try_from(extent).unwrap_or(i32::MAX / 4).saturating_add(margin);
    Some((
        f64_to_i32_clamp(x, -margin, limit(width)),
        f64_to_i32_clamp(y, -margin, limit(height)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_f64_to_i32_clamp() {
        assert_eq!(f64_to_i32_clamp(50.0, 0, 100), 50);
        assert_eq!(f64_to_i32_clamp(49.6, 0, 100), 50);
        assert_eq!(f64_to_i32_clamp(-10.0, 0, 100), 0);
        assert_eq!(f64_to_i32_clamp(150.0, 0, 100), 100);
        assert_eq!(f64_to_i32_clamp(f64::NAN, 0, 100), 0);
        assert_eq!(f64_to_i32_clamp(f64::INFINITY, 0, 100), 0);
    }

    #[test]
    fn test_f64_to_i32_clamp_swapped_bounds() {
        assert_eq!(f64_to_i32_clamp(-50.0, -10, -100), -50);
        assert_eq!(f64_to_i32_clamp(50.0, 42, 42), 42);
    }

    #[test]
    fn test_pixel_center() {
        assert_eq!(pixel_center(320.4, 239.6, 640, 480), Some((320, 240)));
        assert_eq!(pixel_center(f64::NAN, 0.0, 640, 480), None);
        assert_eq!(pixel_center(1e12, -1e12, 640, 480), Some((1280, -640)));
    }

    proptest! {
        #[test]
        fn prop_clamp_within_bounds(value in any::<f64>(), a in -1000i32..1000, b in -1000i32..1000) {
            let result = f64_to_i32_clamp(value, a, b);
            prop_assert!(result >= a.min(b) && result <= a.max(b));
        }
    }
}
