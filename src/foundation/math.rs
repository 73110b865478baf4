use rand::Rng;

const INTEGRAL_FROM: f64 = 4_503_599_627_370_496.0;

/// Round half-up (toward positive infinity at exact halves) to `precision` decimal digits.
///
/// `f64::EPSILON` is added before scaling so values such as `1.005` whose binary
/// representation sits just below the half still round up.
pub fn round(value: f64, precision: u32) -> f64 {
    // Every float from 2^52 up is already an integer.
    if value.abs() >= INTEGRAL_FROM {
        return value;
    }
    let scale = 10f64.powi(precision as i32);
    let scaled = (value + f64::EPSILON) * scale;
    if !scaled.is_finite() {
        return value;
    }
    round_half_up(scaled) / scale
}

/// Round half-up to an integer.
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Affine remap of `value` from the domain `[x1, y1]` onto the range `[x2, y2]`.
///
/// The domain must be non-degenerate (`x1 != y1`). Domain endpoints map exactly onto
/// range endpoints.
pub fn remap(value: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    debug_assert!(x1 != y1, "remap domain must be non-degenerate");
    if value == x1 {
        return x2;
    }
    if value == y1 {
        return y2;
    }
    ((value - x1) * (y2 - x2)) / (y1 - x1) + x2
}

/// Rotate an angle in degrees by `amount`, wrapping once past 360.
pub fn rotate(degree: f64, amount: f64) -> f64 {
    let result = degree + amount;
    if result > 360.0 { result - 360.0 } else { result }
}

pub(crate) fn coin_flip<R: Rng + ?Sized>(rng: &mut R) -> bool {
    rng.random::<f64>() > 0.5
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
