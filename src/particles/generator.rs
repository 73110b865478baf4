use crate::foundation::error::{ConfettiError, ConfettiResult};

/// One confetti unit: an angular launch position and a color.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Particle {
    /// Palette entry assigned by index.
    pub color: String,
    /// Launch angle in degrees, in `[0, 360)`.
    pub degree: f64,
}

/// Evenly partition the full circle among `count` particles, cycling through `colors`.
///
/// Deterministic: the same inputs always produce the same sequence.
pub fn generate(count: u32, colors: &[String]) -> ConfettiResult<Vec<Particle>> {
    if count == 0 {
        return Err(ConfettiError::configuration("particle count must be >= 1"));
    }
    if colors.is_empty() {
        return Err(ConfettiError::configuration(
            "colors must contain at least one color",
        ));
    }

    let n = f64::from(count);
    Ok((0..count as usize)
        .map(|i| Particle {
            color: colors[i % colors.len()].clone(),
            degree: (i as f64 * 360.0) / n,
        })
        .collect())
}

#[cfg(test)]
#[path = "../../tests/unit/particles/generator.rs"]
mod tests;
