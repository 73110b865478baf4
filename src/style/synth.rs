use rand::Rng;

use crate::{
    config::options::{EffectiveConfig, ParticleShape},
    foundation::math::{coin_flip, remap, round, round_half_up, rotate},
    particles::generator::Particle,
    style::params::{ParameterSet, RotationAxes, ShapeKind},
};

/// Lower bound of one full rotation, in milliseconds.
pub const ROTATION_SPEED_MIN_MS: f64 = 200.0;
/// Upper bound of one full rotation, in milliseconds.
pub const ROTATION_SPEED_MAX_MS: f64 = 800.0;
/// Probability that a particle gets lateral disturbance.
pub const CRAZY_PARTICLES_FREQUENCY: f64 = 0.1;
/// Maximum lateral disturbance of a crazy particle.
pub const CRAZY_PARTICLE_CRAZINESS: f64 = 0.3;
/// Mid-point of the bezier control range.
pub const BEZIER_MEDIAN: f64 = 0.5;
/// Maximum duration jitter, in milliseconds.
pub const DURATION_JITTER_MS: f64 = 1000.0;

/// Decide the particle's shape from the configured constraint and its rotation roll.
///
/// In `mix` mode a z-only spin is forced onto a rectangle since it is invisible on a
/// circle; any other roll is a fair coin flip.
pub fn resolve_shape<R: Rng + ?Sized>(
    shape: ParticleShape,
    axes: RotationAxes,
    rng: &mut R,
) -> ShapeKind {
    let circle = match shape {
        ParticleShape::Rectangles => false,
        ParticleShape::Circles => true,
        ParticleShape::Mix => axes.selector() != RotationAxes::Z_ONLY && coin_flip(rng),
    };
    if circle {
        ShapeKind::Circle
    } else {
        ShapeKind::Rectangle
    }
}

/// Compute the full parameter vector for one particle.
pub fn synthesize<R: Rng + ?Sized>(
    particle: &Particle,
    cfg: &EffectiveConfig,
    rng: &mut R,
) -> ParameterSet {
    let degree = particle.degree;
    let force = cfg.force;

    let rotation = RotationAxes::from_selector(rng.random_range(0..=RotationAxes::MAX_SELECTOR));
    let shape = resolve_shape(cfg.particle_shape, rotation, rng);

    // 90deg and 270deg sit at the edges of the stage, 0deg and 180deg in the middle.
    let sideways = (rotate(degree, 90.0) - 180.0).abs();
    let half_width = cfg.stage_width / 2.0;
    let x_landing_px = remap(sideways, 0.0, 180.0, -half_width, half_width);

    let jitter = round_half_up(rng.random::<f64>() * DURATION_JITTER_MS) as i64;
    let duration_chaos_ms = i64::try_from(cfg.duration_ms)
        .unwrap_or(i64::MAX)
        .saturating_sub(jitter);

    let x1 = if rng.random::<f64>() < CRAZY_PARTICLES_FREQUENCY {
        round(rng.random::<f64>() * CRAZY_PARTICLE_CRAZINESS, 2)
    } else {
        0.0
    };
    let x4 = round(remap(sideways, 0.0, 180.0, -1.0, 1.0).abs(), 4);

    let y1 = round(rng.random::<f64>() * BEZIER_MEDIAN, 4);
    let magnitude = rng.random::<f64>() * force;
    let sign = if coin_flip(rng) { 1.0 } else { -1.0 };
    let y2 = round(magnitude * sign, 4);
    // Falling particles (180deg) are already in free fall; rising ones ease in up to `force`.
    let y4 = round(
        remap((degree - 180.0).abs(), 0.0, 180.0, -force, force).max(0.0),
        4,
    );

    let (width_px, height_px) = match shape {
        ShapeKind::Circle => (cfg.particle_size, cfg.particle_size),
        ShapeKind::Rectangle => (
            round_half_up(rng.random::<f64>() * 4.0) + cfg.particle_size / 2.0,
            round_half_up(rng.random::<f64>() * 2.0) + cfg.particle_size,
        ),
    };

    let rotation_duration_ms = round(
        rng.random::<f64>() * (ROTATION_SPEED_MAX_MS - ROTATION_SPEED_MIN_MS)
            + ROTATION_SPEED_MIN_MS,
        2,
    );

    ParameterSet {
        x_landing_px,
        duration_chaos_ms,
        x1,
        x2: -x1,
        x3: x1,
        x4,
        y1,
        y2,
        y3: BEZIER_MEDIAN,
        y4,
        width_px,
        height_px,
        rotation,
        rotation_duration_ms,
        shape,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/synth.rs"]
mod tests;
