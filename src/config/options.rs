use std::io::Read;
use std::time::Duration;

use crate::foundation::error::{ConfettiError, ConfettiResult};

/// Default palette, cycled by particle index.
pub const DEFAULT_COLORS: [&str; 4] = ["#FFC700", "#FF0000", "#2E3191", "#41BBC7"];
/// Default total animation duration in milliseconds.
pub const DEFAULT_DURATION_MS: u64 = 3500;
/// Default fall-curve force.
pub const DEFAULT_FORCE: f64 = 0.5;
/// Default number of particles.
pub const DEFAULT_PARTICLE_COUNT: u32 = 150;
/// Default particle base size in pixels.
pub const DEFAULT_PARTICLE_SIZE: f64 = 12.0;
/// Default stage height in pixels.
pub const DEFAULT_STAGE_HEIGHT: f64 = 800.0;
/// Default stage width in pixels.
pub const DEFAULT_STAGE_WIDTH: f64 = 1600.0;
/// Whether particle nodes are removed once the duration elapses by default.
pub const DEFAULT_DESTROY_AFTER_DONE: bool = true;

/// Constraint on the per-particle shape roll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ParticleShape {
    /// Circles and rectangles.
    #[default]
    Mix,
    /// Circles only.
    Circles,
    /// Rectangles only.
    Rectangles,
}

impl ParticleShape {
    /// Canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mix => "mix",
            Self::Circles => "circles",
            Self::Rectangles => "rectangles",
        }
    }
}

impl std::str::FromStr for ParticleShape {
    type Err = ConfettiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mix" => Ok(Self::Mix),
            "circles" => Ok(Self::Circles),
            "rectangles" => Ok(Self::Rectangles),
            other => Err(ConfettiError::configuration(format!(
                "particleShape must be one of 'mix', 'circles', 'rectangles' (got '{other}')"
            ))),
        }
    }
}

impl TryFrom<String> for ParticleShape {
    type Error = ConfettiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Partial option set. Unset fields fall back to defaults on explode and to the
/// previous snapshot on update.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfettiOptions {
    /// Number of particles to create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub particle_count: Option<u32>,
    /// Shape constraint for the particles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub particle_shape: Option<ParticleShape>,
    /// Particle base size in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub particle_size: Option<f64>,
    /// Total animation duration in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    /// Ordered palette; any CSS color expression is accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    /// Fall-curve steepness in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force: Option<f64>,
    /// Height of the stage particles fall within, in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage_height: Option<f64>,
    /// Width of the stage particles land within, in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage_width: Option<f64>,
    /// Remove particle nodes once the duration has elapsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destroy_after_done: Option<bool>,
    /// Seed for the per-particle random draws. Unseeded explosions use entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl ConfettiOptions {
    /// Empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `particleCount`.
    pub fn particle_count(mut self, count: u32) -> Self {
        self.particle_count = Some(count);
        self
    }

    /// Set `particleShape`.
    pub fn particle_shape(mut self, shape: ParticleShape) -> Self {
        self.particle_shape = Some(shape);
        self
    }

    /// Set `particleSize`.
    pub fn particle_size(mut self, size: f64) -> Self {
        self.particle_size = Some(size);
        self
    }

    /// Set `duration` in milliseconds.
    pub fn duration_ms(mut self, ms: u64) -> Self {
        self.duration = Some(ms);
        self
    }

    /// Set the palette.
    pub fn colors<I, C>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.colors = Some(colors.into_iter().map(Into::into).collect());
        self
    }

    /// Set `force`.
    pub fn force(mut self, force: f64) -> Self {
        self.force = Some(force);
        self
    }

    /// Set `stageHeight`.
    pub fn stage_height(mut self, px: f64) -> Self {
        self.stage_height = Some(px);
        self
    }

    /// Set `stageWidth`.
    pub fn stage_width(mut self, px: f64) -> Self {
        self.stage_width = Some(px);
        self
    }

    /// Set `destroyAfterDone`.
    pub fn destroy_after_done(mut self, yes: bool) -> Self {
        self.destroy_after_done = Some(yes);
        self
    }

    /// Set the random seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Overlay every field set in `patch` onto `self`.
    pub fn apply(&mut self, patch: &ConfettiOptions) {
        fn take<T: Clone>(dst: &mut Option<T>, src: &Option<T>) {
            if let Some(v) = src {
                *dst = Some(v.clone());
            }
        }

        take(&mut self.particle_count, &patch.particle_count);
        take(&mut self.particle_shape, &patch.particle_shape);
        take(&mut self.particle_size, &patch.particle_size);
        take(&mut self.duration, &patch.duration);
        take(&mut self.colors, &patch.colors);
        take(&mut self.force, &patch.force);
        take(&mut self.stage_height, &patch.stage_height);
        take(&mut self.stage_width, &patch.stage_width);
        take(&mut self.destroy_after_done, &patch.destroy_after_done);
        take(&mut self.seed, &patch.seed);
    }

    /// Parse options from a JSON document.
    ///
    /// Values of the wrong type or outside the enumerations are reported as
    /// configuration errors; malformed JSON as serialization errors.
    pub fn from_json_str(s: &str) -> ConfettiResult<Self> {
        serde_json::from_str(s).map_err(classify_json_error)
    }

    /// Parse options from a JSON reader.
    pub fn from_reader<R: Read>(r: R) -> ConfettiResult<Self> {
        serde_json::from_reader(r).map_err(classify_json_error)
    }
}

fn classify_json_error(err: serde_json::Error) -> ConfettiError {
    match err.classify() {
        serde_json::error::Category::Data => ConfettiError::configuration(err.to_string()),
        _ => ConfettiError::from(err),
    }
}

/// Fully resolved option snapshot owned by a live explosion.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveConfig {
    /// Number of particles; at least 1.
    pub particle_count: u32,
    /// Shape constraint.
    pub particle_shape: ParticleShape,
    /// Base size in pixels.
    pub particle_size: f64,
    /// Total duration in milliseconds.
    pub duration_ms: u64,
    /// Non-empty palette.
    pub colors: Vec<String>,
    /// Force in `[0, 1]`.
    pub force: f64,
    /// Stage height in pixels.
    pub stage_height: f64,
    /// Stage width in pixels.
    pub stage_width: f64,
    /// Remove nodes once the duration elapses.
    pub destroy_after_done: bool,
    /// Random seed, if any.
    pub seed: Option<u64>,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLE_COUNT,
            particle_shape: ParticleShape::Mix,
            particle_size: DEFAULT_PARTICLE_SIZE,
            duration_ms: DEFAULT_DURATION_MS,
            colors: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
            force: DEFAULT_FORCE,
            stage_height: DEFAULT_STAGE_HEIGHT,
            stage_width: DEFAULT_STAGE_WIDTH,
            destroy_after_done: DEFAULT_DESTROY_AFTER_DONE,
            seed: None,
        }
    }
}

impl EffectiveConfig {
    /// Merge `options` over the defaults and validate the result.
    pub fn resolve(options: &ConfettiOptions) -> ConfettiResult<Self> {
        Self::default().merged(options)
    }

    /// Merge `patch` over this snapshot and validate the result. `self` is untouched.
    pub fn merged(&self, patch: &ConfettiOptions) -> ConfettiResult<Self> {
        let mut out = self.clone();
        if let Some(v) = patch.particle_count {
            out.particle_count = v;
        }
        if let Some(v) = patch.particle_shape {
            out.particle_shape = v;
        }
        if let Some(v) = patch.particle_size {
            out.particle_size = v;
        }
        if let Some(v) = patch.duration {
            out.duration_ms = v;
        }
        if let Some(v) = &patch.colors {
            out.colors = v.clone();
        }
        if let Some(v) = patch.force {
            out.force = v;
        }
        if let Some(v) = patch.stage_height {
            out.stage_height = v;
        }
        if let Some(v) = patch.stage_width {
            out.stage_width = v;
        }
        if let Some(v) = patch.destroy_after_done {
            out.destroy_after_done = v;
        }
        if patch.seed.is_some() {
            out.seed = patch.seed;
        }
        out.validate()?;
        Ok(out)
    }

    /// Check every invariant of the snapshot.
    pub fn validate(&self) -> ConfettiResult<()> {
        if self.particle_count == 0 {
            return Err(ConfettiError::configuration("particleCount must be >= 1"));
        }
        for (name, value) in [
            ("particleSize", self.particle_size),
            ("force", self.force),
            ("stageHeight", self.stage_height),
            ("stageWidth", self.stage_width),
        ] {
            if !value.is_finite() {
                return Err(ConfettiError::configuration(format!(
                    "{name} must be a finite number (got {value})"
                )));
            }
            if value < 0.0 {
                return Err(ConfettiError::configuration(format!(
                    "{name} must be >= 0 (got {value})"
                )));
            }
        }
        if self.force > 1.0 {
            return Err(ConfettiError::configuration(format!(
                "force must be within [0, 1] (got {})",
                self.force
            )));
        }
        if self.colors.is_empty() {
            return Err(ConfettiError::configuration(
                "colors must contain at least one color",
            ));
        }
        if let Some(i) = self.colors.iter().position(|c| c.trim().is_empty()) {
            return Err(ConfettiError::configuration(format!(
                "colors[{i}] must be a non-empty color string"
            )));
        }
        Ok(())
    }

    /// Nominal duration as a [`Duration`].
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/options.rs"]
mod tests;
