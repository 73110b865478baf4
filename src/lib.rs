//! Confetti bursts animated by CSS, not by per-frame script.
//!
//! The crate synthesizes, for every particle of an explosion, the handful of custom
//! properties a pre-authored stylesheet needs to animate it (landing point, bezier
//! control values, timing, rotation axes, size, shape), and manages the explosion's
//! lifecycle inside a host-provided container.
//!
//! # Pipeline overview
//!
//! 1. **Generate**: `count + palette -> Vec<Particle>` (even angular split, cycled colors)
//! 2. **Synthesize**: `Particle + EffectiveConfig + rng -> ParameterSet`
//! 3. **Materialize**: one presentation unit per particle on a [`Stage`], styled with the
//!    synthesized properties, plus a cleanup timer on a [`Scheduler`]
//!
//! The host supplies two seams: [`Stage`] (element creation, tree edits, named style
//! properties) and [`Scheduler`] (timeouts and microtasks). [`MemoryStage`] and
//! [`EventLoop`] implement both in-process; the `dom` feature adds browser versions.
//!
//! # Getting started
//!
//! ```
//! use std::time::Duration;
//! use confetti_burst::{ConfettiOptions, EventLoop, MemoryStage, explode};
//!
//! let stage = MemoryStage::new();
//! let container = stage.create_container()?;
//! let events = EventLoop::new();
//!
//! let burst = explode(
//!     stage.clone(),
//!     container,
//!     &ConfettiOptions::new().particle_count(20),
//!     events.clone(),
//! )?;
//! assert_eq!(stage.children(container).len(), 20);
//!
//! burst.update(&ConfettiOptions::new().colors(["gold", "teal"]))?;
//! events.advance(Duration::from_millis(3500));
//! assert!(stage.children(container).is_empty());
//! # Ok::<(), confetti_burst::ConfettiError>(())
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod foundation;
mod lifecycle;
mod particles;
mod runtime;
mod stage;
mod style;

pub use config::options::{
    ConfettiOptions, DEFAULT_COLORS, DEFAULT_DESTROY_AFTER_DONE, DEFAULT_DURATION_MS,
    DEFAULT_FORCE, DEFAULT_PARTICLE_COUNT, DEFAULT_PARTICLE_SIZE, DEFAULT_STAGE_HEIGHT,
    DEFAULT_STAGE_WIDTH, EffectiveConfig, ParticleShape,
};
pub use foundation::error::{ConfettiError, ConfettiResult};
pub use foundation::math::{remap, rotate, round};
pub use lifecycle::adapter::Confetti;
pub use lifecycle::controller::{ConfettiHandle, Phase, explode};
pub use particles::generator::{Particle, generate};
#[cfg(feature = "dom")]
pub use runtime::browser::DomScheduler;
pub use runtime::scheduler::{EventLoop, Scheduler, Task, TimerId};
pub use stage::backend::Stage;
#[cfg(feature = "dom")]
pub use stage::dom::DomStage;
pub use stage::memory::{MemoryStage, NodeId};
pub use stage::stylesheet::{
    CONTAINER_CLASS, PARTICLE_CLASS, STYLE_MARKER_ATTR, STYLESHEET, ensure_stylesheet,
};
pub use style::params::{CssVar, ParameterSet, RotationAxes, ShapeKind};
pub use style::synth::{
    BEZIER_MEDIAN, CRAZY_PARTICLE_CRAZINESS, CRAZY_PARTICLES_FREQUENCY, DURATION_JITTER_MS,
    ROTATION_SPEED_MAX_MS, ROTATION_SPEED_MIN_MS, resolve_shape, synthesize,
};
