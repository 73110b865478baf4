use std::{cell::RefCell, rc::Rc, time::Duration};

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

use crate::{
    config::options::{ConfettiOptions, EffectiveConfig},
    foundation::error::ConfettiResult,
    particles::generator::{Particle, generate},
    runtime::scheduler::{Scheduler, TimerId},
    stage::{
        backend::Stage,
        stylesheet::{CONTAINER_CLASS, PARTICLE_CLASS, ensure_stylesheet},
    },
    style::{
        params::{CssVar, fmt_num},
        synth::synthesize,
    },
};

/// Lifecycle state of one explosion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum Phase {
    /// Not started yet.
    Idle,
    /// Particles are on stage and animating.
    Exploding,
    /// The cleanup timer fired and removed the particles.
    Settled,
    /// Destroyed by the caller; terminal.
    Destroyed,
}

struct Instance<S: Stage> {
    stage: S,
    container: S::Node,
    config: EffectiveConfig,
    particles: Vec<Particle>,
    units: Vec<S::Node>,
    timer: Option<TimerId>,
    // bumped whenever a pending arm or timer must be ignored
    generation: u64,
    phase: Phase,
    rng: Pcg64Mcg,
}

impl<S: Stage> Instance<S> {
    fn set_stage_height(&self) -> ConfettiResult<()> {
        self.stage.set_property(
            &self.container,
            CssVar::StageHeight.name(),
            &format!("{}px", fmt_num(self.config.stage_height)),
        )
    }

    /// Create one unit per particle, in particle order, and style each one.
    fn materialize(&mut self) -> ConfettiResult<()> {
        let mut units = Vec::with_capacity(self.particles.len());
        for particle in &self.particles {
            let unit = self.stage.create_element("div")?;
            self.stage.add_class(&unit, PARTICLE_CLASS)?;
            self.stage
                .set_property(&unit, CssVar::BackgroundColor.name(), &particle.color)?;
            let inner = self.stage.create_element("div")?;
            self.stage.append_child(&unit, &inner)?;
            self.stage.append_child(&self.container, &unit)?;

            let params = synthesize(particle, &self.config, &mut self.rng);
            tracing::trace!(degree = particle.degree, shape = ?params.shape, "particle styled");
            for (var, value) in params.properties() {
                self.stage.set_property(&unit, var.name(), &value)?;
            }
            units.push(unit);
        }
        self.units = units;
        Ok(())
    }

    fn rebuild(&mut self) -> ConfettiResult<()> {
        self.stage.clear_children(&self.container)?;
        self.units.clear();
        self.particles = generate(self.config.particle_count, &self.config.colors)?;
        self.materialize()?;
        self.phase = Phase::Exploding;
        Ok(())
    }

    fn recolor(&mut self) -> ConfettiResult<()> {
        self.particles = generate(self.config.particle_count, &self.config.colors)?;
        for (unit, particle) in self.units.iter().zip(&self.particles) {
            self.stage
                .set_property(unit, CssVar::BackgroundColor.name(), &particle.color)?;
        }
        Ok(())
    }

    fn cancel_timer<T: Scheduler>(&mut self, scheduler: &T) {
        self.generation += 1;
        if let Some(id) = self.timer.take() {
            scheduler.clear_timeout(id);
            tracing::debug!(timer = id.0, "cleanup timer canceled");
        }
    }

    fn on_cleanup(&mut self, generation: u64) {
        if generation != self.generation || self.phase == Phase::Destroyed {
            return;
        }
        self.timer = None;
        if !self.config.destroy_after_done {
            return;
        }
        if let Err(err) = self.stage.clear_children(&self.container) {
            tracing::warn!(%err, "clearing particles failed");
            return;
        }
        self.units.clear();
        self.phase = Phase::Settled;
        tracing::debug!("explosion settled");
    }
}

/// Live explosion returned by [`explode`].
///
/// Dropping the handle does not cancel the pending cleanup; call
/// [`ConfettiHandle::destroy`] for that.
pub struct ConfettiHandle<S, T>
where
    S: Stage + 'static,
    S::Node: 'static,
    T: Scheduler + Clone + 'static,
{
    inner: Rc<RefCell<Instance<S>>>,
    scheduler: T,
}

/// Validate `options`, put one particle per unit into `container` and arm the cleanup timer.
///
/// The timer is armed from a microtask, so it is registered after the caller's current
/// synchronous work completes. Nothing is touched when validation fails.
#[tracing::instrument(skip_all)]
pub fn explode<S, T>(
    stage: S,
    container: S::Node,
    options: &ConfettiOptions,
    scheduler: T,
) -> ConfettiResult<ConfettiHandle<S, T>>
where
    S: Stage + 'static,
    S::Node: 'static,
    T: Scheduler + Clone + 'static,
{
    let config = EffectiveConfig::resolve(options)?;
    let particles = generate(config.particle_count, &config.colors)?;
    let rng = match config.seed {
        Some(seed) => Pcg64Mcg::seed_from_u64(seed),
        None => Pcg64Mcg::from_rng(&mut rand::rng()),
    };

    ensure_stylesheet(&stage)?;
    stage.add_class(&container, CONTAINER_CLASS)?;

    let mut instance = Instance {
        stage,
        container,
        config,
        particles,
        units: Vec::new(),
        timer: None,
        generation: 0,
        phase: Phase::Exploding,
        rng,
    };
    instance.set_stage_height()?;
    instance.materialize()?;
    tracing::debug!(
        particles = instance.particles.len(),
        duration_ms = instance.config.duration_ms,
        "exploded"
    );

    let handle = ConfettiHandle {
        inner: Rc::new(RefCell::new(instance)),
        scheduler,
    };
    handle.schedule_cleanup();
    Ok(handle)
}

impl<S, T> ConfettiHandle<S, T>
where
    S: Stage + 'static,
    S::Node: 'static,
    T: Scheduler + Clone + 'static,
{
    /// Merge `patch` over the current options and re-apply what changed.
    ///
    /// - Same particle count, different palette: existing units are recolored in place.
    /// - Different particle count: units are rebuilt and a fresh cleanup timer is armed.
    /// - `destroyAfterDone` turned off: the pending cleanup is canceled.
    ///
    /// The stage height is always re-applied. Other changes take effect on the next
    /// rebuild. A destroyed explosion ignores updates.
    #[tracing::instrument(skip_all)]
    pub fn update(&self, patch: &ConfettiOptions) -> ConfettiResult<()> {
        let mut inst = self.inner.borrow_mut();
        if inst.phase == Phase::Destroyed {
            tracing::debug!("update ignored after destroy");
            return Ok(());
        }

        let next = inst.config.merged(patch)?;
        let count_changed = next.particle_count != inst.config.particle_count;
        let palette_changed = next.colors != inst.config.colors;
        let stop_cleanup = inst.config.destroy_after_done && !next.destroy_after_done;
        inst.config = next;
        if let Some(seed) = patch.seed {
            inst.rng = Pcg64Mcg::seed_from_u64(seed);
        }

        if count_changed {
            tracing::debug!(particles = inst.config.particle_count, "rebuilding");
            inst.rebuild()?;
        } else if palette_changed {
            tracing::debug!("recoloring");
            inst.recolor()?;
        }

        if stop_cleanup {
            inst.cancel_timer(&self.scheduler);
        }

        inst.set_stage_height()?;
        drop(inst);

        if count_changed {
            self.schedule_cleanup();
        }
        Ok(())
    }

    /// Cancel the cleanup timer and release the instance. Particles stay in the container.
    #[tracing::instrument(skip_all)]
    pub fn destroy(&self) {
        let mut inst = self.inner.borrow_mut();
        inst.cancel_timer(&self.scheduler);
        inst.units.clear();
        inst.phase = Phase::Destroyed;
        tracing::debug!("destroyed");
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.inner.borrow().phase
    }

    /// Current option snapshot.
    pub fn config(&self) -> EffectiveConfig {
        self.inner.borrow().config.clone()
    }

    /// Current particle sequence.
    pub fn particles(&self) -> Vec<Particle> {
        self.inner.borrow().particles.clone()
    }

    /// Handles of the live presentation units, in particle order.
    pub fn units(&self) -> Vec<S::Node> {
        self.inner.borrow().units.clone()
    }

    /// Number of live presentation units.
    pub fn unit_count(&self) -> usize {
        self.inner.borrow().units.len()
    }

    /// The caller's container.
    pub fn container(&self) -> S::Node {
        self.inner.borrow().container.clone()
    }

    /// Whether a cleanup timer is currently armed.
    pub fn cleanup_armed(&self) -> bool {
        self.inner.borrow().timer.is_some()
    }

    /// Nominal duration of the burst.
    pub fn duration(&self) -> Duration {
        self.inner.borrow().config.duration()
    }

    /// Cancel any outstanding timer, then arm a new one from a microtask.
    fn schedule_cleanup(&self) {
        let generation = {
            let mut inst = self.inner.borrow_mut();
            inst.cancel_timer(&self.scheduler);
            inst.generation
        };

        let inner = Rc::clone(&self.inner);
        let scheduler = self.scheduler.clone();
        self.scheduler.queue_microtask(Box::new(move || {
            let delay = {
                let inst = inner.borrow();
                if inst.generation != generation || inst.phase == Phase::Destroyed {
                    return;
                }
                inst.config.duration()
            };
            let target = Rc::clone(&inner);
            let id = scheduler.set_timeout(
                delay,
                Box::new(move || target.borrow_mut().on_cleanup(generation)),
            );
            inner.borrow_mut().timer = Some(id);
            tracing::debug!(timer = id.0, delay_ms = delay.as_millis() as u64, "cleanup timer armed");
        }));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/lifecycle/controller.rs"]
mod tests;
