use std::time::Duration;

use crate::{
    config::options::{ConfettiOptions, EffectiveConfig},
    foundation::error::ConfettiResult,
    lifecycle::controller::{ConfettiHandle, Phase, explode},
    runtime::scheduler::Scheduler,
    stage::backend::Stage,
};

/// Stateful wrapper holding a container and options, exploding on demand.
///
/// Option edits go through [`Confetti::set_options`], which forwards to the live
/// explosion, if any.
pub struct Confetti<S, T>
where
    S: Stage + Clone + 'static,
    S::Node: 'static,
    T: Scheduler + Clone + 'static,
{
    stage: S,
    container: S::Node,
    scheduler: T,
    options: ConfettiOptions,
    instance: Option<ConfettiHandle<S, T>>,
}

impl<S, T> Confetti<S, T>
where
    S: Stage + Clone + 'static,
    S::Node: 'static,
    T: Scheduler + Clone + 'static,
{
    /// Prepare a burst for `container`. Nothing is rendered until [`Confetti::explode`].
    ///
    /// Options are validated up front.
    pub fn new(
        stage: S,
        container: S::Node,
        scheduler: T,
        options: ConfettiOptions,
    ) -> ConfettiResult<Self> {
        EffectiveConfig::resolve(&options)?;
        Ok(Self {
            stage,
            container,
            scheduler,
            options,
            instance: None,
        })
    }

    /// Options held by the wrapper.
    pub fn options(&self) -> ConfettiOptions {
        self.options.clone()
    }

    /// Merge `patch` into the held options and forward it to the live explosion.
    pub fn set_options(&mut self, patch: &ConfettiOptions) -> ConfettiResult<()> {
        let mut next = self.options.clone();
        next.apply(patch);
        EffectiveConfig::resolve(&next)?;
        if let Some(instance) = &self.instance {
            instance.update(patch)?;
        }
        self.options = next;
        Ok(())
    }

    /// Start a new burst, replacing any previous one. Returns how long it lasts.
    pub fn explode(&mut self) -> ConfettiResult<Duration> {
        if let Some(previous) = self.instance.take() {
            previous.destroy();
        }
        let handle = explode(
            self.stage.clone(),
            self.container.clone(),
            &self.options,
            self.scheduler.clone(),
        )?;
        let duration = handle.duration();
        self.instance = Some(handle);
        Ok(duration)
    }

    /// Cancel the live explosion's cleanup timer.
    pub fn destroy(&mut self) {
        if let Some(instance) = &self.instance {
            instance.destroy();
        }
    }

    /// Phase of the live explosion, or [`Phase::Idle`] before the first explode.
    pub fn phase(&self) -> Phase {
        self.instance
            .as_ref()
            .map(ConfettiHandle::phase)
            .unwrap_or(Phase::Idle)
    }

    /// The live explosion, if any.
    pub fn handle(&self) -> Option<&ConfettiHandle<S, T>> {
        self.instance.as_ref()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/lifecycle/adapter.rs"]
mod tests;
