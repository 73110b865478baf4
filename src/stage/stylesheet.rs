use crate::{foundation::error::ConfettiResult, stage::backend::Stage};

/// Keyframes and rules interpreting the synthesized custom properties.
pub const STYLESHEET: &str = include_str!("../../assets/confetti.css");
/// Class added to the caller's container.
pub const CONTAINER_CLASS: &str = "confetti-burst-container";
/// Class carried by every particle node.
pub const PARTICLE_CLASS: &str = "confetti-burst-particle";
/// Attribute marking the injected `<style>` element.
pub const STYLE_MARKER_ATTR: &str = "data-confetti-burst";

/// Install [`STYLESHEET`] unless the stage already carries it. Returns whether it was inserted.
pub fn ensure_stylesheet<S: Stage>(stage: &S) -> ConfettiResult<bool> {
    if stage.has_stylesheet() {
        return Ok(false);
    }
    stage.install_stylesheet(STYLESHEET)?;
    tracing::debug!("stylesheet installed");
    Ok(true)
}

#[cfg(test)]
#[path = "../../tests/unit/stage/stylesheet.rs"]
mod tests;
