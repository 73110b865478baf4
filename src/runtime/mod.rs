#[cfg(feature = "dom")]
pub(crate) mod browser;
pub(crate) mod scheduler;
