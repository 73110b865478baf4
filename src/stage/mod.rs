pub(crate) mod backend;
#[cfg(feature = "dom")]
pub(crate) mod dom;
pub(crate) mod memory;
pub(crate) mod stylesheet;
