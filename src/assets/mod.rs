//! Image sources, decoding and the two-image loader.

pub(crate) mod decode;
pub(crate) mod loader;
pub(crate) mod source;
