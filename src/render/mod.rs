//! Drawing surfaces.
//!
//! [`surface::DrawSurface`] is the seam between the transition algorithm and pixels. The CPU
//! surface rasterizes into a premultiplied RGBA8 buffer.

pub(crate) mod composite;
pub(crate) mod cpu;
#[cfg(test)]
pub(crate) mod recording;
pub(crate) mod surface;
