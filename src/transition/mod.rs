//! Block-reveal transitions: the reveal plan, per-frame drawing, refresh scheduling and the
//! engine that ties them to a surface.

pub(crate) mod engine;
pub(crate) mod frame;
pub(crate) mod plan;
pub(crate) mod schedule;
