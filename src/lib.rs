//! pixelslide renders a "pixel block" slide transition.
//!
//! The surface is cut into a grid of square blocks. Each block gets a random variant (plain,
//! bordered or rotating) and a position in a reveal order biased toward the top-left to
//! bottom-right diagonal. Over the transition's duration the previous slide is drawn stretched
//! across the surface and a growing prefix of the ordered blocks is cut from the next slide on
//! top of it.
//!
//! # Pieces
//!
//! - [`ImageSource`] and [`AssetLoader`]: decode both slide images, inline or on the rayon pool.
//! - [`RevealPlan`]: the grid, variants and reveal order for one run.
//! - [`draw_reveal_frame`]: paints one frame onto any [`DrawSurface`].
//! - [`TransitionEngine`]: owns a surface and a [`FrameScheduler`] registration; starts,
//!   supersedes, cancels and completes runs.
//! - [`SlideDeck`]: turns slideshow updates into [`SlideChange`]s, pixel reveals included.
//!
//! Pixels are premultiplied RGBA8 end to end; [`CpuSurface`] rasterizes with `vello_cpu`.
#![forbid(unsafe_code)]

mod assets;
mod foundation;
mod render;
mod slide;
mod transition;

pub use assets::decode::{
    Bitmap, decode_image, premultiply_rgba8_in_place, unpremultiply_rgba8_in_place,
};
pub use assets::loader::{
    AssetLoader, LoadArena, LoadedPair, LoaderMode, PendingLoad, PendingPair, SlotFailure,
};
pub use assets::source::ImageSource;
pub use foundation::config::{DEFAULT_BLOCK_SIZE, TransitionConfig};
pub use foundation::core::{
    Affine, PixelRect, Point, Rect, Rgba8Premul, SurfaceSize, Vec2, rotation_about,
};
pub use foundation::error::{AssetSide, LoadFailure, PixelSlideError, PixelSlideResult};
pub use foundation::math::{RandomSource, Rng64};
pub use render::composite::{PremulRgba8, over};
pub use render::cpu::CpuSurface;
pub use render::surface::DrawSurface;
pub use slide::deck::{PixelTransitionRequest, SlideChange, SlideDeck};
pub use slide::model::{
    DEFAULT_TRANSITION_TIME, SlideUpdate, TRANSITION_TIME_UNIT, TextElement, TransitionEffect,
};
pub use transition::engine::{
    CancelReason, CancelToken, FrameOutcome, RunId, RunPhase, RunState, TransitionEngine,
};
pub use transition::frame::{BlockStyle, FrameStats, draw_reveal_frame};
pub use transition::plan::{Block, BlockVariant, GridDims, RevealPlan, grid_dims, reveal_count};
pub use transition::schedule::{FrameRequestId, FrameScheduler, FrameTarget, RefreshLoop};
