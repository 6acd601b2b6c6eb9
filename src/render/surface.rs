use crate::{
    assets::decode::Bitmap,
    foundation::{
        core::{PixelRect, Rect, Rgba8Premul, SurfaceSize},
        error::PixelSlideResult,
    },
};

/// A 2D drawing target a transition paints into.
///
/// Source rectangles are in bitmap pixel space; destination rectangles are in surface pixels.
/// Implementations report a missing or zero-sized container as
/// [`crate::PixelSlideError::SurfaceUnavailable`] from any call.
pub trait DrawSurface {
    /// Match the surface to its container and return the new size.
    fn resize_to_container(&mut self) -> PixelSlideResult<SurfaceSize>;

    /// Current size in device pixels.
    fn size(&self) -> SurfaceSize;

    /// Reset every pixel to transparent.
    fn clear(&mut self) -> PixelSlideResult<()>;

    /// Draw `src` of `bitmap` into `dst`, scaling as needed.
    fn draw_bitmap(&mut self, bitmap: &Bitmap, src: Rect, dst: PixelRect) -> PixelSlideResult<()>;

    /// Draw `src` of `bitmap` at the size of `dst`, centered on `dst` and rotated about its
    /// center by `angle_deg` (clockwise, y down).
    fn draw_bitmap_rotated(
        &mut self,
        bitmap: &Bitmap,
        src: Rect,
        dst: PixelRect,
        angle_deg: f64,
    ) -> PixelSlideResult<()>;

    /// One-pixel outline along the inside of `rect`.
    fn stroke_rect(&mut self, rect: PixelRect, color: Rgba8Premul) -> PixelSlideResult<()>;

    /// Make everything drawn since the last present visible. Called once at the end of a frame.
    fn present(&mut self) -> PixelSlideResult<()> {
        Ok(())
    }
}
