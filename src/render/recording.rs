//! Draw-call recorder used by tests to assert what a frame painted.

use crate::{
    assets::decode::Bitmap,
    foundation::{
        core::{PixelRect, Rect, Rgba8Premul, SurfaceSize},
        error::{PixelSlideError, PixelSlideResult},
    },
    render::surface::DrawSurface,
};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum DrawOp {
    Clear,
    Bitmap {
        bitmap: (u32, u32),
        src: Rect,
        dst: PixelRect,
    },
    Rotated {
        src: Rect,
        dst: PixelRect,
        angle_deg: f64,
    },
    Stroke {
        rect: PixelRect,
        color: Rgba8Premul,
    },
}

#[derive(Debug)]
pub(crate) struct RecordingSurface {
    pub(crate) container: Option<SurfaceSize>,
    pub(crate) size: SurfaceSize,
    pub(crate) ops: Vec<DrawOp>,
    pub(crate) resizes: usize,
    pub(crate) presents: usize,
}

impl RecordingSurface {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            container: Some(SurfaceSize::new(width, height)),
            size: SurfaceSize::new(0, 0),
            ops: Vec::new(),
            resizes: 0,
            presents: 0,
        }
    }

    /// Number of frames painted so far (each starts with a clear).
    pub(crate) fn frames(&self) -> usize {
        self.ops.iter().filter(|op| **op == DrawOp::Clear).count()
    }

    fn check(&self) -> PixelSlideResult<()> {
        match self.container {
            Some(c) if !c.is_empty() => Ok(()),
            _ => Err(PixelSlideError::surface_unavailable("recording surface detached")),
        }
    }
}

impl DrawSurface for RecordingSurface {
    fn resize_to_container(&mut self) -> PixelSlideResult<SurfaceSize> {
        self.check()?;
        self.resizes += 1;
        if let Some(c) = self.container {
            self.size = c;
        }
        Ok(self.size)
    }

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn clear(&mut self) -> PixelSlideResult<()> {
        self.check()?;
        self.ops.push(DrawOp::Clear);
        Ok(())
    }

    fn draw_bitmap(&mut self, bitmap: &Bitmap, src: Rect, dst: PixelRect) -> PixelSlideResult<()> {
        self.check()?;
        self.ops.push(DrawOp::Bitmap {
            bitmap: (bitmap.width, bitmap.height),
            src,
            dst,
        });
        Ok(())
    }

    fn draw_bitmap_rotated(
        &mut self,
        _bitmap: &Bitmap,
        src: Rect,
        dst: PixelRect,
        angle_deg: f64,
    ) -> PixelSlideResult<()> {
        self.check()?;
        self.ops.push(DrawOp::Rotated {
            src,
            dst,
            angle_deg,
        });
        Ok(())
    }

    fn stroke_rect(&mut self, rect: PixelRect, color: Rgba8Premul) -> PixelSlideResult<()> {
        self.check()?;
        self.ops.push(DrawOp::Stroke { rect, color });
        Ok(())
    }

    fn present(&mut self) -> PixelSlideResult<()> {
        self.check()?;
        self.presents += 1;
        Ok(())
    }
}
