use crate::{
    assets::decode::Bitmap,
    foundation::{
        config::TransitionConfig,
        core::{Rect, Rgba8Premul},
        error::PixelSlideResult,
    },
    render::surface::DrawSurface,
    transition::plan::{BlockVariant, RevealPlan},
};

/// Per-variant drawing parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockStyle {
    pub border_inset: u32,
    pub border_color: Rgba8Premul,
    pub max_rotation_deg: f64,
}

impl Default for BlockStyle {
    fn default() -> Self {
        Self::from_config(&TransitionConfig::default())
    }
}

impl BlockStyle {
    pub fn from_config(cfg: &TransitionConfig) -> Self {
        Self {
            border_inset: cfg.border_inset,
            border_color: cfg.border_color(),
            max_rotation_deg: cfg.max_rotation_deg,
        }
    }

    /// Angle shared by every rotated block at `progress`.
    pub fn rotation_at(&self, progress: f64) -> f64 {
        progress.clamp(0.0, 1.0) * self.max_rotation_deg
    }
}

/// What one frame put on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameStats {
    pub progress: f64,
    pub revealed: usize,
    pub total: usize,
    pub rotation_deg: f64,
}

/// Paint one frame of the reveal: the previous image stretched over the whole surface, then
/// the first `reveal_count(progress)` blocks of the plan cut from the next image.
///
/// Every block takes the same pixel rectangle of the next image, unscaled. Plain blocks copy it
/// 1:1, bordered blocks squeeze it into the inset and rotated blocks spin it about the block
/// center. Parts of a block beyond the next image repeat its edge pixels.
pub fn draw_reveal_frame<S: DrawSurface + ?Sized>(
    surface: &mut S,
    plan: &RevealPlan,
    previous: &Bitmap,
    next: &Bitmap,
    progress: f64,
    style: &BlockStyle,
) -> PixelSlideResult<FrameStats> {
    let progress = progress.clamp(0.0, 1.0);
    let size = plan.size();

    surface.clear()?;
    surface.draw_bitmap(previous, bitmap_rect(previous), size.full_rect())?;

    let rotation_deg = style.rotation_at(progress);
    let revealed = plan.revealed(progress);
    for block in revealed {
        let src = block.rect.to_kurbo();
        match block.variant {
            BlockVariant::Plain => surface.draw_bitmap(next, src, block.rect)?,
            BlockVariant::Bordered => {
                let inner = block.rect.inset_trailing(style.border_inset);
                if !inner.is_empty() {
                    surface.draw_bitmap(next, src, inner)?;
                }
                surface.stroke_rect(block.rect, style.border_color)?;
            }
            BlockVariant::Rotated => {
                surface.draw_bitmap_rotated(next, src, block.rect, rotation_deg)?
            }
        }
    }
    surface.present()?;

    Ok(FrameStats {
        progress,
        revealed: revealed.len(),
        total: plan.len(),
        rotation_deg,
    })
}

fn bitmap_rect(bitmap: &Bitmap) -> Rect {
    Rect::new(0.0, 0.0, f64::from(bitmap.width), f64::from(bitmap.height))
}

#[cfg(test)]
#[path = "../../tests/unit/transition/frame.rs"]
mod tests;
