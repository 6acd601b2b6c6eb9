use std::sync::Arc;

use crate::{
    assets::decode::{Bitmap, unpremultiply_rgba8_in_place},
    foundation::{
        core::{Affine, PixelRect, Rect, Rgba8Premul, SurfaceSize, Vec2, rotation_about},
        error::{PixelSlideError, PixelSlideResult},
    },
    render::{
        composite::{PremulRgba8, over},
        surface::DrawSurface,
    },
};

const IMAGE_CACHE_CAPACITY: usize = 4;

/// Software raster surface backed by `vello_cpu`, holding premultiplied RGBA8 pixels.
///
/// Draw calls are recorded into a render context and rasterized on
/// [`DrawSurface::present`]; pixel accessors show the last presented state. The container
/// models the host element the surface is laid out in; detaching it makes every draw call fail
/// with [`PixelSlideError::SurfaceUnavailable`].
pub struct CpuSurface {
    container: Option<SurfaceSize>,
    size: SurfaceSize,
    raster: Option<Raster>,
    images: Vec<(Arc<Vec<u8>>, vello_cpu::Image)>,
}

struct Raster {
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    scratch: vello_cpu::Pixmap,
    pending: bool,
}

impl Raster {
    fn new(size: SurfaceSize) -> PixelSlideResult<Option<Self>> {
        if size.is_empty() {
            return Ok(None);
        }
        let w = dim_u16(size.width, "surface width")?;
        let h = dim_u16(size.height, "surface height")?;
        Ok(Some(Self {
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
            scratch: vello_cpu::Pixmap::new(w, h),
            pending: false,
        }))
    }
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("container", &self.container)
            .field("size", &self.size)
            .field("cached_images", &self.images.len())
            .finish_non_exhaustive()
    }
}

impl CpuSurface {
    /// Surface attached to a container of `container` size, already sized to it.
    ///
    /// A container wider or taller than `u16::MAX` leaves the surface unsized; the first
    /// [`DrawSurface::resize_to_container`] reports it.
    pub fn new(container: SurfaceSize) -> Self {
        let raster = Raster::new(container).ok().flatten();
        let size = if raster.is_some() {
            container
        } else {
            SurfaceSize::new(0, 0)
        };
        Self {
            container: Some(container),
            size,
            raster,
            images: Vec::new(),
        }
    }

    /// Surface with no container; runs on it fail until one is attached.
    pub fn detached() -> Self {
        Self {
            container: None,
            size: SurfaceSize::new(0, 0),
            raster: None,
            images: Vec::new(),
        }
    }

    /// Attach, resize or (with `None`) detach the container. Pixels are kept until the next
    /// [`DrawSurface::resize_to_container`].
    pub fn set_container(&mut self, container: Option<SurfaceSize>) {
        self.container = container;
    }

    pub fn container(&self) -> Option<SurfaceSize> {
        self.container
    }

    pub fn pixel(&self, x: u32, y: u32) -> PremulRgba8 {
        let i = ((y as usize) * (self.size.width as usize) + (x as usize)) * 4;
        let d = self.data();
        [d[i], d[i + 1], d[i + 2], d[i + 3]]
    }

    /// Premultiplied RGBA8, row-major, as of the last present.
    pub fn data(&self) -> &[u8] {
        match &self.raster {
            Some(r) => r.pixmap.data_as_u8_slice(),
            None => &[],
        }
    }

    /// Straight-alpha copy suitable for writing image files.
    pub fn to_rgba_image(&self) -> PixelSlideResult<image::RgbaImage> {
        let mut straight = self.data().to_vec();
        unpremultiply_rgba8_in_place(&mut straight);
        image::RgbaImage::from_raw(self.size.width, self.size.height, straight)
            .ok_or_else(|| PixelSlideError::render("surface buffer does not match its size"))
    }

    fn attached_size(&self) -> PixelSlideResult<SurfaceSize> {
        let c = self.container.ok_or_else(|| {
            PixelSlideError::surface_unavailable("surface is detached from its container")
        })?;
        SurfaceSize::non_empty(c.width, c.height)
    }

    fn raster_mut(&mut self) -> PixelSlideResult<&mut Raster> {
        self.attached_size()?;
        self.raster.as_mut().ok_or_else(|| {
            PixelSlideError::surface_unavailable("surface has not been sized to its container")
        })
    }

    fn image_paint(&mut self, bitmap: &Bitmap) -> PixelSlideResult<vello_cpu::Image> {
        if let Some((_, paint)) = self
            .images
            .iter()
            .find(|(bytes, _)| Arc::ptr_eq(bytes, &bitmap.rgba8_premul))
        {
            return Ok(paint.clone());
        }

        let pixmap = premul_bytes_to_pixmap(&bitmap.rgba8_premul, bitmap.width, bitmap.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        if self.images.len() >= IMAGE_CACHE_CAPACITY {
            self.images.remove(0);
        }
        self.images.push((bitmap.rgba8_premul.clone(), paint.clone()));
        Ok(paint)
    }

    /// Fill `src` of `bitmap` mapped through `transform` (bitmap space to surface space).
    fn fill_image(
        &mut self,
        bitmap: &Bitmap,
        src: Rect,
        transform: Affine,
    ) -> PixelSlideResult<()> {
        let paint = self.image_paint(bitmap)?;
        let raster = self.raster_mut()?;
        raster.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        raster.ctx.set_transform(affine_to_cpu(transform));
        raster.ctx.set_paint(paint);
        raster.ctx.fill_rect(&rect_to_cpu(src));
        raster.pending = true;
        Ok(())
    }
}

impl DrawSurface for CpuSurface {
    fn resize_to_container(&mut self) -> PixelSlideResult<SurfaceSize> {
        let size = self.attached_size()?;
        if size != self.size || self.raster.is_none() {
            self.raster = Raster::new(size)?;
            self.size = size;
        }
        Ok(size)
    }

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn clear(&mut self) -> PixelSlideResult<()> {
        let raster = self.raster_mut()?;
        raster.ctx.reset();
        raster.pending = false;
        raster.pixmap.data_as_u8_slice_mut().fill(0);
        Ok(())
    }

    fn draw_bitmap(&mut self, bitmap: &Bitmap, src: Rect, dst: PixelRect) -> PixelSlideResult<()> {
        self.attached_size()?;
        if dst.is_empty() || src.width() <= 0.0 || src.height() <= 0.0 {
            return Ok(());
        }
        let scale = Affine::scale_non_uniform(
            f64::from(dst.w) / src.width(),
            f64::from(dst.h) / src.height(),
        );
        let transform = Affine::translate(Vec2::new(f64::from(dst.x), f64::from(dst.y)))
            * scale
            * Affine::translate(-src.origin().to_vec2());
        self.fill_image(bitmap, src, transform)
    }

    fn draw_bitmap_rotated(
        &mut self,
        bitmap: &Bitmap,
        src: Rect,
        dst: PixelRect,
        angle_deg: f64,
    ) -> PixelSlideResult<()> {
        self.attached_size()?;
        if dst.is_empty() || src.width() <= 0.0 || src.height() <= 0.0 {
            return Ok(());
        }
        let scale = Affine::scale_non_uniform(
            f64::from(dst.w) / src.width(),
            f64::from(dst.h) / src.height(),
        );
        let transform = rotation_about(dst.center(), angle_deg)
            * scale
            * Affine::translate(-src.center().to_vec2());
        self.fill_image(bitmap, src, transform)
    }

    fn stroke_rect(&mut self, rect: PixelRect, color: Rgba8Premul) -> PixelSlideResult<()> {
        let raster = self.raster_mut()?;
        if rect.is_empty() {
            return Ok(());
        }
        let [r, g, b, a] = color.to_straight_array();
        raster.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        raster.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));

        let outer = rect.to_kurbo();
        if rect.w <= 2 || rect.h <= 2 {
            // Nothing is left inside a one-pixel outline.
            raster.ctx.fill_rect(&rect_to_cpu(outer));
        } else {
            raster.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(1.0));
            raster.ctx.stroke_rect(&rect_to_cpu(outer.inset(-0.5)));
        }
        raster.pending = true;
        Ok(())
    }

    fn present(&mut self) -> PixelSlideResult<()> {
        let raster = self.raster_mut()?;
        if !raster.pending {
            return Ok(());
        }
        raster.ctx.flush();
        raster.scratch.data_as_u8_slice_mut().fill(0);
        raster.ctx.render_to_pixmap(&mut raster.scratch);
        raster.ctx.reset();
        raster.pending = false;

        let src = raster.scratch.data_as_u8_slice();
        let dst = raster.pixmap.data_as_u8_slice_mut();
        for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
            d.copy_from_slice(&out);
        }
        Ok(())
    }
}

fn dim_u16(v: u32, what: &str) -> PixelSlideResult<u16> {
    v.try_into()
        .map_err(|_| PixelSlideError::render(format!("{what} {v} exceeds u16")))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> PixelSlideResult<vello_cpu::Pixmap> {
    let w = dim_u16(width, "bitmap width")?;
    let h = dim_u16(height, "bitmap height")?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(PixelSlideError::render("bitmap byte length mismatch"));
    }

    let mut translucent = false;
    let pixels = rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            translucent |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect::<Vec<_>>();

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        translucent,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
