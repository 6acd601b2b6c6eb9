use crate::foundation::error::{PixelSlideError, PixelSlideResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Size of a drawing surface in device pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Reject zero-area sizes; a transition cannot run on them.
    pub fn non_empty(width: u32, height: u32) -> PixelSlideResult<Self> {
        if width == 0 || height == 0 {
            return Err(PixelSlideError::surface_unavailable(format!(
                "surface has zero area ({width}x{height})"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixel_count(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    pub fn full_rect(self) -> PixelRect {
        PixelRect::new(0, 0, self.width, self.height)
    }
}

/// Integer pixel rectangle, origin at the top-left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn is_empty(self) -> bool {
        self.w == 0 || self.h == 0
    }

    pub fn right(self) -> u32 {
        self.x.saturating_add(self.w)
    }

    pub fn bottom(self) -> u32 {
        self.y.saturating_add(self.h)
    }

    pub fn center(self) -> Point {
        Point::new(
            f64::from(self.x) + f64::from(self.w) / 2.0,
            f64::from(self.y) + f64::from(self.h) / 2.0,
        )
    }

    /// Shrink the right and bottom edges by `inset`, keeping the origin.
    pub fn inset_trailing(self, inset: u32) -> Self {
        Self {
            x: self.x,
            y: self.y,
            w: self.w.saturating_sub(inset),
            h: self.h.saturating_sub(inset),
        }
    }

    /// Clip to `[0, size.width) x [0, size.height)`.
    pub fn clip_to(self, size: SurfaceSize) -> Self {
        let x = self.x.min(size.width);
        let y = self.y.min(size.height);
        Self {
            x,
            y,
            w: self.right().min(size.width) - x,
            h: self.bottom().min(size.height) - y,
        }
    }

    pub fn to_kurbo(self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.right()),
            f64::from(self.bottom()),
        )
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Straight-alpha components, rounded.
    pub fn to_straight_array(self) -> [u8; 4] {
        if self.a == 0 {
            return [0, 0, 0, 0];
        }
        let a = u16::from(self.a);
        let unpremul = |c: u8| ((u16::from(c) * 255 + a / 2) / a).min(255) as u8;
        [unpremul(self.r), unpremul(self.g), unpremul(self.b), self.a]
    }
}

/// Rotation of a block about its own center, mapping block-local coordinates
/// (origin at the block center) to surface coordinates.
pub fn rotation_about(center: Point, angle_deg: f64) -> Affine {
    Affine::translate(center.to_vec2()) * Affine::rotate(angle_deg.to_radians())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
