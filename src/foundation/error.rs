/// Convenience result type used across pixelslide.
pub type PixelSlideResult<T> = Result<T, PixelSlideError>;

/// Which of the two transition images an asset belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetSide {
    /// The frame being replaced.
    Previous,
    /// The frame being revealed.
    Next,
}

impl AssetSide {
    /// Map a load-arena slot of a two-image batch to its side.
    pub fn from_slot(slot: usize) -> Self {
        if slot == 0 { Self::Previous } else { Self::Next }
    }
}

impl std::fmt::Display for AssetSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Previous => f.write_str("previous"),
            Self::Next => f.write_str("next"),
        }
    }
}

/// An image source that could not be read or decoded.
///
/// Kept `Clone` so a failed run can report it from its terminal state.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
#[error("{side} image failed to load: {reason}")]
pub struct LoadFailure {
    /// Side whose source failed.
    pub side: AssetSide,
    /// Human readable cause (decoder or IO message chain).
    pub reason: String,
}

impl LoadFailure {
    /// Build a failure for `side`.
    pub fn new(side: AssetSide, reason: impl Into<String>) -> Self {
        Self {
            side,
            reason: reason.into(),
        }
    }
}

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum PixelSlideError {
    /// Invalid user-provided configuration or input data.
    #[error("validation error: {0}")]
    Validation(String),

    /// One of the transition images failed to load.
    #[error("load failure: {0}")]
    Load(#[from] LoadFailure),

    /// The drawing surface has no container or a zero-sized one.
    #[error("surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// Errors raised while drawing a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PixelSlideError {
    /// Build a [`PixelSlideError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PixelSlideError::SurfaceUnavailable`] value.
    pub fn surface_unavailable(msg: impl Into<String>) -> Self {
        Self::SurfaceUnavailable(msg.into())
    }

    /// Build a [`PixelSlideError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`PixelSlideError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether this error means the surface can no longer be drawn to.
    pub fn is_surface_unavailable(&self) -> bool {
        matches!(self, Self::SurfaceUnavailable(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
