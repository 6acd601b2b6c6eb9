use std::time::Duration;

use crate::{
    assets::source::ImageSource,
    foundation::error::{PixelSlideError, PixelSlideResult},
};

/// `transition-time` used when an update carries 0 (or nothing).
pub const DEFAULT_TRANSITION_TIME: i64 = 20;

/// One unit of `transition-time`.
pub const TRANSITION_TIME_UNIT: Duration = Duration::from_millis(100);

/// Slide-to-slide effect named by an update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum TransitionEffect {
    #[default]
    Fade,
    Slide,
    /// Block reveal drawn by [`crate::TransitionEngine`].
    Pixel,
}

impl TransitionEffect {
    /// Case-insensitive; anything unrecognized is `Fade`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "pixel" => Self::Pixel,
            "slide" => Self::Slide,
            _ => Self::Fade,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fade => "fade",
            Self::Slide => "slide",
            Self::Pixel => "pixel",
        }
    }
}

impl From<String> for TransitionEffect {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

/// Text overlay positioned in slide pixels.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TextElement {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    #[serde(
        rename = "fontSize",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub font_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
}

/// A slide pushed by the slideshow server.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SlideUpdate {
    /// Data URI or bare base64 payload; empty means "no image".
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub text: Vec<TextElement>,
    #[serde(rename = "text-color", default = "default_text_color")]
    pub text_color: String,
    #[serde(rename = "transition-effect", default)]
    pub transition_effect: TransitionEffect,
    #[serde(rename = "transition-time", default)]
    pub transition_time: i64,
}

fn default_text_color() -> String {
    "white".to_owned()
}

impl Default for SlideUpdate {
    fn default() -> Self {
        Self {
            image: String::new(),
            text: Vec::new(),
            text_color: default_text_color(),
            transition_effect: TransitionEffect::Fade,
            transition_time: DEFAULT_TRANSITION_TIME,
        }
    }
}

impl SlideUpdate {
    pub fn from_json_str(s: &str) -> PixelSlideResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| PixelSlideError::serde(format!("slide update parse failed: {e}")))
    }

    /// Parse either a single update object or an array of them.
    pub fn list_from_json_str(s: &str) -> PixelSlideResult<Vec<Self>> {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            Many(Vec<SlideUpdate>),
            One(Box<SlideUpdate>),
        }

        let parsed: OneOrMany = serde_json::from_str(s)
            .map_err(|e| PixelSlideError::serde(format!("slide updates parse failed: {e}")))?;
        Ok(match parsed {
            OneOrMany::Many(v) => v,
            OneOrMany::One(u) => vec![*u],
        })
    }

    pub fn has_image(&self) -> bool {
        !self.image.trim().is_empty()
    }

    /// Duration of a fade or slide: `transition-time` in units of 100 ms. Zero or negative means
    /// the default of 20 (2 s). Pixel reveals do not use it.
    pub fn transition_duration(&self) -> Duration {
        let units = if self.transition_time > 0 {
            self.transition_time
        } else {
            DEFAULT_TRANSITION_TIME
        };
        TRANSITION_TIME_UNIT.saturating_mul(u32::try_from(units).unwrap_or(u32::MAX))
    }

    /// Source for this slide's image, or `None` when it has none.
    pub fn image_source(&self) -> PixelSlideResult<Option<ImageSource>> {
        if !self.has_image() {
            return Ok(None);
        }
        ImageSource::from_slide_image(&self.image).map(Some)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/slide/model.rs"]
mod tests;
