use std::time::Duration;

use crate::{
    assets::source::ImageSource,
    foundation::{config::TransitionConfig, error::PixelSlideResult},
    slide::model::{SlideUpdate, TransitionEffect},
};

/// Inputs for a block-reveal between two slides.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelTransitionRequest {
    pub previous: ImageSource,
    pub next: ImageSource,
    pub duration: Duration,
}

/// What the display should do with an incoming update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlideChange {
    /// Nothing was on screen; show the slide directly.
    Initial,
    /// The image did not change (or the update has none); only overlays may differ.
    ImageUnchanged,
    /// Run a block reveal from the old image to the new one.
    Pixel(PixelTransitionRequest),
    /// A fade or slide the host renders itself.
    Declarative {
        effect: TransitionEffect,
        duration: Duration,
    },
}

/// Tracks the slide on screen and classifies each update against it.
#[derive(Debug)]
pub struct SlideDeck {
    current: Option<SlideUpdate>,
    applied: usize,
    pixel_duration: Duration,
}

impl Default for SlideDeck {
    fn default() -> Self {
        Self {
            current: None,
            applied: 0,
            pixel_duration: TransitionConfig::default().default_duration(),
        }
    }
}

impl SlideDeck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Duration of every pixel reveal. `transition-time` only times declarative effects.
    pub fn with_pixel_duration(mut self, duration: Duration) -> Self {
        self.pixel_duration = duration;
        self
    }

    pub fn pixel_duration(&self) -> Duration {
        self.pixel_duration
    }

    pub fn current(&self) -> Option<&SlideUpdate> {
        self.current.as_ref()
    }

    /// Updates applied so far.
    pub fn applied(&self) -> usize {
        self.applied
    }

    /// Classify `update` against the current slide, then make it current.
    pub fn apply(&mut self, update: SlideUpdate) -> PixelSlideResult<SlideChange> {
        let change = self.classify(&update);
        self.current = Some(update);
        self.applied += 1;
        if let Ok(change) = &change {
            tracing::debug!(slide = self.applied, change = change.kind(), "slide applied");
        }
        change
    }

    fn classify(&self, update: &SlideUpdate) -> PixelSlideResult<SlideChange> {
        let Some(shown) = self.current.as_ref().filter(|s| s.has_image()) else {
            return Ok(SlideChange::Initial);
        };
        if !update.has_image() || shown.image == update.image {
            return Ok(SlideChange::ImageUnchanged);
        }

        match update.transition_effect {
            TransitionEffect::Pixel => Ok(SlideChange::Pixel(PixelTransitionRequest {
                previous: ImageSource::from_slide_image(&shown.image)?,
                next: ImageSource::from_slide_image(&update.image)?,
                duration: self.pixel_duration,
            })),
            effect => Ok(SlideChange::Declarative {
                effect,
                duration: update.transition_duration(),
            }),
        }
    }
}

impl SlideChange {
    fn kind(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::ImageUnchanged => "image_unchanged",
            Self::Pixel(_) => "pixel",
            Self::Declarative { .. } => "declarative",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/slide/deck.rs"]
mod tests;
