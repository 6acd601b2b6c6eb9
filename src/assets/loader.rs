use std::sync::mpsc;

use crate::{
    assets::{
        decode::{Bitmap, decode_image},
        source::ImageSource,
    },
    foundation::error::{AssetSide, LoadFailure, PixelSlideError, PixelSlideResult},
};

/// A slot of a [`LoadArena`] that failed.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
#[error("slot {slot} failed: {reason}")]
pub struct SlotFailure {
    pub slot: usize,
    pub reason: String,
}

/// Countdown over `N` pending loads that settles exactly once.
///
/// The arena settles when the last slot succeeds, or at the first failure. Completions after
/// that, duplicate completions and out-of-range slots are ignored.
#[derive(Debug)]
pub struct LoadArena<T> {
    slots: Vec<Option<T>>,
    remaining: usize,
    settled: bool,
}

impl<T> LoadArena<T> {
    pub fn new(len: usize) -> Self {
        let mut slots = Vec::with_capacity(len);
        slots.resize_with(len, || None);
        Self {
            slots,
            remaining: len,
            settled: len == 0,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Record the result for `slot`. Returns the outcome on the call that settles the arena.
    pub fn complete(
        &mut self,
        slot: usize,
        result: Result<T, String>,
    ) -> Option<Result<Vec<T>, SlotFailure>> {
        if self.settled {
            return None;
        }
        let Some(entry) = self.slots.get_mut(slot) else {
            tracing::debug!(slot, len = self.slots.len(), "ignoring out-of-range load slot");
            return None;
        };
        if entry.is_some() {
            return None;
        }

        match result {
            Err(reason) => {
                self.settled = true;
                Some(Err(SlotFailure { slot, reason }))
            }
            Ok(value) => {
                *entry = Some(value);
                self.remaining -= 1;
                if self.remaining > 0 {
                    return None;
                }
                self.settled = true;
                Some(Ok(self.slots.iter_mut().filter_map(Option::take).collect()))
            }
        }
    }
}

/// Where decoding runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoaderMode {
    /// Decode on the rayon pool; callers poll without blocking.
    #[default]
    Background,
    /// Decode synchronously inside [`AssetLoader::load`].
    Inline,
}

/// Decodes image sources into [`Bitmap`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct AssetLoader {
    mode: LoaderMode,
}

type SlotResult = (usize, PixelSlideResult<Bitmap>);

impl AssetLoader {
    pub fn new(mode: LoaderMode) -> Self {
        Self { mode }
    }

    /// Start decoding every source. The returned handle settles once all have decoded or one
    /// has failed.
    pub fn load(&self, sources: Vec<ImageSource>) -> PendingLoad {
        let mut pending = PendingLoad {
            arena: LoadArena::new(sources.len()),
            rx: None,
            outcome: None,
        };
        if pending.arena.is_empty() {
            pending.outcome = Some(Ok(Vec::new()));
            return pending;
        }

        match self.mode {
            LoaderMode::Inline => {
                for (slot, source) in sources.iter().enumerate() {
                    pending.accept(slot, decode_source(source));
                    if pending.arena.is_settled() {
                        break;
                    }
                }
            }
            LoaderMode::Background => {
                let (tx, rx) = mpsc::channel::<SlotResult>();
                for (slot, source) in sources.into_iter().enumerate() {
                    let tx = tx.clone();
                    rayon::spawn(move || {
                        // The receiver may be gone if the run was superseded.
                        let _ = tx.send((slot, decode_source(&source)));
                    });
                }
                pending.rx = Some(rx);
            }
        }
        pending
    }

    /// Two-image form used by transitions: slot 0 is previous, slot 1 is next.
    pub fn load_pair(&self, previous: ImageSource, next: ImageSource) -> PendingPair {
        PendingPair {
            inner: self.load(vec![previous, next]),
        }
    }
}

fn decode_source(source: &ImageSource) -> PixelSlideResult<Bitmap> {
    let bytes = source.bytes()?;
    decode_image(&bytes)
}

/// Handle to an in-flight [`AssetLoader::load`] batch.
#[derive(Debug)]
pub struct PendingLoad {
    arena: LoadArena<Bitmap>,
    rx: Option<mpsc::Receiver<SlotResult>>,
    outcome: Option<Result<Vec<Bitmap>, SlotFailure>>,
}

impl PendingLoad {
    /// Whether the batch has settled (its outcome may already have been taken).
    pub fn is_settled(&self) -> bool {
        self.arena.is_settled()
    }

    /// Drain finished decodes without blocking. Returns the outcome exactly once.
    pub fn poll(&mut self) -> Option<Result<Vec<Bitmap>, SlotFailure>> {
        while !self.arena.is_settled() {
            let Some(rx) = &self.rx else {
                break;
            };
            match rx.try_recv() {
                Ok((slot, result)) => self.accept(slot, result),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    self.fail_missing("decoder worker exited");
                    break;
                }
            }
        }
        self.outcome.take()
    }

    /// Block until the batch settles.
    pub fn wait(mut self) -> Result<Vec<Bitmap>, SlotFailure> {
        while !self.arena.is_settled() {
            let Some(rx) = &self.rx else {
                break;
            };
            match rx.recv() {
                Ok((slot, result)) => self.accept(slot, result),
                Err(_) => {
                    self.fail_missing("decoder worker exited");
                    break;
                }
            }
        }
        self.outcome.take().unwrap_or_else(|| {
            Err(SlotFailure {
                slot: 0,
                reason: "load outcome already taken".to_string(),
            })
        })
    }

    fn accept(&mut self, slot: usize, result: PixelSlideResult<Bitmap>) {
        let result = result.map_err(|e| format!("{e:#}"));
        if let Some(outcome) = self.arena.complete(slot, result) {
            match &outcome {
                Ok(bitmaps) => tracing::debug!(count = bitmaps.len(), "image batch decoded"),
                Err(failure) => tracing::warn!(
                    slot = failure.slot,
                    reason = %failure.reason,
                    "image decode failed"
                ),
            }
            self.outcome = Some(outcome);
        }
    }

    fn fail_missing(&mut self, reason: &str) {
        let missing = self
            .arena
            .slots
            .iter()
            .position(Option::is_none)
            .unwrap_or(0);
        self.accept(missing, Err(PixelSlideError::render(reason)));
    }
}

/// Decoded previous/next images of one transition.
#[derive(Clone, Debug)]
pub struct LoadedPair {
    pub previous: Bitmap,
    pub next: Bitmap,
}

/// [`PendingLoad`] specialised to a previous/next pair.
#[derive(Debug)]
pub struct PendingPair {
    inner: PendingLoad,
}

impl PendingPair {
    pub fn is_settled(&self) -> bool {
        self.inner.is_settled()
    }

    /// Non-blocking; returns the outcome exactly once.
    pub fn poll(&mut self) -> Option<Result<LoadedPair, LoadFailure>> {
        self.inner.poll().map(into_pair)
    }

    pub fn wait(self) -> Result<LoadedPair, LoadFailure> {
        into_pair(self.inner.wait())
    }
}

fn into_pair(outcome: Result<Vec<Bitmap>, SlotFailure>) -> Result<LoadedPair, LoadFailure> {
    match outcome {
        Ok(bitmaps) => {
            let mut it = bitmaps.into_iter();
            match (it.next(), it.next()) {
                (Some(previous), Some(next)) => Ok(LoadedPair { previous, next }),
                _ => Err(LoadFailure::new(
                    AssetSide::Next,
                    "image batch settled without both images",
                )),
            }
        }
        Err(failure) => Err(LoadFailure::new(
            AssetSide::from_slot(failure.slot),
            failure.reason,
        )),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
