use std::{
    cell::Cell,
    rc::Rc,
    time::{Duration, Instant},
};

use crate::{
    assets::{
        decode::Bitmap,
        loader::{AssetLoader, LoadedPair, PendingPair},
        source::ImageSource,
    },
    foundation::{
        config::TransitionConfig,
        error::{LoadFailure, PixelSlideError, PixelSlideResult},
        math::{RandomSource, Rng64},
    },
    render::surface::DrawSurface,
    transition::{
        frame::{BlockStyle, FrameStats, draw_reveal_frame},
        plan::RevealPlan,
        schedule::{FrameRequestId, FrameScheduler, FrameTarget},
    },
};

/// Identifies one `begin_*` call on an engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RunId(pub u64);

/// Why a run stopped before reaching progress 1.0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CancelReason {
    /// `cancel_run` or the run's [`CancelToken`].
    Requested,
    /// A newer run took over the surface.
    Superseded,
    /// The surface lost its container or has zero size.
    SurfaceUnavailable,
    /// Any other drawing error.
    RenderFailed,
}

/// Lifecycle of the engine's current (or most recent) run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Loading,
    Running,
    Completed,
    Cancelled(CancelReason),
    Failed(LoadFailure),
}

impl RunPhase {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Loading | Self::Running)
    }
}

/// Cooperative cancellation flag of a run, observed at the start of its next frame.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Timing of a running reveal. The clock starts at the first frame drawn.
#[derive(Clone, Debug)]
pub struct RunState {
    start: Option<Instant>,
    duration: Duration,
}

impl RunState {
    pub fn new(duration: Duration) -> Self {
        Self {
            start: None,
            duration,
        }
    }

    pub fn start(&self) -> Option<Instant> {
        self.start
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// `clamp((now - start) / duration, 0, 1)`, latching `start` on the first call.
    pub fn progress(&mut self, now: Instant) -> f64 {
        let start = *self.start.get_or_insert(now);
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(start);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }
}

/// Result of one frame callback.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameOutcome {
    /// Not this engine's pending request, or nothing is running.
    Ignored,
    /// Images are still decoding; another frame was requested.
    Waiting,
    /// A frame was drawn and another requested.
    Drawn(FrameStats),
    /// The final frame was drawn and the completion callback ran.
    Completed(FrameStats),
    /// The run stopped without completing.
    Cancelled(CancelReason),
    /// An image failed to decode; nothing was drawn.
    LoadFailed(LoadFailure),
}

type Completion = Box<dyn FnOnce(RunId)>;

struct ActiveRun {
    id: RunId,
    cancel: CancelToken,
    on_complete: Option<Completion>,
    stage: Stage,
}

enum Stage {
    Loading {
        pending: PendingPair,
        duration: Duration,
    },
    Running(Box<Reveal>),
}

struct Reveal {
    state: RunState,
    plan: RevealPlan,
    previous: Bitmap,
    next: Bitmap,
}

/// Drives block-reveal transitions on one surface.
///
/// The engine holds at most one frame request with its scheduler at any time; starting a run
/// while another is active cancels the old one and withdraws its request first.
pub struct TransitionEngine<S: DrawSurface, F: FrameScheduler> {
    surface: S,
    scheduler: F,
    loader: AssetLoader,
    config: TransitionConfig,
    style: BlockStyle,
    rng: Box<dyn RandomSource>,
    phase: RunPhase,
    run: Option<ActiveRun>,
    frame_request: Option<FrameRequestId>,
    next_run_id: u64,
    last_frame: Option<FrameStats>,
    last_error: Option<String>,
}

impl<S: DrawSurface, F: FrameScheduler> TransitionEngine<S, F> {
    pub fn new(surface: S, scheduler: F, config: TransitionConfig) -> PixelSlideResult<Self> {
        config.validate()?;
        let rng = config.seed.map(Rng64::new).unwrap_or_else(Rng64::from_clock);
        Ok(Self {
            surface,
            scheduler,
            loader: AssetLoader::default(),
            style: BlockStyle::from_config(&config),
            config,
            rng: Box::new(rng),
            phase: RunPhase::Idle,
            run: None,
            frame_request: None,
            next_run_id: 0,
            last_frame: None,
            last_error: None,
        })
    }

    pub fn with_loader(mut self, loader: AssetLoader) -> Self {
        self.loader = loader;
        self
    }

    /// Replace the randomness behind variant assignment and ordering.
    pub fn with_random_source(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn phase(&self) -> &RunPhase {
        &self.phase
    }

    pub fn current_run(&self) -> Option<RunId> {
        self.run.as_ref().map(|r| r.id)
    }

    /// Cancellation flag of the active run, for hosts that stop it from elsewhere.
    pub fn cancel_token(&self) -> Option<CancelToken> {
        self.run.as_ref().map(|r| r.cancel.clone())
    }

    /// Plan of the running reveal, once images are ready.
    pub fn plan(&self) -> Option<&RevealPlan> {
        match &self.run.as_ref()?.stage {
            Stage::Running(reveal) => Some(&reveal.plan),
            Stage::Loading { .. } => None,
        }
    }

    pub fn has_frame_request(&self) -> bool {
        self.frame_request.is_some()
    }

    /// Stats of the most recently drawn frame.
    pub fn last_frame(&self) -> Option<FrameStats> {
        self.last_frame
    }

    /// Message of the error that ended the last run early, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Start a reveal from already decoded bitmaps.
    ///
    /// Sizes the surface to its container, builds the plan and requests the first frame.
    /// `on_complete` runs once if the reveal reaches progress 1.0 and never otherwise. Fails
    /// with [`PixelSlideError::SurfaceUnavailable`] (and phase `Cancelled`) if the surface
    /// cannot be sized.
    #[tracing::instrument(
        skip(self, previous, next, on_complete),
        fields(duration_ms = duration.as_millis() as u64)
    )]
    pub fn begin_run(
        &mut self,
        previous: Bitmap,
        next: Bitmap,
        duration: Duration,
        on_complete: impl FnOnce(RunId) + 'static,
    ) -> PixelSlideResult<RunId> {
        self.supersede();
        let id = self.allocate_run_id();

        let reveal = match self.prepare_reveal(previous, next, duration) {
            Ok(reveal) => reveal,
            Err(err) => {
                self.finish_early(&err);
                return Err(err);
            }
        };

        self.run = Some(ActiveRun {
            id,
            cancel: CancelToken::default(),
            on_complete: Some(Box::new(on_complete)),
            stage: Stage::Running(Box::new(reveal)),
        });
        self.set_phase(RunPhase::Running);
        self.register_frame();
        Ok(id)
    }

    /// Start a reveal from image sources; decoding happens through the engine's loader.
    ///
    /// The engine stays `Loading` until both images are decoded, polling on each frame. A
    /// decode failure ends the run as `Failed` without touching the surface.
    #[tracing::instrument(
        skip(self, previous, next, on_complete),
        fields(previous = %previous.describe(), next = %next.describe())
    )]
    pub fn begin_transition(
        &mut self,
        previous: ImageSource,
        next: ImageSource,
        duration: Duration,
        on_complete: impl FnOnce(RunId) + 'static,
    ) -> RunId {
        self.supersede();
        let id = self.allocate_run_id();
        let pending = self.loader.load_pair(previous, next);

        self.run = Some(ActiveRun {
            id,
            cancel: CancelToken::default(),
            on_complete: Some(Box::new(on_complete)),
            stage: Stage::Loading { pending, duration },
        });
        self.set_phase(RunPhase::Loading);
        self.register_frame();
        id
    }

    /// Stop the active run now. No further frames are drawn and its completion never runs.
    /// No-op when nothing is active.
    pub fn cancel_run(&mut self) {
        if self.run.is_some() {
            self.stop(CancelReason::Requested);
        }
    }

    /// Frame callback for request `id` at refresh time `now`.
    pub fn on_frame(&mut self, id: FrameRequestId, now: Instant) -> FrameOutcome {
        if self.frame_request != Some(id) {
            return FrameOutcome::Ignored;
        }
        self.frame_request = None;

        let Some(mut run) = self.run.take() else {
            return FrameOutcome::Ignored;
        };
        if run.cancel.is_cancelled() {
            self.set_phase(RunPhase::Cancelled(CancelReason::Requested));
            return FrameOutcome::Cancelled(CancelReason::Requested);
        }

        if let Stage::Loading { pending, duration } = &mut run.stage {
            let LoadedPair { previous, next } = match pending.poll() {
                None => {
                    self.run = Some(run);
                    self.register_frame();
                    return FrameOutcome::Waiting;
                }
                Some(Err(failure)) => {
                    tracing::warn!(run = run.id.0, %failure, "transition images failed to load");
                    self.set_phase(RunPhase::Failed(failure.clone()));
                    return FrameOutcome::LoadFailed(failure);
                }
                Some(Ok(pair)) => pair,
            };
            let duration = *duration;
            match self.prepare_reveal(previous, next, duration) {
                Ok(reveal) => run.stage = Stage::Running(Box::new(reveal)),
                Err(err) => {
                    run.cancel.cancel();
                    return FrameOutcome::Cancelled(self.finish_early(&err));
                }
            }
            self.set_phase(RunPhase::Running);
        }

        let Stage::Running(reveal) = &mut run.stage else {
            return FrameOutcome::Ignored;
        };
        let progress = reveal.state.progress(now);
        let drawn = draw_reveal_frame(
            &mut self.surface,
            &reveal.plan,
            &reveal.previous,
            &reveal.next,
            progress,
            &self.style,
        );

        if let Ok(stats) = &drawn {
            self.last_frame = Some(*stats);
        }
        match drawn {
            Err(err) => {
                run.cancel.cancel();
                FrameOutcome::Cancelled(self.finish_early(&err))
            }
            Ok(stats) if progress < 1.0 => {
                self.run = Some(run);
                self.register_frame();
                FrameOutcome::Drawn(stats)
            }
            Ok(stats) => {
                self.set_phase(RunPhase::Completed);
                if let Some(on_complete) = run.on_complete.take() {
                    on_complete(run.id);
                }
                FrameOutcome::Completed(stats)
            }
        }
    }

    fn prepare_reveal(
        &mut self,
        previous: Bitmap,
        next: Bitmap,
        duration: Duration,
    ) -> PixelSlideResult<Reveal> {
        let size = self.surface.resize_to_container()?;
        let plan = RevealPlan::build(
            size,
            self.config.block_size,
            self.config.diagonal_bias,
            &mut *self.rng,
        )?;
        Ok(Reveal {
            state: RunState::new(duration),
            plan,
            previous,
            next,
        })
    }

    fn supersede(&mut self) {
        if self.run.is_some() {
            self.stop(CancelReason::Superseded);
        }
        self.last_frame = None;
        self.last_error = None;
    }

    fn stop(&mut self, reason: CancelReason) {
        self.withdraw_frame();
        if let Some(run) = self.run.take() {
            run.cancel.cancel();
            tracing::debug!(run = run.id.0, ?reason, "run cancelled");
        }
        self.set_phase(RunPhase::Cancelled(reason));
    }

    /// End the active run because of `err`; never propagated into the scheduler.
    fn finish_early(&mut self, err: &PixelSlideError) -> CancelReason {
        let reason = if err.is_surface_unavailable() {
            CancelReason::SurfaceUnavailable
        } else {
            CancelReason::RenderFailed
        };
        tracing::warn!(error = %err, ?reason, "transition stopped");
        self.last_error = Some(err.to_string());
        self.stop(reason);
        reason
    }

    fn register_frame(&mut self) {
        self.withdraw_frame();
        self.frame_request = Some(self.scheduler.request_frame());
    }

    fn withdraw_frame(&mut self) {
        if let Some(id) = self.frame_request.take() {
            self.scheduler.cancel_frame(id);
        }
    }

    fn allocate_run_id(&mut self) -> RunId {
        self.next_run_id += 1;
        RunId(self.next_run_id)
    }

    fn set_phase(&mut self, phase: RunPhase) {
        if self.phase != phase {
            tracing::debug!(from = ?self.phase, to = ?phase, "transition phase");
        }
        self.phase = phase;
    }
}

impl<S: DrawSurface, F: FrameScheduler> FrameTarget for TransitionEngine<S, F> {
    fn on_frame(&mut self, id: FrameRequestId, now: Instant) -> bool {
        if self.frame_request != Some(id) {
            return false;
        }
        TransitionEngine::on_frame(self, id, now);
        true
    }
}

impl<S: DrawSurface, F: FrameScheduler> Drop for TransitionEngine<S, F> {
    fn drop(&mut self) {
        self.withdraw_frame();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transition/engine.rs"]
mod tests;
