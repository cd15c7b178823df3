use crate::engine::EngineHandle;
use crate::time::{FrameClock, FrameTime};

use super::scheduler::{FrameRequest, FrameScheduler};

/// Frames between two throughput lines in the trace log.
const REPORT_EVERY: u64 = 600;

/// Scheduling state of the animation loop.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopState {
    Idle,
    Running,
}

/// Drives the per-frame loop and owns the live engine handle.
///
/// While `Running`, exactly one frame request is outstanding. Each delivered
/// request ticks the live handle and arms the next one. `stop` withdraws the
/// outstanding request, and any token delivered afterwards is ignored, so no
/// tick happens once `stop` has returned.
///
/// The handle is swapped only through [`take_handle`](Self::take_handle) and
/// [`replace_handle`](Self::replace_handle); a handle that has been taken out
/// can no longer be reached by a tick.
pub struct AnimationController<H, S> {
    state: LoopState,
    handle: Option<H>,
    scheduler: S,
    pending: Option<FrameRequest>,
    clock: FrameClock,
    report_from: Option<FrameTime>,
}

impl<H, S> AnimationController<H, S>
where
    H: EngineHandle,
    S: FrameScheduler,
{
    pub fn new(scheduler: S) -> Self {
        Self {
            state: LoopState::Idle,
            handle: None,
            scheduler,
            pending: None,
            clock: FrameClock::new(),
            report_from: None,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Ticks performed so far, immediate ones included.
    pub fn frame_count(&self) -> u64 {
        self.clock.frames()
    }

    /// The outstanding frame request, if any.
    pub fn pending(&self) -> Option<FrameRequest> {
        self.pending
    }

    pub fn handle(&self) -> Option<&H> {
        self.handle.as_ref()
    }

    pub fn has_handle(&self) -> bool {
        self.handle.is_some()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Starts the loop: one immediate tick, then the next frame is armed.
    pub fn start(&mut self) {
        if self.state == LoopState::Running {
            return;
        }
        self.state = LoopState::Running;
        self.clock.reset();
        self.report_from = None;
        log::debug!("animation loop started at frame {}", self.clock.frames());

        self.advance();
        self.arm();
    }

    /// Stops the loop and withdraws the outstanding frame request.
    pub fn stop(&mut self) {
        if self.state == LoopState::Idle {
            return;
        }
        if let Some(request) = self.pending.take() {
            self.scheduler.cancel_frame(request);
        }
        self.state = LoopState::Idle;
        log::debug!("animation loop stopped at frame {}", self.clock.frames());
    }

    /// Stops a running loop or starts an idle one. Returns the new state.
    pub fn toggle(&mut self) -> LoopState {
        match self.state {
            LoopState::Running => self.stop(),
            LoopState::Idle => self.start(),
        }
        self.state
    }

    /// Delivers a fired frame request.
    ///
    /// Ticks and re-arms only when the loop is running and `request` is the
    /// outstanding one; cancelled or superseded tokens are dropped.
    pub fn on_frame(&mut self, request: FrameRequest) -> Option<FrameTime> {
        if self.state == LoopState::Idle {
            return None;
        }
        if self.pending != Some(request) {
            log::trace!("ignoring stale frame request {request:?}");
            return None;
        }
        self.pending = None;

        let time = self.advance();
        self.arm();
        Some(time)
    }

    /// Ticks the live handle once without touching the schedule.
    pub fn tick_once(&mut self) -> FrameTime {
        self.advance()
    }

    /// Removes the live handle. The caller disposes it.
    pub fn take_handle(&mut self) -> Option<H> {
        self.handle.take()
    }

    /// Installs `handle` as the live one and returns the previous handle.
    pub fn replace_handle(&mut self, handle: H) -> Option<H> {
        self.handle.replace(handle)
    }

    fn arm(&mut self) {
        debug_assert!(self.pending.is_none());
        self.pending = Some(self.scheduler.request_frame());
    }

    fn advance(&mut self) -> FrameTime {
        let time = self.clock.tick();
        if let Some(handle) = self.handle.as_mut() {
            handle.tick();
        }
        self.report(time);
        time
    }

    fn report(&mut self, time: FrameTime) {
        let Some(from) = self.report_from else {
            self.report_from = Some(time);
            return;
        };
        let frames = time.frame_index - from.frame_index;
        if frames < REPORT_EVERY {
            return;
        }
        let secs = time.now.saturating_duration_since(from.now).as_secs_f64();
        if secs > 0.0 {
            log::trace!("{:.1} frames/s over the last {frames} frames", frames as f64 / secs);
        }
        self.report_from = Some(time);
    }
}
