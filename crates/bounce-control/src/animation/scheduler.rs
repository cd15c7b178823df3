/// Token for one requested frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FrameRequest(pub u64);

/// The platform primitive that calls back once on the next frame.
///
/// `request_frame` arms exactly one callback. The host delivers it by calling
/// `AnimationController::on_frame` with the returned token.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameRequest;

    /// Withdraws `request`. Delivering a cancelled token afterwards is harmless:
    /// the controller ignores tokens it is not waiting for.
    fn cancel_frame(&mut self, request: FrameRequest);
}

/// Scheduler whose frames fire only when the owner says so.
///
/// Used for headless runs and tests: `fire_next` pops the oldest armed request.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    armed: Vec<FrameRequest>,
    cancelled: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests currently armed.
    pub fn armed(&self) -> &[FrameRequest] {
        &self.armed
    }

    /// Total requests withdrawn through `cancel_frame`.
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }

    /// Removes and returns the oldest armed request.
    pub fn fire_next(&mut self) -> Option<FrameRequest> {
        if self.armed.is_empty() {
            return None;
        }
        Some(self.armed.remove(0))
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        self.next_id += 1;
        let request = FrameRequest(self.next_id);
        self.armed.push(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        let before = self.armed.len();
        self.armed.retain(|r| *r != request);
        if self.armed.len() != before {
            self.cancelled += 1;
        }
    }
}
