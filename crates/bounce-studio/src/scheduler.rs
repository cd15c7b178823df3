use bounce_control::{FrameRequest, FrameScheduler};

/// Frame scheduler backed by window redraw requests.
///
/// `request_frame` asks the window for a redraw; the runtime hands the armed
/// token back to the surface when `RedrawRequested` arrives. Redraws the OS
/// sends on its own find nothing armed; they repaint without ticking
/// (see `redraw::deliver`).
pub struct RedrawScheduler {
    wake: Box<dyn Fn()>,
    next: u64,
    armed: Option<FrameRequest>,
}

impl RedrawScheduler {
    pub fn new(wake: impl Fn() + 'static) -> Self {
        Self {
            wake: Box::new(wake),
            next: 0,
            armed: None,
        }
    }

    /// Takes the outstanding request, if any.
    pub fn take_armed(&mut self) -> Option<FrameRequest> {
        self.armed.take()
    }
}

impl FrameScheduler for RedrawScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        self.next += 1;
        let request = FrameRequest(self.next);
        self.armed = Some(request);
        (self.wake)();
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.armed == Some(request) {
            self.armed = None;
        }
    }
}
