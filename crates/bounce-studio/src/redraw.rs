use bounce_control::{EngineBinding, RenderSurface};

use crate::scheduler::RedrawScheduler;

/// A live handle that can draw its current state again without advancing it.
pub trait Present {
    fn present(&self);
}

/// Outcome of one `RedrawRequested`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Redraw {
    /// The armed animation frame was delivered.
    Ticked,
    /// No frame was due; the live handle was drawn as it is.
    Presented,
    /// Nothing to draw yet.
    Nothing,
}

/// Handles a window redraw.
///
/// A running loop gets its armed frame. Any other redraw (an expose, a resize,
/// a stale request) repaints the live handle without stepping it, so an idle
/// surface still shows its latest configuration.
pub fn deliver<B>(surface: &mut RenderSurface<B, RedrawScheduler>) -> Redraw
where
    B: EngineBinding,
    B::Handle: Present,
{
    if let Some(request) = surface.scheduler_mut().take_armed() {
        if surface.on_frame(request).is_some() {
            return Redraw::Ticked;
        }
    }

    match surface.controller().handle() {
        Some(handle) => {
            handle.present();
            Redraw::Presented
        }
        None => Redraw::Nothing,
    }
}
