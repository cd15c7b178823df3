//! Animation-loop lifecycle.

mod controller;
mod scheduler;

pub use controller::{AnimationController, LoopState};
pub use scheduler::{FrameRequest, FrameScheduler, ManualScheduler};
