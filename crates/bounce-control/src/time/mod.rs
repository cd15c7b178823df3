//! Frame timing for the animation loop.
//!
//! One `FrameClock` per `AnimationController`; it is ticked once per frame and
//! reset whenever the loop starts.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
