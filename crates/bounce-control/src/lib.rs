//! Control layer for a per-frame rendering engine.
//!
//! Keeps one engine instance per render surface in sync with user-adjustable
//! configuration and drives it from a start/stop animation loop:
//!
//! - `config`: `ConfigState`, `Action` and the pure `reduce` function
//! - `store`: versioned state that publishes a `ConfigChange` per accepted action
//! - `engine`: the boundary contract an engine implements
//! - `animation`: the loop controller and the frame scheduling primitive
//! - `reconfigure`: swaps the live engine handle when the configuration changes
//! - `bootstrap`: the one-time engine load and first create
//! - `surface`: `RenderSurface`, the context object tying the above together

pub mod animation;
pub mod bootstrap;
pub mod config;
pub mod engine;
pub mod reconfigure;
pub mod store;
pub mod surface;

pub mod logging;
pub mod time;

#[cfg(test)]
mod testing;

pub use animation::{AnimationController, FrameRequest, FrameScheduler, LoopState, ManualScheduler};
pub use bootstrap::{BootError, BootState, Bootstrapper};
pub use config::{Action, ConfigError, ConfigState};
pub use engine::{EngineBinding, EngineHandle};
pub use reconfigure::{ReconfigurationCoordinator, Reconfigured};
pub use store::{ConfigChange, ConfigStore};
pub use surface::{ControlError, RenderSurface};
