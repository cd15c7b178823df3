//! Boundary contract of the rendering engine.
//!
//! The control layer never looks inside an engine. It loads the engine once,
//! creates handles from configuration snapshots, ticks the live handle once per
//! frame and drops superseded handles.

use std::future::Future;

use anyhow::Result;

use crate::config::ConfigState;

/// A live engine instance bound to a surface and a configuration snapshot.
///
/// Dropping the handle disposes it.
pub trait EngineHandle {
    /// Performs one frame's worth of work against the bound surface.
    ///
    /// Called once per frame; must not block.
    fn tick(&mut self);
}

/// Factory for engine handles.
pub trait EngineBinding {
    type Handle: EngineHandle;

    /// One-time asynchronous bootstrap of the engine. Awaited before any `create`.
    fn load(&mut self) -> impl Future<Output = Result<()>>;

    /// Builds a live instance from `config`.
    ///
    /// Creating a second instance for the same surface id supersedes the first;
    /// it must not fail for that reason.
    fn create(&mut self, config: &ConfigState) -> Result<Self::Handle>;
}
