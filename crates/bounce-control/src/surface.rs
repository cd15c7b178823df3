use std::fmt;

use crate::animation::{AnimationController, FrameRequest, FrameScheduler, LoopState};
use crate::bootstrap::{BootError, BootState, Bootstrapper};
use crate::config::{Action, ConfigError, ConfigState};
use crate::engine::EngineBinding;
use crate::reconfigure::ReconfigurationCoordinator;
use crate::store::ConfigStore;
use crate::time::FrameTime;

/// Error returned by `RenderSurface` operations.
#[derive(Debug)]
pub enum ControlError {
    /// Loop control was requested before the bootstrap completed.
    NotReady(BootState),
    /// The action payload was rejected; the previous state is kept.
    Rejected(ConfigError),
    /// The new configuration was accepted but the engine could not be rebuilt.
    Reconfigure(anyhow::Error),
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlError::NotReady(state) => write!(f, "surface is not ready ({state:?})"),
            ControlError::Rejected(e) => write!(f, "action rejected: {e}"),
            ControlError::Reconfigure(e) => write!(f, "reconfiguration failed: {e:#}"),
        }
    }
}

impl std::error::Error for ControlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ControlError::NotReady(_) => None,
            ControlError::Rejected(e) => Some(e),
            ControlError::Reconfigure(e) => Some(&**e),
        }
    }
}

impl From<ConfigError> for ControlError {
    fn from(e: ConfigError) -> Self {
        ControlError::Rejected(e)
    }
}

/// One render surface: its configuration, its engine and its animation loop.
///
/// This is the context object the host talks to. Nothing in it is global;
/// several surfaces can coexist, each with its own binding and scheduler.
pub struct RenderSurface<B: EngineBinding, S> {
    store: ConfigStore,
    coordinator: ReconfigurationCoordinator<B>,
    controller: AnimationController<B::Handle, S>,
    boot: Bootstrapper,
}

impl<B, S> RenderSurface<B, S>
where
    B: EngineBinding,
    S: FrameScheduler,
{
    pub fn new(initial: ConfigState, binding: B, scheduler: S) -> Self {
        Self {
            store: ConfigStore::new(initial),
            coordinator: ReconfigurationCoordinator::new(binding),
            controller: AnimationController::new(scheduler),
            boot: Bootstrapper::new(),
        }
    }

    pub fn config(&self) -> &ConfigState {
        self.store.state()
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn coordinator(&self) -> &ReconfigurationCoordinator<B> {
        &self.coordinator
    }

    pub fn controller(&self) -> &AnimationController<B::Handle, S> {
        &self.controller
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        self.controller.scheduler_mut()
    }

    pub fn binding_mut(&mut self) -> &mut B {
        self.coordinator.binding_mut()
    }

    pub fn boot_state(&self) -> BootState {
        self.boot.state()
    }

    pub fn loop_state(&self) -> LoopState {
        self.controller.state()
    }

    /// Loads the engine and installs the first handle. Runs once.
    pub async fn bootstrap(&mut self) -> Result<(), BootError> {
        self.boot
            .run(&mut self.store, &mut self.coordinator, &mut self.controller)
            .await
    }

    /// Applies `action` and, once booted, rebuilds the engine for the new state.
    ///
    /// Returns whether a new configuration version was published.
    pub fn dispatch(&mut self, action: &Action) -> Result<bool, ControlError> {
        let changed = self.store.dispatch(action).inspect_err(|e| {
            log::warn!("{} rejected: {e}", action.tag());
        })?;

        match self.boot.state() {
            BootState::Ready => self.flush()?,
            // Folded into the first create by the bootstrap.
            BootState::Pending => {}
            // No engine will ever consume them.
            BootState::Failed => {
                self.store.drain_changes().for_each(drop);
            }
        }
        Ok(changed)
    }

    pub fn start(&mut self) -> Result<LoopState, ControlError> {
        self.ensure_ready()?;
        self.controller.start();
        Ok(self.controller.state())
    }

    pub fn stop(&mut self) -> Result<LoopState, ControlError> {
        self.ensure_ready()?;
        self.controller.stop();
        Ok(self.controller.state())
    }

    pub fn toggle(&mut self) -> Result<LoopState, ControlError> {
        self.ensure_ready()?;
        Ok(self.controller.toggle())
    }

    /// Delivers a fired frame request to the animation loop.
    pub fn on_frame(&mut self, request: FrameRequest) -> Option<FrameTime> {
        self.controller.on_frame(request)
    }

    fn ensure_ready(&self) -> Result<(), ControlError> {
        match self.boot.state() {
            BootState::Ready => Ok(()),
            other => Err(ControlError::NotReady(other)),
        }
    }

    fn flush(&mut self) -> Result<(), ControlError> {
        let changes: Vec<_> = self.store.drain_changes().collect();
        for change in &changes {
            self.coordinator
                .apply(change, &mut self.controller)
                .map_err(ControlError::Reconfigure)?;
        }
        Ok(())
    }
}
