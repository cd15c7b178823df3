use anyhow::{Context, Result};

use crate::animation::{AnimationController, FrameScheduler};
use crate::engine::EngineBinding;
use crate::store::ConfigChange;

/// Result of applying one `ConfigChange`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Reconfigured {
    /// A handle built from `version` is now live.
    Installed { version: u64 },
    /// `version` is not newer than what was already observed; nothing changed.
    Stale { version: u64, latest: u64 },
}

/// Replaces the controller's live handle whenever the configuration changes.
///
/// The swap is: drop the old handle, create the new one, install it, tick once.
/// All of it runs inside one call, so a tick observes either the old handle or
/// the new one, never a disposed one. The loop's running state is untouched.
pub struct ReconfigurationCoordinator<B> {
    binding: B,
    latest_seen: Option<u64>,
    installed: Option<u64>,
    created: u64,
    disposed: u64,
}

impl<B: EngineBinding> ReconfigurationCoordinator<B> {
    pub fn new(binding: B) -> Self {
        Self {
            binding,
            latest_seen: None,
            installed: None,
            created: 0,
            disposed: 0,
        }
    }

    pub fn binding(&self) -> &B {
        &self.binding
    }

    pub fn binding_mut(&mut self) -> &mut B {
        &mut self.binding
    }

    /// Version of the live handle's configuration.
    pub fn installed_version(&self) -> Option<u64> {
        self.installed
    }

    /// Handles created so far.
    pub fn created(&self) -> u64 {
        self.created
    }

    /// Handles disposed so far.
    pub fn disposed(&self) -> u64 {
        self.disposed
    }

    /// Loads the engine. Awaited once, before the first `apply`.
    pub async fn load(&mut self) -> Result<()> {
        self.binding.load().await
    }

    /// Rebuilds the live handle from `change`.
    ///
    /// Changes older than the newest observed version are ignored. If `create`
    /// fails, the old handle is already gone and the controller is left
    /// without one until the next successful change.
    pub fn apply<S>(
        &mut self,
        change: &ConfigChange,
        controller: &mut AnimationController<B::Handle, S>,
    ) -> Result<Reconfigured>
    where
        S: FrameScheduler,
    {
        let latest = self.latest_seen.max(self.installed);
        if let Some(latest) = latest {
            let behind = change.version < latest;
            let already_live = self.installed == Some(change.version);
            if behind || already_live {
                log::debug!("skipping config v{} (latest v{latest})", change.version);
                return Ok(Reconfigured::Stale {
                    version: change.version,
                    latest,
                });
            }
        }
        self.latest_seen = Some(change.version);

        if let Some(old) = controller.take_handle() {
            drop(old);
            self.disposed += 1;
            self.installed = None;
        }

        let state = &change.state;
        let handle = self.binding.create(state).with_context(|| {
            format!("failed to create engine for surface {:?} (config v{})", state.id, change.version)
        })?;

        controller.replace_handle(handle);
        self.installed = Some(change.version);
        self.created += 1;
        log::info!(
            "engine v{} live on {:?}: {}x{}, {} disks of {}px, collision {}",
            change.version,
            state.id,
            state.width,
            state.height,
            state.disk_num,
            state.disk_size,
            if state.collision { "on" } else { "off" },
        );

        controller.tick_once();
        Ok(Reconfigured::Installed {
            version: change.version,
        })
    }
}
