use std::fmt;

use crate::animation::{AnimationController, FrameScheduler};
use crate::engine::EngineBinding;
use crate::reconfigure::ReconfigurationCoordinator;
use crate::store::ConfigStore;

/// Progress of the one-time engine bootstrap.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BootState {
    Pending,
    Ready,
    /// Terminal: the surface stays uninitialized for this process.
    Failed,
}

/// Why the bootstrap did not reach `Ready`.
#[derive(Debug)]
pub enum BootError {
    /// Bootstrap was already attempted; it runs once per process.
    AlreadyRan(BootState),
    /// The engine module failed to load.
    Load(anyhow::Error),
    /// The engine loaded but the first handle could not be created.
    Create(anyhow::Error),
}

impl fmt::Display for BootError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootError::AlreadyRan(state) => write!(f, "bootstrap already ran ({state:?})"),
            BootError::Load(e) => write!(f, "engine load failed: {e:#}"),
            BootError::Create(e) => write!(f, "initial engine create failed: {e:#}"),
        }
    }
}

impl std::error::Error for BootError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BootError::AlreadyRan(_) => None,
            BootError::Load(e) | BootError::Create(e) => Some(&**e),
        }
    }
}

/// Loads the engine, then installs the first handle from the current config.
#[derive(Debug)]
pub struct Bootstrapper {
    state: BootState,
}

impl Bootstrapper {
    pub fn new() -> Self {
        Self {
            state: BootState::Pending,
        }
    }

    pub fn state(&self) -> BootState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == BootState::Ready
    }

    /// Runs the bootstrap sequence. Only the first call does any work.
    ///
    /// Changes published before completion are folded into the store snapshot
    /// used for the first `create`, so they are drained and not replayed.
    pub async fn run<B, S>(
        &mut self,
        store: &mut ConfigStore,
        coordinator: &mut ReconfigurationCoordinator<B>,
        controller: &mut AnimationController<B::Handle, S>,
    ) -> Result<(), BootError>
    where
        B: EngineBinding,
        S: FrameScheduler,
    {
        if self.state != BootState::Pending {
            return Err(BootError::AlreadyRan(self.state));
        }

        log::debug!("loading engine");
        if let Err(e) = coordinator.load().await {
            log::error!("engine load failed, surface stays uninitialized: {e:#}");
            self.state = BootState::Failed;
            return Err(BootError::Load(e));
        }

        let skipped = store.drain_changes().count();
        if skipped > 0 {
            log::debug!("folding {skipped} pre-boot config change(s) into the first create");
        }

        if let Err(e) = coordinator.apply(&store.snapshot(), controller) {
            log::error!("initial engine create failed: {e:#}");
            self.state = BootState::Failed;
            return Err(BootError::Create(e));
        }

        self.state = BootState::Ready;
        log::info!("engine ready (config v{})", store.version());
        Ok(())
    }
}

impl Default for Bootstrapper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::ManualScheduler;
    use crate::config::Action;
    use crate::testing::{RecordingBinding, RecordingHandle};

    type Controller = AnimationController<RecordingHandle, ManualScheduler>;

    #[test]
    fn loads_then_creates_once() {
        let (binding, journal) = RecordingBinding::new();
        let mut coord = ReconfigurationCoordinator::new(binding);
        let mut c = Controller::new(ManualScheduler::new());
        let mut store = ConfigStore::default();
        let mut boot = Bootstrapper::new();

        pollster::block_on(boot.run(&mut store, &mut coord, &mut c)).unwrap();
        assert_eq!(boot.state(), BootState::Ready);
        let j = journal.borrow();
        assert_eq!(j.loads, 1);
        assert_eq!(j.created.len(), 1);
        assert_eq!(j.ticks.len(), 1);
    }

    #[test]
    fn second_run_is_rejected() {
        let (binding, journal) = RecordingBinding::new();
        let mut coord = ReconfigurationCoordinator::new(binding);
        let mut c = Controller::new(ManualScheduler::new());
        let mut store = ConfigStore::default();
        let mut boot = Bootstrapper::new();

        pollster::block_on(boot.run(&mut store, &mut coord, &mut c)).unwrap();
        let err = pollster::block_on(boot.run(&mut store, &mut coord, &mut c)).unwrap_err();
        assert!(matches!(err, BootError::AlreadyRan(BootState::Ready)));
        assert_eq!(journal.borrow().loads, 1);
    }

    #[test]
    fn load_failure_is_permanent() {
        let (mut binding, journal) = RecordingBinding::new();
        binding.fail_load = true;
        let mut coord = ReconfigurationCoordinator::new(binding);
        let mut c = Controller::new(ManualScheduler::new());
        let mut store = ConfigStore::default();
        let mut boot = Bootstrapper::new();

        let err = pollster::block_on(boot.run(&mut store, &mut coord, &mut c)).unwrap_err();
        assert!(matches!(err, BootError::Load(_)));
        assert_eq!(boot.state(), BootState::Failed);
        assert!(journal.borrow().created.is_empty());

        coord.binding_mut().fail_load = false;
        let err = pollster::block_on(boot.run(&mut store, &mut coord, &mut c)).unwrap_err();
        assert!(matches!(err, BootError::AlreadyRan(BootState::Failed)));
        assert_eq!(journal.borrow().loads, 1);
    }

    #[test]
    fn create_failure_fails_boot() {
        let (mut binding, _) = RecordingBinding::new();
        binding.fail_create_at = Some(1);
        let mut coord = ReconfigurationCoordinator::new(binding);
        let mut c = Controller::new(ManualScheduler::new());
        let mut store = ConfigStore::default();
        let mut boot = Bootstrapper::new();

        let err = pollster::block_on(boot.run(&mut store, &mut coord, &mut c)).unwrap_err();
        assert!(matches!(err, BootError::Create(_)));
        assert_eq!(boot.state(), BootState::Failed);
        assert!(!c.has_handle());
    }

    #[test]
    fn pre_boot_changes_fold_into_first_create() {
        let (binding, journal) = RecordingBinding::new();
        let mut coord = ReconfigurationCoordinator::new(binding);
        let mut c = Controller::new(ManualScheduler::new());
        let mut store = ConfigStore::default();
        store.dispatch(&Action::WindowChange("800".into())).unwrap();
        store.dispatch(&Action::DiskSizeChange("4".into())).unwrap();
        let mut boot = Bootstrapper::new();

        pollster::block_on(boot.run(&mut store, &mut coord, &mut c)).unwrap();
        let j = journal.borrow();
        assert_eq!(j.created.len(), 1);
        assert_eq!(j.created[0].width, 800);
        assert_eq!(j.created[0].disk_size, 4);
        assert_eq!(store.pending(), 0);
        assert_eq!(coord.installed_version(), Some(2));
    }
}
