use crate::config::{reduce, Action, ConfigError, ConfigState};

/// A published configuration version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigChange {
    /// Monotonic version; the initial state is version 0.
    pub version: u64,
    pub state: ConfigState,
}

/// Holds the current `ConfigState` and publishes every change.
///
/// Changes are buffered in an outbox and handed to subscribers when they call
/// [`ConfigStore::drain_changes`], in the order the versions were produced.
#[derive(Debug)]
pub struct ConfigStore {
    state: ConfigState,
    version: u64,
    outbox: Vec<ConfigChange>,
}

impl ConfigStore {
    pub fn new(initial: ConfigState) -> Self {
        Self {
            state: initial,
            version: 0,
            outbox: Vec::new(),
        }
    }

    pub fn state(&self) -> &ConfigState {
        &self.state
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// The current state tagged with its version.
    pub fn snapshot(&self) -> ConfigChange {
        ConfigChange {
            version: self.version,
            state: self.state.clone(),
        }
    }

    /// Reduces `action` into the current state.
    ///
    /// Returns `Ok(true)` when a new version was published, `Ok(false)` when the
    /// action left the state unchanged. A rejected action keeps the previous
    /// state and publishes nothing.
    pub fn dispatch(&mut self, action: &Action) -> Result<bool, ConfigError> {
        let next = reduce(&self.state, action)?;
        if next == self.state {
            log::trace!("{} left config unchanged", action.tag());
            return Ok(false);
        }

        self.version += 1;
        self.state = next;
        self.outbox.push(self.snapshot());
        log::debug!("config v{} <- {}", self.version, action.tag());
        Ok(true)
    }

    /// Number of published changes not yet drained.
    pub fn pending(&self) -> usize {
        self.outbox.len()
    }

    /// Hands out buffered changes, oldest first.
    pub fn drain_changes(&mut self) -> std::vec::Drain<'_, ConfigChange> {
        self.outbox.drain(..)
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(ConfigState::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_publishes_versions_in_order() {
        let mut store = ConfigStore::default();
        assert_eq!(store.dispatch(&Action::DiskNumChange("1000".into())), Ok(true));
        assert_eq!(store.dispatch(&Action::WindowChange("800".into())), Ok(true));

        let changes: Vec<_> = store.drain_changes().collect();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].version, 1);
        assert_eq!(changes[0].state.disk_num, 1000);
        assert_eq!(changes[0].state.width, 400);
        assert_eq!(changes[1].version, 2);
        assert_eq!(changes[1].state.width, 800);
        assert_eq!(store.pending(), 0);
    }

    #[test]
    fn unchanged_state_publishes_nothing() {
        let mut store = ConfigStore::default();
        assert_eq!(store.dispatch(&Action::WindowChange("400".into())), Ok(false));
        assert_eq!(store.dispatch(&Action::Unrecognized("NOPE".into())), Ok(false));
        assert_eq!(store.version(), 0);
        assert_eq!(store.pending(), 0);
    }

    #[test]
    fn rejected_action_keeps_state() {
        let mut store = ConfigStore::default();
        assert!(store.dispatch(&Action::DiskSizeChange("huge".into())).is_err());
        assert_eq!(store.state(), &ConfigState::default());
        assert_eq!(store.version(), 0);
        assert_eq!(store.pending(), 0);
    }

    #[test]
    fn snapshot_tracks_latest() {
        let mut store = ConfigStore::default();
        store.dispatch(&Action::CollisionChange(true)).unwrap();
        let snap = store.snapshot();
        assert_eq!(snap.version, 1);
        assert!(snap.state.collision);
    }
}
