//! Recording engine used by the unit tests of this crate.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;

use crate::config::ConfigState;
use crate::engine::{EngineBinding, EngineHandle};

/// Everything the recording engine observed.
#[derive(Debug, Default)]
pub(crate) struct Journal {
    pub loads: u32,
    /// `create` calls, failed ones included.
    pub create_calls: usize,
    pub created: Vec<ConfigState>,
    pub disposed: u32,
    /// Handle id of every tick, in order.
    pub ticks: Vec<u32>,
    /// Ticks delivered to a handle that was not the newest one.
    pub stale_ticks: u32,
}

impl Journal {
    pub fn live_id(&self) -> u32 {
        self.created.len() as u32
    }
}

#[derive(Default)]
pub(crate) struct RecordingBinding {
    pub journal: Rc<RefCell<Journal>>,
    pub fail_load: bool,
    /// 1-based create call that fails.
    pub fail_create_at: Option<usize>,
}

impl RecordingBinding {
    pub fn new() -> (Self, Rc<RefCell<Journal>>) {
        let binding = Self::default();
        let journal = binding.journal.clone();
        (binding, journal)
    }
}

pub(crate) struct RecordingHandle {
    id: u32,
    journal: Rc<RefCell<Journal>>,
}

impl EngineHandle for RecordingHandle {
    fn tick(&mut self) {
        let mut j = self.journal.borrow_mut();
        if self.id != j.live_id() {
            j.stale_ticks += 1;
        }
        j.ticks.push(self.id);
    }
}

impl Drop for RecordingHandle {
    fn drop(&mut self) {
        self.journal.borrow_mut().disposed += 1;
    }
}

impl EngineBinding for RecordingBinding {
    type Handle = RecordingHandle;

    async fn load(&mut self) -> Result<()> {
        self.journal.borrow_mut().loads += 1;
        if self.fail_load {
            anyhow::bail!("engine module failed to load");
        }
        Ok(())
    }

    fn create(&mut self, config: &ConfigState) -> Result<RecordingHandle> {
        let mut j = self.journal.borrow_mut();
        j.create_calls += 1;
        if self.fail_create_at == Some(j.create_calls) {
            anyhow::bail!("surface {:?} unavailable", config.id);
        }
        j.created.push(config.clone());
        Ok(RecordingHandle {
            id: j.live_id(),
            journal: self.journal.clone(),
        })
    }
}
