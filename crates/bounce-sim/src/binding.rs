use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use anyhow::{bail, Result};
use bounce_control::{ConfigState, EngineBinding, EngineHandle};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::field::DiskField;

/// Headless engine: every handle owns a `DiskField` and steps it once per tick.
///
/// The binding remembers the newest generation per surface id. Creating a new
/// handle for an id supersedes the previous one, which stops stepping even if
/// it is still ticked.
pub struct SimBinding {
    rng: StdRng,
    loaded: bool,
    generations: HashMap<String, Rc<Cell<u64>>>,
}

impl SimBinding {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Binding whose fields are reproducible for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            loaded: false,
            generations: HashMap::new(),
        }
    }

    /// Number of handles created so far for surface `id`.
    pub fn generation(&self, id: &str) -> u64 {
        self.generations.get(id).map_or(0, |g| g.get())
    }
}

impl Default for SimBinding {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBinding for SimBinding {
    type Handle = SimHandle;

    async fn load(&mut self) -> Result<()> {
        self.loaded = true;
        log::debug!("simulation engine loaded");
        Ok(())
    }

    fn create(&mut self, config: &ConfigState) -> Result<SimHandle> {
        if !self.loaded {
            bail!("simulation engine used before load");
        }

        let current = self.generations.entry(config.id.clone()).or_default().clone();
        let generation = current.get() + 1;
        current.set(generation);

        let field = DiskField::from_config(config, &mut self.rng);
        log::debug!(
            "surface {:?}: generation {generation}, {} disks of {}px, collision {}",
            config.id,
            config.disk_num,
            config.disk_size,
            config.collision,
        );

        Ok(SimHandle {
            field,
            generation,
            current,
        })
    }
}

/// A live simulation bound to one surface generation.
pub struct SimHandle {
    field: DiskField,
    generation: u64,
    current: Rc<Cell<u64>>,
}

impl SimHandle {
    pub fn field(&self) -> &DiskField {
        &self.field
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// A newer handle exists for the same surface.
    pub fn is_superseded(&self) -> bool {
        self.current.get() != self.generation
    }
}

impl EngineHandle for SimHandle {
    fn tick(&mut self) {
        if self.is_superseded() {
            return;
        }
        self.field.step();
    }
}

#[cfg(test)]
mod tests {
    use bounce_control::{Action, BootState, LoopState, ManualScheduler, RenderSurface};

    use super::*;

    type Surface = RenderSurface<SimBinding, ManualScheduler>;

    fn small() -> ConfigState {
        ConfigState {
            disk_num: 10,
            ..ConfigState::default()
        }
    }

    fn booted() -> Surface {
        let mut s = Surface::new(small(), SimBinding::seeded(1), ManualScheduler::new());
        pollster::block_on(s.bootstrap()).unwrap();
        s
    }

    fn fire(s: &mut Surface, n: usize) {
        for _ in 0..n {
            let r = s.scheduler_mut().fire_next().unwrap();
            s.on_frame(r).unwrap();
        }
    }

    fn live(s: &Surface) -> &SimHandle {
        s.controller().handle().unwrap()
    }

    // ── binding ───────────────────────────────────────────────────────────

    #[test]
    fn create_before_load_fails() {
        let mut b = SimBinding::seeded(0);
        assert!(b.create(&small()).is_err());
        assert_eq!(b.generation("canvas"), 0);
    }

    #[test]
    fn newer_handle_supersedes_older() {
        let mut b = SimBinding::seeded(0);
        pollster::block_on(b.load()).unwrap();

        let mut first = b.create(&small()).unwrap();
        let second = b.create(&small()).unwrap();
        assert!(first.is_superseded());
        assert!(!second.is_superseded());
        assert_eq!(b.generation("canvas"), 2);

        first.tick();
        assert_eq!(first.field().steps(), 0);
    }

    #[test]
    fn surfaces_are_independent() {
        let mut b = SimBinding::seeded(0);
        pollster::block_on(b.load()).unwrap();

        let a = b.create(&ConfigState::with_id("a")).unwrap();
        let _b = b.create(&ConfigState::with_id("b")).unwrap();
        assert!(!a.is_superseded());
        assert_eq!(b.generation("a"), 1);
        assert_eq!(b.generation("b"), 1);
    }

    // ── end to end ────────────────────────────────────────────────────────

    #[test]
    fn boot_renders_first_frame_while_idle() {
        let s = booted();
        assert_eq!(s.boot_state(), BootState::Ready);
        assert_eq!(s.loop_state(), LoopState::Idle);
        assert_eq!(live(&s).field().steps(), 1);
        assert_eq!(live(&s).field().disks().len(), 10);
    }

    #[test]
    fn running_loop_steps_the_field() {
        let mut s = booted();
        s.start().unwrap();
        // Boot tick, start tick, then one per fired frame.
        fire(&mut s, 5);
        assert_eq!(live(&s).field().steps(), 7);

        s.stop().unwrap();
        assert!(s.scheduler_mut().fire_next().is_none());
        assert_eq!(live(&s).field().steps(), 7);
    }

    #[test]
    fn reconfigure_rebuilds_the_field() {
        let mut s = booted();
        s.start().unwrap();
        fire(&mut s, 3);

        assert!(s.dispatch(&Action::DiskNumChange("25".into())).unwrap());
        assert!(s.dispatch(&Action::CollisionChange(true)).unwrap());

        let h = live(&s);
        assert_eq!(h.generation(), 3);
        assert_eq!(h.field().disks().len(), 25);
        assert!(h.field().params().collision);
        assert_eq!(h.field().steps(), 1);
        assert_eq!(s.loop_state(), LoopState::Running);

        fire(&mut s, 2);
        assert_eq!(live(&s).field().steps(), 3);
    }

    #[test]
    fn rejected_payload_keeps_the_field() {
        let mut s = booted();
        assert!(s.dispatch(&Action::DiskSizeChange("big".into())).is_err());
        assert_eq!(live(&s).generation(), 1);
        assert_eq!(s.config().disk_size, 16);
    }
}
