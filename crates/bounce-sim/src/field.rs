use std::f32::consts::PI;

use bounce_control::ConfigState;
use rand::Rng;

use crate::collide::CollisionGrid;

/// One moving disk. Position is the centre, in surface pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Disk {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

/// Simulation parameters derived from a configuration snapshot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FieldParams {
    pub width: f32,
    pub height: f32,
    pub count: u32,
    /// Disk diameter.
    pub size: f32,
    pub collision: bool,
}

impl FieldParams {
    pub fn radius(&self) -> f32 {
        self.size * 0.5
    }
}

impl From<&ConfigState> for FieldParams {
    fn from(config: &ConfigState) -> Self {
        Self {
            width: config.width as f32,
            height: config.height as f32,
            count: config.disk_num,
            size: config.disk_size as f32,
            collision: config.collision,
        }
    }
}

/// The disks of one surface and the rules that move them.
pub struct DiskField {
    params: FieldParams,
    disks: Vec<Disk>,
    colors: Vec<[f32; 3]>,
    grid: Option<CollisionGrid>,
    steps: u64,
}

impl DiskField {
    /// Spawns `params.count` disks at the centre of the surface.
    ///
    /// Disk `i` gets speed `1 + 3r` and heading `π · 0.1 · i · r` for a uniform
    /// `r` in `[0, 1)`, which fans the disks out in a spiral, and a random colour.
    pub fn new<R: Rng + ?Sized>(params: FieldParams, rng: &mut R) -> Self {
        let count = params.count as usize;
        let mut disks = Vec::with_capacity(count);
        let mut colors: Vec<[f32; 3]> = Vec::with_capacity(count);

        let (cx, cy) = (params.width * 0.5, params.height * 0.5);
        for i in 0..count {
            let r: f32 = rng.gen_range(0.0..1.0);
            let speed = 1.0 + 3.0 * r;
            let heading = PI * (0.1 * i as f32 * r);
            disks.push(Disk {
                x: cx,
                y: cy,
                vx: speed * heading.cos(),
                vy: speed * heading.sin(),
            });
            colors.push([rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)]);
        }

        let grid = params
            .collision
            .then(|| CollisionGrid::new(params.width, params.height, params.size));

        Self {
            params,
            disks,
            colors,
            grid,
            steps: 0,
        }
    }

    pub fn from_config<R: Rng + ?Sized>(config: &ConfigState, rng: &mut R) -> Self {
        Self::new(FieldParams::from(config), rng)
    }

    pub fn params(&self) -> &FieldParams {
        &self.params
    }

    pub fn disks(&self) -> &[Disk] {
        &self.disks
    }

    /// Linear RGB colour per disk, parallel to `disks()`.
    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Advances every disk by one frame.
    pub fn step(&mut self) {
        let r = self.params.radius();
        let (w, h) = (self.params.width, self.params.height);

        for d in &mut self.disks {
            (d.x, d.vx) = reflect(d.x + d.vx, d.vx, r, w);
            (d.y, d.vy) = reflect(d.y + d.vy, d.vy, r, h);
        }

        if let Some(grid) = self.grid.as_mut() {
            grid.resolve(&mut self.disks, r, self.steps as usize);
            // Separation may push a disk past a wall.
            for d in &mut self.disks {
                d.x = keep_inside(d.x, r, w);
                d.y = keep_inside(d.y, r, h);
            }
        }
        self.steps += 1;
    }
}

/// Mirrors a coordinate that crossed a wall back inside `[r, extent - r]`.
///
/// The velocity component is pointed away from the wall that was hit. Disks
/// wider than the surface are pinned to its middle.
fn reflect(pos: f32, vel: f32, r: f32, extent: f32) -> (f32, f32) {
    let lo = r;
    let hi = extent - r;
    if lo >= hi {
        return (extent * 0.5, vel);
    }

    if pos < lo {
        ((2.0 * lo - pos).min(hi), vel.abs())
    } else if pos > hi {
        ((2.0 * hi - pos).max(lo), -vel.abs())
    } else {
        (pos, vel)
    }
}

fn keep_inside(pos: f32, r: f32, extent: f32) -> f32 {
    if r >= extent - r {
        extent * 0.5
    } else {
        pos.clamp(r, extent - r)
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::collide::MAX_PER_CELL;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn params(count: u32, size: f32) -> FieldParams {
        FieldParams {
            width: 200.0,
            height: 100.0,
            count,
            size,
            collision: false,
        }
    }

    // ── spawn ─────────────────────────────────────────────────────────────

    #[test]
    fn spawns_requested_count_at_centre() {
        let mut rng = StdRng::seed_from_u64(7);
        let f = DiskField::new(params(50, 8.0), &mut rng);
        assert_eq!(f.disks().len(), 50);
        assert_eq!(f.colors().len(), 50);
        for d in f.disks() {
            assert_eq!((d.x, d.y), (100.0, 50.0));
            let speed = (d.vx * d.vx + d.vy * d.vy).sqrt();
            assert!((1.0 - 1e-4..=4.0 + 1e-4).contains(&speed), "speed {speed}");
        }
    }

    #[test]
    fn same_seed_same_field() {
        let a = DiskField::new(params(20, 8.0), &mut StdRng::seed_from_u64(3));
        let b = DiskField::new(params(20, 8.0), &mut StdRng::seed_from_u64(3));
        assert_eq!(a.disks(), b.disks());
        assert_eq!(a.colors(), b.colors());
    }

    #[test]
    fn params_follow_config() {
        let config = ConfigState {
            width: 800,
            height: 800,
            disk_num: 1000,
            disk_size: 32,
            collision: true,
            ..ConfigState::default()
        };
        let p = FieldParams::from(&config);
        assert_eq!((p.width, p.height, p.count, p.size), (800.0, 800.0, 1000, 32.0));
        assert!(p.collision);
        assert_eq!(p.radius(), 16.0);
    }

    // ── walls ─────────────────────────────────────────────────────────────

    #[test]
    fn reflect_off_low_wall() {
        let (p, v) = reflect(2.0, -3.0, 4.0, 100.0);
        assert_eq!(p, 6.0);
        assert_eq!(v, 3.0);
    }

    #[test]
    fn reflect_off_high_wall() {
        let (p, v) = reflect(99.0, 2.0, 4.0, 100.0);
        assert_eq!(p, 93.0);
        assert_eq!(v, -2.0);
    }

    #[test]
    fn oversized_disk_is_pinned() {
        assert_eq!(reflect(3.0, 1.0, 80.0, 100.0), (50.0, 1.0));
    }

    #[test]
    fn disks_stay_inside_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut f = DiskField::new(params(300, 16.0), &mut rng);
        for _ in 0..1_000 {
            f.step();
        }
        assert_eq!(f.steps(), 1_000);
        let r = f.params().radius();
        for d in f.disks() {
            assert!(d.x >= r && d.x <= 200.0 - r, "x {}", d.x);
            assert!(d.y >= r && d.y <= 100.0 - r, "y {}", d.y);
        }
    }

    // ── collision ─────────────────────────────────────────────────────────

    fn crowd(count: u32) -> DiskField {
        let p = FieldParams {
            width: 400.0,
            height: 400.0,
            count,
            size: 16.0,
            collision: true,
        };
        DiskField::new(p, &mut StdRng::seed_from_u64(21))
    }

    #[test]
    fn spawn_pile_spreads_out() {
        // Velocity alone moves a disk at most 4px in the first step.
        let mut f = crowd(200);
        f.step();
        let spread = f
            .disks()
            .iter()
            .map(|d| ((d.x - 200.0).powi(2) + (d.y - 200.0).powi(2)).sqrt())
            .fold(0.0f32, f32::max);
        assert!(spread > 5.0, "spread {spread}");
    }

    #[test]
    fn colliding_disks_stay_inside_bounds() {
        let mut f = crowd(2_000);
        for _ in 0..50 {
            f.step();
        }
        for d in f.disks() {
            assert!((8.0..=392.0).contains(&d.x), "x {}", d.x);
            assert!((8.0..=392.0).contains(&d.y), "y {}", d.y);
        }
    }

    #[test]
    fn largest_crowd_steps_within_budget() {
        let n = 100_000;
        let mut f = crowd(n);
        let budget = n as u64 * 9 * MAX_PER_CELL as u64;

        let started = Instant::now();
        for _ in 0..3 {
            f.step();
            let checks = f.grid.as_ref().map_or(0, |g| g.checks());
            assert!(checks <= budget, "{checks} pair checks");
        }
        // Loose wall-clock bound; optimised builds run far below it.
        if cfg!(not(debug_assertions)) {
            assert!(started.elapsed() < Duration::from_millis(300), "{:?}", started.elapsed());
        }
    }
}
