use crate::field::Disk;

/// Most disks of one cell tested against a neighbour per step.
///
/// A cell one diameter wide holds about one resting disk, so a crowded cell is
/// a transient pile-up (every disk spawns at the centre). Capping the scan keeps
/// a step linear in the disk count; the window rotates each step so every disk
/// of a crowded cell gets its turn.
pub(crate) const MAX_PER_CELL: usize = 4;

/// Uniform grid with cells one disk diameter wide.
///
/// Two disks can only touch if their cells are neighbours, so each disk is
/// tested against the 3x3 block around its own cell. The grid is rebuilt by a
/// counting sort every step; its buffers are reused between steps.
pub(crate) struct CollisionGrid {
    cell: f32,
    cols: usize,
    rows: usize,
    /// Prefix sums: disks of cell `c` are `order[starts[c]..starts[c + 1]]`.
    starts: Vec<u32>,
    cursor: Vec<u32>,
    order: Vec<u32>,
    cell_of: Vec<u32>,
    checks: u64,
}

impl CollisionGrid {
    pub fn new(width: f32, height: f32, size: f32) -> Self {
        let cell = size.max(1.0);
        let cols = (width / cell).ceil().max(1.0) as usize;
        let rows = (height / cell).ceil().max(1.0) as usize;
        Self {
            cell,
            cols,
            rows,
            starts: vec![0; cols * rows + 1],
            cursor: Vec::new(),
            order: Vec::new(),
            cell_of: Vec::new(),
            checks: 0,
        }
    }

    /// Pair tests performed by the last `resolve`.
    pub fn checks(&self) -> u64 {
        self.checks
    }

    /// Resolves overlapping pairs: approaching pairs exchange their normal
    /// velocity components (equal-mass elastic collision) and every overlap is
    /// pushed apart along the normal.
    ///
    /// `rotation` picks which members of a crowded cell are tested this step.
    pub fn resolve(&mut self, disks: &mut [Disk], r: f32, rotation: usize) {
        self.rebuild(disks);
        self.checks = 0;

        let min_dist = 2.0 * r;
        for i in 0..disks.len() {
            let c = self.cell_of[i] as usize;
            let (cx, cy) = (c % self.cols, c / self.cols);

            for ny in cy.saturating_sub(1)..=(cy + 1).min(self.rows - 1) {
                for nx in cx.saturating_sub(1)..=(cx + 1).min(self.cols - 1) {
                    let n = ny * self.cols + nx;
                    let (lo, hi) = (self.starts[n] as usize, self.starts[n + 1] as usize);
                    let len = hi - lo;
                    let take = len.min(MAX_PER_CELL);
                    for k in 0..take {
                        let j = self.order[lo + (rotation + k) % len] as usize;
                        if j != i {
                            self.checks += 1;
                            collide_pair(disks, i, j, min_dist);
                        }
                    }
                }
            }
        }
    }

    fn cell_index(&self, x: f32, y: f32) -> usize {
        let cx = ((x / self.cell).max(0.0) as usize).min(self.cols - 1);
        let cy = ((y / self.cell).max(0.0) as usize).min(self.rows - 1);
        cy * self.cols + cx
    }

    fn rebuild(&mut self, disks: &[Disk]) {
        self.starts.fill(0);
        self.cell_of.clear();
        for d in disks {
            let c = self.cell_index(d.x, d.y);
            self.cell_of.push(c as u32);
            self.starts[c + 1] += 1;
        }
        for i in 1..self.starts.len() {
            self.starts[i] += self.starts[i - 1];
        }

        self.cursor.clear();
        self.cursor.extend_from_slice(&self.starts[..self.starts.len() - 1]);
        self.order.resize(disks.len(), 0);
        for (i, &c) in self.cell_of.iter().enumerate() {
            let slot = &mut self.cursor[c as usize];
            self.order[*slot as usize] = i as u32;
            *slot += 1;
        }
    }
}

fn collide_pair(disks: &mut [Disk], i: usize, j: usize, min_dist: f32) {
    let (a, b) = (disks[i], disks[j]);
    let (mut dx, mut dy) = (b.x - a.x, b.y - a.y);
    let mut dist2 = dx * dx + dy * dy;
    if dist2 >= min_dist * min_dist {
        return;
    }

    // Coincident centres (the spawn point) have no normal; split them along a
    // direction derived from the pair so the pile-up spreads out.
    if dist2 <= f32::EPSILON {
        let angle = (i ^ j) as f32 * 2.399_963; // golden angle
        (dx, dy) = (angle.cos() * 1e-3, angle.sin() * 1e-3);
        dist2 = dx * dx + dy * dy;
    }

    let dist = dist2.sqrt();
    let (nx, ny) = (dx / dist, dy / dist);

    let push = 0.5 * (min_dist - dist);
    disks[i].x -= push * nx;
    disks[i].y -= push * ny;
    disks[j].x += push * nx;
    disks[j].y += push * ny;

    let approach = (b.vx - a.vx) * nx + (b.vy - a.vy) * ny;
    if approach >= 0.0 {
        return;
    }
    disks[i].vx += approach * nx;
    disks[i].vy += approach * ny;
    disks[j].vx -= approach * nx;
    disks[j].vy -= approach * ny;
}
