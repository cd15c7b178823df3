/// Disk diameters offered by the control surface.
pub const DISK_SIZE_OPTIONS: [u32; 5] = [4, 8, 16, 32, 64];

/// Disk counts offered by the control surface.
pub const DISK_NUM_OPTIONS: [u32; 6] = [10, 100, 1_000, 10_000, 50_000, 100_000];

/// Square window sides offered by the control surface.
pub const WINDOW_OPTIONS: [u32; 5] = [200, 400, 600, 800, 1_000];

/// Returns the option after (or before, when `reverse`) `current`, wrapping.
///
/// A value that is not part of `options` snaps to the first option above it
/// (or the last below it when reversing).
pub fn cycle(options: &[u32], current: u32, reverse: bool) -> u32 {
    debug_assert!(!options.is_empty());

    let n = options.len();
    match options.iter().position(|&o| o == current) {
        Some(i) if reverse => options[(i + n - 1) % n],
        Some(i) => options[(i + 1) % n],
        None if reverse => options
            .iter()
            .rev()
            .copied()
            .find(|&o| o < current)
            .unwrap_or(options[n - 1]),
        None => options
            .iter()
            .copied()
            .find(|&o| o > current)
            .unwrap_or(options[0]),
    }
}
