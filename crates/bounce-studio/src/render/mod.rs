//! Draws a `DiskField` into a surface frame.

mod disks;

pub use disks::DiskRenderer;
