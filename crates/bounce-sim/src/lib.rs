//! Bouncing-disk simulation.
//!
//! `DiskField` holds the disks of one surface and advances them a frame at a
//! time, reflecting off the walls and, when enabled, off each other.
//! `SimBinding` exposes it as a headless engine for `bounce-control`; the
//! studio reuses the field and draws it on the GPU.

mod binding;
mod collide;
mod field;

pub use binding::{SimBinding, SimHandle};
pub use field::{Disk, DiskField, FieldParams};
