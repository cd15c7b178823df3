//! Interactive bouncing-disk studio.
//!
//! Usage: `bounce-studio [TAG=payload]...`, e.g.
//! `bounce-studio DISK_NUM_CHANGE=1000 COLLISION_CHANGE=true`.
//!
//! Keys: space starts/stops, S/N/W cycle disk size, disk count and window
//! size (shift reverses), C flips collision, escape quits.

mod binding;
mod config;
mod controls;
mod gpu;
mod redraw;
mod render;
mod runtime;
mod scheduler;

use bounce_control::logging::{init_logging, LoggingConfig};

use crate::config::{parse_args, StudioConfig};

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let actions = parse_args(std::env::args().skip(1));
    runtime::run(StudioConfig::default(), actions)
}
