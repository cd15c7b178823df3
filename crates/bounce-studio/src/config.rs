use bounce_control::{Action, ConfigState};

use crate::gpu::GpuInit;

/// Startup configuration of the studio window.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub title: String,
    /// Configuration the surface starts from, before command-line actions.
    pub initial: ConfigState,
    /// Fixed seed for reproducible runs; entropy when `None`.
    pub seed: Option<u64>,
    pub gpu: GpuInit,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            title: "bounce".to_string(),
            initial: ConfigState::default(),
            seed: None,
            gpu: GpuInit::default(),
        }
    }
}

/// Parses `TAG=payload` arguments. Malformed ones and unknown tags are logged
/// and skipped.
pub fn parse_args<I>(args: I) -> Vec<Action>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut actions = Vec::new();
    for arg in args {
        let arg = arg.as_ref();
        match Action::parse_arg(arg) {
            Ok(Action::Unrecognized(tag)) => log::warn!("ignoring argument {arg:?}: unknown tag {tag:?}"),
            Ok(action) => actions.push(action),
            Err(e) => log::warn!("ignoring argument {arg:?}: {e}"),
        }
    }
    actions
}
