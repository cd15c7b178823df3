//! Configuration state and its transitions.
//!
//! `ConfigState` is replaced wholesale on every accepted `Action`; `reduce` is
//! the only place a new state is computed.

mod action;
mod error;
pub mod options;
mod reducer;
mod state;

pub use action::Action;
pub use error::{ConfigError, ConfigField};
pub use reducer::{parse_positive, reduce};
pub use state::ConfigState;
