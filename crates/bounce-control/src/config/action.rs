use super::error::ConfigError;

/// A configuration mutation produced by the control surface.
///
/// Actions are consumed once by the reducer and then discarded. Numeric
/// payloads stay in their textual form (the value of the selected option) and
/// are parsed by the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Sets width and height to the same value.
    WindowChange(String),
    DiskSizeChange(String),
    DiskNumChange(String),
    CollisionChange(bool),
    /// A tag the reducer does not know. Applying it is a no-op.
    Unrecognized(String),
}

impl Action {
    pub const WINDOW_CHANGE: &'static str = "WINDOW_CHANGE";
    pub const DISK_SIZE_CHANGE: &'static str = "DISK_SIZE_CHANGE";
    pub const DISK_NUM_CHANGE: &'static str = "DISK_NUM_CHANGE";
    pub const COLLISION_CHANGE: &'static str = "COLLISION_CHANGE";

    /// Builds an action from its `(tag, payload)` text form.
    ///
    /// Unknown tags map to [`Action::Unrecognized`]. Numeric payloads are not
    /// validated here; a collision payload must be `true` or `false`.
    pub fn from_tagged(tag: &str, payload: &str) -> Result<Self, ConfigError> {
        let action = match tag {
            Self::WINDOW_CHANGE => Action::WindowChange(payload.to_string()),
            Self::DISK_SIZE_CHANGE => Action::DiskSizeChange(payload.to_string()),
            Self::DISK_NUM_CHANGE => Action::DiskNumChange(payload.to_string()),
            Self::COLLISION_CHANGE => {
                let flag = payload.trim().parse::<bool>().map_err(|_| ConfigError::NotAFlag {
                    payload: payload.to_string(),
                })?;
                Action::CollisionChange(flag)
            }
            other => Action::Unrecognized(other.to_string()),
        };
        Ok(action)
    }

    /// Parses `TAG=payload`. A missing `=` yields an empty payload.
    pub fn parse_arg(arg: &str) -> Result<Self, ConfigError> {
        let (tag, payload) = arg.split_once('=').unwrap_or((arg, ""));
        Self::from_tagged(tag.trim(), payload)
    }

    pub fn tag(&self) -> &str {
        match self {
            Action::WindowChange(_) => Self::WINDOW_CHANGE,
            Action::DiskSizeChange(_) => Self::DISK_SIZE_CHANGE,
            Action::DiskNumChange(_) => Self::DISK_NUM_CHANGE,
            Action::CollisionChange(_) => Self::COLLISION_CHANGE,
            Action::Unrecognized(tag) => tag,
        }
    }
}
