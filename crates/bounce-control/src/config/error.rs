use std::fmt;

/// Numeric field addressed by an action payload.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ConfigField {
    Window,
    DiskSize,
    DiskNum,
}

impl ConfigField {
    pub fn name(self) -> &'static str {
        match self {
            ConfigField::Window => "window",
            ConfigField::DiskSize => "disk size",
            ConfigField::DiskNum => "disk count",
        }
    }
}

/// A rejected action payload. The store keeps its previous state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Payload is not a base-10 integer that fits in `u32`.
    NotANumber { field: ConfigField, payload: String },
    /// Payload parsed but is zero.
    NotPositive { field: ConfigField },
    /// Collision payload is neither `true` nor `false`.
    NotAFlag { payload: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NotANumber { field, payload } => {
                write!(f, "{} payload {payload:?} is not an integer", field.name())
            }
            ConfigError::NotPositive { field } => {
                write!(f, "{} must be a positive integer", field.name())
            }
            ConfigError::NotAFlag { payload } => {
                write!(f, "collision payload {payload:?} is not a boolean")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_field() {
        let fields = [ConfigField::Window, ConfigField::DiskSize, ConfigField::DiskNum];
        for field in fields {
            let e = ConfigError::NotANumber {
                field,
                payload: "x".into(),
            };
            assert!(e.to_string().starts_with(field.name()), "{e}");
            assert!(ConfigError::NotPositive { field }.to_string().contains(field.name()));
        }
        let flag = ConfigError::NotAFlag { payload: "maybe".into() };
        assert!(flag.to_string().contains("\"maybe\""));
    }
}
