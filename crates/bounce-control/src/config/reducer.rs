use super::action::Action;
use super::error::{ConfigError, ConfigField};
use super::state::ConfigState;

/// Parses a numeric payload as a positive base-10 integer.
///
/// Surrounding whitespace is ignored. Empty, non-numeric, overflowing and zero
/// payloads are rejected.
pub fn parse_positive(field: ConfigField, payload: &str) -> Result<u32, ConfigError> {
    let value = payload
        .trim()
        .parse::<u32>()
        .map_err(|_| ConfigError::NotANumber {
            field,
            payload: payload.to_string(),
        })?;

    if value == 0 {
        return Err(ConfigError::NotPositive { field });
    }
    Ok(value)
}

/// Applies `action` to `state` and returns the next state.
///
/// Pure: the result depends only on the two arguments. Unrecognized actions
/// return an unchanged copy of `state`.
pub fn reduce(state: &ConfigState, action: &Action) -> Result<ConfigState, ConfigError> {
    let next = match action {
        Action::WindowChange(payload) => {
            let side = parse_positive(ConfigField::Window, payload)?;
            ConfigState {
                width: side,
                height: side,
                ..state.clone()
            }
        }
        Action::DiskSizeChange(payload) => ConfigState {
            disk_size: parse_positive(ConfigField::DiskSize, payload)?,
            ..state.clone()
        },
        Action::DiskNumChange(payload) => ConfigState {
            disk_num: parse_positive(ConfigField::DiskNum, payload)?,
            ..state.clone()
        },
        Action::CollisionChange(collision) => ConfigState {
            collision: *collision,
            ..state.clone()
        },
        Action::Unrecognized(_) => state.clone(),
    };
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn initial() -> ConfigState {
        ConfigState::default()
    }

    // ── scenarios ─────────────────────────────────────────────────────────

    #[test]
    fn disk_num_change_sets_only_disk_num() {
        let next = reduce(&initial(), &Action::DiskNumChange("1000".into())).unwrap();
        assert_eq!((next.width, next.height), (400, 400));
        assert_eq!(next.disk_num, 1000);
        assert_eq!(next.disk_size, 16);
    }

    #[test]
    fn window_change_sets_both_sides() {
        let next = reduce(&initial(), &Action::WindowChange("800".into())).unwrap();
        assert_eq!((next.width, next.height), (800, 800));
    }

    #[test]
    fn disk_size_change() {
        let next = reduce(&initial(), &Action::DiskSizeChange("64".into())).unwrap();
        assert_eq!(next.disk_size, 64);
        assert_eq!(next.disk_num, 100);
    }

    #[test]
    fn collision_change_sets_flag() {
        let on = reduce(&initial(), &Action::CollisionChange(true)).unwrap();
        assert!(on.collision);
        let off = reduce(&on, &Action::CollisionChange(false)).unwrap();
        assert_eq!(off, initial());
    }

    #[test]
    fn same_window_is_idempotent() {
        let next = reduce(&initial(), &Action::WindowChange("400".into())).unwrap();
        assert_eq!(next, initial());
    }

    #[test]
    fn unrecognized_is_noop() {
        let next = reduce(&initial(), &Action::Unrecognized("ZOOM".into())).unwrap();
        assert_eq!(next, initial());
    }

    #[test]
    fn id_never_changes() {
        let s = ConfigState::with_id("surface-7");
        let next = reduce(&s, &Action::WindowChange("1000".into())).unwrap();
        assert_eq!(next.id, "surface-7");
    }

    // ── rejection ─────────────────────────────────────────────────────────

    #[test]
    fn non_numeric_payload_is_rejected() {
        let err = reduce(&initial(), &Action::DiskNumChange("lots".into())).unwrap_err();
        assert_eq!(
            err,
            ConfigError::NotANumber {
                field: ConfigField::DiskNum,
                payload: "lots".into()
            }
        );
    }

    #[test]
    fn zero_empty_and_negative_are_rejected() {
        assert_eq!(
            parse_positive(ConfigField::DiskSize, "0"),
            Err(ConfigError::NotPositive { field: ConfigField::DiskSize })
        );
        assert!(parse_positive(ConfigField::DiskSize, "").is_err());
        assert!(parse_positive(ConfigField::DiskSize, "-4").is_err());
        assert!(parse_positive(ConfigField::DiskSize, "4.5").is_err());
        assert!(parse_positive(ConfigField::DiskSize, "99999999999").is_err());
    }

    #[test]
    fn whitespace_is_trimmed() {
        assert_eq!(parse_positive(ConfigField::Window, " 600\n"), Ok(600));
    }

    // ── purity ────────────────────────────────────────────────────────────

    #[test]
    fn same_inputs_same_output() {
        let actions = [
            Action::DiskNumChange("10000".into()),
            Action::WindowChange("200".into()),
            Action::CollisionChange(true),
            Action::DiskSizeChange("4".into()),
        ];

        let run = || {
            actions
                .iter()
                .try_fold(initial(), |s, a| reduce(&s, a))
                .unwrap()
        };

        let first = run();
        // Interleave an unrelated reduction; it must not affect the replay.
        let _ = reduce(&first, &Action::WindowChange("1000".into()));
        assert_eq!(run(), first);
        assert_eq!(reduce(&first, &actions[0]), reduce(&first, &actions[0]));
    }
}
