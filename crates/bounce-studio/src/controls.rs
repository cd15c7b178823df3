use bounce_control::config::options::{self, DISK_NUM_OPTIONS, DISK_SIZE_OPTIONS, WINDOW_OPTIONS};
use bounce_control::{Action, ConfigState};
use winit::keyboard::KeyCode;

/// What a key press asks the studio to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    Toggle,
    Dispatch(Action),
    Exit,
}

/// Maps a pressed key to a control. `reverse` is the Shift state.
///
/// Selector keys step to the next option after the current value and carry it
/// as a decimal payload, the same form the command line uses.
pub fn control_for(key: KeyCode, reverse: bool, config: &ConfigState) -> Option<Control> {
    let control = match key {
        KeyCode::Space => Control::Toggle,
        KeyCode::Escape => Control::Exit,
        KeyCode::KeyS => Control::Dispatch(Action::DiskSizeChange(step(
            &DISK_SIZE_OPTIONS,
            config.disk_size,
            reverse,
        ))),
        KeyCode::KeyN => Control::Dispatch(Action::DiskNumChange(step(
            &DISK_NUM_OPTIONS,
            config.disk_num,
            reverse,
        ))),
        KeyCode::KeyW => Control::Dispatch(Action::WindowChange(step(
            &WINDOW_OPTIONS,
            config.width,
            reverse,
        ))),
        KeyCode::KeyC => Control::Dispatch(Action::CollisionChange(!config.collision)),
        _ => return None,
    };
    Some(control)
}

fn step(opts: &[u32], current: u32, reverse: bool) -> String {
    options::cycle(opts, current, reverse).to_string()
}
