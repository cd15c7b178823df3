/// Render-surface and simulation parameters.
///
/// A `ConfigState` is a value: every accepted action produces a new one and the
/// previous version is never mutated. Numeric fields are always positive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigState {
    /// Identity of the render target. Fixed for the lifetime of the surface.
    pub id: String,

    /// Surface width in logical pixels.
    pub width: u32,

    /// Surface height in logical pixels.
    pub height: u32,

    /// Number of disks handed to the engine.
    pub disk_num: u32,

    /// Disk diameter in logical pixels.
    pub disk_size: u32,

    /// Enables disk-to-disk collision response.
    pub collision: bool,
}

impl ConfigState {
    /// Surface id used when none is supplied.
    pub const DEFAULT_ID: &'static str = "canvas";

    /// Creates the default configuration bound to `id`.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

impl Default for ConfigState {
    fn default() -> Self {
        Self {
            id: Self::DEFAULT_ID.to_string(),
            width: 400,
            height: 400,
            disk_num: 100,
            disk_size: 16,
            collision: false,
        }
    }
}
