/// Time in milliseconds
pub type TimeMs = u64;

/// Scene identifier as known to the scene graph
pub type SceneName = String;

pub const MS_PER_SECOND: TimeMs = 1_000;
pub const MS_PER_MINUTE: TimeMs = 60 * MS_PER_SECOND;
pub const MS_PER_HOUR: TimeMs = 60 * MS_PER_MINUTE;
