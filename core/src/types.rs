//! Shared primitive types and timing constants.

/// A point in time, milliseconds since the Unix epoch.
/// Always supplied by the caller — the core never reads the system clock.
pub type Millis = i64;

/// Stable key of a growable crop (`"lungroot"`, `"bonegrain"`, ...).
pub type CropKey = String;

/// Stable key of a tradeable/consumable good (`"lung_chunk"`, ...).
pub type GoodKey = String;

/// One logical tick advances the simulation by 60 seconds.
pub const TICK_INTERVAL_MS: Millis = 60 * 1000;

/// Market prices regenerate at most once per 5-minute window.
pub const MARKET_WINDOW_MS: Millis = 5 * 60 * 1000;

/// Offline catch-up replays at most 24 hours of missed ticks.
pub const OFFLINE_CAP_MS: Millis = 24 * 60 * 60 * 1000;
