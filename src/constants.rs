// Answer selection
pub const MAX_PICK_ATTEMPTS: usize = 50;

// Difficulty tiers: (total guesses, hints revealed; None = every valid score field)
pub const EASY_GUESSES: i32 = 15;
pub const MEDIUM_GUESSES: i32 = 10;
pub const MEDIUM_HINTS: usize = 8;
pub const HARD_GUESSES: i32 = 5;
pub const HARD_HINTS: usize = 4;
pub const HELL_GUESSES: i32 = 3;
pub const HELL_HINTS: usize = 1;

// Catalog paging
pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const MAX_PAGE_SIZE: usize = 100;

// Data and server defaults
pub const DEFAULT_DATA_PATH: &str = "data/emperors.json";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

// HTTP boundary limits
pub const MAX_REQUEST_BYTES: usize = 64 * 1024;
pub const READ_TIMEOUT_SECS: u64 = 10;
pub const SESSION_COOKIE: &str = "sid";

// Rounds older than this are expired; the sweep runs from `start` at most once per interval
pub const SESSION_TTL_SECS: i64 = 2 * 60 * 60;
pub const SESSION_SWEEP_SECS: i64 = 5 * 60;

// Placeholder cells that mean "not scored"
pub const MISSING_MARKERS: &[&str] = &["", "-", "—", "－", "–"];
