//! Shared constants for end-to-end tests
//!
//! When the fixture rows in `fixtures.rs` change, update the expectations here.

// ============================================================================
// Fixture source
// ============================================================================

/// File name of the CSV written into each test server's temp dir
pub const SOURCE_FILE_NAME: &str = "engajamento.csv";

/// Data rows in the fixture, header excluded
pub const TOTAL_ROWS: usize = 6;

/// Rows left after dropping the one with an unparseable date
pub const KEPT_ROWS: usize = 5;

/// The only row whose vote cell is not a number
pub const INVALID_VOTE_CELLS: usize = 1;

// ============================================================================
// Expected aggregates (everything selected)
// ============================================================================

/// Distinct ids among "Comentário" rows: c1 appears twice
pub const COMMENT_COUNT: usize = 3;

pub const TOTAL_VOTES: u64 = 11;

pub const NETWORK_FACEBOOK: &str = "Facebook";
pub const NETWORK_INSTAGRAM: &str = "Instagram";

pub const TOPIC_NEWS: &str = "Notícias";
pub const TOPIC_ODDS: &str = "Odds";
pub const TOPIC_PROMO: &str = "Promo";

/// Week candidates, ordered by month then week regardless of year
pub const WEEK_OPTIONS: [&str; 5] = ["S1-Jan", "S2-Jan", "S3-Jan", "S1-Feb", "S5-Dec"];

/// Weekly trend labels, ordered by year, month and week
pub const WEEKS_CHRONOLOGICAL: [&str; 5] = ["S5-Dec", "S1-Jan", "S2-Jan", "S3-Jan", "S1-Feb"];

// ============================================================================
// Timeouts
// ============================================================================

/// Timeout for HTTP requests in tests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 5;

/// Maximum time to wait for server to be ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Polling interval when waiting for server readiness (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 10;
