//! Game and service configuration constants

/// Playfield width in grid cells
pub const GRID_WIDTH: i32 = 20;

/// Playfield height in grid cells
pub const GRID_HEIGHT: i32 = 20;

/// Total number of grid cells
pub const GRID_CELLS: i32 = GRID_WIDTH * GRID_HEIGHT;

/// Points awarded per food capture
pub const POINTS_PER_FOOD: u32 = 10;

/// Snake length at the start of every game
pub const INITIAL_SNAKE_LENGTH: usize = 3;

/// Fastest allowed tick interval in milliseconds (speed floor)
pub const MIN_TICK_INTERVAL_MS: u64 = 50;

/// Highest score the grid can physically hold
pub const MAX_THEORETICAL_SCORE: i64 = GRID_CELLS as i64 * POINTS_PER_FOOD as i64;

/// Attempts at rejection-sampling a food cell before scanning for free cells
pub const FOOD_PLACEMENT_ATTEMPTS: u32 = 64;

/// HTTP server port
pub const SERVER_PORT: u16 = 8080;

// =============================================================================
// Leaderboard
// =============================================================================

/// Maximum number of entries the leaderboard retains
pub const LEADERBOARD_CAP: usize = 20;

/// Durable key under which the leaderboard record is stored
pub const LEADERBOARD_KEY: &str = "leaderboard";

/// How far a submission timestamp may deviate from server time, either way
pub const TIMESTAMP_FRESHNESS_MS: i64 = 10 * 60 * 1000;

/// Allowed deviation between declared and score-implied snake length
pub const SNAKE_LENGTH_TOLERANCE: i64 = 2;

/// Fastest physically possible interval between food captures
pub const MIN_MS_PER_FOOD: i64 = 500;

/// Store read/write attempts before a transient failure escalates
pub const STORE_RETRY_ATTEMPTS: u32 = 3;

/// Base delay between store retries; grows linearly per attempt
pub const STORE_RETRY_BASE_DELAY_MS: u64 = 100;

/// Full read-modify-write cycles attempted when conditional writes conflict
pub const RMW_MAX_RETRIES: u32 = 3;

/// How long a query-service leaderboard read stays cached
pub const QUERY_CACHE_TTL_MS: u64 = 5_000;

// =============================================================================
// Admission control
// =============================================================================

/// Submissions admitted per source address per window
pub const RATE_LIMIT_MAX_SUBMISSIONS: u32 = 5;

/// Admission window length in milliseconds
pub const RATE_LIMIT_WINDOW_MS: u64 = 60_000;

// =============================================================================
// Event Logging
// =============================================================================

/// Enable submission audit logging
pub const ENABLE_EVENT_LOGGING: bool = true;

/// Audit log file path
pub const EVENT_LOG_FILE: &str = "submission_events.log";
