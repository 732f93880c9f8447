/// Maximum number of threads on the board.
pub const MAX_THREADS: u64 = 500;

/// Maximum number of comments under a single thread.
pub const MAX_COMMENTS_PER_THREAD: u64 = 1000;

/// Threads shown per listing page.
pub const THREADS_PER_PAGE: u32 = 5;

/// Default lifetime of an issued token, in hours.
pub const TOKEN_LIFETIME_HOURS: i64 = 24;
