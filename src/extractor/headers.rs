//! Anti-detection HTTP headers.

use rand::seq::SliceRandom;

/// Realistic browser User-Agent strings, rotated per request.
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

/// Pick a random User-Agent from the pool.
pub fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

/// Engine arguments for browser-like request headers.
pub fn header_args() -> Vec<String> {
    vec![
        "--user-agent".to_string(),
        random_user_agent().to_string(),
        "--add-header".to_string(),
        "Accept:text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string(),
        "--add-header".to_string(),
        "Accept-Language:en-US,en;q=0.9".to_string(),
        "--add-header".to_string(),
        "Accept-Encoding:gzip, deflate".to_string(),
        "--add-header".to_string(),
        "DNT:1".to_string(),
        "--add-header".to_string(),
        "Connection:keep-alive".to_string(),
    ]
}
