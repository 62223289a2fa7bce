use stance_shared::hover::{DEFAULT_CLOSE_DELAY_MS, DEFAULT_OPEN_DELAY_MS};

pub struct Config {
    pub api_base_url: &'static str,
    pub hover_open_delay_ms: i64,
    pub hover_close_delay_ms: i64,
    pub feed_poll_ms: u32,
}

impl Config {
    pub const fn new() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000/api",
            hover_open_delay_ms: DEFAULT_OPEN_DELAY_MS,
            hover_close_delay_ms: DEFAULT_CLOSE_DELAY_MS,
            feed_poll_ms: 2_000,
        }
    }
}

pub const CONFIG: Config = Config::new();
