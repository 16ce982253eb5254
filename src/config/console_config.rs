use serde::Deserialize;
use std::time::Duration;

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ConsoleConfig {
    pub currency_symbol: String,
    /// 0 disables the heartbeat task
    pub heartbeat_interval_ms: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            currency_symbol: String::new(),
            heartbeat_interval_ms: 1000,
        }
    }
}

impl ConsoleConfig {
    pub fn heartbeat_interval(&self) -> Option<Duration> {
        (self.heartbeat_interval_ms > 0).then(|| Duration::from_millis(self.heartbeat_interval_ms))
    }
}
