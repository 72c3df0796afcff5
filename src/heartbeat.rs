use std::time::Duration;

use serde::Deserialize;

/// Interval between `GET /heartbeat` polls.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Body of `GET /heartbeat`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HeartbeatStatus {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub last_heartbeat: Option<String>,
    #[serde(default)]
    pub uptime: Option<String>,
}

impl HeartbeatStatus {
    /// Uptime to show: the backend's own figure if it sent one,
    /// otherwise how long this console has been running.
    pub fn uptime_text(status: Option<&HeartbeatStatus>, client_uptime: Duration) -> String {
        status
            .and_then(|s| s.uptime.clone())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| format_uptime(client_uptime))
    }
}

/// `HH:MM:SS`; hours keep growing past 99.
pub fn format_uptime(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
