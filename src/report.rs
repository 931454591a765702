// 🧾 Report - timestamped envelope for command output

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Report<T: Serialize> {
    pub command: String,
    pub generated_at: DateTime<Utc>,
    pub kernel_version: &'static str,
    pub data: T,
}

impl<T: Serialize> Report<T> {
    pub fn new(command: impl Into<String>, data: T) -> Self {
        Report {
            command: command.into(),
            generated_at: Utc::now(),
            kernel_version: crate::VERSION,
            data,
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
