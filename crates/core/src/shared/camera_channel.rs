use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the two independent camera pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraChannel {
    Entry,
    Exit,
}

impl CameraChannel {
    pub const ALL: &[CameraChannel] = &[CameraChannel::Entry, CameraChannel::Exit];

    /// Capitalized name for operator-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            CameraChannel::Entry => "Entry",
            CameraChannel::Exit => "Exit",
        }
    }
}

impl fmt::Display for CameraChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraChannel::Entry => write!(f, "entry"),
            CameraChannel::Exit => write!(f, "exit"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown camera channel '{0}' (expected 'entry' or 'exit')")]
pub struct ParseChannelError(pub String);

impl FromStr for CameraChannel {
    type Err = ParseChannelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "entry" | "in" => Ok(CameraChannel::Entry),
            "exit" | "out" => Ok(CameraChannel::Exit),
            _ => Err(ParseChannelError(s.to_string())),
        }
    }
}
