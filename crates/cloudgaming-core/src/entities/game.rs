//! Game entity - an entry in the streaming catalog

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Catalog availability of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum GameStatus {
    /// Image is provisioned and can be launched
    Ready,
    /// Image is still being prepared
    #[default]
    Prepare,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::Prepare => "PREPARE",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "READY" => Ok(Self::Ready),
            "PREPARE" => Ok(Self::Prepare),
            other => Err(format!("unknown game status: {other}")),
        }
    }
}

/// Game catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub platform: Option<String>,
    pub app_id: Option<String>,
    pub status: GameStatus,
    pub last_update_at: DateTime<Utc>,
}

impl Game {
    /// Create a new game in the `PREPARE` state
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            slug: slug.into(),
            title: title.into(),
            platform: None,
            app_id: None,
            status: GameStatus::Prepare,
            last_update_at: Utc::now(),
        }
    }

    /// Set the storefront platform and its app identifier
    pub fn with_platform(mut self, platform: impl Into<String>, app_id: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self.app_id = Some(app_id.into());
        self
    }

    pub fn with_status(mut self, status: GameStatus) -> Self {
        self.status = status;
        self
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.status == GameStatus::Ready
    }
}
