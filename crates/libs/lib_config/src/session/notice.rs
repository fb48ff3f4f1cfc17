use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// One-shot message shown to a user on their next page view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decodes stored notices in order, dropping entries that no longer parse.
    pub fn decode_all(raw: Vec<String>) -> Vec<Notice> {
        raw.into_iter()
            .filter_map(|entry| match serde_json::from_str::<Notice>(&entry) {
                Ok(notice) => Some(notice),
                Err(e) => {
                    tracing::warn!("Dropping unreadable notice {:?}: {}", entry, e);
                    None
                }
            })
            .collect()
    }
}
