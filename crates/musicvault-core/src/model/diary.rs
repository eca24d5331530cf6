use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::DiaryEntryId;

/// A dated practice reflection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub id: DiaryEntryId,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub content: String,
    pub image_ref: Option<String>,
}

/// Fields supplied when writing a diary entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDiaryEntry {
    pub title: String,
    pub content: String,
    pub image_ref: Option<String>,
}

impl NewDiaryEntry {
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            image_ref: None,
        }
    }

    #[must_use]
    pub fn with_image_ref(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }
}
