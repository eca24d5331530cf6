use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::model::ids::{BandishId, KaryakramId, KaryakramItemId};

/// Planning state of a karyakram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KaryakramStatus {
    #[default]
    Planned,
    Completed,
    Draft,
}

impl KaryakramStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Completed => "completed",
            Self::Draft => "draft",
        }
    }
}

impl fmt::Display for KaryakramStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KaryakramStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "planned" => Ok(Self::Planned),
            "completed" => Ok(Self::Completed),
            "draft" => Ok(Self::Draft),
            other => Err(format!("unknown karyakram status: {other}")),
        }
    }
}

/// A planned performance occasion.
///
/// Owns its setlist rows: deleting a karyakram deletes its items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Karyakram {
    pub id: KaryakramId,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub date: Option<NaiveDate>,
    pub venue: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub status: KaryakramStatus,
}

/// Editable details of a karyakram.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewKaryakram {
    pub title: String,
    pub date: Option<NaiveDate>,
    pub venue: Option<String>,
    pub notes: Option<String>,
    pub status: KaryakramStatus,
}

impl NewKaryakram {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn at(mut self, venue: impl Into<String>) -> Self {
        self.venue = Some(venue.into());
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: KaryakramStatus) -> Self {
        self.status = status;
        self
    }
}

impl From<&Karyakram> for NewKaryakram {
    fn from(karyakram: &Karyakram) -> Self {
        Self {
            title: karyakram.title.clone(),
            date: karyakram.date,
            venue: karyakram.venue.clone(),
            notes: karyakram.notes.clone(),
            status: karyakram.status,
        }
    }
}

/// One stored setlist row: a bandish placed at a position in a karyakram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KaryakramItem {
    pub id: KaryakramItemId,
    pub created_at: DateTime<Utc>,
    pub karyakram_id: KaryakramId,
    pub bandish_id: BandishId,

    /// 1-based play position.
    pub sequence_order: u32,

    pub notes: Option<String>,
}

/// Fields supplied when inserting a setlist row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewKaryakramItem {
    pub karyakram_id: KaryakramId,
    pub bandish_id: BandishId,
    pub sequence_order: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{from_record, to_record};

    #[test]
    fn test_status_round_trip_through_str() {
        for status in [
            KaryakramStatus::Planned,
            KaryakramStatus::Completed,
            KaryakramStatus::Draft,
        ] {
            assert_eq!(status.as_str().parse::<KaryakramStatus>(), Ok(status));
        }
        assert!("cancelled".parse::<KaryakramStatus>().is_err());
    }

    #[test]
    fn test_new_karyakram_builder() {
        let date = NaiveDate::from_ymd_opt(2024, 11, 1).unwrap();
        let details = NewKaryakram::new("Diwali Baithak")
            .on(date)
            .at("Community Hall")
            .with_status(KaryakramStatus::Draft);

        assert_eq!(details.title, "Diwali Baithak");
        assert_eq!(details.date, Some(date));
        assert_eq!(details.venue.as_deref(), Some("Community Hall"));
        assert_eq!(details.status, KaryakramStatus::Draft);
    }

    #[test]
    fn test_karyakram_from_record_defaults_status() {
        let mut record = to_record(&NewKaryakram::new("Mehfil")).unwrap();
        record.remove("status");
        record.insert("id".into(), serde_json::json!(KaryakramId::new().to_string()));
        record.insert("created_at".into(), serde_json::json!(Utc::now().to_rfc3339()));
        record.insert("date".into(), serde_json::json!("2025-01-26"));

        let karyakram: Karyakram = from_record(record).unwrap();
        assert_eq!(karyakram.status, KaryakramStatus::Planned);
        assert_eq!(karyakram.date, NaiveDate::from_ymd_opt(2025, 1, 26));
    }
}
