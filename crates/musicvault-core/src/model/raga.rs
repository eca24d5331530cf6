use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::RagaId;

/// A melodic framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Raga {
    pub id: RagaId,
    pub created_at: DateTime<Utc>,
    pub name: String,

    /// Parent scale family (e.g., "Kalyan", "Bilawal").
    pub thaat: String,

    /// Traditional performance time (e.g., "Evening (6 PM - 9 PM)").
    pub time: String,

    /// Predominant note.
    pub vadi: String,

    /// Second most prominent note.
    pub samvadi: String,

    /// Ascending line.
    pub aroha: String,

    /// Descending line.
    pub avroha: String,

    /// Characteristic catch phrase.
    pub pakad: String,

    pub description: Option<String>,
}

impl Raga {
    /// Whether a swara sequence occurs in the aroha, avroha or pakad.
    ///
    /// Plain substring matching; no note normalisation is attempted.
    #[must_use]
    pub fn contains_swaras(&self, sequence: &str) -> bool {
        let needle = sequence.trim();
        !needle.is_empty()
            && [&self.aroha, &self.avroha, &self.pakad]
                .iter()
                .any(|line| line.contains(needle))
    }
}

/// Fields supplied when creating a raga.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRaga {
    pub name: String,
    pub thaat: String,
    pub time: String,
    pub vadi: String,
    pub samvadi: String,
    pub aroha: String,
    pub avroha: String,
    pub pakad: String,
    pub description: Option<String>,
}

impl NewRaga {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_thaat(mut self, thaat: impl Into<String>) -> Self {
        self.thaat = thaat.into();
        self
    }

    #[must_use]
    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = time.into();
        self
    }

    #[must_use]
    pub fn with_vadi_samvadi(mut self, vadi: impl Into<String>, samvadi: impl Into<String>) -> Self {
        self.vadi = vadi.into();
        self.samvadi = samvadi.into();
        self
    }

    #[must_use]
    pub fn with_lines(
        mut self,
        aroha: impl Into<String>,
        avroha: impl Into<String>,
        pakad: impl Into<String>,
    ) -> Self {
        self.aroha = aroha.into();
        self.avroha = avroha.into();
        self.pakad = pakad.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{from_record, to_record};

    fn yaman() -> NewRaga {
        NewRaga::new("Yaman")
            .with_thaat("Kalyan")
            .with_time("Evening (6 PM - 9 PM)")
            .with_vadi_samvadi("Ga", "Ni")
            .with_lines(
                "Ni Re Ga Ma(t) Pa Dha Ni Sa",
                "Sa Ni Dha Pa Ma(t) Ga Re Sa",
                "Ni Re Ga Ma(t) Pa, Re Ga Re Sa",
            )
    }

    #[test]
    fn test_new_raga_builder() {
        let raga = yaman().with_description("Evening raga");
        assert_eq!(raga.name, "Yaman");
        assert_eq!(raga.thaat, "Kalyan");
        assert_eq!(raga.vadi, "Ga");
        assert_eq!(raga.description, Some("Evening raga".to_string()));
    }

    #[test]
    fn test_contains_swaras() {
        let mut record = to_record(&yaman()).unwrap();
        record.insert("id".into(), serde_json::json!(RagaId::new().to_string()));
        record.insert("created_at".into(), serde_json::json!(Utc::now().to_rfc3339()));
        let raga: Raga = from_record(record).unwrap();

        assert!(raga.contains_swaras("Pa Dha Ni"));
        assert!(raga.contains_swaras("  Re Ga Re Sa "));
        assert!(!raga.contains_swaras("Komal Dha"));
        assert!(!raga.contains_swaras("   "));
    }
}
