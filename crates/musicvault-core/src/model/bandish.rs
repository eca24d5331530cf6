use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::model::ids::{BandishId, RagaId};

/// The genre of a bandish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandishKind {
    #[default]
    Khayal,
    Dhrupad,
    Thumri,
    Bhajan,
    /// A free-form note not tied to a raga.
    GeneralNote,
    Other,
}

impl BandishKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Khayal => "khayal",
            Self::Dhrupad => "dhrupad",
            Self::Thumri => "thumri",
            Self::Bhajan => "bhajan",
            Self::GeneralNote => "general_note",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for BandishKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BandishKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace([' ', '-'], "_").as_str() {
            "khayal" => Ok(Self::Khayal),
            "dhrupad" => Ok(Self::Dhrupad),
            "thumri" => Ok(Self::Thumri),
            "bhajan" => Ok(Self::Bhajan),
            "general_note" | "note" => Ok(Self::GeneralNote),
            "other" => Ok(Self::Other),
            other => Err(format!("unknown bandish type: {other}")),
        }
    }
}

/// The laya (tempo) a bandish is sung in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tempo {
    Vilambit,
    #[default]
    Madhya,
    Drut,
}

impl Tempo {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vilambit => "vilambit",
            Self::Madhya => "madhya",
            Self::Drut => "drut",
        }
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tempo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "vilambit" => Ok(Self::Vilambit),
            "madhya" => Ok(Self::Madhya),
            "drut" => Ok(Self::Drut),
            other => Err(format!("unknown tempo: {other}")),
        }
    }
}

/// A fixed composition, usually set within a raga.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bandish {
    pub id: BandishId,
    pub created_at: DateTime<Utc>,

    /// The raga this composition belongs to, if any.
    pub raga_id: Option<RagaId>,

    pub title: String,

    #[serde(rename = "type")]
    pub kind: BandishKind,

    pub tempo: Tempo,

    /// Rhythmic cycle (e.g., "Teentaal", "Ektaal").
    pub tala: String,

    pub composer: Option<String>,

    #[serde(default)]
    pub lyrics: String,

    /// Reference to an audio recording (URL or path).
    pub audio_ref: Option<String>,

    /// Reference to a notation image (URL or path).
    pub notation_ref: Option<String>,
}

/// Fields supplied when creating a bandish.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBandish {
    pub raga_id: Option<RagaId>,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: BandishKind,
    pub tempo: Tempo,
    pub tala: String,
    pub composer: Option<String>,
    pub lyrics: String,
    pub audio_ref: Option<String>,
    pub notation_ref: Option<String>,
}

impl NewBandish {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn in_raga(mut self, raga_id: RagaId) -> Self {
        self.raga_id = Some(raga_id);
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: BandishKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_tempo(mut self, tempo: Tempo) -> Self {
        self.tempo = tempo;
        self
    }

    #[must_use]
    pub fn with_tala(mut self, tala: impl Into<String>) -> Self {
        self.tala = tala.into();
        self
    }

    #[must_use]
    pub fn with_composer(mut self, composer: impl Into<String>) -> Self {
        self.composer = Some(composer.into());
        self
    }

    #[must_use]
    pub fn with_lyrics(mut self, lyrics: impl Into<String>) -> Self {
        self.lyrics = lyrics.into();
        self
    }

    #[must_use]
    pub fn with_audio_ref(mut self, audio_ref: impl Into<String>) -> Self {
        self.audio_ref = Some(audio_ref.into());
        self
    }

    #[must_use]
    pub fn with_notation_ref(mut self, notation_ref: impl Into<String>) -> Self {
        self.notation_ref = Some(notation_ref.into());
        self
    }
}
