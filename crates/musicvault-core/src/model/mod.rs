pub mod bandish;
pub mod diary;
pub mod ids;
pub mod karyakram;
pub mod raga;

pub use bandish::{Bandish, BandishKind, NewBandish, Tempo};
pub use diary::{DiaryEntry, NewDiaryEntry};
pub use ids::{BandishId, DiaryEntryId, KaryakramId, KaryakramItemId, RagaId};
pub use karyakram::{Karyakram, KaryakramItem, KaryakramStatus, NewKaryakram, NewKaryakramItem};
pub use raga::{NewRaga, Raga};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::gateway::Record;

/// Serialize a model value into a gateway record.
pub fn to_record<T: Serialize>(value: &T) -> Result<Record> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(Error::InvalidData(format!(
            "expected a record object, got {other}"
        ))),
    }
}

/// Deserialize a gateway record into a model value.
pub fn from_record<T: DeserializeOwned>(record: Record) -> Result<T> {
    Ok(serde_json::from_value(Value::Object(record))?)
}
