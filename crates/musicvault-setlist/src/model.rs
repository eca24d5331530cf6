use std::collections::HashMap;
use std::fmt;

use musicvault_core::gateway::{Gateway, Query, RecordId, Table};
use musicvault_core::model::{
    from_record, Bandish, BandishId, BandishKind, Karyakram, KaryakramId, KaryakramItem,
    KaryakramItemId, Raga, RagaId, Tempo,
};

use crate::error::Result;

/// Identity of a setlist item.
///
/// Items appended locally carry a placeholder until a reload replaces them
/// with the store-assigned id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemIdentity {
    Durable(KaryakramItemId),
    Pending(u64),
}

impl ItemIdentity {
    #[must_use]
    pub fn durable(self) -> Option<KaryakramItemId> {
        match self {
            Self::Durable(id) => Some(id),
            Self::Pending(_) => None,
        }
    }

    #[must_use]
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

impl fmt::Display for ItemIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Durable(id) => write!(f, "{id}"),
            Self::Pending(n) => write!(f, "pending-{n}"),
        }
    }
}

/// Read-only view of a bandish as shown in a setlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    pub id: BandishId,
    pub title: String,
    pub kind: BandishKind,
    pub tala: String,
    pub tempo: Tempo,
    pub lyrics: Option<String>,
    pub audio_ref: Option<String>,
    pub notation_ref: Option<String>,
    pub raga_name: Option<String>,
}

impl Composition {
    #[must_use]
    pub fn from_bandish(bandish: Bandish, raga_name: Option<String>) -> Self {
        Self {
            id: bandish.id,
            title: bandish.title,
            kind: bandish.kind,
            tala: bandish.tala,
            tempo: bandish.tempo,
            lyrics: Some(bandish.lyrics).filter(|l| !l.trim().is_empty()),
            audio_ref: bandish.audio_ref,
            notation_ref: bandish.notation_ref,
            raga_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetlistItem {
    pub id: ItemIdentity,
    pub event_id: KaryakramId,
    pub composition_id: BandishId,
    pub sequence_ordinal: u32,
    /// Joined on load; `None` when the bandish no longer exists.
    pub composition: Option<Composition>,
}

impl SetlistItem {
    fn from_stored(item: KaryakramItem, composition: Option<Composition>) -> Self {
        Self {
            id: ItemIdentity::Durable(item.id),
            event_id: item.karyakram_id,
            composition_id: item.bandish_id,
            sequence_ordinal: item.sequence_order,
            composition,
        }
    }

    /// Title for display, with a marker for a missing bandish.
    #[must_use]
    pub fn title(&self) -> &str {
        self.composition
            .as_ref()
            .map_or("(missing bandish)", |c| c.title.as_str())
    }
}

/// Whether the local setlist is known to match the store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Freshness {
    #[default]
    Fresh,
    /// A remote step failed; the reason is kept for display until reload.
    Stale(String),
}

/// The ordered items of one karyakram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setlist {
    event: Karyakram,
    items: Vec<SetlistItem>,
    freshness: Freshness,
}

impl Setlist {
    #[must_use]
    pub fn new(event: Karyakram, items: Vec<SetlistItem>) -> Self {
        Self {
            event,
            items,
            freshness: Freshness::Fresh,
        }
    }

    /// Fetch an event's items in sequence order with their bandishes joined.
    ///
    /// Fails with `NotFound` only if the event is missing; no items is an
    /// empty setlist.
    pub async fn load(gateway: &dyn Gateway, event_id: KaryakramId) -> Result<Self> {
        let event: Karyakram = from_record(
            gateway
                .get_one(Table::Karyakrams, &RecordId::new(event_id.to_string()))
                .await?,
        )?;

        let stored: Vec<KaryakramItem> = gateway
            .list_ordered(
                Table::KaryakramItems,
                &Query::where_eq("karyakram_id", event_id.to_string()).ascending("sequence_order"),
            )
            .await?
            .into_iter()
            .map(from_record)
            .collect::<musicvault_core::Result<_>>()?;

        let mut raga_names = HashMap::new();
        let mut items = Vec::with_capacity(stored.len());
        for item in stored {
            let composition = fetch_composition(gateway, item.bandish_id, &mut raga_names).await?;
            items.push(SetlistItem::from_stored(item, composition));
        }

        log::debug!("Loaded {} setlist items for {}", items.len(), event.title);
        Ok(Self::new(event, items))
    }

    #[must_use]
    pub fn event(&self) -> &Karyakram {
        &self.event
    }

    #[must_use]
    pub fn event_id(&self) -> KaryakramId {
        self.event.id
    }

    #[must_use]
    pub fn items(&self) -> &[SetlistItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SetlistItem> {
        self.items.get(index)
    }

    /// Index of the item with this identity.
    #[must_use]
    pub fn position(&self, id: ItemIdentity) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Sequence ordinals in list order.
    #[must_use]
    pub fn ordinals(&self) -> Vec<u32> {
        self.items.iter().map(|item| item.sequence_ordinal).collect()
    }

    #[must_use]
    pub fn freshness(&self) -> &Freshness {
        &self.freshness
    }

    #[must_use]
    pub fn is_stale(&self) -> bool {
        matches!(self.freshness, Freshness::Stale(_))
    }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<SetlistItem> {
        &mut self.items
    }

    pub(crate) fn mark_stale(&mut self, reason: impl Into<String>) {
        self.freshness = Freshness::Stale(reason.into());
    }
}

async fn fetch_composition(
    gateway: &dyn Gateway,
    bandish_id: BandishId,
    raga_names: &mut HashMap<RagaId, Option<String>>,
) -> Result<Option<Composition>> {
    let record = match gateway
        .get_one(Table::Bandishes, &RecordId::new(bandish_id.to_string()))
        .await
    {
        Ok(record) => record,
        Err(e) if e.is_not_found() => {
            log::debug!("Setlist refers to missing bandish {}", bandish_id);
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };
    let bandish: Bandish = from_record(record)?;

    let raga_name = match bandish.raga_id {
        None => None,
        Some(raga_id) => {
            if let Some(name) = raga_names.get(&raga_id) {
                name.clone()
            } else {
                let name = match gateway
                    .get_one(Table::Ragas, &RecordId::new(raga_id.to_string()))
                    .await
                {
                    Ok(record) => Some(from_record::<Raga>(record)?.name),
                    Err(e) if e.is_not_found() => None,
                    Err(e) => return Err(e.into()),
                };
                raga_names.insert(raga_id, name.clone());
                name
            }
        }
    };

    Ok(Some(Composition::from_bandish(bandish, raga_name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn bandish(title: &str, lyrics: &str) -> Bandish {
        Bandish {
            id: BandishId::new(),
            created_at: Utc::now(),
            raga_id: None,
            title: title.to_string(),
            kind: BandishKind::Khayal,
            tempo: Tempo::Drut,
            tala: "Ektaal".to_string(),
            composer: None,
            lyrics: lyrics.to_string(),
            audio_ref: None,
            notation_ref: None,
        }
    }

    #[test]
    fn test_composition_drops_blank_lyrics() {
        let c = Composition::from_bandish(bandish("Eri Aali", "  "), None);
        assert_eq!(c.lyrics, None);
        let c = Composition::from_bandish(bandish("Eri Aali", "piya bina"), Some("Yaman".into()));
        assert_eq!(c.lyrics.as_deref(), Some("piya bina"));
        assert_eq!(c.raga_name.as_deref(), Some("Yaman"));
    }

    #[test]
    fn test_item_identity() {
        let id = KaryakramItemId::new();
        assert_eq!(ItemIdentity::Durable(id).durable(), Some(id));
        assert!(ItemIdentity::Pending(3).is_pending());
        assert_eq!(ItemIdentity::Pending(3).to_string(), "pending-3");
    }

    #[test]
    fn test_missing_composition_title() {
        let item = SetlistItem {
            id: ItemIdentity::Pending(0),
            event_id: KaryakramId::new(),
            composition_id: BandishId::new(),
            sequence_ordinal: 1,
            composition: None,
        };
        assert_eq!(item.title(), "(missing bandish)");
    }
}
