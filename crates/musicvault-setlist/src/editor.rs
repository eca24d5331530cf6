//! Optimistic setlist edits.
//!
//! Every edit changes the local setlist first and then makes the store
//! calls. A failed store call leaves the local change in place and marks the
//! setlist stale; only [`SetlistEditor::reload`] reconciles. Nothing is
//! retried or rolled back.

use serde_json::Value;
use std::sync::Arc;

use musicvault_core::gateway::{Gateway, Record, RecordId, Table};
use musicvault_core::model::{to_record, BandishId, KaryakramId, KaryakramItemId, NewKaryakramItem};

use crate::error::{Result, SetlistError};
use crate::model::{Composition, ItemIdentity, Setlist, SetlistItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOutcome {
    Moved,
    /// The move would leave the list; nothing was changed or sent.
    Unchanged,
}

/// An append applied locally but not yet sent to the store.
#[derive(Debug)]
#[must_use = "a staged append does nothing until committed"]
pub struct PendingAppend {
    placeholder: ItemIdentity,
    composition_id: BandishId,
    sequence_ordinal: u32,
}

impl PendingAppend {
    pub fn placeholder(&self) -> ItemIdentity {
        self.placeholder
    }

    pub fn sequence_ordinal(&self) -> u32 {
        self.sequence_ordinal
    }
}

/// A removal applied locally but not yet sent to the store.
#[derive(Debug)]
#[must_use = "a staged removal does nothing until committed"]
pub struct PendingRemove {
    id: ItemIdentity,
}

#[derive(Debug)]
pub struct SetlistEditor {
    gateway: Arc<dyn Gateway>,
    setlist: Setlist,
    next_placeholder: u64,
}

impl SetlistEditor {
    pub fn new(gateway: Arc<dyn Gateway>, setlist: Setlist) -> Self {
        Self {
            gateway,
            setlist,
            next_placeholder: 0,
        }
    }

    /// Load an event's setlist and start editing it.
    pub async fn open(gateway: Arc<dyn Gateway>, event_id: KaryakramId) -> Result<Self> {
        let setlist = Setlist::load(&*gateway, event_id).await?;
        Ok(Self::new(gateway, setlist))
    }

    pub fn setlist(&self) -> &Setlist {
        &self.setlist
    }

    pub fn into_setlist(self) -> Setlist {
        self.setlist
    }

    /// Replace the local setlist with the store's copy, clearing staleness.
    pub async fn reload(&mut self) -> Result<()> {
        match Setlist::load(&*self.gateway, self.setlist.event_id()).await {
            Ok(setlist) => {
                self.setlist = setlist;
                Ok(())
            }
            Err(e) => {
                self.setlist.mark_stale(format!("reload failed: {e}"));
                Err(e)
            }
        }
    }

    /// Add the composition to the end of the local list with the next ordinal.
    pub fn stage_append(&mut self, composition: Composition) -> PendingAppend {
        let placeholder = ItemIdentity::Pending(self.next_placeholder);
        self.next_placeholder += 1;

        let sequence_ordinal = self.setlist.len() as u32 + 1;
        let composition_id = composition.id;
        let event_id = self.setlist.event_id();
        self.setlist.items_mut().push(SetlistItem {
            id: placeholder,
            event_id,
            composition_id,
            sequence_ordinal,
            composition: Some(composition),
        });

        PendingAppend {
            placeholder,
            composition_id,
            sequence_ordinal,
        }
    }

    /// Insert the staged item, then reload to pick up its durable id.
    pub async fn commit_append(&mut self, pending: PendingAppend) -> Result<()> {
        let item = NewKaryakramItem {
            karyakram_id: self.setlist.event_id(),
            bandish_id: pending.composition_id,
            sequence_order: pending.sequence_ordinal,
        };
        let inserted = match to_record(&item) {
            Ok(record) => self.gateway.insert(Table::KaryakramItems, record).await,
            Err(e) => Err(e),
        };

        match inserted {
            Ok(id) => {
                log::debug!("Appended setlist item {} at {}", id, pending.sequence_ordinal);
                self.reload().await
            }
            Err(e) => {
                log::warn!("Append of {} failed: {}", pending.placeholder, e);
                self.setlist.mark_stale(format!("append failed: {e}"));
                Err(SetlistError::mutation("append", e))
            }
        }
    }

    pub async fn append(&mut self, composition: Composition) -> Result<()> {
        let pending = self.stage_append(composition);
        self.commit_append(pending).await
    }

    /// Drop the item from the local list. Other ordinals are left as they are.
    pub fn stage_remove(&mut self, id: ItemIdentity) -> PendingRemove {
        self.setlist.items_mut().retain(|item| item.id != id);
        PendingRemove { id }
    }

    /// Delete the staged item from the store.
    ///
    /// The delete is sent even when the item was not in the local list. A
    /// placeholder never reached the store, so removing one sends nothing.
    pub async fn commit_remove(&mut self, pending: PendingRemove) -> Result<()> {
        let Some(id) = pending.id.durable() else {
            log::debug!("Dropped unsaved setlist item {}", pending.id);
            return Ok(());
        };

        if let Err(e) = self
            .gateway
            .delete(Table::KaryakramItems, &record_id(id))
            .await
        {
            log::warn!("Remove of {} failed: {}", id, e);
            self.setlist.mark_stale(format!("remove failed: {e}"));
            return Err(SetlistError::mutation("remove", e));
        }
        Ok(())
    }

    pub async fn remove(&mut self, id: ItemIdentity) -> Result<()> {
        let pending = self.stage_remove(id);
        self.commit_remove(pending).await
    }

    /// Exchange the item at `index` with its neighbour, then renumber the
    /// whole list 1..N and persist every ordinal, one update at a time.
    pub async fn swap_adjacent(&mut self, index: usize, direction: Direction) -> Result<SwapOutcome> {
        let len = self.setlist.len();
        let neighbour = match direction {
            Direction::Up => index.checked_sub(1),
            Direction::Down => index.checked_add(1),
        };
        let Some(neighbour) = neighbour.filter(|&n| index < len && n < len) else {
            return Ok(SwapOutcome::Unchanged);
        };

        let items = self.setlist.items_mut();
        items.swap(index, neighbour);
        for (position, item) in items.iter_mut().enumerate() {
            item.sequence_ordinal = position as u32 + 1;
        }

        let updates: Vec<(KaryakramItemId, u32)> = items
            .iter()
            .filter_map(|item| item.id.durable().map(|id| (id, item.sequence_ordinal)))
            .collect();

        let mut succeeded = 0;
        let mut failed = 0;
        let mut last_error = None;
        for (id, ordinal) in updates {
            let mut fields = Record::new();
            fields.insert("sequence_order".to_string(), Value::from(ordinal));
            match self
                .gateway
                .update(Table::KaryakramItems, &record_id(id), fields)
                .await
            {
                Ok(()) => succeeded += 1,
                Err(e) => {
                    log::warn!("Ordinal update for {} failed: {}", id, e);
                    failed += 1;
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            None => Ok(SwapOutcome::Moved),
            Some(e) => {
                self.setlist
                    .mark_stale(format!("{failed} of {} ordinal updates failed", succeeded + failed));
                if succeeded == 0 {
                    Err(SetlistError::mutation("reorder", e))
                } else {
                    Err(SetlistError::PartialFailure {
                        operation: "reorder",
                        succeeded,
                        failed,
                    })
                }
            }
        }
    }
}

fn record_id(id: KaryakramItemId) -> RecordId {
    RecordId::new(id.to_string())
}
