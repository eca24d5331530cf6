//! Performance mode: one setlist item at a time.

use std::fmt;

use musicvault_core::model::KaryakramId;

use crate::error::{Result, SetlistError};
use crate::model::{Setlist, SetlistItem};

/// What follows the current item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upcoming<'a> {
    Next(&'a SetlistItem),
    EndOfSet,
}

/// 1-based position and item count, shown as `3 / 8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub position: usize,
    pub count: usize,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.position, self.count)
    }
}

/// A clamped cursor over a frozen copy of a setlist.
///
/// The cursor is `None` exactly when the setlist is empty.
#[derive(Debug, Clone, Default)]
pub struct PerformanceNavigator {
    event_id: Option<KaryakramId>,
    items: Vec<SetlistItem>,
    cursor: Option<usize>,
}

impl PerformanceNavigator {
    #[must_use]
    pub fn new(setlist: &Setlist) -> Self {
        let mut navigator = Self::default();
        navigator.load(setlist);
        navigator
    }

    /// Take a new snapshot. A different event starts from the first item;
    /// the same event keeps the cursor, clamped to the new length.
    pub fn load(&mut self, setlist: &Setlist) {
        let same_event = self.event_id == Some(setlist.event_id());
        self.event_id = Some(setlist.event_id());
        self.items = setlist.items().to_vec();

        let last = self.items.len().checked_sub(1);
        self.cursor = match (last, self.cursor) {
            (None, _) => None,
            (Some(last), Some(cursor)) if same_event => Some(cursor.min(last)),
            (Some(_), _) => Some(0),
        };
    }

    /// Move to the next item. Returns whether the cursor moved.
    pub fn advance(&mut self) -> bool {
        match self.cursor {
            Some(c) if c + 1 < self.items.len() => {
                self.cursor = Some(c + 1);
                true
            }
            _ => false,
        }
    }

    /// Move to the previous item. Returns whether the cursor moved.
    pub fn retreat(&mut self) -> bool {
        match self.cursor {
            Some(c) if c > 0 => {
                self.cursor = Some(c - 1);
                true
            }
            _ => false,
        }
    }

    pub fn current(&self) -> Result<&SetlistItem> {
        self.cursor
            .and_then(|c| self.items.get(c))
            .ok_or(SetlistError::EmptySetlist)
    }

    #[must_use]
    pub fn upcoming(&self) -> Upcoming<'_> {
        self.cursor
            .and_then(|c| self.items.get(c + 1))
            .map_or(Upcoming::EndOfSet, Upcoming::Next)
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        Progress {
            position: self.cursor.map_or(0, |c| c + 1),
            count: self.items.len(),
        }
    }

    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
