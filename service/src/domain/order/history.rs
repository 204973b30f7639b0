//! [`History`] of [`Order`] status changes.

use common::{unit, DateTimeOf};
use derive_more::{Display, Error};

#[cfg(doc)]
use crate::domain::Order;

use super::Status;

/// Append-only log of [`Order`] status changes, ordered by time.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct History(Vec<Entry>);

impl History {
    /// Creates a new [`History`] out of the provided [`Entry`]s.
    ///
    /// [`Entry`]s are stably sorted by their time, so equally timed ones keep
    /// the provided order.
    #[must_use]
    pub fn from_entries(mut entries: Vec<Entry>) -> Self {
        entries.sort_by_key(|e| e.at);
        Self(entries)
    }

    /// Appends the provided [`Entry`] to this [`History`].
    ///
    /// # Errors
    ///
    /// If the [`Entry`] is older than the last one in this [`History`].
    pub fn push(&mut self, entry: Entry) -> Result<(), OutOfOrderError> {
        if let Some(last) = self.last() {
            if entry.at < last.at {
                return Err(OutOfOrderError { entry });
            }
        }
        self.0.push(entry);
        Ok(())
    }

    /// Returns the most recent [`Entry`] of this [`History`], if any.
    #[must_use]
    pub fn last(&self) -> Option<&Entry> {
        self.0.last()
    }

    /// Returns the most recent [`Entry`] having the provided [`Status`].
    #[must_use]
    pub fn last_of(&self, status: Status) -> Option<&Entry> {
        self.0.iter().rev().find(|e| e.status == status)
    }

    /// Returns an iterator over the [`Entry`]s, oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Entry> {
        self.0.iter()
    }

    /// Returns the number of [`Entry`]s in this [`History`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Indicates whether this [`History`] has no [`Entry`]s.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Single [`History`] record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Entry {
    /// [`Status`] the [`Order`] got.
    pub status: Status,

    /// When the [`Status`] was set.
    pub at: ChangeDateTime,

    /// Optional comment left with the change.
    pub comment: Option<String>,
}

/// Error of appending an [`Entry`] older than the last one.
#[derive(Clone, Debug, Display, Error)]
#[display("`{}` entry at `{}` breaks the `History` order", entry.status, entry.at.to_rfc3339())]
pub struct OutOfOrderError {
    /// Rejected [`Entry`].
    #[error(not(source))]
    pub entry: Entry,
}

/// [`DateTimeOf`] a [`History`] change.
pub type ChangeDateTime = DateTimeOf<(History, unit::Change)>;
