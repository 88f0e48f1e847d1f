//! Append-only activity log.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// What a logged operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Record created.
    Created,
    /// Record changed.
    Updated,
    /// Record archived (and its effect reversed).
    Archived,
    /// Archived record restored.
    Unarchived,
    /// Reviewed journal entry applied.
    Posted,
    /// Starting balances overwritten.
    OpeningBalances,
}

/// One line of the activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityEntry {
    /// Time-ordered identifier.
    pub id: Uuid,
    /// When the operation completed.
    pub at: DateTime<Utc>,
    /// Who performed it.
    pub actor: String,
    /// What happened.
    pub action: Action,
    /// Entity type.
    pub entity: &'static str,
    /// Display id of the affected record.
    pub entity_id: String,
    /// Short human-readable detail.
    pub detail: String,
}

/// Who did what, in order. Entries are never edited or removed.
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    entries: Vec<ActivityEntry>,
}

impl ActivityLog {
    /// Appends an entry stamped with the current time.
    pub fn record(
        &mut self,
        actor: &str,
        action: Action,
        entity: &'static str,
        entity_id: String,
        detail: String,
    ) -> &ActivityEntry {
        self.entries.push(ActivityEntry {
            id: Uuid::now_v7(),
            at: Utc::now(),
            actor: actor.to_string(),
            action,
            entity,
            entity_id,
            detail,
        });
        &self.entries[self.entries.len() - 1]
    }

    /// Entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.iter()
    }

    /// Most recent entry.
    #[must_use]
    pub fn last(&self) -> Option<&ActivityEntry> {
        self.entries.last()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was logged yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_keep_order() {
        let mut log = ActivityLog::default();
        log.record("amal", Action::Created, "Sale", "SAL-000001".into(), String::new());
        log.record("amal", Action::Archived, "Sale", "SAL-000001".into(), String::new());

        let ids: Vec<Uuid> = log.iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
        assert_eq!(ids[0].get_version_num(), 7);
        assert_eq!(log.last().unwrap().action, Action::Archived);
    }
}
