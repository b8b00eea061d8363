// ==========================================
// Depot Management - Depot entity
// ==========================================
// Table: Depots
// Soft delete: IsDeleted = 1 rows are logically absent from every read
// ==========================================

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Table name shared by the drivers and the schema builder
pub const DEPOTS_TABLE: &str = "Depots";

// ==========================================
// Depot - warehouse record
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Depot {
    pub id: i64,                           // store-assigned, 0 before insert
    pub active: Option<bool>,              // None reads as active
    pub is_deleted: bool,                  // soft delete flag
    pub created_at: DateTime<FixedOffset>, // write-once
    pub created_by: Option<String>,        // attribution
    pub name: Option<String>,              // depot name
}

impl Depot {
    /// Create an unsaved depot with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Builder-style attribution
    pub fn with_created_by(mut self, created_by: impl Into<String>) -> Self {
        self.created_by = Some(created_by.into());
        self
    }

    /// Builder-style active flag
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    /// Whether the depot is active (absent flag counts as active)
    pub fn is_active(&self) -> bool {
        self.active.unwrap_or(true)
    }

    /// Whether the value has been persisted
    pub fn is_persisted(&self) -> bool {
        self.id > 0
    }

    /// Prepare a value for insertion: stamp creation time, clear the
    /// delete flag and default the active flag.
    pub fn prepare_for_insert(mut self) -> Self {
        self.created_at = now_utc();
        self.is_deleted = false;
        self.active = Some(self.is_active());
        self
    }
}

impl Default for Depot {
    fn default() -> Self {
        Self {
            id: 0,
            active: Some(true),
            is_deleted: false,
            created_at: now_utc(),
            created_by: None,
            name: None,
        }
    }
}

/// Current time in UTC with an explicit +00:00 offset
pub fn now_utc() -> DateTime<FixedOffset> {
    Utc::now().fixed_offset()
}

/// Storage form of CreatedAt (RFC 3339)
pub fn format_created_at(value: &DateTime<FixedOffset>) -> String {
    value.to_rfc3339()
}

/// Parse a stored CreatedAt value
///
/// Values are written as RFC 3339; the `%F %T%.f%:z` form is what rusqlite's
/// own chrono binding produces and is accepted as well.
pub fn parse_created_at(raw: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).or_else(|_| DateTime::parse_from_str(raw, "%F %T%.f%:z"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_active_reads_as_active() {
        let mut depot = Depot::new("North");
        depot.active = None;
        assert!(depot.is_active());

        depot.active = Some(false);
        assert!(!depot.is_active());
    }

    #[test]
    fn test_prepare_for_insert_resets_flags() {
        let mut depot = Depot::new("North");
        depot.is_deleted = true;
        depot.active = None;

        let prepared = depot.prepare_for_insert();
        assert!(!prepared.is_deleted);
        assert_eq!(prepared.active, Some(true));
        assert_eq!(prepared.created_at.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_parse_created_at_accepts_both_forms() {
        let rfc = parse_created_at("2024-05-01T08:30:00+09:00").unwrap();
        let spaced = parse_created_at("2024-05-01 08:30:00+09:00").unwrap();
        assert_eq!(rfc, spaced);
        assert!(parse_created_at("yesterday").is_err());
        assert_eq!(parse_created_at(&format_created_at(&rfc)).unwrap(), rfc);
    }
}
