use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::identity::Address;
use crate::sealed::SealedScalar;
use crate::temporal::Timestamp;

/// Category tag for a resource site. Fixed small set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Crystal,
    Metal,
    Relic,
    Flora,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Category; 4] = [
        Category::Crystal,
        Category::Metal,
        Category::Relic,
        Category::Flora,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Crystal => "crystal",
            Self::Metal => "metal",
            Self::Relic => "relic",
            Self::Flora => "flora",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Category {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "crystal" => Ok(Self::Crystal),
            "metal" => Ok(Self::Metal),
            "relic" => Ok(Self::Relic),
            "flora" => Ok(Self::Flora),
            other => Err(TypeError::UnknownCategory(other.to_string())),
        }
    }
}

/// Lifecycle status of a resource site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteStatus {
    /// The site accepts prospecting.
    Active,
    /// The site has been exhausted.
    Depleted,
}

/// A resource site record, stored as an opaque JSON blob in the record
/// store.
///
/// Records are created by a submit action and never mutated or deleted
/// (a whole-blob overwrite under the same key is the only way to change
/// one). Visibility is global: any reader can list all records and see
/// their sealed fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRecord {
    /// Record key, unique within the store.
    pub id: String,
    /// First sealed scalar (placeholder encoding, not a ciphertext).
    pub grade: SealedScalar,
    /// Second sealed scalar.
    pub yield_estimate: SealedScalar,
    /// Creation time.
    pub created_at: Timestamp,
    /// The identity that created the record.
    pub owner: Address,
    /// Category tag.
    pub category: Category,
    /// Lifecycle status.
    pub status: SiteStatus,
}

impl SiteRecord {
    /// Build a new active record, sealing both scalar fields.
    pub fn new(
        id: impl Into<String>,
        owner: Address,
        category: Category,
        grade: u32,
        yield_estimate: u32,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: id.into(),
            grade: SealedScalar::seal(grade),
            yield_estimate: SealedScalar::seal(yield_estimate),
            created_at,
            owner,
            category,
            status: SiteStatus::Active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> SiteRecord {
        SiteRecord::new(
            "site-001",
            Address::ephemeral(),
            Category::Crystal,
            85,
            1200,
            Timestamp::from_millis(1_700_000_000_000),
        )
    }

    #[test]
    fn new_record_is_active_and_sealed() {
        let r = record();
        assert_eq!(r.status, SiteStatus::Active);
        assert!(r.grade.is_sealed());
        assert!(r.yield_estimate.is_sealed());
        assert_eq!(r.grade.unseal().unwrap(), 85);
        assert_eq!(r.yield_estimate.unseal().unwrap(), 1200);
    }

    #[test]
    fn category_roundtrip() {
        for cat in Category::ALL {
            let parsed: Category = cat.to_string().parse().unwrap();
            assert_eq!(parsed, cat);
        }
    }

    #[test]
    fn unknown_category_is_rejected() {
        let err = "plasma".parse::<Category>().unwrap_err();
        assert_eq!(err, TypeError::UnknownCategory("plasma".into()));
    }

    #[test]
    fn serde_roundtrip_preserves_fields() {
        let r = record();
        let json = serde_json::to_string(&r).unwrap();
        let parsed: SiteRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(r, parsed);
    }

    #[test]
    fn category_serializes_lowercase() {
        let json = serde_json::to_string(&Category::Relic).unwrap();
        assert_eq!(json, "\"relic\"");
    }
}
