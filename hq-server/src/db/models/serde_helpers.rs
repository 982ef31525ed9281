//! Common serde helpers for SurrealDB documents
//!
//! RecordId deserialization accepts both formats:
//! - string form "table:id" (from API JSON)
//! - SurrealDB native form (from the database)
//!
//! Also hosts the legacy dual-key adapter: older dashboard builds read
//! camelCase field names, so every mutation mirrors canonical snake_case
//! keys to their camelCase twins at the persistence boundary.

use serde::{Deserialize, Deserializer, Serializer};
use surrealdb::RecordId;

/// Deserialize bool that treats null as false
pub fn bool_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<bool>::deserialize(deserializer).map(|opt| opt.unwrap_or(false))
}

/// Internal helper accepting both string and native RecordId formats
#[derive(Debug, Clone)]
struct FlexibleRecordId(RecordId);

impl<'de> Deserialize<'de> for FlexibleRecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        use std::fmt;

        struct FlexibleVisitor;

        impl<'de> Visitor<'de> for FlexibleVisitor {
            type Value = FlexibleRecordId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string 'table:id' or RecordId")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                value
                    .parse::<RecordId>()
                    .map(FlexibleRecordId)
                    .map_err(|_| de::Error::custom(format!("invalid RecordId: {}", value)))
            }

            fn visit_map<M>(self, map: M) -> Result<Self::Value, M::Error>
            where
                M: de::MapAccess<'de>,
            {
                // Delegate to the native RecordId deserializer
                RecordId::deserialize(de::value::MapAccessDeserializer::new(map))
                    .map(FlexibleRecordId)
            }
        }

        deserializer.deserialize_any(FlexibleVisitor)
    }
}

/// RecordId serialization as "table:id" string
pub mod record_id {
    use super::*;

    pub fn serialize<S>(id: &RecordId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&id.to_string())
    }

    pub fn deserialize<'de, D>(d: D) -> Result<RecordId, D::Error>
    where
        D: Deserializer<'de>,
    {
        FlexibleRecordId::deserialize(d).map(|f| f.0)
    }
}

/// Option<RecordId> serialization
pub mod option_record_id {
    use super::*;

    pub fn serialize<S>(id: &Option<RecordId>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match id {
            Some(id) => s.serialize_some(&id.to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Option<RecordId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<FlexibleRecordId>::deserialize(d).map(|opt| opt.map(|f| f.0))
    }
}

/// Legacy dual-key support
///
/// Canonical documents use snake_case keys; every mutation also writes the
/// camelCase twin so readers of the previous dashboard generation keep
/// working. The canonical key always wins on read (reads never consult the
/// twins - the adapter guarantees they exist and agree after every write).
pub mod legacy {
    use serde_json::Value;

    /// Canonical key → legacy twin
    const TWINS: &[(&str, &str)] = &[
        ("franchise_id", "franchiseId"),
        ("is_locked", "isLocked"),
        ("created_at", "createdAt"),
        ("updated_at", "updatedAt"),
        ("submitted_at", "submittedAt"),
        ("approved_at", "approvedAt"),
        ("approved_by", "approvedBy"),
        ("rejection_reason", "rejectionReason"),
        ("unlock_reason", "unlockReason"),
        ("status_history", "statusHistory"),
        ("total_income", "totalIncome"),
        ("total_expenses", "totalExpenses"),
        ("gross_income", "grossIncome"),
        ("logistics_income", "logisticsIncome"),
        ("total_hours", "totalHours"),
        ("last_force_sync", "lastForceSync"),
    ];

    /// Legacy twin of a canonical key, if one exists
    pub fn twin_of(canonical: &str) -> Option<&'static str> {
        TWINS
            .iter()
            .find(|(snake, _)| *snake == canonical)
            .map(|(_, camel)| *camel)
    }

    /// Mirror every canonical key present in `doc` to its legacy twin.
    ///
    /// Non-object values pass through untouched.
    pub fn with_twins(mut doc: Value) -> Value {
        if let Some(map) = doc.as_object_mut() {
            let mirrored: Vec<(String, Value)> = map
                .iter()
                .filter_map(|(key, value)| {
                    twin_of(key).map(|camel| (camel.to_string(), value.clone()))
                })
                .collect();
            for (key, value) in mirrored {
                map.insert(key, value);
            }
        }
        doc
    }

}
