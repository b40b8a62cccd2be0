use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Top-level fields of a stored document, without its `_id`.
pub type Fields = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Clothes,
    Donations,
    Testimonials,
    Gallery,
    Comments,
    Volunteers,
}

impl Collection {
    /// Backing table. Interpolated into SQL, so it must stay a fixed literal.
    pub fn table(self) -> &'static str {
        match self {
            Collection::Clothes => "clothes",
            Collection::Donations => "donations",
            Collection::Testimonials => "testimonials",
            Collection::Gallery => "gallery",
            Collection::Comments => "comments",
            Collection::Volunteers => "volunteers",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// A stored record, serialized flat as `{"_id": ..., ...fields}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: Fields,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Modified,
    /// Record existed and already held the given values.
    Unchanged,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: Uuid,
}

impl InsertOneResult {
    pub fn new(inserted_id: Uuid) -> Self {
        Self {
            acknowledged: true,
            inserted_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<Uuid>,
    pub upserted_count: u64,
}

impl UpdateResult {
    pub fn from_outcome(id: Uuid, outcome: UpsertOutcome) -> Self {
        let (matched_count, modified_count, upserted_id) = match outcome {
            UpsertOutcome::Inserted => (0, 0, Some(id)),
            UpsertOutcome::Modified => (1, 1, None),
            UpsertOutcome::Unchanged => (1, 0, None),
        };
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
            upserted_count: upserted_id.is_some() as u64,
            upserted_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteResult {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}
