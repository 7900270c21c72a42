// tasks/mod.rs — Task domain types and error taxonomy.

pub mod query;

use serde::{Deserialize, Serialize};

/// A persisted task row.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub priority: String,
    pub completed: bool,
}

/// Creation payload. Every field is optional at the API boundary —
/// NOT NULL columns are enforced by the schema, so a missing title or
/// priority surfaces as a store failure, not a deserialization error.
#[derive(Debug, Default, Deserialize)]
pub struct NewTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
}

/// Partial-update payload for PUT /tasks/update/{id}.
///
/// A field counts as supplied only when it is present AND non-empty;
/// an empty string is treated the same as an absent field, so clearing
/// a field to "" through this endpoint is not possible.
#[derive(Debug, Default, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
}

impl TaskPatch {
    /// Candidate fields in their fixed update order, paired with their
    /// column names. Empty values are filtered out here so callers see
    /// only the fields that will actually be written.
    pub fn supplied_fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("title", self.title.as_deref()),
            ("description", self.description.as_deref()),
            ("priority", self.priority.as_deref()),
        ]
        .into_iter()
        .filter_map(|(col, val)| match val {
            Some(v) if !v.is_empty() => Some((col, v)),
            _ => None,
        })
        .collect()
    }
}

/// Failures a task operation can produce. REST handlers map these onto
/// status codes; everything inside `Store` stays out of response bodies.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// The update payload contained no usable fields.
    #[error("no data provided to update")]
    NoFieldsProvided,

    /// The target id matched no row.
    #[error("task not found")]
    NotFound,

    /// Any underlying store error (connectivity, constraint violation).
    #[error("store failure: {0}")]
    Store(#[from] sqlx::Error),
}
