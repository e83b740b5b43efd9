//! Request and response bodies exchanged with the HTTP service

use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

pub mod settings;

/// `POST /users`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitGrid {
    /// Rows separated by `-`, with `o` for open cells, `x` for walls, one `m` and one `p`
    pub data: String,
    /// Width and height of the grid
    pub size: usize,
}

/// `GET /users?id=...`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupQuery {
    pub id: String,
}

/// The answer to a submission or a lookup
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub id: String,
    /// Moves from start to goal, like `[Left, Up, Up, Left]`
    pub result: String,
}

/// One stored submission
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    /// Normalized rows joined with `,`
    pub grid: String,
    /// Local time the submission was received, `%Y-%m-%d %H:%M:%S`
    pub time: String,
    pub result: String,
}

impl From<Record> for SubmissionResult {
    fn from(record: Record) -> Self {
        Self {
            id: record.id,
            result: record.result,
        }
    }
}

/// `GET /admin`
///
/// Serialized as an object keyed by 1-based position, in insertion order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordListing(pub Vec<Record>);

impl Serialize for RecordListing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.0
                .iter()
                .enumerate()
                .map(|(i, record)| ((i + 1).to_string(), record)),
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub error: String,
}
