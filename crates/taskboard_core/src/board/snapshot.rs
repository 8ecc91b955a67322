//! Full board state as persisted in the file store.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::column::ColumnSet;
use super::version::Version;
use crate::error::{BoardError, Result};

/// Opaque token identifying one stored content version (the file's content hash).
pub type Revision = String;

/// A board at one point in time.
///
/// Serialized as the pretty-printed JSON document stored per customer. Fields
/// this type does not know about are carried in `extra` and written back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uat_end_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_site_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uat_folder_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_emails: Option<String>,

    /// Hex SHA-256 of the board password. Hashing happens outside this crate.
    #[serde(default)]
    pub password_hash: String,

    #[serde(default, deserialize_with = "version_or_initial")]
    pub version: Version,

    pub columns: ColumnSet,

    #[serde(default)]
    pub disable_add_task: bool,

    /// Unrecognized top-level fields, preserved round-trip.
    #[serde(flatten)]
    pub extra: Map<String, Value>,

    /// Revision this snapshot was read from or written as, if it came from a store.
    #[serde(skip)]
    pub revision: Option<Revision>,
}

impl BoardSnapshot {
    /// An empty board that has never been written.
    pub fn new(password_hash: impl Into<String>) -> Self {
        Self {
            display_name: None,
            uat_end_date: None,
            dev_site_url: None,
            uat_folder_url: None,
            contact_emails: None,
            password_hash: password_hash.into(),
            version: Version::INITIAL,
            columns: ColumnSet::empty(),
            disable_add_task: false,
            extra: Map::new(),
            revision: None,
        }
    }

    /// Parse a stored snapshot, normalizing its columns.
    ///
    /// A document without a `columns` array is rejected as malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        match value.get("columns") {
            Some(Value::Array(_)) => {}
            Some(_) => {
                return Err(BoardError::MalformedData(
                    "`columns` is not an array".to_string(),
                ));
            }
            None => {
                return Err(BoardError::MalformedData(
                    "missing `columns` field".to_string(),
                ));
            }
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Serialize as pretty-printed JSON, the format written to the store.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Name to show for this board, falling back to the customer id.
    pub fn title<'a>(&'a self, customer_id: &'a str) -> &'a str {
        self.display_name.as_deref().unwrap_or(customer_id)
    }
}

/// A missing or null stored version reads as the initial version.
fn version_or_initial<'de, D>(deserializer: D) -> std::result::Result<Version, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Version>::deserialize(deserializer)?.unwrap_or(Version::INITIAL))
}
