use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::draft::{BatchMember, FileKind};

/// A stored file as the backend reports it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRef {
    pub filename: String,
    pub path: String,
}

/// A completed submission, as returned by `GET /api/submissions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub course: String,
    #[serde(default)]
    pub roll_number: String,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub batch_info: String,
    #[serde(default)]
    pub ppt_file: FileRef,
    #[serde(default)]
    pub ieee_file: FileRef,
    #[serde(default)]
    pub batch_members: Vec<BatchMember>,
    #[serde(default)]
    pub remarks: String,
    pub created_at: DateTime<Utc>,
}

impl SubmissionRecord {
    pub fn file(&self, kind: FileKind) -> &FileRef {
        match kind {
            FileKind::Ppt => &self.ppt_file,
            FileKind::Ieee => &self.ieee_file,
        }
    }
}
