use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::error::PortalError;

pub const MAX_BATCH_MEMBERS: usize = 5;
pub const MIN_BATCH_MEMBERS: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchMember {
    pub name: String,
    pub registration_number: String,
}

impl BatchMember {
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.registration_number.trim().is_empty()
    }
}

/// A file chosen on the local disk. Only the location is held; the bytes are
/// read when the draft is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub path: PathBuf,
    pub filename: String,
}

impl FileHandle {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let filename = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Self { path, filename }
    }
}

/// The in-progress submission.
///
/// File handles are skipped when serialized, so a stored snapshot never
/// carries them and files must be chosen again after a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Draft {
    pub branch: String,
    pub course: String,
    pub roll_number: String,
    pub section: String,
    pub name: String,
    pub batch_info: String,
    #[serde(skip)]
    pub ppt_file: Option<FileHandle>,
    #[serde(skip)]
    pub ieee_file: Option<FileHandle>,
    pub batch_members: Vec<BatchMember>,
    pub remarks: String,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            branch: String::new(),
            course: String::new(),
            roll_number: String::new(),
            section: String::new(),
            name: String::new(),
            batch_info: String::new(),
            ppt_file: None,
            ieee_file: None,
            batch_members: vec![BatchMember::default()],
            remarks: String::new(),
        }
    }
}

impl Draft {
    /// Restores a draft from a stored snapshot. A snapshot with an empty member
    /// list is repaired so the list keeps at least one entry.
    pub fn from_snapshot(raw: &str) -> serde_json::Result<Self> {
        let mut draft = serde_json::from_str::<Draft>(raw)?;
        if draft.batch_members.is_empty() {
            draft.batch_members.push(BatchMember::default());
        }
        Ok(draft)
    }

    pub fn snapshot(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn text_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::RollNumber => &mut self.roll_number,
            TextField::Section => &mut self.section,
            TextField::Name => &mut self.name,
            TextField::BatchInfo => &mut self.batch_info,
            TextField::Remarks => &mut self.remarks,
        }
    }

    pub fn select_mut(&mut self, field: SelectField) -> &mut String {
        match field {
            SelectField::Branch => &mut self.branch,
            SelectField::Course => &mut self.course,
        }
    }

    pub fn file(&self, kind: FileKind) -> Option<&FileHandle> {
        match kind {
            FileKind::Ppt => self.ppt_file.as_ref(),
            FileKind::Ieee => self.ieee_file.as_ref(),
        }
    }

    pub fn file_mut(&mut self, kind: FileKind) -> &mut Option<FileHandle> {
        match kind {
            FileKind::Ppt => &mut self.ppt_file,
            FileKind::Ieee => &mut self.ieee_file,
        }
    }
}

/// Free-text fields of the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    RollNumber,
    Section,
    Name,
    BatchInfo,
    Remarks,
}

impl FromStr for TextField {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rollNumber" | "roll" => Ok(Self::RollNumber),
            "section" => Ok(Self::Section),
            "name" => Ok(Self::Name),
            "batchInfo" | "batch" => Ok(Self::BatchInfo),
            "remarks" => Ok(Self::Remarks),
            other => Err(PortalError::InvalidInput(format!("unknown field '{other}'"))),
        }
    }
}

/// Fields whose values come from a fixed catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectField {
    Branch,
    Course,
}

impl FromStr for SelectField {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "branch" => Ok(Self::Branch),
            "course" => Ok(Self::Course),
            other => Err(PortalError::InvalidInput(format!("unknown select '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Ppt,
    Ieee,
}

impl FileKind {
    /// Name of the multipart part carrying this file.
    pub fn form_name(self) -> &'static str {
        match self {
            FileKind::Ppt => "pptFile",
            FileKind::Ieee => "ieeeFile",
        }
    }

    pub fn accepted_extensions(self) -> &'static [&'static str] {
        match self {
            FileKind::Ppt => &["ppt", "pptx", "pdf"],
            FileKind::Ieee => &["pdf", "doc", "docx"],
        }
    }

    pub fn accepts(self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .is_some_and(|e| self.accepted_extensions().contains(&e.as_str()))
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Ppt => write!(f, "presentation"),
            FileKind::Ieee => write!(f, "IEEE document"),
        }
    }
}

impl FromStr for FileKind {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ppt" | "pptFile" => Ok(Self::Ppt),
            "ieee" | "ieeeFile" => Ok(Self::Ieee),
            other => Err(PortalError::InvalidInput(format!("unknown file kind '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberField {
    Name,
    RegistrationNumber,
}

impl FromStr for MemberField {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "reg" | "registrationNumber" => Ok(Self::RegistrationNumber),
            other => Err(PortalError::InvalidInput(format!("unknown member field '{other}'"))),
        }
    }
}
