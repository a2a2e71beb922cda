//! The dashboard's search, filter and sort pipeline. Pure: it only reads the
//! fetched records and the current controls.

use std::{fmt, str::FromStr};

use crate::{error::PortalError, model::submission_record::SubmissionRecord};

/// An equality filter on one field, where `"all"` disables it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }
}

impl FromStr for Selection {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err(PortalError::InvalidInput("empty filter value".into())),
            "all" => Ok(Selection::All),
            other => Ok(Selection::Only(other.to_owned())),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str("all"),
            Selection::Only(value) => f.write_str(value),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

impl FromStr for SortOrder {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            other => Err(PortalError::InvalidInput(format!("unknown sort order '{other}'"))),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct Query {
    pub search: String,
    pub branch: Selection,
    pub course: Selection,
    pub sort: SortOrder,
}

impl Query {
    /// Case-insensitive match of the search text against the batch info and
    /// each member's name and registration number.
    fn matches_search(&self, record: &SubmissionRecord) -> bool {
        let needle = self.search.to_lowercase();
        if needle.is_empty() {
            return true;
        }

        record.batch_info.to_lowercase().contains(&needle)
            || record.batch_members.iter().any(|m| {
                m.name.to_lowercase().contains(&needle)
                    || m.registration_number.to_lowercase().contains(&needle)
            })
    }

    pub fn apply<'a>(&self, records: &'a [SubmissionRecord]) -> Vec<&'a SubmissionRecord> {
        let mut visible = records
            .iter()
            .filter(|r| self.matches_search(r))
            .filter(|r| self.branch.matches(&r.branch))
            .filter(|r| self.course.matches(&r.course))
            .collect::<Vec<_>>();

        match self.sort {
            SortOrder::Newest => visible.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortOrder::Oldest => visible.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        }

        visible
    }
}
