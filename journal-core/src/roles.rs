//! The closed role enumeration and the masthead subset.

use crate::error::JournalError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "AU")]
    Author,
    #[serde(rename = "RE")]
    Referee,
    #[serde(rename = "ED")]
    Editor,
    #[serde(rename = "ME")]
    ManagingEditor,
    #[serde(rename = "CE")]
    CopyEditor,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Author,
        Role::Referee,
        Role::Editor,
        Role::ManagingEditor,
        Role::CopyEditor,
    ];

    /// The masthead subset: editorial staff published on the journal's about page.
    pub fn is_masthead(self) -> bool {
        matches!(self, Role::Editor | Role::ManagingEditor | Role::CopyEditor)
    }

    pub fn code(self) -> &'static str {
        match self {
            Role::Author => "AU",
            Role::Referee => "RE",
            Role::Editor => "ED",
            Role::ManagingEditor => "ME",
            Role::CopyEditor => "CE",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Role::Author => "Author",
            Role::Referee => "Referee",
            Role::Editor => "Editor",
            Role::ManagingEditor => "Managing Editor",
            Role::CopyEditor => "Consulting Editor",
        }
    }

    pub fn parse(code: &str) -> Result<Role, JournalError> {
        Role::ALL
            .into_iter()
            .find(|r| r.code() == code)
            .ok_or_else(|| JournalError::invalid(format!("unknown role code: {code}")))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masthead_subset_is_ed_me_ce() {
        assert!(Role::Editor.is_masthead());
        assert!(Role::ManagingEditor.is_masthead());
        assert!(Role::CopyEditor.is_masthead());
        assert!(!Role::Author.is_masthead());
        assert!(!Role::Referee.is_masthead());
    }

    #[test]
    fn parse_round_trips_every_code() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.code()).unwrap(), role);
        }
    }

    #[test]
    fn parse_rejects_unknown_code() {
        assert!(Role::parse("XX").is_err());
    }
}
