//! Conversation view partitions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Conversation;

/// One of the three named subsets of the conversation collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Unread,
    Archived,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Unread, Filter::Archived];

    /// Whether a conversation belongs to this partition.
    ///
    /// Hidden conversations belong to none. An archived conversation is only
    /// ever in `Archived`, so that partition is disjoint from the other two.
    pub fn matches(self, conversation: &Conversation) -> bool {
        if conversation.is_hidden {
            return false;
        }
        match self {
            Filter::All => !conversation.is_archived,
            Filter::Unread => !conversation.is_archived && conversation.has_unread(),
            Filter::Archived => conversation.is_archived,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Unread => "unread",
            Filter::Archived => "archived",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown conversation filter: {0}")]
pub struct ParseFilterError(pub String);

impl FromStr for Filter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "a" => Ok(Filter::All),
            "unread" | "u" => Ok(Filter::Unread),
            "archived" | "archive" | "ar" => Ok(Filter::Archived),
            other => Err(ParseFilterError(other.to_string())),
        }
    }
}
