use std::fmt;

use serde::Deserialize;

use crate::error::{Result, WikiError};

/// A page reference, either by numeric page id or by title.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    PageId(u64),
    Title(String),
}

impl Identifier {
    /// Builds an identifier from the two optional fields a caller may supply.
    /// Exactly one of them must be present.
    pub fn from_parts(page_id: Option<u64>, title: Option<String>) -> Result<Identifier> {
        match (page_id, title) {
            (Some(id), None) => Ok(Identifier::PageId(id)),
            (None, Some(title)) => {
                let id = Identifier::Title(title);
                id.validate()?;
                Ok(id)
            }
            (Some(_), Some(_)) => Err(WikiError::InvalidArgument(
                "expected a page id or a title, got both".to_string(),
            )),
            (None, None) => Err(WikiError::InvalidArgument(
                "expected a page id or a title, got neither".to_string(),
            )),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Identifier::Title(title) if title.trim().is_empty() => Err(
                WikiError::InvalidArgument("page title must not be empty".to_string()),
            ),
            _ => Ok(()),
        }
    }
}

impl From<&str> for Identifier {
    fn from(title: &str) -> Self {
        Identifier::Title(title.to_string())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::PageId(id) => write!(f, "#{id}"),
            Identifier::Title(title) => f.write_str(title),
        }
    }
}

/// One hit of a keyword search, in relevance order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDetail {
    pub page_id: u64,
    pub title: String,
    /// HTML fragment as returned by the wiki.
    pub display_title: String,
    /// `display_title` with markup removed.
    pub plain_title: String,
    pub canonical_url: String,
}

/// Output of a batch fetch; slot `i` belongs to input identifier `i`.
pub type FetchResult = Vec<Result<PageDetail>>;

// Wire types for `action=parse`.

#[derive(Debug, Deserialize)]
pub struct ParseEnvelope {
    pub parse: Option<ParseSection>,
    pub error: Option<ApiErrorSection>,
}

#[derive(Debug, Deserialize)]
pub struct ParseSection {
    pub pageid: u64,
    pub title: String,
    pub displaytitle: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorSection {
    pub code: String,
    #[serde(default)]
    pub info: String,
}
