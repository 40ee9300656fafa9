use crate::data_models::{FetchResult, Identifier};

/// A row ready for display. Failed lookups keep their place as `Unavailable`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderableRow {
    Page {
        page_id: u64,
        title: String,
        url: String,
    },
    Unavailable {
        label: String,
        reason: String,
    },
}

impl RenderableRow {
    pub fn is_available(&self) -> bool {
        matches!(self, RenderableRow::Page { .. })
    }
}

/// Zips identifiers with their fetch outcomes. A missing slot is treated as a failure.
pub fn assemble(ids: &[Identifier], results: &FetchResult) -> Vec<RenderableRow> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| match results.get(i) {
            Some(Ok(detail)) => RenderableRow::Page {
                page_id: detail.page_id,
                title: detail.plain_title.clone(),
                url: detail.canonical_url.clone(),
            },
            Some(Err(e)) => RenderableRow::Unavailable {
                label: id.to_string(),
                reason: e.to_string(),
            },
            None => RenderableRow::Unavailable {
                label: id.to_string(),
                reason: "no result".to_string(),
            },
        })
        .collect()
}
