use futures::future::join_all;
use std::future::Future;

use crate::data_models::{FetchResult, Identifier, PageDetail};
use crate::error::{Result, WikiError};

/// Splits `items` into consecutive groups of `size`; the last group holds the remainder.
pub fn chunk<T>(items: &[T], size: usize) -> Result<std::slice::Chunks<'_, T>> {
    if size == 0 {
        return Err(WikiError::InvalidArgument(
            "chunk size must be > 0".to_string(),
        ));
    }
    Ok(items.chunks(size))
}

#[test]
fn test_chunk() {
    {
        let items = vec![1, 2, 3, 4, 5];
        let got: Vec<&[i32]> = chunk(&items, 2).unwrap().collect();
        let expected: Vec<&[i32]> = vec![&[1, 2][..], &[3, 4][..], &[5][..]];
        assert_eq!(got, expected);
    }

    // Evenly divisible: every chunk is full.
    {
        let items = vec![1, 2, 3, 4, 5, 6];
        let got: Vec<&[i32]> = chunk(&items, 3).unwrap().collect();
        assert_eq!(got.len(), 2);
        assert!(got.iter().all(|c| c.len() == 3));
    }

    // Size larger than input yields a single chunk.
    {
        let items = vec!["a", "b"];
        let got: Vec<&[&str]> = chunk(&items, 10).unwrap().collect();
        assert_eq!(got, vec![&["a", "b"][..]]);
    }

    {
        let items: Vec<u8> = vec![];
        assert_eq!(chunk(&items, 4).unwrap().count(), 0);
    }

    {
        let items = vec![1, 2, 3];
        assert!(matches!(chunk(&items, 0), Err(WikiError::InvalidArgument(_))));
    }
}

#[test]
fn test_chunk_concatenation_reproduces_input() {
    let items: Vec<u32> = (0..97).collect();
    for size in 1..=20 {
        let chunks: Vec<&[u32]> = chunk(&items, size).unwrap().collect();
        let flat: Vec<u32> = chunks.iter().flat_map(|c| c.iter().copied()).collect();
        assert_eq!(flat, items);

        let remainder = items.len() % size;
        let last = chunks.last().unwrap().len();
        if remainder == 0 {
            assert_eq!(last, size);
        } else {
            assert_eq!(last, remainder);
        }
        assert!(chunks[..chunks.len() - 1].iter().all(|c| c.len() == size));
    }
}

/// Anything that can resolve a single identifier into a page detail.
pub trait PageSource {
    fn fetch_page(
        &self,
        identifier: &Identifier,
    ) -> impl Future<Output = Result<PageDetail>> + Send;
}

impl<T: PageSource> PageSource for &T {
    fn fetch_page(
        &self,
        identifier: &Identifier,
    ) -> impl Future<Output = Result<PageDetail>> + Send {
        (**self).fetch_page(identifier)
    }
}

/// Fetches many pages with at most `max_concurrency` lookups in flight.
///
/// Identifiers are processed in chunks of `max_concurrency`. Every lookup of a
/// chunk is started together and the next chunk only starts once all of them
/// have resolved. Slot `i` of the result always belongs to identifier `i`.
pub struct BatchFetcher<S> {
    source: S,
    max_concurrency: usize,
}

impl<S: PageSource> BatchFetcher<S> {
    pub fn new(source: S, max_concurrency: usize) -> Self {
        Self {
            source,
            max_concurrency,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Per-item failures land in their slot as `Err`; only a zero
    /// concurrency limit fails the whole call.
    pub async fn fetch_many(&self, identifiers: &[Identifier]) -> Result<FetchResult> {
        let chunks = chunk(identifiers, self.max_concurrency)?;

        let mut results: FetchResult = Vec::with_capacity(identifiers.len());
        if identifiers.is_empty() {
            return Ok(results);
        }

        for (chunk_no, group) in chunks.enumerate() {
            tracing::debug!(chunk = chunk_no, size = group.len(), "fetching chunk");

            let lookups = group.iter().map(|id| self.source.fetch_page(id));
            let outcomes = join_all(lookups).await;

            for (id, outcome) in group.iter().zip(outcomes) {
                if let Err(e) = &outcome {
                    tracing::warn!(identifier = %id, error = %e, "page lookup failed");
                }
                results.push(outcome);
            }
        }

        let failed = results.iter().filter(|r| r.is_err()).count();
        tracing::info!(
            total = results.len(),
            failed,
            max_concurrency = self.max_concurrency,
            "batch fetch finished"
        );

        Ok(results)
    }
}
