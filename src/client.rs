//! HTTP access to the wiki's `api.php`: keyword search and single-page lookups.

use scraper::Html;
use serde_json::Value;

use crate::batch_fetcher::PageSource;
use crate::config::Config;
use crate::data_models::{ApiErrorSection, Identifier, PageDetail, ParseEnvelope, SearchResult};
use crate::error::{Result, WikiError};

pub fn page_by_title_url(base: &str, title: &str) -> String {
    format!(
        "{base}/api.php?action=parse&page={}&contentmodel=wikitext&format=json",
        urlencoding::encode(title)
    )
}

pub fn page_by_id_url(base: &str, page_id: u64) -> String {
    format!("{base}/api.php?action=parse&pageid={page_id}&contentmodel=wikitext&format=json")
}

/// Browser-facing page URL. Built locally, the API never returns it.
pub fn canonical_page_url(base: &str, title: &str) -> String {
    format!("{base}/index.php?title={}", urlencoding::encode(title))
}

pub fn opensearch_url(base: &str, query: &str, limit: usize) -> String {
    format!(
        "{base}/api.php?action=opensearch&search={}&limit={limit}&namespace=0&format=json",
        urlencoding::encode(query)
    )
}

/// `displaytitle` is an HTML fragment (`<span class="mw-page-title-main">..</span>`).
pub fn strip_markup(fragment: &str) -> String {
    let document = Html::parse_fragment(fragment);
    let text = document.root_element().text().collect::<String>();
    text.trim().to_string()
}

pub struct WikiClient {
    http: reqwest::Client,
    base_url: String,
}

impl WikiClient {
    pub fn new(config: &Config) -> Result<WikiClient> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| WikiError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(WikiClient {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn canonical_url(&self, title: &str) -> String {
        canonical_page_url(&self.base_url, title)
    }

    /// Runs an `opensearch` query for the space-joined keywords and returns
    /// at most `max_results` titles in relevance order.
    pub async fn search(
        &self,
        keywords: &[String],
        max_results: usize,
    ) -> Result<Vec<SearchResult>> {
        if max_results == 0 {
            return Err(WikiError::InvalidArgument(
                "max_results must be > 0".to_string(),
            ));
        }

        let query = keywords.join(" ");
        if query.trim().is_empty() {
            tracing::debug!("empty search query, skipping request");
            return Ok(Vec::new());
        }

        let url = opensearch_url(&self.base_url, &query, max_results);
        tracing::debug!(%url, "searching");
        let body = self.get_body(&url).await?;

        let mut titles = parse_opensearch(&body)?;
        titles.truncate(max_results);
        tracing::info!(query = %query, count = titles.len(), "search finished");

        Ok(titles
            .into_iter()
            .map(|title| SearchResult { title })
            .collect())
    }

    /// Single attempt lookup of one page via `action=parse`.
    pub async fn fetch_one(&self, identifier: &Identifier) -> Result<PageDetail> {
        identifier.validate()?;

        let url = match identifier {
            Identifier::PageId(id) => page_by_id_url(&self.base_url, *id),
            Identifier::Title(title) => page_by_title_url(&self.base_url, title),
        };
        tracing::debug!(%identifier, %url, "fetching page detail");

        let body = self.get_body(&url).await?;
        self.parse_page_detail(&body)
    }

    async fn get_body(&self, url: &str) -> Result<String> {
        let res = self.http.get(url).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(WikiError::Transport(format!("HTTP {status} from {url}")));
        }
        Ok(res.text().await?)
    }

    fn parse_page_detail(&self, body: &str) -> Result<PageDetail> {
        let envelope: ParseEnvelope = serde_json::from_str(body)
            .map_err(|e| WikiError::MalformedResponse(format!("invalid JSON body: {e}")))?;

        let Some(parse) = envelope.parse else {
            return Err(match envelope.error {
                Some(err) => api_error(&err),
                None => WikiError::MalformedResponse("response has no parse section".to_string()),
            });
        };

        let mut plain_title = strip_markup(&parse.displaytitle);
        if plain_title.is_empty() {
            plain_title = parse.title.clone();
        }

        Ok(PageDetail {
            page_id: parse.pageid,
            canonical_url: self.canonical_url(&parse.title),
            title: parse.title,
            display_title: parse.displaytitle,
            plain_title,
        })
    }
}

impl PageSource for WikiClient {
    async fn fetch_page(&self, identifier: &Identifier) -> Result<PageDetail> {
        self.fetch_one(identifier).await
    }
}

fn api_error(err: &ApiErrorSection) -> WikiError {
    WikiError::MalformedResponse(format!("wiki returned error {}: {}", err.code, err.info))
}

/// Body shape: `[query, [titles..], [snippets..], [urls..]]`, or `{"error": {..}}`.
fn parse_opensearch(body: &str) -> Result<Vec<String>> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| WikiError::MalformedResponse(format!("invalid JSON body: {e}")))?;

    if let Some(section) = value.get("error") {
        let err = serde_json::from_value::<ApiErrorSection>(section.clone())
            .map_err(|e| WikiError::MalformedResponse(format!("unreadable API error: {e}")))?;
        return Err(api_error(&err));
    }

    let titles = value
        .as_array()
        .and_then(|parts| parts.get(1))
        .cloned()
        .ok_or_else(|| {
            WikiError::MalformedResponse("opensearch response has no title list".to_string())
        })?;

    serde_json::from_value::<Vec<String>>(titles)
        .map_err(|e| WikiError::MalformedResponse(format!("opensearch titles: {e}")))
}
