//! OpenAlex API client.
//!
//! Issues the catalog's boolean queries against the OpenAlex `/works` search
//! endpoint, one term at a time, one page at a time. Cursor pagination with a
//! fixed politeness delay between page requests.
//!
//! API notes (per OpenAlex docs):
//! - Attach `mailto=email` for polite-pool access; absence is tolerated.
//! - Abstracts arrive as an inverted index and must be reconstructed.

use crate::catalog::QueryTerm;
use crate::error::{Result, SearchError};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// OpenAlex API base URL
const OPENALEX_API_BASE: &str = "https://api.openalex.org";

/// Results per page
const PAGE_SIZE: usize = 25;

/// Pause between successive page requests for the same term
const PAGE_DELAY: Duration = Duration::from_millis(100);

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Bounded retries on HTTP 429 before giving up on the page
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Publication-year window and page cap applied to every term.
#[derive(Debug, Clone, Copy)]
pub struct SearchWindow {
    /// First publication year, inclusive
    pub start_year: i32,
    /// Last publication year, inclusive
    pub end_year: i32,
    /// Maximum pages consumed per term
    pub max_pages: usize,
}

impl Default for SearchWindow {
    fn default() -> Self {
        Self {
            start_year: 2014,
            end_year: 2024,
            max_pages: 3,
        }
    }
}

/// One matched document, normalized from the OpenAlex work envelope on
/// receipt so the rest of the pipeline never sees upstream schema drift.
#[derive(Debug, Clone, Default)]
pub struct RawRecord {
    pub title: String,
    pub authors: Vec<String>,
    pub year: Option<i32>,
    pub doi: Option<String>,
    pub venue: String,
    pub abstract_text: Option<String>,
    /// Keyword and topic labels supplied by the API
    pub concepts: Vec<String>,
    pub cited_by: i64,
    pub open_access: bool,
    pub url: String,
    pub openalex_id: String,
}

/// OpenAlex search client.
pub struct Client {
    http: reqwest::Client,
    mailto: Option<String>,
}

impl Client {
    /// Build the HTTP client. The contact email, when given, is sent both in
    /// the user-agent and as the `mailto` query parameter.
    pub fn new(mailto: Option<String>) -> Result<Self> {
        let user_agent = match &mailto {
            Some(email) => format!("ndtsearch/0.1 (mailto:{email})"),
            None => "ndtsearch/0.1".to_string(),
        };
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(user_agent)
            .build()
            .map_err(|e| SearchError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { http, mailto })
    }

    /// Start a fresh paginated sequence for one term. Each term gets its own
    /// cursor; no state leaks across terms.
    pub fn paginate<'a>(&'a self, term: &'a QueryTerm, window: &SearchWindow) -> Paginator<'a> {
        Paginator {
            client: self,
            term,
            window: *window,
            cursor: Some("*".to_string()),
            pages_fetched: 0,
        }
    }

    /// Fetch one page body, retrying a bounded number of times on HTTP 429.
    async fn fetch_page(&self, url: &str) -> Result<String> {
        let mut retries = 0;

        loop {
            let response = self.http.get(url).send().await?;
            let status = response.status();

            if status.is_success() {
                return Ok(response.text().await?);
            }

            if status == StatusCode::TOO_MANY_REQUESTS && retries < MAX_RATE_LIMIT_RETRIES {
                let backoff = Duration::from_secs(2u64.pow(retries));
                warn!(
                    retries = retries,
                    backoff_secs = backoff.as_secs(),
                    "Rate limited, backing off"
                );
                tokio::time::sleep(backoff).await;
                retries += 1;
                continue;
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(SearchError::RateLimited(60));
            }

            return Err(SearchError::Api {
                code: status.as_u16(),
                message: format!("OpenAlex API error: {status}"),
            });
        }
    }
}

/// Lazy, finite, non-restartable page sequence for a single term.
pub struct Paginator<'a> {
    client: &'a Client,
    term: &'a QueryTerm,
    window: SearchWindow,
    cursor: Option<String>,
    pages_fetched: usize,
}

impl Paginator<'_> {
    /// Fetch the next page of records.
    ///
    /// Returns `Ok(None)` once the page cap is reached, the API reports no
    /// further pages, or a page comes back empty. A transient failure or an
    /// unparseable body surfaces as an error; the caller abandons the term's
    /// remaining pages and moves on.
    pub async fn next_page(&mut self) -> Result<Option<Vec<RawRecord>>> {
        let cursor = match &self.cursor {
            Some(c) if self.pages_fetched < self.window.max_pages => c.clone(),
            _ => return Ok(None),
        };

        if self.pages_fetched > 0 {
            tokio::time::sleep(PAGE_DELAY).await;
        }

        let url = build_search_url(
            self.term.expression,
            &cursor,
            &self.window,
            self.client.mailto.as_deref(),
        );
        debug!(url = %url, page = self.pages_fetched + 1, "Fetching OpenAlex page");

        let body = self.client.fetch_page(&url).await?;
        let page = parse_response(&body)?;

        self.pages_fetched += 1;
        self.cursor = page.next_cursor;

        if page.records.is_empty() {
            self.cursor = None;
            return Ok(None);
        }

        Ok(Some(page.records))
    }
}

/// Build the `/works` search URL for one page.
fn build_search_url(
    expression: &str,
    cursor: &str,
    window: &SearchWindow,
    mailto: Option<&str>,
) -> String {
    let mut url = format!(
        "{}/works?search={}&per-page={}&cursor={}&filter=publication_year:{}-{},type:article",
        OPENALEX_API_BASE,
        urlencoding::encode(expression),
        PAGE_SIZE,
        urlencoding::encode(cursor),
        window.start_year,
        window.end_year,
    );
    if let Some(email) = mailto {
        url.push_str(&format!("&mailto={}", urlencoding::encode(email)));
    }
    url.push_str(
        "&select=id,title,display_name,publication_year,doi,cited_by_count,\
         abstract_inverted_index,authorships,primary_location,open_access,\
         keywords,primary_topic",
    );
    url
}

// === OpenAlex API response types ===

#[derive(Debug, Deserialize)]
struct OpenAlexResponse {
    #[serde(default)]
    meta: OpenAlexMeta,
    #[serde(default)]
    results: Vec<OpenAlexWork>,
}

#[derive(Debug, Default, Deserialize)]
struct OpenAlexMeta {
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAlexWork {
    id: Option<String>,
    title: Option<String>,
    display_name: Option<String>,
    publication_year: Option<i32>,
    doi: Option<String>,
    cited_by_count: Option<i64>,
    #[serde(rename = "abstract_inverted_index")]
    abstract_index: Option<serde_json::Value>,
    authorships: Option<Vec<OpenAlexAuthorship>>,
    primary_location: Option<OpenAlexLocation>,
    open_access: Option<OpenAlexOpenAccess>,
    keywords: Option<Vec<OpenAlexKeyword>>,
    primary_topic: Option<OpenAlexTopic>,
}

#[derive(Debug, Deserialize)]
struct OpenAlexAuthorship {
    author: Option<OpenAlexAuthor>,
}

#[derive(Debug, Deserialize)]
struct OpenAlexAuthor {
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAlexLocation {
    source: Option<OpenAlexSource>,
    landing_page_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAlexSource {
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAlexOpenAccess {
    is_oa: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct OpenAlexKeyword {
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAlexTopic {
    display_name: Option<String>,
}

#[derive(Debug)]
struct ParsedPage {
    records: Vec<RawRecord>,
    next_cursor: Option<String>,
}

/// Parse one response body into normalized records plus the next-page cursor.
fn parse_response(json_str: &str) -> Result<ParsedPage> {
    let response: OpenAlexResponse = serde_json::from_str(json_str)
        .map_err(|e| SearchError::Parse(format!("Failed to parse OpenAlex response: {e}")))?;

    let records = response
        .results
        .into_iter()
        .filter_map(parse_work)
        .collect();

    Ok(ParsedPage {
        records,
        next_cursor: response.meta.next_cursor,
    })
}

/// Normalize one work envelope. Untitled works are dropped.
fn parse_work(work: OpenAlexWork) -> Option<RawRecord> {
    let title = work.display_name.or(work.title).unwrap_or_default();
    if title.is_empty() {
        return None;
    }

    let authors: Vec<String> = work
        .authorships
        .unwrap_or_default()
        .into_iter()
        .filter_map(|a| a.author)
        .filter_map(|a| a.display_name)
        .collect();

    let doi = work
        .doi
        .as_deref()
        .map(normalize_doi)
        .filter(|d| !d.is_empty());

    let venue = work
        .primary_location
        .as_ref()
        .and_then(|l| l.source.as_ref())
        .and_then(|s| s.display_name.clone())
        .unwrap_or_default();

    let url = work
        .primary_location
        .as_ref()
        .and_then(|l| l.landing_page_url.clone())
        .or_else(|| work.doi.clone())
        .unwrap_or_default();

    let abstract_text = work
        .abstract_index
        .as_ref()
        .map(reconstruct_abstract)
        .filter(|a| !a.is_empty());

    let mut concepts: Vec<String> = work
        .keywords
        .unwrap_or_default()
        .into_iter()
        .filter_map(|k| k.display_name)
        .collect();
    if let Some(topic) = work.primary_topic.and_then(|t| t.display_name) {
        concepts.push(topic);
    }

    Some(RawRecord {
        title,
        authors,
        year: work.publication_year,
        doi,
        venue,
        abstract_text,
        concepts,
        cited_by: work.cited_by_count.unwrap_or(0),
        open_access: work
            .open_access
            .and_then(|oa| oa.is_oa)
            .unwrap_or(false),
        url,
        openalex_id: work.id.unwrap_or_default(),
    })
}

/// Strip the resolver prefix from a DOI.
fn normalize_doi(doi: &str) -> String {
    doi.trim()
        .trim_start_matches("https://doi.org/")
        .to_string()
}

/// Reconstruct abstract text from the inverted index.
/// OpenAlex provides abstracts as an inverted index for legal reasons.
fn reconstruct_abstract(inverted_index: &serde_json::Value) -> String {
    let Some(obj) = inverted_index.as_object() else {
        return String::new();
    };

    let mut words: Vec<(i64, &str)> = Vec::new();
    for (word, positions) in obj {
        if let Some(pos_array) = positions.as_array() {
            for pos in pos_array {
                if let Some(p) = pos.as_i64() {
                    words.push((p, word.as_str()));
                }
            }
        }
    }

    words.sort_by_key(|(pos, _)| *pos);
    words
        .iter()
        .map(|(_, w)| *w)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn test_build_search_url() {
        let window = SearchWindow {
            start_year: 2014,
            end_year: 2024,
            max_pages: 3,
        };
        let url = build_search_url(
            r#""impact echo" concrete"#,
            "*",
            &window,
            Some("review@example.org"),
        );
        assert!(url.contains("search=%22impact%20echo%22%20concrete"));
        assert!(url.contains("per-page=25"));
        assert!(url.contains("cursor=%2A"));
        assert!(url.contains("filter=publication_year:2014-2024,type:article"));
        assert!(url.contains("mailto=review%40example.org"));
    }

    #[test]
    fn test_build_search_url_without_mailto() {
        let url = build_search_url("concrete", "*", &SearchWindow::default(), None);
        assert!(!url.contains("mailto="));
    }

    #[test]
    fn test_reconstruct_abstract() {
        let idx = serde_json::json!({
            "velocity": [2],
            "Ultrasonic": [0],
            "pulse": [1],
        });
        assert_eq!(reconstruct_abstract(&idx), "Ultrasonic pulse velocity");
    }

    #[test]
    fn test_reconstruct_abstract_non_object() {
        assert_eq!(reconstruct_abstract(&serde_json::json!(null)), "");
    }

    #[test]
    fn test_normalize_doi() {
        assert_eq!(normalize_doi("https://doi.org/10.1/x"), "10.1/x");
        assert_eq!(normalize_doi("10.1/x"), "10.1/x");
    }

    #[test]
    fn test_parse_response() {
        let body = r#"{
            "meta": {"count": 1, "next_cursor": "IjEi"},
            "results": [{
                "id": "https://openalex.org/W1",
                "display_name": "Rebound hammer strength estimation of concrete",
                "publication_year": 2021,
                "doi": "https://doi.org/10.1000/abc",
                "cited_by_count": 12,
                "abstract_inverted_index": {"Concrete": [0], "strength": [1]},
                "authorships": [
                    {"author": {"display_name": "Ada Example"}},
                    {"author": {"display_name": "Bo Sample"}}
                ],
                "primary_location": {
                    "source": {"display_name": "Construction and Building Materials"},
                    "landing_page_url": "https://example.org/w1"
                },
                "open_access": {"is_oa": true},
                "keywords": [{"display_name": "Non-destructive testing"}],
                "primary_topic": {"display_name": "Concrete structures"}
            }]
        }"#;

        let page = parse_response(body).expect("parse");
        assert_eq!(page.next_cursor.as_deref(), Some("IjEi"));
        assert_eq!(page.records.len(), 1);

        let r = &page.records[0];
        assert_eq!(r.title, "Rebound hammer strength estimation of concrete");
        assert_eq!(r.authors, vec!["Ada Example", "Bo Sample"]);
        assert_eq!(r.year, Some(2021));
        assert_eq!(r.doi.as_deref(), Some("10.1000/abc"));
        assert_eq!(r.venue, "Construction and Building Materials");
        assert_eq!(r.abstract_text.as_deref(), Some("Concrete strength"));
        assert_eq!(
            r.concepts,
            vec!["Non-destructive testing", "Concrete structures"]
        );
        assert_eq!(r.cited_by, 12);
        assert!(r.open_access);
    }

    #[test]
    fn test_parse_response_malformed() {
        let err = parse_response("not json").expect_err("should fail");
        assert!(matches!(err, SearchError::Parse(_)));
    }

    #[test]
    fn test_parse_response_drops_untitled() {
        let body = r#"{"meta": {"next_cursor": null}, "results": [{"id": "https://openalex.org/W2"}]}"#;
        let page = parse_response(body).expect("parse");
        assert!(page.records.is_empty());
        assert!(page.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_paginator_respects_page_cap() {
        // A paginator whose cap is zero never issues a request.
        let client = Client::new(None).expect("client");
        let term = catalog::terms()[0];
        let window = SearchWindow {
            max_pages: 0,
            ..SearchWindow::default()
        };
        let mut pager = client.paginate(&term, &window);
        let page = pager.next_page().await.expect("no request made");
        assert!(page.is_none());
    }
}
