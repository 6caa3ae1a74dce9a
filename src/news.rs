//! # news — Article Source
//!
//! [`ArticleSource`] is the engine's only way to get articles.  The production
//! implementation is [`PolygonNews`] (`GET /v2/reference/news`).
//!
//! "No articles" is an empty `Vec`, never an error.  Items without a title or
//! a description are dropped: there is nothing for the classifier to read.
//! Repeated ids are dropped too (first one wins), so a batch handed to the
//! engine never carries the same id twice.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::SourceError;
use crate::models::{Article, ArticleId};

#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Most recent articles about `ticker`, newest first, at most `limit`.
    async fn fetch(
        &self,
        ticker: &str,
        limit: u32,
        lookback_days: u32,
    ) -> Result<Vec<Article>, SourceError>;
}

// ─── Polygon.io ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct PolygonNews {
    client:   reqwest::Client,
    base_url: String,
    api_key:  String,
}

/// Response format of Polygon `/v2/reference/news`
#[derive(Debug, Deserialize)]
struct PolygonNewsResponse {
    #[serde(default)]
    status:  Option<String>,
    #[serde(default)]
    results: Vec<PolygonNewsItem>,
}

#[derive(Debug, Deserialize)]
struct PolygonNewsItem {
    id:            Option<String>,
    #[serde(default)]
    title:         String,
    #[serde(default)]
    description:   Option<String>,
    published_utc: Option<String>,
    article_url:   Option<String>,
    publisher:     Option<PolygonPublisher>,
}

#[derive(Debug, Deserialize)]
struct PolygonPublisher {
    name: Option<String>,
}

impl PolygonNews {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key:  api_key.into(),
        }
    }
}

#[async_trait]
impl ArticleSource for PolygonNews {
    async fn fetch(
        &self,
        ticker: &str,
        limit: u32,
        lookback_days: u32,
    ) -> Result<Vec<Article>, SourceError> {
        let end = Utc::now();
        let start = end - chrono::Duration::days(i64::from(lookback_days));
        let url = format!("{}/v2/reference/news", self.base_url);

        debug!(ticker, limit, lookback_days, "Fetching news from Polygon...");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("ticker", ticker.to_string()),
                ("published_utc.gte", start.format("%Y-%m-%d").to_string()),
                ("published_utc.lte", end.format("%Y-%m-%d").to_string()),
                ("limit", limit.to_string()),
                ("sort", "published_utc".to_string()),
                ("order", "desc".to_string()),
                ("apiKey", self.api_key.clone()),
            ])
            .timeout(Duration::from_secs(30))
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.without_url().to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(SourceError::Api { status, body });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| SourceError::Transport(e.without_url().to_string()))?;

        let articles = parse_news_response(&body)?;
        info!(ticker, found = articles.len(), "News fetched");
        Ok(articles)
    }
}

/// Decode a Polygon news payload into articles, skipping unusable items.
pub fn parse_news_response(body: &str) -> Result<Vec<Article>, SourceError> {
    let data: PolygonNewsResponse =
        serde_json::from_str(body).map_err(|e| SourceError::Decode(e.to_string()))?;

    if let Some(status) = data.status.as_deref() {
        if status.eq_ignore_ascii_case("ERROR") && data.results.is_empty() {
            return Err(SourceError::Api { status: 200, body: body.to_string() });
        }
    }

    let mut seen = HashSet::new();
    let articles = data
        .results
        .into_iter()
        .filter_map(into_article)
        .filter(|article| {
            let fresh = seen.insert(article.id.clone());
            if !fresh {
                debug!(article_id = %article.id, "Dropping repeated news item");
            }
            fresh
        })
        .collect();

    Ok(articles)
}

fn into_article(item: PolygonNewsItem) -> Option<Article> {
    let title = item.title.trim().to_string();
    let description = item.description.map(|d| d.trim().to_string()).unwrap_or_default();
    if title.is_empty() || description.is_empty() {
        return None;
    }

    let id = item
        .id
        .filter(|id| !id.is_empty())
        .or_else(|| item.article_url.clone().filter(|u| !u.is_empty()))
        .unwrap_or_else(|| {
            content_key(&title, &description, item.published_utc.as_deref().unwrap_or(""))
        });

    Some(Article {
        id: ArticleId::new(id),
        title,
        description,
        source: item
            .publisher
            .and_then(|p| p.name)
            .unwrap_or_else(|| "Unknown".to_string()),
        url: item.article_url,
        published_at: item
            .published_utc
            .as_deref()
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
            .map(|t| t.with_timezone(&Utc)),
    })
}

/// Stable id for items Polygon sent without `id` or `article_url`.
fn content_key(title: &str, description: &str, published: &str) -> String {
    let mut hasher = Sha256::new();
    for part in [title, description, published] {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    let digest = format!("{:x}", hasher.finalize());
    format!("news-{}", &digest[..16])
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "status": "OK",
        "results": [
            {
                "id": "abc123",
                "title": "Apple Reports Record iPhone Sales in Q4",
                "description": "Apple beat analyst expectations by 15%.",
                "published_utc": "2026-02-05T10:00:00Z",
                "article_url": "https://example.com/apple-q4",
                "publisher": { "name": "Reuters" }
            },
            {
                "id": "no-desc",
                "title": "Headline only",
                "published_utc": "2026-02-05T09:00:00Z"
            },
            {
                "title": "Apple Faces Supply Chain Challenges in China",
                "description": "Production delays at major facilities.",
                "article_url": "https://example.com/apple-supply"
            }
        ]
    }"#;

    #[test]
    fn test_items_without_description_are_skipped() {
        let articles = parse_news_response(SAMPLE).unwrap();
        assert_eq!(articles.len(), 2);
        assert!(articles.iter().all(|a| a.id.as_str() != "no-desc"));
    }

    #[test]
    fn test_article_fields_mapped() {
        let articles = parse_news_response(SAMPLE).unwrap();
        let first = &articles[0];
        assert_eq!(first.id.as_str(), "abc123");
        assert_eq!(first.source, "Reuters");
        assert_eq!(first.published_label(), "2026-02-05 10:00 UTC");
    }

    #[test]
    fn test_id_falls_back_to_url_then_content_key() {
        let articles = parse_news_response(SAMPLE).unwrap();
        assert_eq!(articles[1].id.as_str(), "https://example.com/apple-supply");
        assert_eq!(articles[1].source, "Unknown");

        let a = content_key("same headline", "body", "2026-02-05T10:00:00Z");
        assert_eq!(a, content_key("same headline", "body", "2026-02-05T10:00:00Z"));
        assert!(a.starts_with("news-"));
        assert_eq!(a.len(), "news-".len() + 16);
        assert_ne!(a, content_key("same headline", "other body", "2026-02-05T10:00:00Z"));
        assert_ne!(a, content_key("same headlinebody", "", "2026-02-05T10:00:00Z"));
    }

    #[test]
    fn test_same_headline_different_stories_get_distinct_ids() {
        let body = r#"{
            "status": "OK",
            "results": [
                { "title": "Apple shares rise", "description": "Wire copy from Reuters." },
                { "title": "Apple shares rise", "description": "Analysts lift targets." }
            ]
        }"#;
        let articles = parse_news_response(body).unwrap();
        assert_eq!(articles.len(), 2);
        assert_ne!(articles[0].id, articles[1].id);
    }

    #[test]
    fn test_repeated_ids_keep_first_item() {
        let body = r#"{
            "status": "OK",
            "results": [
                { "id": "dup", "title": "First take", "description": "one" },
                { "id": "dup", "title": "Second take", "description": "two" },
                { "id": "other", "title": "Elsewhere", "description": "three" }
            ]
        }"#;
        let articles = parse_news_response(body).unwrap();
        let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["First take", "Elsewhere"]);
    }

    #[test]
    fn test_empty_results_is_not_an_error() {
        let articles = parse_news_response(r#"{"status":"OK","results":[]}"#).unwrap();
        assert!(articles.is_empty());
        let articles = parse_news_response(r#"{"status":"OK","count":0}"#).unwrap();
        assert!(articles.is_empty());
    }

    #[test]
    fn test_garbage_body_is_decode_error() {
        assert!(matches!(parse_news_response("<html>"), Err(SourceError::Decode(_))));
    }
}
