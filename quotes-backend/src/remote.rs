/// HTTP remote quote source.
///
/// The endpoint serves generic posts (`{id, title, body, userId}`); each one
/// becomes a quote with `title` as text and the configured category.
use async_trait::async_trait;
use quotes_core::config::RemoteSettings;
use quotes_core::sync::{RemoteSource, SyncError};
use quotes_core::types::Quote;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
struct RemotePost {
    id: i64,
    title: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewPost<'a> {
    title: &'a str,
    body: &'a str,
    user_id: u32,
}

pub struct HttpRemoteSource {
    client: reqwest::Client,
    url: String,
    category: String,
}

impl HttpRemoteSource {
    pub fn new(settings: &RemoteSettings) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| SyncError::Network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            url: settings.url.clone(),
            category: settings.category.clone(),
        })
    }
}

/// Map the remote payload into quotes. The top level must be an array.
fn posts_to_quotes(payload: serde_json::Value, category: &str) -> Result<Vec<Quote>, SyncError> {
    if !payload.is_array() {
        return Err(SyncError::Parse("expected a JSON array".to_string()));
    }
    let posts: Vec<RemotePost> =
        serde_json::from_value(payload).map_err(|e| SyncError::Parse(e.to_string()))?;
    Ok(posts
        .into_iter()
        .map(|p| Quote::new(Some(p.id), p.title, category))
        .collect())
}

#[async_trait]
impl RemoteSource for HttpRemoteSource {
    async fn fetch_quotes(&self) -> Result<Vec<Quote>, SyncError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| SyncError::Network(format!("GET {} failed: {}", self.url, e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SyncError::Network(format!("GET {} returned {}", self.url, status)));
        }

        let payload: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| SyncError::Parse(e.to_string()))?;
        let quotes = posts_to_quotes(payload, &self.category)?;
        log::debug!(target: "quotes.remote", "Fetched {} remote quotes", quotes.len());
        Ok(quotes)
    }

    async fn push_quote(&self, quote: &Quote) -> Result<(), SyncError> {
        let body = NewPost {
            title: &quote.text,
            body: &quote.category,
            user_id: 1,
        };
        let resp = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| SyncError::Network(format!("POST {} failed: {}", self.url, e)))?;
        log::info!(
            target: "quotes.remote",
            "Posted quote {:?} to server: {}",
            quote.id,
            resp.status()
        );
        Ok(())
    }
}
