use crate::core::Transport;
use crate::utils::error::{FetchError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, ORIGIN, REFERER};
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

/// Firefox on Windows; the public API rejects obvious automated clients.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:128.0) Gecko/20100101 Firefox/128.0";

const BODY_SNIPPET_CHARS: usize = 200;

pub fn snippet(body: &str) -> String {
    let mut out: String = body.chars().take(BODY_SNIPPET_CHARS).collect();
    if body.chars().count() > BODY_SNIPPET_CHARS {
        out.push('…');
    }
    out
}

#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub timeout: Duration,
    pub user_agent: Option<String>,
    pub headers: HashMap<String, String>,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: None,
            headers: HashMap::new(),
        }
    }
}

fn browser_headers(extra: &HashMap<String, String>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/json, text/plain, */*"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(
        ORIGIN,
        HeaderValue::from_static("https://selfregistration.cowin.gov.in"),
    );
    headers.insert(
        REFERER,
        HeaderValue::from_static("https://selfregistration.cowin.gov.in/"),
    );

    // 設定檔中的自訂標頭覆蓋預設值
    for (key, value) in extra {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
            crate::utils::error::WatchError::InvalidConfigValueError {
                field: "source.headers".to_string(),
                value: key.clone(),
                reason: e.to_string(),
            }
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| {
            crate::utils::error::WatchError::InvalidConfigValueError {
                field: format!("source.headers.{}", key),
                value: value.clone(),
                reason: e.to_string(),
            }
        })?;
        headers.insert(name, value);
    }
    Ok(headers)
}

/// reqwest transport that presents itself as a desktop browser.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(options: &TransportOptions) -> Result<Self> {
        let client = Client::builder()
            .user_agent(options.user_agent.as_deref().unwrap_or(BROWSER_USER_AGENT))
            .default_headers(browser_headers(&options.headers)?)
            .timeout(options.timeout)
            .gzip(true)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get_json(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> std::result::Result<serde_json::Value, FetchError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| FetchError::Network {
                url: e.url().map(|u| u.to_string()).unwrap_or_else(|| url.to_string()),
                cause: e.to_string(),
            })?;

        let status = response.status();
        let final_url = response.url().to_string();
        tracing::debug!("📡 {} -> {}", final_url, status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Http {
                status: status.as_u16(),
                url: final_url,
                body: snippet(&body),
            });
        }

        let body = response.text().await.map_err(|e| FetchError::Network {
            url: final_url.clone(),
            cause: e.to_string(),
        })?;
        serde_json::from_str(&body).map_err(|e| FetchError::Decode {
            url: final_url,
            cause: e.to_string(),
        })
    }
}
