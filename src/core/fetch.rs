use crate::core::{QueryPlan, RequestParams, Transport};
use crate::utils::error::FetchError;
use futures::stream::{self, StreamExt};
use serde_json::Value;

/// 成功取回的單位回應
#[derive(Debug, Clone)]
pub struct UnitPayload {
    pub label: String,
    pub payload: Value,
}

pub struct FetchClient<T: Transport> {
    transport: T,
    concurrency: usize,
}

impl<T: Transport> FetchClient<T> {
    pub fn new(transport: T, concurrency: usize) -> Self {
        Self {
            transport,
            concurrency: concurrency.max(1),
        }
    }

    /// One GET for one unit. Failures are logged and yield `None`.
    pub async fn fetch(&self, endpoint: &str, params: &RequestParams) -> Option<Value> {
        tracing::debug!("📡 {}: GET {} {:?}", params.label, endpoint, params.query);

        match self.transport.get_json(endpoint, &params.query).await {
            Ok(payload) => Some(payload),
            Err(FetchError::Http { status, url, body }) => {
                tracing::error!("❌ {}: {} [{}] {}", params.label, url, status, body);
                None
            }
            Err(FetchError::Network { url, cause }) => {
                tracing::error!("❌ {}: {} network error: {}", params.label, url, cause);
                None
            }
            Err(FetchError::Decode { url, cause }) => {
                tracing::error!("❌ {}: {} undecodable body: {}", params.label, url, cause);
                None
            }
        }
    }

    /// Fetches every unit with bounded concurrency. Results keep unit order;
    /// failed units are dropped without affecting the others.
    pub async fn fetch_all(&self, plan: &QueryPlan) -> Vec<UnitPayload> {
        let endpoint = plan.endpoint.as_str();

        let requests: Vec<_> = plan
            .units
            .iter()
            .map(|unit| async move { (unit.label.clone(), self.fetch(endpoint, unit).await) })
            .collect();

        let results: Vec<(String, Option<Value>)> = stream::iter(requests)
            .buffered(self.concurrency)
            .collect()
            .await;

        let total = results.len();
        let payloads: Vec<UnitPayload> = results
            .into_iter()
            .filter_map(|(label, payload)| payload.map(|payload| UnitPayload { label, payload }))
            .collect();

        if payloads.len() < total {
            tracing::warn!("⚠️ {}/{} units failed this cycle", total - payloads.len(), total);
        }
        payloads
    }
}
