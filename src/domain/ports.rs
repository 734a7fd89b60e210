use crate::domain::model::{Alert, EligibilityFilter, LoadOutcome, RankedResultSet, Record, SearchTarget};
use crate::utils::error::{FetchError, Result};
use async_trait::async_trait;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn server(&self) -> &str;
    fn search_target(&self) -> &SearchTarget;
    fn eligibility_filter(&self) -> Option<&EligibilityFilter>;
    fn calendar_view(&self) -> bool;
    fn search_date(&self) -> &str;
    fn concurrent_requests(&self) -> usize;
    fn interval(&self) -> Duration;
    fn top_n(&self) -> usize;
    fn notification_title(&self) -> &str;
    fn click_url(&self) -> Option<&str>;
}

/// 單次 GET 請求；HTTP 與連線錯誤都要分類成 FetchError
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> std::result::Result<serde_json::Value, FetchError>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, alert: &Alert) -> Result<()>;
}

pub trait Timer: Send + Sync {
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Record>>;
    async fn transform(&self, data: Vec<Record>) -> Result<RankedResultSet>;
    async fn load(&self, result: RankedResultSet) -> Result<LoadOutcome>;
}
