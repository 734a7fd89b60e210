use crate::core::fetch::FetchClient;
use crate::core::{
    alert, extract::extract, query, rank, ConfigProvider, LoadOutcome, Notifier, Pipeline,
    RankedResultSet, Record, Transport,
};
use crate::utils::error::Result;

/// 每輪：建立查詢 → 逐一抓取 → 抽取 → 排序 → 通知
pub struct SlotPipeline<T: Transport, N: Notifier, C: ConfigProvider> {
    fetcher: FetchClient<T>,
    notifier: N,
    config: C,
}

impl<T: Transport, N: Notifier, C: ConfigProvider> SlotPipeline<T, N, C> {
    pub fn new(transport: T, notifier: N, config: C) -> Self {
        Self {
            fetcher: FetchClient::new(transport, config.concurrent_requests()),
            notifier,
            config,
        }
    }

    pub fn query_plan(&self) -> crate::core::QueryPlan {
        query::build(
            self.config.server(),
            self.config.search_target(),
            self.config.calendar_view(),
            self.config.eligibility_filter(),
            self.config.search_date(),
        )
    }
}

#[async_trait::async_trait]
impl<T: Transport, N: Notifier, C: ConfigProvider> Pipeline for SlotPipeline<T, N, C> {
    async fn extract(&self) -> Result<Vec<Record>> {
        let plan = self.query_plan();
        tracing::debug!("🔎 {} units, criteria {}", plan.units.len(), plan.criteria);

        let mut records = Vec::new();
        for unit in self.fetcher.fetch_all(&plan).await {
            let found = extract(&unit.payload, &plan.criteria);
            for record in &found {
                tracing::debug!(
                    "{}{} capacity {}",
                    unit.label,
                    record.pointer,
                    record.available_capacity
                );
            }
            if !found.is_empty() {
                tracing::info!(
                    "📍 {}: {} sessions available at {}",
                    unit.label,
                    found.len(),
                    plan.endpoint
                );
            }
            records.extend(found);
        }

        Ok(records)
    }

    async fn transform(&self, data: Vec<Record>) -> Result<RankedResultSet> {
        Ok(rank(data))
    }

    async fn load(&self, result: RankedResultSet) -> Result<LoadOutcome> {
        if result.is_empty() {
            return Ok(LoadOutcome::Skipped);
        }

        let top = result.top(self.config.top_n());
        let alert = alert::render(self.config.notification_title(), top, self.config.click_url());

        match self.notifier.notify(&alert).await {
            Ok(()) => Ok(LoadOutcome::Notified { count: top.len() }),
            Err(e) => {
                tracing::error!("❌ Notification failed: {}", e);
                tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
                Ok(LoadOutcome::Skipped)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::{ReqwestTransport, TransportOptions};
    use crate::core::{Alert, EligibilityFilter, SearchTarget};
    use crate::utils::error::WatchError;
    use async_trait::async_trait;
    use httpmock::prelude::*;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    struct MockConfig {
        server: String,
        target: SearchTarget,
        filter: Option<EligibilityFilter>,
    }

    impl MockConfig {
        fn new(server: String, target: SearchTarget) -> Self {
            Self {
                server,
                target,
                filter: None,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn server(&self) -> &str {
            &self.server
        }

        fn search_target(&self) -> &SearchTarget {
            &self.target
        }

        fn eligibility_filter(&self) -> Option<&EligibilityFilter> {
            self.filter.as_ref()
        }

        fn calendar_view(&self) -> bool {
            true
        }

        fn search_date(&self) -> &str {
            "16-10-2026"
        }

        fn concurrent_requests(&self) -> usize {
            2
        }

        fn interval(&self) -> Duration {
            Duration::from_secs(30)
        }

        fn top_n(&self) -> usize {
            3
        }

        fn notification_title(&self) -> &str {
            "Vaccine Appointment Available"
        }

        fn click_url(&self) -> Option<&str> {
            Some("https://selfregistration.cowin.gov.in/")
        }
    }

    #[derive(Clone, Default)]
    struct RecordingNotifier {
        alerts: Arc<Mutex<Vec<Alert>>>,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, alert: &Alert) -> Result<()> {
            if self.fail {
                return Err(WatchError::NotificationError {
                    message: "no notification daemon".to_string(),
                });
            }
            self.alerts.lock().unwrap().push(alert.clone());
            Ok(())
        }
    }

    fn transport() -> ReqwestTransport {
        ReqwestTransport::new(&TransportOptions::default()).unwrap()
    }

    fn centers(sessions: Value) -> Value {
        json!({"centers": [{"name": "Civic Hospital", "fee_type": "Free", "sessions": sessions}]})
    }

    #[tokio::test]
    async fn test_extract_concatenates_units_in_order() {
        let server = MockServer::start();
        let first = server.mock(|when, then| {
            when.method(GET)
                .path("/appointment/sessions/public/calendarByPin")
                .query_param("pincode", "400614")
                .query_param("date", "16-10-2026");
            then.status(200).json_body(centers(json!([
                {"available_capacity": 2, "min_age_limit": 18, "vaccine": "COVAXIN"}
            ])));
        });
        let second = server.mock(|when, then| {
            when.method(GET)
                .path("/appointment/sessions/public/calendarByPin")
                .query_param("pincode", "400706");
            then.status(200).json_body(centers(json!([
                {"available_capacity": 8, "min_age_limit": 45, "vaccine": "COVISHIELD"}
            ])));
        });

        let config = MockConfig::new(
            server.base_url(),
            SearchTarget::Locations(vec!["400614".to_string(), "400706".to_string()]),
        );
        let pipeline = SlotPipeline::new(
            transport(),
            RecordingNotifier::default(),
            config,
        );

        let records = pipeline.extract().await.unwrap();

        first.assert();
        second.assert();
        let capacities: Vec<u64> = records.iter().map(|r| r.available_capacity).collect();
        assert_eq!(capacities, vec![2, 8]);
    }

    #[tokio::test]
    async fn test_boxed_pipeline_runs_on_spawned_task() {
        let server = MockServer::start();
        let sessions = server.mock(|when, then| {
            when.method(GET)
                .path("/appointment/sessions/public/calendarByPin")
                .query_param("pincode", "400703");
            then.status(200).json_body(centers(json!([
                {"available_capacity": 4, "min_age_limit": 18, "vaccine": "COVAXIN"}
            ])));
        });

        let config = MockConfig::new(
            server.base_url(),
            SearchTarget::Locations(vec!["400703".to_string()]),
        );
        let pipeline: Box<dyn Pipeline> = Box::new(SlotPipeline::new(
            transport(),
            RecordingNotifier::default(),
            config,
        ));

        let records = tokio::spawn(async move { pipeline.extract().await })
            .await
            .unwrap()
            .unwrap();

        sessions.assert();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].available_capacity, 4);
    }

    #[tokio::test]
    async fn test_extract_applies_eligibility_filter() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/appointment/sessions/public/calendarByDistrict");
            then.status(200).json_body(centers(json!([
                {"available_capacity": 5, "min_age_limit": "18", "vaccine": "COVAXIN"},
                {"available_capacity": 3, "min_age_limit": "45", "vaccine": "COVISHIELD"}
            ])));
        });

        let mut config = MockConfig::new(server.base_url(), SearchTarget::Region("395".to_string()));
        config.filter = Some(EligibilityFilter::new("45"));
        let pipeline = SlotPipeline::new(
            transport(),
            RecordingNotifier::default(),
            config,
        );

        let records = pipeline.extract().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].age_range.as_deref(), Some("45"));
    }

    #[tokio::test]
    async fn test_load_notifies_top_three() {
        let notifier = RecordingNotifier::default();
        let pipeline = SlotPipeline::new(
            transport(),
            notifier.clone(),
            MockConfig::new("http://unused".to_string(), SearchTarget::Region("1".to_string())),
        );

        let records = (1..=5)
            .map(|c| Record {
                center_name: Some(format!("C{}", c)),
                available_capacity: c,
                age_range: Some("18".to_string()),
                price_tier: Some("Free".to_string()),
                vaccine_name: Some("COVAXIN".to_string()),
                date: None,
                pointer: String::new(),
            })
            .collect();
        let ranked = pipeline.transform(records).await.unwrap();
        let outcome = pipeline.load(ranked).await.unwrap();

        assert_eq!(outcome, LoadOutcome::Notified { count: 3 });
        let alerts = notifier.alerts.lock().unwrap();
        assert_eq!(alerts.len(), 1);
        let lines: Vec<&str> = alerts[0].body.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("C5 capacity: 5"));
        assert!(lines[2].starts_with("C3 capacity: 3"));
    }

    #[tokio::test]
    async fn test_load_skips_empty_set() {
        let notifier = RecordingNotifier::default();
        let pipeline = SlotPipeline::new(
            transport(),
            notifier.clone(),
            MockConfig::new("http://unused".to_string(), SearchTarget::Region("1".to_string())),
        );

        let outcome = pipeline.load(RankedResultSet::default()).await.unwrap();
        assert_eq!(outcome, LoadOutcome::Skipped);
        assert!(notifier.alerts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_notifier_failure_is_not_fatal() {
        let notifier = RecordingNotifier {
            fail: true,
            ..Default::default()
        };
        let pipeline = SlotPipeline::new(
            transport(),
            notifier,
            MockConfig::new("http://unused".to_string(), SearchTarget::Region("1".to_string())),
        );

        let ranked = rank(vec![Record {
            center_name: None,
            available_capacity: 1,
            age_range: None,
            price_tier: None,
            vaccine_name: None,
            date: None,
            pointer: String::new(),
        }]);
        let outcome = pipeline.load(ranked).await.unwrap();
        assert_eq!(outcome, LoadOutcome::Skipped);
    }
}
