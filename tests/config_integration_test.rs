use anyhow::Result;
use slot_notifier::core::query;
use slot_notifier::core::{ConfigProvider, SearchTarget};
use slot_notifier::utils::validation::Validate;
use slot_notifier::{WatchConfig, WatchError};
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_config_file_to_query_plan() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("watch.toml");
    std::fs::write(
        &path,
        r#"
[search]
pin_codes = "400614,400706"
age_filter = 45
date = "17-10-2026"

[source]
server = "https://example.test/api/v2/"
concurrent_requests = 4

[schedule]
interval_seconds = 90

[notification]
title = "Slots!"
top_n = 5
"#,
    )?;

    let config = WatchConfig::from_file(&path)?;
    config.validate()?;
    let settings = config.resolve()?;

    assert_eq!(settings.interval(), Duration::from_secs(90));
    assert_eq!(settings.top_n(), 5);
    assert_eq!(settings.notification_title(), "Slots!");
    assert_eq!(settings.concurrent_requests(), 4);

    let plan = query::build(
        settings.server(),
        settings.search_target(),
        settings.calendar_view(),
        settings.eligibility_filter(),
        settings.search_date(),
    );
    println!("🔎 {} → {}", plan.endpoint, plan.criteria);

    assert_eq!(
        plan.endpoint,
        "https://example.test/api/v2/appointment/sessions/public/calendarByPin"
    );
    assert_eq!(plan.units.len(), 2);
    assert_eq!(plan.units[1].label, "pincode 400706");
    assert!(plan
        .units
        .iter()
        .all(|u| u.query.contains(&("date".to_string(), "17-10-2026".to_string()))));
    assert_eq!(
        plan.criteria.to_string(),
        "$.centers[*].sessions[?(@.available_capacity > 0 & @.min_age_limit == '45')]"
    );

    Ok(())
}

#[test]
fn test_init_writes_usable_default() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("slot-notifier.toml");

    let written = WatchConfig::write_default(&path, false)?;
    assert_eq!(written, path);

    let settings = WatchConfig::from_file(&path)?.resolve()?;
    assert!(matches!(settings.search_target(), SearchTarget::Locations(codes) if codes.len() == 3));
    assert_eq!(settings.interval(), Duration::from_secs(30));
    assert_eq!(settings.click_url(), Some("https://selfregistration.cowin.gov.in/"));

    let err = WatchConfig::write_default(&path, false).unwrap_err();
    assert!(matches!(err, WatchError::ConfigError { .. }));

    Ok(())
}

#[test]
fn test_missing_target_reports_friendly_error() -> Result<()> {
    let config = WatchConfig::from_toml_str("[search]\n")?;
    let err = config.resolve().unwrap_err();

    println!("❌ {}", err.user_friendly_message());
    assert!(matches!(err, WatchError::MissingConfigError { .. }));
    assert!(!err.recovery_suggestion().is_empty());

    Ok(())
}
