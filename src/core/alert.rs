use crate::core::{Alert, Record};

/// 單行摘要：中心、名額、年齡、疫苗、費用
pub fn summary_line(record: &Record) -> String {
    let mut parts = vec![
        record
            .center_name
            .clone()
            .unwrap_or_else(|| "Unknown center".to_string()),
        format!("capacity: {}", record.available_capacity),
    ];
    if let Some(age) = &record.age_range {
        parts.push(format!("age: {}+", age));
    }
    if let Some(vaccine) = &record.vaccine_name {
        parts.push(format!("vaccine: {}", vaccine));
    }
    if let Some(price) = &record.price_tier {
        parts.push(format!("price: {}", price));
    }
    parts.join(" ")
}

pub fn render(title: &str, records: &[Record], click_url: Option<&str>) -> Alert {
    let body = records
        .iter()
        .map(summary_line)
        .collect::<Vec<_>>()
        .join("\n");

    Alert {
        title: title.to_string(),
        body,
        click_url: click_url.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(center: Option<&str>, capacity: u64) -> Record {
        Record {
            center_name: center.map(str::to_string),
            available_capacity: capacity,
            age_range: Some("45".to_string()),
            price_tier: Some("Free".to_string()),
            vaccine_name: Some("COVISHIELD".to_string()),
            date: None,
            pointer: String::new(),
        }
    }

    #[test]
    fn test_summary_line_has_all_parts() {
        assert_eq!(
            summary_line(&record(Some("Thane Civic Hospital"), 12)),
            "Thane Civic Hospital capacity: 12 age: 45+ vaccine: COVISHIELD price: Free"
        );
    }

    #[test]
    fn test_summary_line_omits_missing_parts() {
        let bare = Record {
            center_name: None,
            available_capacity: 2,
            age_range: None,
            price_tier: None,
            vaccine_name: None,
            date: None,
            pointer: String::new(),
        };
        assert_eq!(summary_line(&bare), "Unknown center capacity: 2");
    }

    #[test]
    fn test_render_one_line_per_record() {
        let alert = render(
            "Vaccine Appointment Available",
            &[record(Some("A"), 9), record(Some("B"), 4)],
            Some("https://selfregistration.cowin.gov.in/"),
        );

        assert_eq!(alert.title, "Vaccine Appointment Available");
        assert_eq!(alert.body.lines().count(), 2);
        assert!(alert.body.starts_with("A capacity: 9"));
        assert_eq!(
            alert.click_url.as_deref(),
            Some("https://selfregistration.cowin.gov.in/")
        );
    }
}
