use crate::core::{EligibilityFilter, QueryPlan, RequestParams, SearchTarget, SessionQuery};

pub const DEFAULT_SERVER: &str = "https://cdn-api.co-vin.in/api/v2";
pub const SESSIONS_PATH: &str = "appointment/sessions/public";

/// API 要求的日期格式
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Today's date in the format the sessions API expects.
pub fn today() -> String {
    chrono::Local::now().format(DATE_FORMAT).to_string()
}

fn endpoint_fragment(target: &SearchTarget, calendar_view: bool) -> &'static str {
    match (target, calendar_view) {
        (SearchTarget::Locations(_), true) => "calendarByPin",
        (SearchTarget::Locations(_), false) => "findByPin",
        (SearchTarget::Region(_), true) => "calendarByDistrict",
        (SearchTarget::Region(_), false) => "findByDistrict",
    }
}

/// Builds the endpoint, one parameter set per search unit, and the session
/// criteria used by the extractor. Pure; the date is supplied by the caller.
pub fn build(
    server: &str,
    target: &SearchTarget,
    calendar_view: bool,
    filter: Option<&EligibilityFilter>,
    date: &str,
) -> QueryPlan {
    let endpoint = format!(
        "{}/{}/{}",
        server.trim_end_matches('/'),
        SESSIONS_PATH,
        endpoint_fragment(target, calendar_view)
    );

    let units = match target {
        SearchTarget::Locations(codes) => codes
            .iter()
            .map(|code| RequestParams {
                label: format!("pincode {}", code),
                query: vec![
                    ("pincode".to_string(), code.clone()),
                    ("date".to_string(), date.to_string()),
                ],
            })
            .collect(),
        SearchTarget::Region(id) => vec![RequestParams {
            label: format!("district {}", id),
            query: vec![
                ("district_id".to_string(), id.clone()),
                ("date".to_string(), date.to_string()),
            ],
        }],
    };

    QueryPlan {
        endpoint,
        units,
        criteria: SessionQuery {
            min_age_limit: filter.cloned(),
        },
    }
}
