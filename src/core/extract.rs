use crate::core::{Record, SessionQuery};
use serde_json::Value;

/// 數字或字串欄位都轉成文字；整數值的浮點數 (`45.0`) 寫成 `45`
fn text_of(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 => Some(format!("{:.0}", f)),
            _ => Some(n.to_string()),
        },
        _ => None,
    }
}

/// Capacity as a non-negative integer; whole floats (`10.0`) are accepted.
fn capacity_of(session: &Value) -> Option<u64> {
    let raw = session.get("available_capacity")?;
    if let Some(n) = raw.as_u64() {
        return Some(n);
    }
    let f = raw.as_f64()?;
    (f >= 0.0 && f.fract() == 0.0).then_some(f as u64)
}

fn session_matches(session: &Value, capacity: u64, criteria: &SessionQuery) -> bool {
    if capacity == 0 {
        return false;
    }
    match &criteria.min_age_limit {
        Some(filter) => text_of(session.get("min_age_limit")).as_deref() == Some(filter.as_str()),
        None => true,
    }
}

fn to_record(parent: &Value, session: &Value, criteria: &SessionQuery, pointer: String) -> Option<Record> {
    let capacity = capacity_of(session)?;
    if !session_matches(session, capacity, criteria) {
        return None;
    }

    Some(Record {
        center_name: text_of(parent.get("name")),
        available_capacity: capacity,
        age_range: text_of(session.get("min_age_limit")),
        price_tier: text_of(parent.get("fee_type")),
        vaccine_name: text_of(session.get("vaccine")),
        date: text_of(session.get("date")),
        pointer,
    })
}

/// Walks `centers[*].sessions[*]` and joins each matching session with its
/// center. A top-level `sessions` array (single-day endpoints) is walked too,
/// each session acting as its own parent. Malformed entries are skipped.
pub fn extract(payload: &Value, criteria: &SessionQuery) -> Vec<Record> {
    let mut records = Vec::new();

    if let Some(centers) = payload.get("centers").and_then(Value::as_array) {
        for (ci, center) in centers.iter().enumerate() {
            let Some(sessions) = center.get("sessions").and_then(Value::as_array) else {
                continue;
            };
            for (si, session) in sessions.iter().enumerate() {
                let pointer = format!("/centers/{}/sessions/{}", ci, si);
                records.extend(to_record(center, session, criteria, pointer));
            }
        }
    }

    if let Some(sessions) = payload.get("sessions").and_then(Value::as_array) {
        for (si, session) in sessions.iter().enumerate() {
            let pointer = format!("/sessions/{}", si);
            records.extend(to_record(session, session, criteria, pointer));
        }
    }

    records
}
