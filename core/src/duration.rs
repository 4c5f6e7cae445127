use crate::Assessment;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    static ref MINUTES: Regex = Regex::new(r"(?i)(\d+)\s*(?:minutes|minute|mins|min)\b").expect("valid regex");
    static ref HOURS: Regex = Regex::new(r"(?i)(\d+)\s*(?:hours|hour|hrs|hr)\b").expect("valid regex");
    static ref FIRST_INT: Regex = Regex::new(r"\d+").expect("valid regex");
}

/// Time budget mentioned in a query ("within 40 minutes", "about 1 hour"), in minutes.
/// Minute phrases are looked for before hour phrases; the first match wins.
/// A budget of 0 is no budget.
pub fn extract_limit(query: &str) -> Option<u32> {
    let limit = match MINUTES.captures(query) {
        Some(c) => saturating_int(&c[1]),
        None => saturating_int(&HOURS.captures(query)?[1]).saturating_mul(60),
    };
    (limit > 0).then_some(limit)
}

// Input is all ASCII digits, so the only parse failure is overflow.
fn saturating_int(digits: &str) -> u32 {
    digits.parse().unwrap_or(u32::MAX)
}

/// Duration of an assessment in minutes, read from `attributes.duration`.
/// Missing or unparsable values count as 0.
pub fn assessment_minutes(assessment: &Assessment) -> u32 {
    match assessment.attributes.get("duration") {
        Some(Value::Number(n)) => match n.as_u64() {
            Some(v) => v.min(u32::MAX as u64) as u32,
            // fractional or negative: floor, clamped into u32
            None => n.as_f64().map(|f| f.floor().clamp(0.0, u32::MAX as f64) as u32).unwrap_or(0),
        },
        Some(Value::String(s)) => FIRST_INT.find(s).map(|m| saturating_int(m.as_str())).unwrap_or(0),
        _ => 0,
    }
}

pub fn fits(assessment: &Assessment, max_minutes: u32) -> bool {
    assessment_minutes(assessment) <= max_minutes
}
