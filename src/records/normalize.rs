use serde_json::Value;

use super::assets::footage_href;
use super::model::{LoadReport, ParsedRecord, Record, RejectReason, RejectedRecord, Status};

pub(crate) fn as_non_empty_string(value: Option<&Value>) -> Option<String> {
    let trimmed = value?.as_str()?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn normalize_status(value: Option<&Value>) -> Status {
    match as_non_empty_string(value) {
        Some(s) if s.eq_ignore_ascii_case("former") => Status::Former,
        _ => Status::Current,
    }
}

/// Numbers and numeric strings become a whole year; anything else is rejected.
pub fn coerce_year(value: Option<&Value>) -> Option<i64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<f64>().ok()?
        }
        _ => return None,
    };
    if !n.is_finite() {
        return None;
    }
    Some(n.trunc() as i64)
}

pub fn normalize_record(index: usize, raw: &Value) -> ParsedRecord {
    let reject = |reason: RejectReason| {
        ParsedRecord::Rejected(RejectedRecord {
            index,
            reason,
            raw: raw.clone(),
        })
    };

    let obj = match raw.as_object() {
        Some(obj) => obj,
        None => return reject(RejectReason::NotAnObject),
    };

    let Some(name) = as_non_empty_string(obj.get("name")) else {
        return reject(RejectReason::MissingName);
    };
    let Some(title) = as_non_empty_string(obj.get("title")) else {
        return reject(RejectReason::MissingTitle);
    };
    let Some(description) = as_non_empty_string(obj.get("description")) else {
        return reject(RejectReason::MissingDescription);
    };
    let Some(year) = coerce_year(obj.get("year")) else {
        return reject(RejectReason::InvalidYear);
    };

    let footage = as_non_empty_string(obj.get("footage"));
    ParsedRecord::Valid(Record {
        name,
        title,
        description,
        image: as_non_empty_string(obj.get("image")),
        footage: footage_href(footage.as_deref()),
        year,
        status: normalize_status(obj.get("status")),
    })
}

/// Normalizes every element, keeping input order. Rejections are logged and
/// collected; they never stop the rest of the payload.
pub fn normalize_all(values: &[Value]) -> LoadReport {
    let mut report = LoadReport::default();
    for (index, raw) in values.iter().enumerate() {
        match normalize_record(index, raw) {
            ParsedRecord::Valid(record) => report.records.push(record),
            ParsedRecord::Rejected(rejected) => {
                tracing::warn!(
                    index = rejected.index,
                    reason = rejected.reason.as_str(),
                    raw = %rejected.raw,
                    "skipping invalid record"
                );
                report.rejected.push(rejected);
            }
        }
    }
    report
}
