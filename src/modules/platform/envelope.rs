use reqwest::StatusCode;
use serde_json::Value;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::Report;

/// Strip the `{ success, message, data }` envelope from a 2xx body.
///
/// Bodies that are not an envelope (a bare array, a bare report) are returned
/// as-is. `success: false` is a failure even though the HTTP status was 2xx.
pub fn unwrap(body: Value) -> Result<Value> {
    let Value::Object(mut map) = body else {
        return Ok(body);
    };

    if !map.contains_key("success") && !map.contains_key("data") {
        return Ok(Value::Object(map));
    }

    if map.get("success").and_then(Value::as_bool) == Some(false) {
        let message = map
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Request rejected by the platform")
            .to_string();
        return Err(AppError::BadRequest(message));
    }

    Ok(map.remove("data").unwrap_or(Value::Null))
}

/// Best-effort message from an error body
pub fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Map a non-2xx platform response onto an application error
pub fn status_error(status: StatusCode, message: Option<String>, action: &str) -> AppError {
    let message = message.unwrap_or_else(|| format!("Failed to {}", action));
    match status {
        StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
        StatusCode::FORBIDDEN => AppError::Forbidden(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::TOO_MANY_REQUESTS => AppError::RateLimitExceeded(message),
        s if s.is_client_error() => AppError::BadRequest(message),
        s => AppError::ExternalServiceError(format!("Platform API error: HTTP {} - {}", s, message)),
    }
}

/// Reports from a list payload: a bare array or `{ reports: [...] }`.
///
/// Records that fail to decode are skipped so one bad row cannot blank a screen.
pub fn reports(data: Value) -> Result<Vec<Report>> {
    let items = match data {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("reports") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(AppError::ExternalServiceError(
                    "Unexpected report list payload".to_string(),
                ))
            }
        },
        Value::Null => Vec::new(),
        _ => {
            return Err(AppError::ExternalServiceError(
                "Unexpected report list payload".to_string(),
            ))
        }
    };

    let total = items.len();
    let reports: Vec<Report> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Report>(item) {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::warn!("Skipping malformed report record: {}", e);
                None
            }
        })
        .collect();

    if reports.len() < total {
        tracing::warn!(
            "Decoded {} of {} report records from platform",
            reports.len(),
            total
        );
    }

    Ok(reports)
}

/// A single report: the object itself or `{ report: {...} }`
pub fn report(data: Value) -> Result<Report> {
    let data = match data {
        Value::Object(mut map) if map.contains_key("report") => {
            map.remove("report").unwrap_or(Value::Null)
        }
        other => other,
    };

    serde_json::from_value::<Report>(data).map_err(|e| {
        tracing::error!("Failed to parse report response: {}", e);
        AppError::ExternalServiceError(format!("Failed to parse report response: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_envelope_returns_data() {
        let data = unwrap(json!({ "success": true, "data": [1, 2] })).unwrap();
        assert_eq!(data, json!([1, 2]));
    }

    #[test]
    fn test_unwrap_success_false_is_error_with_message() {
        let err = unwrap(json!({ "success": false, "message": "Report locked" })).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "Report locked"));
    }

    #[test]
    fn test_unwrap_passes_through_bare_payloads() {
        assert_eq!(unwrap(json!([])).unwrap(), json!([]));
        assert_eq!(
            unwrap(json!({ "_id": "r1" })).unwrap(),
            json!({ "_id": "r1" })
        );
        assert_eq!(unwrap(json!({ "success": true })).unwrap(), Value::Null);
    }

    #[test]
    fn test_status_error_mapping() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, None, "list reports"),
            AppError::Unauthorized(_)
        ));
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, None, "list reports"),
            AppError::Forbidden(_)
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, Some("gone".into()), "get report"),
            AppError::NotFound(ref m) if m == "gone"
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, None, "get report"),
            AppError::ExternalServiceError(_)
        ));
    }

    #[test]
    fn test_error_message_reads_message_or_error() {
        assert_eq!(
            error_message(r#"{"message":"Token expired"}"#).as_deref(),
            Some("Token expired")
        );
        assert_eq!(error_message(r#"{"error":"nope"}"#).as_deref(), Some("nope"));
        assert_eq!(error_message("<html>"), None);
    }

    #[test]
    fn test_reports_accepts_both_list_shapes_and_skips_malformed() {
        let bare = reports(json!([{ "_id": "a" }, { "_id": "b" }])).unwrap();
        assert_eq!(bare.len(), 2);

        let wrapped = reports(json!({ "reports": [{ "_id": "a" }, { "title": "no id" }] })).unwrap();
        assert_eq!(wrapped.len(), 1);
        assert_eq!(wrapped[0].id, "a");

        let both_ids = reports(json!([{ "_id": "65f1", "id": "65f1", "title": "Pothole" }])).unwrap();
        assert_eq!(both_ids.len(), 1);
        assert_eq!(both_ids[0].title, "Pothole");

        assert!(reports(Value::Null).unwrap().is_empty());
        assert!(reports(json!("nope")).is_err());
    }

    #[test]
    fn test_report_accepts_wrapped_object() {
        assert_eq!(report(json!({ "report": { "_id": "x" } })).unwrap().id, "x");
        assert_eq!(report(json!({ "_id": "y" })).unwrap().id, "y");
        assert!(report(json!({ "title": "no id" })).is_err());
    }
}
