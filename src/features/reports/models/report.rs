use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::str::FromStr;
use utoipa::ToSchema;

use super::lenient;
use super::status::ReportStatus;

/// Report severity as used by the platform API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for ReportSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportSeverity::Low => write!(f, "LOW"),
            ReportSeverity::Medium => write!(f, "MEDIUM"),
            ReportSeverity::High => write!(f, "HIGH"),
            ReportSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

impl FromStr for ReportSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => Ok(ReportSeverity::Low),
            "MEDIUM" => Ok(ReportSeverity::Medium),
            "HIGH" => Ok(ReportSeverity::High),
            "CRITICAL" => Ok(ReportSeverity::Critical),
            _ => Err(format!("unknown report severity: {}", s)),
        }
    }
}

/// Report category (name, icon, color)
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Option<String>,
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut fields = lenient::Fields::from_deserializer(deserializer)?;
        Ok(Self {
            id: fields.read(&["id", "_id"], lenient::optional_text)?,
            name: fields.read(&["name"], lenient::text)?,
            icon: fields.read(&["icon"], lenient::optional_text)?,
            color: fields.read(&["color"], lenient::optional_text)?,
        })
    }
}

/// Where the problem was reported
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
}

impl<'de> Deserialize<'de> for Location {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut fields = lenient::Fields::from_deserializer(deserializer)?;
        Ok(Self {
            latitude: fields.read(&["latitude", "lat"], lenient::coordinate)?,
            longitude: fields.read(&["longitude", "lng", "lon"], lenient::coordinate)?,
            address: fields.read(&["address"], lenient::optional_text)?,
            city: fields.read(&["city"], lenient::optional_text)?,
            region: fields.read(&["region"], lenient::optional_text)?,
        })
    }
}

/// Reference to a platform user (reporter, official or worker)
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl<'de> Deserialize<'de> for UserRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut fields = lenient::Fields::from_deserializer(deserializer)?;
        Ok(Self {
            id: fields.read(&["id", "_id"], lenient::text)?,
            name: fields.read(&["name"], lenient::optional_text)?,
            email: fields.read(&["email"], lenient::optional_text)?,
            phone: fields.read(&["phone"], lenient::optional_text)?,
        })
    }
}

/// A civic issue report as returned by the platform API.
///
/// Only `id` (or `_id`) is mandatory. Missing or malformed text reads as `""`,
/// missing or malformed optional values read as `None`, lists default to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: Option<ReportStatus>,
    pub severity: Option<ReportSeverity>,
    pub category: Option<Category>,
    pub location: Option<Location>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub reporter: Option<UserRef>,
    pub assigned_to: Option<UserRef>,
    pub assigned_to_worker: Option<UserRef>,
    pub tags: Vec<String>,
    pub image_urls: Vec<String>,
    pub video_url: Option<String>,
    pub spam_score: Option<f64>,
    pub confidence_score: Option<f64>,
    pub toxicity_score: Option<f64>,
}

impl<'de> Deserialize<'de> for Report {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut fields = lenient::Fields::from_deserializer(deserializer)?;
        Ok(Self {
            id: fields.read(&["id", "_id"], lenient::id)?,
            title: fields.read(&["title"], lenient::text)?,
            description: fields.read(&["description"], lenient::text)?,
            status: fields.read(&["status"], lenient::parsed)?,
            severity: fields.read(&["severity"], lenient::parsed)?,
            category: fields.read(&["category"], category)?,
            location: fields.read(&["location"], lenient::object)?,
            created_at: fields.read(&["createdAt"], lenient::timestamp)?,
            updated_at: fields.read(&["updatedAt"], lenient::timestamp)?,
            resolved_at: fields.read(&["resolvedAt"], lenient::timestamp)?,
            rejected_at: fields.read(&["rejectedAt"], lenient::timestamp)?,
            reporter: fields.read(&["reporter"], user_ref)?,
            assigned_to: fields.read(&["assignedTo"], user_ref)?,
            assigned_to_worker: fields.read(&["assignedToWorker"], user_ref)?,
            tags: fields.read(&["tags"], lenient::string_list)?,
            image_urls: fields.read(&["imageUrls"], lenient::string_list)?,
            video_url: fields.read(&["videoUrl"], lenient::optional_text)?,
            spam_score: fields.read(&["spamScore"], lenient::score)?,
            confidence_score: fields.read(&["confidenceScore"], lenient::score)?,
            toxicity_score: fields.read(&["toxicityScore"], lenient::score)?,
        })
    }
}

impl Report {
    /// Category name, or `""` when the report has none
    pub fn category_name(&self) -> &str {
        self.category.as_ref().map(|c| c.name.as_str()).unwrap_or("")
    }
}

/// A bare string is a category name
fn category<'de, D>(deserializer: D) -> Result<Option<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(name)) if !name.is_empty() => Some(Category {
            name,
            ..Default::default()
        }),
        Some(value @ Value::Object(_)) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

/// A bare string or number is a user id
fn user_ref<'de, D>(deserializer: D) -> Result<Option<UserRef>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(id)) if !id.is_empty() => Some(UserRef {
            id,
            ..Default::default()
        }),
        Some(Value::Number(n)) => Some(UserRef {
            id: n.to_string(),
            ..Default::default()
        }),
        Some(value @ Value::Object(_)) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_full_payload() {
        let report: Report = serde_json::from_value(json!({
            "_id": "65f1",
            "title": "Large Pothole on Main St",
            "description": "Deep enough to damage tyres",
            "status": "IN_PROGRESS",
            "severity": "HIGH",
            "category": { "_id": "c1", "name": "Road", "icon": "road", "color": "#ff0000" },
            "location": { "lat": 9.03, "lng": "38.74", "city": "Addis Ababa" },
            "createdAt": "2024-01-03T10:00:00Z",
            "reporter": { "_id": "u1", "name": "Abebe" },
            "assignedToWorker": "w7",
            "tags": ["road", "urgent"],
            "imageUrls": ["https://cdn.example/1.jpg"],
            "spamScore": 0.02,
            "confidenceScore": 0.91
        }))
        .unwrap();

        assert_eq!(report.id, "65f1");
        assert_eq!(report.status, Some(ReportStatus::InProgress));
        assert_eq!(report.severity, Some(ReportSeverity::High));
        assert_eq!(report.category_name(), "Road");
        assert_eq!(report.location.as_ref().unwrap().longitude, Some(38.74));
        assert_eq!(
            report.created_at,
            Some(Utc.with_ymd_and_hms(2024, 1, 3, 10, 0, 0).unwrap())
        );
        assert_eq!(report.assigned_to_worker.unwrap().id, "w7");
        assert_eq!(report.tags, vec!["road", "urgent"]);
        assert_eq!(report.confidence_score, Some(0.91));
    }

    #[test]
    fn test_sparse_and_malformed_payload_degrades_to_defaults() {
        let report: Report = serde_json::from_value(json!({
            "id": 3,
            "title": null,
            "description": null,
            "status": "ARCHIVED",
            "severity": 5,
            "category": null,
            "location": "somewhere",
            "createdAt": "not a date",
            "tags": "single",
            "imageUrls": [1, "https://cdn.example/2.jpg", null],
            "toxicityScore": 1.7
        }))
        .unwrap();

        assert_eq!(report.id, "3");
        assert_eq!(report.title, "");
        assert_eq!(report.description, "");
        assert_eq!(report.status, None);
        assert_eq!(report.severity, None);
        assert_eq!(report.category, None);
        assert_eq!(report.category_name(), "");
        assert_eq!(report.location, None);
        assert_eq!(report.created_at, None);
        assert_eq!(report.tags, vec!["single"]);
        assert_eq!(report.image_urls, vec!["https://cdn.example/2.jpg"]);
        assert_eq!(report.toxicity_score, None);
    }

    #[test]
    fn test_mongo_id_next_to_virtual_id() {
        let report: Report = serde_json::from_value(json!({
            "_id": "65f1",
            "id": "65f1",
            "title": "Pothole",
            "category": { "_id": "c1", "id": "c1", "name": "Road" },
            "reporter": { "_id": "u1", "id": "u1", "name": "Abebe" },
            "location": { "lat": 9.03, "latitude": 9.03, "lng": 38.74 }
        }))
        .unwrap();

        assert_eq!(report.id, "65f1");
        assert_eq!(report.category.unwrap().id.as_deref(), Some("c1"));
        assert_eq!(report.reporter.unwrap().id, "u1");
        assert_eq!(report.location.unwrap().latitude, Some(9.03));
    }

    #[test]
    fn test_null_id_falls_back_to_mongo_id() {
        let report: Report =
            serde_json::from_value(json!({ "id": null, "_id": "65f2" })).unwrap();
        assert_eq!(report.id, "65f2");
    }

    #[test]
    fn test_category_as_plain_name() {
        let report: Report =
            serde_json::from_value(json!({ "id": "r1", "category": "Lighting" })).unwrap();
        assert_eq!(report.category_name(), "Lighting");
    }

    #[test]
    fn test_missing_id_is_an_error() {
        assert!(serde_json::from_value::<Report>(json!({ "title": "No id" })).is_err());
        assert!(serde_json::from_value::<Report>(json!({ "id": "" })).is_err());
    }

    #[test]
    fn test_serializes_camel_case() {
        let report = Report {
            id: "r1".to_string(),
            status: Some(ReportStatus::NeedsMoreInfo),
            ..Default::default()
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["status"], "NEEDS_MORE_INFO");
        assert!(value.get("imageUrls").is_some());
        assert!(value.get("createdAt").is_some());
    }
}
