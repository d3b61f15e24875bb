//! # API Client
//!
//! HTTP client for the backend alert and sensor endpoints. Wire shapes are
//! local to this module; numeric columns may arrive as strings depending on
//! the backing database driver, so the deserializers are lenient.

use chrono::{DateTime, NaiveDateTime, Utc};
use gloo_net::http::Request;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use hazard_domain::{Alert, AlertCategory, AlertStatus, GeoPoint, SensorReading};

/// One alert row as served by the backend.
#[derive(Debug, Deserialize)]
struct AlertRecord {
    id: i64,
    alert_type: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    longitude: Option<f64>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    timestamp: Option<DateTime<Utc>>,
}

impl AlertRecord {
    /// Converts a server row into the domain entity. Rows with an unknown
    /// category are rejected. Missing coordinates become non-finite so the
    /// marker layer skips them while the list still shows the row.
    fn into_domain(self) -> Option<Alert> {
        let category = match self.alert_type.parse::<AlertCategory>() {
            Ok(category) => category,
            Err(err) => {
                log::warn!("alert {} skipped: {err}", self.id);
                return None;
            }
        };
        let status = if matches!(self.status.as_deref(), Some("resolved")) {
            AlertStatus::Resolved
        } else {
            AlertStatus::Active
        };
        Some(Alert {
            id: self.id,
            category,
            description: self.description.unwrap_or_default(),
            point: GeoPoint::new(
                self.latitude.unwrap_or(f64::NAN),
                self.longitude.unwrap_or(f64::NAN),
            ),
            status,
            created_at: self.timestamp.unwrap_or_else(Utc::now),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateAlertRequest<'a> {
    alert_type: &'a str,
    description: &'a str,
    coords: Coords,
}

#[derive(Debug, Serialize)]
struct Coords {
    lat: f64,
    lng: f64,
}

/// Latest sensor row. Field names follow the station schema.
#[derive(Debug, Deserialize)]
struct SensorRecord {
    #[serde(default)]
    estacion: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    temperatura: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    humedad: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    presion: Option<f64>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    time: Option<DateTime<Utc>>,
}

impl From<SensorRecord> for SensorReading {
    fn from(record: SensorRecord) -> Self {
        Self {
            station: record.estacion,
            temperature_c: record.temperatura,
            humidity_pct: record.humedad,
            pressure_hpa: record.presion,
            recorded_at: record.time,
        }
    }
}

/// Fetch the active alert set in server order.
pub async fn fetch_alerts(base: &str) -> Result<Vec<Alert>, String> {
    let response = Request::get(&format!("{base}/api/alerts"))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !response.ok() {
        return Err(format!("alert listing returned {}", response.status()));
    }
    let records: Vec<AlertRecord> = response.json().await.map_err(|e| e.to_string())?;
    Ok(records
        .into_iter()
        .filter_map(AlertRecord::into_domain)
        .filter(|alert| alert.status == AlertStatus::Active)
        .collect())
}

/// Create an alert on the backend and return the stored record.
pub async fn create_alert(
    base: &str,
    category: AlertCategory,
    point: GeoPoint,
    description: &str,
) -> Result<Alert, String> {
    let payload = CreateAlertRequest {
        alert_type: category.as_str(),
        description,
        coords: Coords {
            lat: point.lat,
            lng: point.lng,
        },
    };
    let response = Request::post(&format!("{base}/api/create-alert"))
        .header("Content-Type", "application/json")
        .json(&payload)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !response.ok() {
        return Err(format!("alert creation returned {}", response.status()));
    }
    let record: AlertRecord = response.json().await.map_err(|e| e.to_string())?;
    record
        .into_domain()
        .ok_or_else(|| "created alert could not be decoded".to_string())
}

/// Mark an alert resolved on the backend.
pub async fn resolve_alert(base: &str, id: i64) -> Result<(), String> {
    let response = Request::post(&format!("{base}/api/resolve-alert/{id}"))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !response.ok() {
        return Err(format!("alert resolution returned {}", response.status()));
    }
    Ok(())
}

/// Fetch the latest sensor reading. The backend serves `null` when the
/// station has not reported yet.
pub async fn fetch_latest_reading(base: &str) -> Result<Option<SensorReading>, String> {
    let response = Request::get(&format!("{base}/api/latest-data"))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !response.ok() {
        return Err(format!("sensor endpoint returned {}", response.status()));
    }
    let record: Option<SensorRecord> = response.json().await.map_err(|e| e.to_string())?;
    Ok(record.map(SensorReading::from))
}

/// Accepts a JSON number or a numeric string; anything else is `None`.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .filter(|n| n.is_finite()))
}

/// Accepts RFC 3339, RFC 2822 (what Flask's jsonify emits for datetimes),
/// the bare `YYYY-MM-DD HH:MM:SS` form, or an epoch-seconds number.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => parse_timestamp(&s),
        Value::Number(n) => n.as_i64().and_then(|secs| DateTime::from_timestamp(secs, 0)),
        _ => None,
    }))
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_rfc2822(s) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_alert_record_accepts_string_coordinates() {
        let record: AlertRecord = serde_json::from_value(json!({
            "id": 7,
            "alert_type": "flood",
            "description": "river rising",
            "latitude": "4.7110",
            "longitude": "-74.0721",
            "status": "active",
            "timestamp": "2024-05-01 13:45:09"
        }))
        .unwrap();

        let alert = record.into_domain().unwrap();
        assert_eq!(alert.id, 7);
        assert_eq!(alert.category, AlertCategory::Flood);
        assert!(alert.point.is_finite());
        assert_eq!(alert.status, AlertStatus::Active);
    }

    #[test]
    fn test_alert_record_with_garbage_coordinates_keeps_the_row() {
        let record: AlertRecord = serde_json::from_value(json!({
            "id": 8,
            "alert_type": "storm",
            "latitude": "not-a-number",
            "longitude": null
        }))
        .unwrap();

        let alert = record.into_domain().unwrap();
        assert!(!alert.point.is_finite());
        assert!(alert.description.is_empty());
    }

    #[test]
    fn test_alert_record_with_unknown_category_is_skipped() {
        let record: AlertRecord = serde_json::from_value(json!({
            "id": 9,
            "alert_type": "volcano",
            "latitude": 4.7,
            "longitude": -74.0
        }))
        .unwrap();

        assert!(record.into_domain().is_none());
    }

    #[test]
    fn test_create_request_wire_shape() {
        let payload = CreateAlertRequest {
            alert_type: AlertCategory::Flood.as_str(),
            description: "river rising",
            coords: Coords {
                lat: 4.711,
                lng: -74.072,
            },
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["alertType"], "flood");
        assert_eq!(value["description"], "river rising");
        assert_eq!(value["coords"]["lat"], 4.711);
        assert_eq!(value["coords"]["lng"], -74.072);
    }

    #[test]
    fn test_sensor_record_is_lenient_about_types() {
        let record: SensorRecord = serde_json::from_value(json!({
            "estacion": "CENTRO",
            "temperatura": "19.5",
            "humedad": 64,
            "presion": null,
            "time": "Wed, 01 May 2024 12:00:00 GMT"
        }))
        .unwrap();

        let reading = SensorReading::from(record);
        assert_eq!(reading.station.as_deref(), Some("CENTRO"));
        assert_eq!(reading.temperature_c, Some(19.5));
        assert_eq!(reading.humidity_pct, Some(64.0));
        assert_eq!(reading.pressure_hpa, None);
        assert!(reading.recorded_at.is_some());
    }

    #[test]
    fn test_sensor_record_with_missing_fields() {
        let record: SensorRecord = serde_json::from_value(json!({})).unwrap();
        let reading = SensorReading::from(record);
        assert_eq!(reading, SensorReading::default());
    }

    #[test]
    fn test_timestamp_parsing_forms() {
        assert!(parse_timestamp("2024-05-01T13:45:09Z").is_some());
        assert!(parse_timestamp("2024-05-01 13:45:09").is_some());
        assert!(parse_timestamp("Wed, 01 May 2024 12:00:00 GMT").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
