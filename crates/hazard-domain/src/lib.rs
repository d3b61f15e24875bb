//! # Hazard Watch - Domain Model
//!
//! Core entities and pure logic for the hazard map dashboard: the alert
//! entity and its category set, the in-memory active alert store, the
//! marker reconciliation planner, and sensor reading display rules. These
//! types are the single source of truth across the store, map, and view
//! layers.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Popup text shown when an alert carries no description.
pub const NO_DESCRIPTION: &str = "No description available.";

/// Placeholder for sensor fields that are missing or unparseable.
pub const MISSING_FIELD: &str = "--";

// =============================================================================
// VALUE OBJECTS
// =============================================================================

/// Geographic position in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both components parse to finite numbers. Markers are only placed for
    /// finite positions; everything else is skipped and logged upstream.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Coordinate pair formatted to 4 decimal places for popups.
    #[must_use]
    pub fn display(&self) -> String {
        format!("Lat: {:.4}, Lng: {:.4}", self.lat, self.lng)
    }
}

// =============================================================================
// ENUMS
// =============================================================================

/// Fixed set of hazard categories an alert can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertCategory {
    Flood,
    Landslide,
    Wildfire,
    Storm,
    Accident,
}

impl AlertCategory {
    pub const ALL: [Self; 5] = [
        Self::Flood,
        Self::Landslide,
        Self::Wildfire,
        Self::Storm,
        Self::Accident,
    ];

    /// Lowercase wire form used by the backend API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Flood => "flood",
            Self::Landslide => "landslide",
            Self::Wildfire => "wildfire",
            Self::Storm => "storm",
            Self::Accident => "accident",
        }
    }

    /// Human-facing label for lists and popups.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Flood => "Flood",
            Self::Landslide => "Landslide",
            Self::Wildfire => "Wildfire",
            Self::Storm => "Storm",
            Self::Accident => "Accident",
        }
    }
}

impl fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flood" => Ok(Self::Flood),
            "landslide" => Ok(Self::Landslide),
            "wildfire" => Ok(Self::Wildfire),
            "storm" => Ok(Self::Storm),
            "accident" => Ok(Self::Accident),
            other => Err(DomainError::UnknownCategory(other.to_string())),
        }
    }
}

/// Alert lifecycle status. Resolved alerts are deleted, never retained; the
/// variant exists for the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Active,
    Resolved,
}

// =============================================================================
// ENTITY TYPES
// =============================================================================

/// A user-placed hazard record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Unique for the lifetime of the session; never reused after resolution.
    pub id: i64,
    pub category: AlertCategory,
    /// Free text, may be empty.
    pub description: String,
    pub point: GeoPoint,
    pub status: AlertStatus,
    pub created_at: DateTime<Utc>,
}

impl Alert {
    /// Description text for popups, substituting a placeholder when empty.
    #[must_use]
    pub fn description_or_placeholder(&self) -> &str {
        if self.description.trim().is_empty() {
            NO_DESCRIPTION
        } else {
            &self.description
        }
    }
}

// =============================================================================
// ACTIVE ALERT SET
// =============================================================================

/// In-memory active alert set for backend-less operation. Sole writer of its
/// contents; views rebuild from `snapshot()` after every mutation.
#[derive(Debug, Clone)]
pub struct ActiveAlerts {
    next_id: i64,
    alerts: Vec<Alert>,
}

impl ActiveAlerts {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next_id: 1,
            alerts: Vec::new(),
        }
    }

    /// Appends a new alert with a fresh monotonic id and returns it.
    pub fn create(
        &mut self,
        category: AlertCategory,
        point: GeoPoint,
        description: String,
    ) -> Alert {
        let alert = Alert {
            id: self.next_id,
            category,
            description,
            point,
            status: AlertStatus::Active,
            created_at: Utc::now(),
        };
        self.next_id += 1;
        self.alerts.push(alert.clone());
        alert
    }

    /// Removes the alert with the given id. Returns `false` when absent; the
    /// id is retired either way.
    pub fn resolve(&mut self, id: i64) -> bool {
        let before = self.alerts.len();
        self.alerts.retain(|alert| alert.id != id);
        self.alerts.len() != before
    }

    /// Fresh copy of the active set, in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Alert> {
        self.alerts.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}

impl Default for ActiveAlerts {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// MARKER RECONCILIATION
// =============================================================================

/// Minimal patch that brings the marker layer in line with the active set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerPlan {
    /// Alerts that need a marker mounted.
    pub add: Vec<Alert>,
    /// Marker ids to tear down.
    pub remove: Vec<i64>,
    /// Alert ids left without a marker because their coordinates are not
    /// finite. The list row is still rendered for these.
    pub skipped: Vec<i64>,
}

impl MarkerPlan {
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty() && self.skipped.is_empty()
    }
}

/// Diffs the mounted marker ids against the current snapshot. Markers that
/// survive keep their identity, so open popups are not disturbed by a
/// refresh.
#[must_use]
pub fn plan_markers(mounted: &BTreeSet<i64>, current: &[Alert]) -> MarkerPlan {
    let mut plan = MarkerPlan::default();
    let mut keep = BTreeSet::new();
    for alert in current {
        if !alert.point.is_finite() {
            plan.skipped.push(alert.id);
            continue;
        }
        keep.insert(alert.id);
        if !mounted.contains(&alert.id) {
            plan.add.push(alert.clone());
        }
    }
    for id in mounted {
        if !keep.contains(id) {
            plan.remove.push(*id);
        }
    }
    plan
}

// =============================================================================
// SENSOR READINGS
// =============================================================================

/// Latest station reading. Every field is optional: a malformed response
/// degrades field by field instead of dropping the whole reading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub station: Option<String>,
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub pressure_hpa: Option<f64>,
    pub recorded_at: Option<DateTime<Utc>>,
}

impl SensorReading {
    #[must_use]
    pub fn station_display(&self) -> String {
        self.station
            .clone()
            .unwrap_or_else(|| MISSING_FIELD.to_string())
    }

    #[must_use]
    pub fn temperature_display(&self) -> String {
        format_metric(self.temperature_c, "°C")
    }

    #[must_use]
    pub fn humidity_display(&self) -> String {
        format_metric(self.humidity_pct, "%")
    }

    #[must_use]
    pub fn pressure_display(&self) -> String {
        format_metric(self.pressure_hpa, "hPa")
    }

    #[must_use]
    pub fn time_display(&self) -> String {
        format_timestamp(self.recorded_at)
    }
}

/// Two-decimal value with unit suffix, or the missing-field placeholder.
#[must_use]
pub fn format_metric(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.2} {unit}"),
        _ => MISSING_FIELD.to_string(),
    }
}

/// Day-first local timestamp, or the missing-field placeholder.
#[must_use]
pub fn format_timestamp(ts: Option<DateTime<Utc>>) -> String {
    ts.map_or_else(
        || MISSING_FIELD.to_string(),
        |t| t.format("%d/%m/%Y %H:%M:%S").to_string(),
    )
}

// =============================================================================
// ERRORS
// =============================================================================

/// Domain-level errors.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("unknown alert category: '{0}'")]
    UnknownCategory(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bogota() -> GeoPoint {
        GeoPoint::new(4.711, -74.072)
    }

    #[test]
    fn test_create_assigns_fresh_monotonic_ids() {
        let mut set = ActiveAlerts::new();
        let a = set.create(AlertCategory::Flood, bogota(), "river rising".into());
        let b = set.create(AlertCategory::Storm, bogota(), String::new());

        assert_eq!(set.len(), 2);
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(a.category, AlertCategory::Flood);
        assert_eq!(a.status, AlertStatus::Active);
    }

    #[test]
    fn test_snapshot_preserves_insertion_order() {
        let mut set = ActiveAlerts::new();
        for category in AlertCategory::ALL {
            set.create(category, bogota(), String::new());
        }

        let ids: Vec<i64> = set.snapshot().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_resolve_removes_exactly_one_entry() {
        let mut set = ActiveAlerts::new();
        let first = set.create(AlertCategory::Flood, bogota(), String::new());
        let second = set.create(AlertCategory::Accident, bogota(), String::new());

        assert!(set.resolve(first.id));
        let remaining = set.snapshot();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, second.id);
    }

    #[test]
    fn test_resolve_missing_id_is_noop() {
        let mut set = ActiveAlerts::new();
        set.create(AlertCategory::Storm, bogota(), String::new());

        assert!(!set.resolve(99));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_ids_are_never_reused_after_resolution() {
        let mut set = ActiveAlerts::new();
        let first = set.create(AlertCategory::Flood, bogota(), String::new());
        set.resolve(first.id);
        let next = set.create(AlertCategory::Flood, bogota(), String::new());

        assert!(next.id > first.id);
    }

    #[test]
    fn test_plan_adds_one_marker_per_new_alert() {
        let mut set = ActiveAlerts::new();
        set.create(AlertCategory::Flood, bogota(), String::new());
        set.create(AlertCategory::Storm, bogota(), String::new());

        let plan = plan_markers(&BTreeSet::new(), &set.snapshot());
        assert_eq!(plan.add.len(), 2);
        assert!(plan.remove.is_empty());
        assert!(plan.skipped.is_empty());
    }

    #[test]
    fn test_plan_removes_vanished_ids_only() {
        let mut set = ActiveAlerts::new();
        let first = set.create(AlertCategory::Flood, bogota(), String::new());
        let second = set.create(AlertCategory::Storm, bogota(), String::new());

        let mounted: BTreeSet<i64> = [first.id, second.id].into_iter().collect();
        set.resolve(first.id);

        let plan = plan_markers(&mounted, &set.snapshot());
        assert_eq!(plan.remove, vec![first.id]);
        assert!(plan.add.is_empty());
    }

    #[test]
    fn test_plan_keeps_existing_markers_untouched() {
        let mut set = ActiveAlerts::new();
        let alert = set.create(AlertCategory::Wildfire, bogota(), String::new());

        let mounted: BTreeSet<i64> = [alert.id].into_iter().collect();
        let plan = plan_markers(&mounted, &set.snapshot());
        assert!(plan.is_noop());
    }

    #[test]
    fn test_plan_skips_non_finite_coordinates() {
        let mut set = ActiveAlerts::new();
        let bad = set.create(AlertCategory::Accident, GeoPoint::new(f64::NAN, -74.0), String::new());
        let good = set.create(AlertCategory::Flood, bogota(), String::new());

        let plan = plan_markers(&BTreeSet::new(), &set.snapshot());
        assert_eq!(plan.skipped, vec![bad.id]);
        assert_eq!(plan.add.len(), 1);
        assert_eq!(plan.add[0].id, good.id);
    }

    #[test]
    fn test_geo_point_display_uses_four_decimals() {
        let point = GeoPoint::new(4.711, -74.072);
        assert_eq!(point.display(), "Lat: 4.7110, Lng: -74.0720");
    }

    #[test]
    fn test_category_round_trips_through_wire_form() {
        for category in AlertCategory::ALL {
            assert_eq!(category.as_str().parse::<AlertCategory>().unwrap(), category);
        }
        assert!("earthquake".parse::<AlertCategory>().is_err());
    }

    #[test]
    fn test_description_placeholder_for_empty_text() {
        let mut set = ActiveAlerts::new();
        let blank = set.create(AlertCategory::Storm, bogota(), "   ".into());
        let filled = set.create(AlertCategory::Storm, bogota(), "hail expected".into());

        assert_eq!(blank.description_or_placeholder(), NO_DESCRIPTION);
        assert_eq!(filled.description_or_placeholder(), "hail expected");
    }

    #[test]
    fn test_metric_formatting_is_two_decimals_with_unit() {
        assert_eq!(format_metric(Some(23.456), "°C"), "23.46 °C");
        assert_eq!(format_metric(Some(1013.0), "hPa"), "1013.00 hPa");
        assert_eq!(format_metric(None, "%"), MISSING_FIELD);
        assert_eq!(format_metric(Some(f64::NAN), "%"), MISSING_FIELD);
    }

    #[test]
    fn test_timestamp_formatting() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 13, 45, 9).unwrap();
        assert_eq!(format_timestamp(Some(ts)), "01/05/2024 13:45:09");
        assert_eq!(format_timestamp(None), MISSING_FIELD);
    }

    #[test]
    fn test_sensor_display_degrades_per_field() {
        let reading = SensorReading {
            station: Some("CENTRO".into()),
            temperature_c: Some(19.5),
            humidity_pct: None,
            pressure_hpa: Some(752.301),
            recorded_at: None,
        };

        assert_eq!(reading.station_display(), "CENTRO");
        assert_eq!(reading.temperature_display(), "19.50 °C");
        assert_eq!(reading.humidity_display(), MISSING_FIELD);
        assert_eq!(reading.pressure_display(), "752.30 hPa");
        assert_eq!(reading.time_display(), MISSING_FIELD);
    }
}
