//! Wire types shared with the backend.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Account info returned by login/register and cached in the session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<u64>,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Equipment-type distribution: `labels[i]` has count `values[i]`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ChartData {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub values: Vec<f64>,
}

impl ChartData {
    /// Build from the backend's `equipment_types` JSON object string
    /// (`{"Pump": 3, "Valve": 2}`), keeping key order.
    ///
    /// Anything that is not a JSON object yields empty chart data. Entries
    /// with non-numeric counts are skipped so labels and values stay aligned.
    pub fn from_equipment_types(raw: &str) -> Self {
        let parsed: serde_json::Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(_) => return Self::default(),
        };

        let Some(map) = parsed.as_object() else {
            return Self::default();
        };

        let mut chart = Self::default();
        for (label, count) in map {
            if let Some(n) = count.as_f64() {
                chart.labels.push(label.clone());
                chart.values.push(n);
            }
        }
        chart
    }

    /// Co-indexed `(label, value)` pairs, truncated to the shorter side if
    /// the payload was inconsistent.
    pub fn pairs(&self) -> Vec<(String, f64)> {
        self.labels
            .iter()
            .cloned()
            .zip(self.values.iter().copied())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.labels.len().min(self.values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn total(&self) -> f64 {
        self.pairs().iter().map(|(_, v)| v).sum()
    }

    pub fn max_value(&self) -> f64 {
        self.pairs().iter().map(|(_, v)| *v).fold(0.0, f64::max)
    }
}

/// One normalized CSV row.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EquipmentRecord {
    #[serde(default)]
    pub id: Option<u64>,
    pub equipment_name: String,
    pub equipment_type: String,
    pub flowrate: f64,
    pub pressure: f64,
    pub temperature: f64,
}

/// A processed upload. History entries omit `equipment_records` and
/// `chart_data`; the summary endpoint includes both.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DatasetSummary {
    pub id: u64,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub uploaded_at: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub total_equipment: u64,
    #[serde(default)]
    pub avg_flowrate: f64,
    #[serde(default)]
    pub avg_pressure: f64,
    #[serde(default)]
    pub avg_temperature: f64,
    #[serde(default)]
    pub equipment_types: Option<String>,
    #[serde(default)]
    pub chart_data: Option<ChartData>,
    #[serde(default)]
    pub equipment_records: Vec<EquipmentRecord>,
}

impl DatasetSummary {
    /// Chart data as sent, or derived from `equipment_types` when the
    /// endpoint does not include it.
    pub fn chart(&self) -> ChartData {
        match (&self.chart_data, &self.equipment_types) {
            (Some(chart), _) => chart.clone(),
            (None, Some(raw)) => ChartData::from_equipment_types(raw),
            (None, None) => ChartData::default(),
        }
    }

    pub fn distinct_types(&self) -> usize {
        self.chart().len()
    }

    /// `uploaded_at` rendered like `Jan 27, 2026, 10:30 AM`. Unparseable
    /// timestamps are shown as sent.
    pub fn uploaded_at_display(&self) -> String {
        format_timestamp(&self.uploaded_at)
    }
}

/// Response body of a successful delete.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteAck {
    #[serde(default)]
    pub message: Option<String>,
}

/// `{"error": "..."}` body the backend sends with 4xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

const DISPLAY_FORMAT: &str = "%b %-d, %Y, %I:%M %p";

pub fn format_timestamp(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(DISPLAY_FORMAT).to_string();
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.format(DISPLAY_FORMAT).to_string();
    }
    raw.to_string()
}
