use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::InvalidReading;
use crate::utils::display_offset;

/// The six quantities reported by the monitor, in canonical display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    Temperature,
    Humidity,
    Voc,
    Eco2,
    Pm25,
    Aqi,
}

impl SensorKind {
    pub const ALL: [SensorKind; 6] = [
        SensorKind::Temperature,
        SensorKind::Humidity,
        SensorKind::Voc,
        SensorKind::Eco2,
        SensorKind::Pm25,
        SensorKind::Aqi,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "Temperature",
            SensorKind::Humidity => "Humidity",
            SensorKind::Voc => "VOC",
            SensorKind::Eco2 => "eCO2",
            SensorKind::Pm25 => "PM2.5",
            SensorKind::Aqi => "AQI",
        }
    }

    /// Unit suffix as it appears next to a value, including any separating space.
    pub fn unit(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "°C",
            SensorKind::Humidity => "%",
            SensorKind::Voc => " ppm",
            SensorKind::Eco2 => " ppm",
            SensorKind::Pm25 => " µg/m³",
            SensorKind::Aqi => "",
        }
    }

    /// The comfort range as display text, as used in alert emails.
    pub fn ideal_text(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "18-30°C",
            SensorKind::Humidity => "30-60%",
            SensorKind::Voc => "< 500 ppm",
            SensorKind::Eco2 => "400-1000 ppm",
            SensorKind::Pm25 => "< 35 µg/m³",
            SensorKind::Aqi => "1-3",
        }
    }

    /// Advice shown alongside an out-of-range reading.
    pub fn recommendation(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "Temperature outside the ideal range.",
            SensorKind::Humidity => "Humidity level inadequate.",
            SensorKind::Voc => "High VOC concentration.",
            SensorKind::Eco2 => "Elevated CO2 level.",
            SensorKind::Pm25 => "Elevated fine particulate matter.",
            SensorKind::Aqi => "Poor air quality.",
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One raw feed entry. Field values arrive string-encoded from the device.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedEntry {
    pub entry_id: i64,
    pub created_at: String,
    pub field1: Option<String>,
    pub field2: Option<String>,
    pub field3: Option<String>,
    pub field4: Option<String>,
    pub field5: Option<String>,
    pub field6: Option<String>,
}

impl FeedEntry {
    pub fn raw_value(&self, kind: SensorKind) -> Option<&str> {
        match kind {
            SensorKind::Temperature => self.field1.as_deref(),
            SensorKind::Humidity => self.field2.as_deref(),
            SensorKind::Voc => self.field3.as_deref(),
            SensorKind::Eco2 => self.field4.as_deref(),
            SensorKind::Pm25 => self.field5.as_deref(),
            SensorKind::Aqi => self.field6.as_deref(),
        }
    }

    /// Strict numeric conversion. A missing or non-numeric value fails the
    /// read; it never silently becomes zero.
    pub fn value(&self, kind: SensorKind) -> Result<f64, InvalidReading> {
        let raw = self.raw_value(kind).ok_or(InvalidReading::Missing {
            kind,
            entry_id: self.entry_id,
        })?;
        raw.trim()
            .parse::<f64>()
            .map_err(|_| InvalidReading::NonNumeric {
                kind,
                raw: raw.to_string(),
            })
    }

    /// Failure-tolerant coercion used by the aggregator: a value that cannot
    /// be parsed contributes NaN and poisons that field's mean.
    pub fn coerced_value(&self, kind: SensorKind) -> f64 {
        self.value(kind).unwrap_or(f64::NAN)
    }

    /// Entry timestamp shifted to the fixed display offset.
    pub fn timestamp(&self) -> Result<OffsetDateTime, time::error::Parse> {
        OffsetDateTime::parse(&self.created_at, &Rfc3339).map(|t| t.to_offset(display_offset()))
    }
}

/// Response shape of the device-data API.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedResponse {
    pub channel: HashMap<String, serde_json::Value>,
    pub feeds: Vec<FeedEntry>,
}

impl FeedResponse {
    /// Display names for the monitored quantities, taken from every channel
    /// metadata key containing "field".
    pub fn field_labels(&self) -> Vec<(String, String)> {
        let mut labels: Vec<(String, String)> = self
            .channel
            .iter()
            .filter(|(key, _)| key.contains("field"))
            .filter_map(|(key, value)| value.as_str().map(|s| (key.clone(), s.to_string())))
            .collect();
        labels.sort();
        labels
    }
}

/// One value per monitored quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingSet {
    pub temperature: f64,
    pub humidity: f64,
    pub voc: f64,
    pub eco2: f64,
    pub pm25: f64,
    pub aqi: f64,
}

impl ReadingSet {
    pub fn get(&self, kind: SensorKind) -> f64 {
        match kind {
            SensorKind::Temperature => self.temperature,
            SensorKind::Humidity => self.humidity,
            SensorKind::Voc => self.voc,
            SensorKind::Eco2 => self.eco2,
            SensorKind::Pm25 => self.pm25,
            SensorKind::Aqi => self.aqi,
        }
    }
}

/// Averages over the trailing feed window.
#[derive(Debug, Clone)]
pub struct HourlyAverage {
    pub readings: ReadingSet,
    pub samples: usize,
    pub time: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(entry_id: i64, temperature: &str) -> FeedEntry {
        FeedEntry {
            entry_id,
            created_at: "2025-06-01T12:00:00Z".to_string(),
            field1: Some(temperature.to_string()),
            field2: Some("45.0".to_string()),
            field3: Some("120".to_string()),
            field4: Some("650".to_string()),
            field5: Some("10".to_string()),
            field6: Some("2".to_string()),
        }
    }

    #[test]
    fn test_feed_response_deserializes() {
        let body = r#"{
            "channel": {"id": 12345, "field1": "Temperature", "field2": "Humidity"},
            "feeds": [
                {"entry_id": 1, "created_at": "2025-06-01T12:00:00Z",
                 "field1": "24.5", "field2": "41.2", "field3": "80",
                 "field4": "520", "field5": "8", "field6": "1"}
            ]
        }"#;
        let response: FeedResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.feeds.len(), 1);
        assert_eq!(response.feeds[0].entry_id, 1);
        assert_eq!(
            response.feeds[0].value(SensorKind::Temperature).unwrap(),
            24.5
        );
    }

    #[test]
    fn test_field_labels_filters_on_substring() {
        let body = r#"{
            "channel": {"id": 7, "name": "air", "field1": "Temperature", "field6": "AQI"},
            "feeds": []
        }"#;
        let response: FeedResponse = serde_json::from_str(body).unwrap();
        let labels = response.field_labels();
        assert_eq!(
            labels,
            vec![
                ("field1".to_string(), "Temperature".to_string()),
                ("field6".to_string(), "AQI".to_string()),
            ]
        );
    }

    #[test]
    fn test_non_numeric_value_fails_the_read() {
        let e = entry(1, "n/a");
        assert!(e.value(SensorKind::Temperature).is_err());
        assert!(e.coerced_value(SensorKind::Temperature).is_nan());
    }

    #[test]
    fn test_missing_value_fails_the_read() {
        let mut e = entry(1, "20.0");
        e.field4 = None;
        assert!(matches!(
            e.value(SensorKind::Eco2),
            Err(InvalidReading::Missing { .. })
        ));
    }

    #[test]
    fn test_timestamp_shifts_to_display_offset() {
        let e = entry(1, "20.0");
        let ts = e.timestamp().unwrap();
        assert_eq!(ts.offset(), display_offset());
        assert_eq!(ts.hour(), 9); // 12:00 UTC at UTC-3
    }
}
