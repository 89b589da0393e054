/// Builds the structured alert batch and its HTML rendering
use crate::alert::classify::{in_alert_range, EvalMode};
use crate::models::{ReadingSet, SensorKind};

/// One out-of-range line item: kind, formatted value, unit and the ideal
/// range as display text.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertRecord {
    pub kind: SensorKind,
    pub value: String,
    pub unit: &'static str,
    pub ideal: &'static str,
}

impl AlertRecord {
    fn new(kind: SensorKind, value: f64) -> Self {
        Self {
            kind,
            value: value.to_string(),
            unit: kind.unit(),
            ideal: kind.ideal_text(),
        }
    }

    pub fn to_list_item(&self) -> String {
        format!(
            "<li>{}: <b>{}{}</b> (Ideal: {})</li>",
            self.kind.label(),
            self.value,
            self.unit,
            self.ideal
        )
    }
}

/// The out-of-range records of one evaluation pass, in canonical kind order.
#[derive(Debug, Clone, Default)]
pub struct AlertBatch {
    pub records: Vec<AlertRecord>,
}

impl AlertBatch {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// The email payload: header, introductory sentence and one list item
    /// per record.
    pub fn to_html(&self) -> String {
        let items: String = self
            .records
            .iter()
            .map(AlertRecord::to_list_item)
            .collect();
        format!(
            "<h3>⚠️ Air Quality Alert</h3>\
             <p>The following sensors reported readings outside the ideal range over the last hour:</p>\
             <ul>{}</ul>",
            items
        )
    }
}

/// Evaluate all six kinds in canonical order against the alert ranges for
/// the given mode. An empty batch is the steady-state all-clear outcome and
/// must produce no side effect downstream.
pub fn compose(readings: &ReadingSet, mode: EvalMode) -> AlertBatch {
    let mut batch = AlertBatch::default();
    for kind in SensorKind::ALL {
        let value = readings.get(kind);
        if !in_alert_range(kind, value, mode) {
            batch.records.push(AlertRecord::new(kind, value));
        }
    }
    batch
}

#[cfg(test)]
mod tests {
    use super::*;

    fn readings() -> ReadingSet {
        ReadingSet {
            temperature: 24.0,
            humidity: 45.0,
            voc: 100.0,
            eco2: 600.0,
            pm25: 10.0,
            aqi: 2.0,
        }
    }

    #[test]
    fn test_all_in_range_yields_empty_batch() {
        let batch = compose(&readings(), EvalMode::Hourly);
        assert!(batch.is_empty());
    }

    #[test]
    fn test_out_of_range_kinds_in_canonical_order() {
        let mut r = readings();
        r.humidity = 25.0;
        r.aqi = 4.0;
        let batch = compose(&r, EvalMode::Hourly);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.records[0].kind, SensorKind::Humidity);
        assert_eq!(batch.records[1].kind, SensorKind::Aqi);
    }

    #[test]
    fn test_instantaneous_mode_tolerates_aqi_four() {
        let mut r = readings();
        r.aqi = 4.0;
        assert!(compose(&r, EvalMode::Instantaneous).is_empty());
        assert_eq!(compose(&r, EvalMode::Hourly).len(), 1);
    }

    #[test]
    fn test_html_document_shape() {
        let mut r = readings();
        r.humidity = 25.0;
        r.temperature = 32.5;
        let html = compose(&r, EvalMode::Hourly).to_html();
        assert!(html.starts_with("<h3>"));
        assert!(html.contains("<li>Temperature: <b>32.5°C</b> (Ideal: 18-30°C)</li>"));
        assert!(html.contains("<li>Humidity: <b>25%</b> (Ideal: 30-60%)</li>"));
        // Temperature precedes humidity per the canonical order
        assert!(html.find("Temperature").unwrap() < html.find("Humidity").unwrap());
        assert!(html.ends_with("</ul>"));
    }

    #[test]
    fn test_nan_average_is_reported() {
        let mut r = readings();
        r.voc = f64::NAN;
        let batch = compose(&r, EvalMode::Hourly);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.records[0].kind, SensorKind::Voc);
        assert_eq!(batch.records[0].value, "NaN");
    }
}
