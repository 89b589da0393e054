/// Trailing-window selection and per-kind averaging of raw feed entries
use time::OffsetDateTime;

use crate::models::{FeedEntry, HourlyAverage, ReadingSet, SensorKind};
use crate::utils::round2;

/// Number of trailing entries that make up the "recent" window.
const WINDOW_SIZE: i64 = 6;

/// Select the entries with the six highest ids: `entry_id > max - 6`,
/// inclusive of the maximum. The window is keyed by id, not by time.
pub fn recent_window(feeds: &[FeedEntry]) -> Vec<&FeedEntry> {
    let max_id = match feeds.iter().map(|entry| entry.entry_id).max() {
        Some(id) => id,
        None => return Vec::new(),
    };
    feeds
        .iter()
        .filter(|entry| entry.entry_id > max_id - WINDOW_SIZE)
        .collect()
}

/// The single most recent entry, unaggregated.
pub fn last_entry(feeds: &[FeedEntry]) -> Option<&FeedEntry> {
    feeds.iter().max_by_key(|entry| entry.entry_id)
}

/// Arithmetic mean per kind over the recent window, rounded to two decimals.
///
/// A value that fails numeric coercion contributes NaN, which poisons that
/// field's mean for the whole window. The other fields are unaffected.
pub fn hourly_average(feeds: &[FeedEntry]) -> Option<HourlyAverage> {
    let window = recent_window(feeds);
    if window.is_empty() {
        return None;
    }

    let count = window.len() as f64;
    let mean = |kind: SensorKind| {
        round2(
            window
                .iter()
                .map(|entry| entry.coerced_value(kind))
                .sum::<f64>()
                / count,
        )
    };

    Some(HourlyAverage {
        readings: ReadingSet {
            temperature: mean(SensorKind::Temperature),
            humidity: mean(SensorKind::Humidity),
            voc: mean(SensorKind::Voc),
            eco2: mean(SensorKind::Eco2),
            pm25: mean(SensorKind::Pm25),
            aqi: mean(SensorKind::Aqi),
        },
        samples: window.len(),
        time: OffsetDateTime::now_utc(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(entry_id: i64, temperature: &str) -> FeedEntry {
        FeedEntry {
            entry_id,
            created_at: "2025-06-01T12:00:00Z".to_string(),
            field1: Some(temperature.to_string()),
            field2: Some("45".to_string()),
            field3: Some("100".to_string()),
            field4: Some("600".to_string()),
            field5: Some("10".to_string()),
            field6: Some("2".to_string()),
        }
    }

    #[test]
    fn test_window_keeps_six_highest_ids() {
        let feeds: Vec<FeedEntry> = (8..=15).map(|id| entry(id, "20")).collect();
        let window = recent_window(&feeds);
        let ids: Vec<i64> = window.iter().map(|e| e.entry_id).collect();
        assert_eq!(ids, vec![10, 11, 12, 13, 14, 15]);
    }

    #[test]
    fn test_window_of_empty_feed_is_empty() {
        assert!(recent_window(&[]).is_empty());
        assert!(hourly_average(&[]).is_none());
    }

    #[test]
    fn test_mean_over_window_excludes_older_entries() {
        // ids 10..=15 carry 20..=25; id 9 carries an outlier that must not count
        let mut feeds = vec![entry(9, "100")];
        for (i, temp) in (20..=25).enumerate() {
            feeds.push(entry(10 + i as i64, &temp.to_string()));
        }
        let avg = hourly_average(&feeds).unwrap();
        assert_eq!(avg.readings.temperature, 22.5);
        assert_eq!(avg.samples, 6);
    }

    #[test]
    fn test_mean_is_rounded_to_two_decimals() {
        let feeds = vec![entry(1, "20"), entry(2, "20"), entry(3, "21")];
        let avg = hourly_average(&feeds).unwrap();
        assert_eq!(avg.readings.temperature, 20.33);
    }

    #[test]
    fn test_bad_sample_poisons_only_its_own_field() {
        let mut feeds = vec![entry(1, "20"), entry(2, "21")];
        feeds[1].field1 = Some("error".to_string());
        let avg = hourly_average(&feeds).unwrap();
        assert!(avg.readings.temperature.is_nan());
        assert_eq!(avg.readings.humidity, 45.0);
    }

    #[test]
    fn test_last_entry_is_max_id() {
        let feeds = vec![entry(3, "20"), entry(7, "25"), entry(5, "22")];
        assert_eq!(last_entry(&feeds).unwrap().entry_id, 7);
    }
}
