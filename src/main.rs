mod aggregate;
mod alert;
mod config;
mod error;
mod feed;
mod models;
mod notify;
mod utils;

use log::{debug, error, info, warn};
use time::OffsetDateTime;
use tokio::time::{sleep, Duration};

use aggregate::{hourly_average, last_entry};
use alert::{classify, compose, dispatch, AlertBatch, EvalMode};
use config::MonitorConfig;
use feed::FeedClient;
use models::{FeedResponse, HourlyAverage, SensorKind};
use notify::{build_transport, NotificationTransport};
use utils::{display_offset, duration_to_seconds, format_datetime};

/// One full fetch-classify-render(-alert) pass. Any fetch or decode failure
/// skips the rest of the tick; nothing is rendered from a partial payload.
async fn run_tick(
    client: &FeedClient,
    config: &MonitorConfig,
    transport: Option<&dyn NotificationTransport>,
    last_alert_sent: &mut Option<OffsetDateTime>,
) {
    let data = match client.fetch().await {
        Ok(data) => data,
        Err(e) => {
            error!("Failed to fetch sensor feed: {}", e);
            return;
        }
    };

    if data.feeds.is_empty() {
        warn!("No data received from the feed");
        return;
    }

    for (key, label) in data.field_labels() {
        debug!("Channel {} is {}", key, label);
    }

    render_last_reading(&data);

    let average = match hourly_average(&data.feeds) {
        Some(average) => average,
        None => return,
    };
    render_hourly_average(&average);

    let batch = compose(&average.readings, EvalMode::Hourly);
    if batch.is_empty() {
        info!("All readings within the ideal ranges");
        return;
    }

    warn!("{} quantities out of range in the hourly average", batch.len());
    for record in &batch.records {
        // The banner carries the same color the dashboard paints the value with
        let color = classify(record.kind, average.readings.get(record.kind)).color;
        warn!(
            "Alert {} ({}): average {}{} outside the ideal {}. {}",
            record.kind.label(),
            color.hex(),
            record.value,
            record.unit,
            record.ideal,
            record.kind.recommendation()
        );
    }

    maybe_dispatch(&batch, config, transport, last_alert_sent).await;
}

/// The latest entry, one line per quantity with its display color band.
fn render_last_reading(data: &FeedResponse) {
    let last = match last_entry(&data.feeds) {
        Some(last) => last,
        None => return,
    };

    let when = match last.timestamp() {
        Ok(ts) => format_datetime(&ts),
        Err(_) => last.created_at.clone(),
    };
    info!("Last reading at {}:", when);

    for kind in SensorKind::ALL {
        match last.value(kind) {
            Ok(value) => {
                let class = classify(kind, value);
                if class.in_range {
                    info!(
                        "  {}: {}{} [{}]",
                        kind.label(),
                        value,
                        kind.unit(),
                        class.color.label()
                    );
                } else {
                    warn!(
                        "  {}: {}{} [{}] - {}",
                        kind.label(),
                        value,
                        kind.unit(),
                        class.color.label(),
                        kind.recommendation()
                    );
                }
            }
            Err(e) => warn!("  {}: unreadable ({})", kind.label(), e),
        }
    }
}

fn render_hourly_average(average: &HourlyAverage) {
    info!(
        "Hourly average over {} samples at {}:",
        average.samples,
        format_datetime(&average.time.to_offset(display_offset()))
    );
    for kind in SensorKind::ALL {
        let value = average.readings.get(kind);
        let class = classify(kind, value);
        info!(
            "  Average {}: {}{} [{}]",
            kind.label(),
            value,
            kind.unit(),
            class.color.label()
        );
    }
}

/// Hand the batch to the dispatcher unless recipients or transport are
/// missing, or the resend cooldown is still running.
async fn maybe_dispatch(
    batch: &AlertBatch,
    config: &MonitorConfig,
    transport: Option<&dyn NotificationTransport>,
    last_alert_sent: &mut Option<OffsetDateTime>,
) {
    if config.recipients.is_empty() {
        return;
    }

    let transport = match transport {
        Some(transport) => transport,
        None => {
            warn!("Email transport is not configured; skipping alert email");
            return;
        }
    };

    if let Some(sent_at) = *last_alert_sent {
        let since = duration_to_seconds(OffsetDateTime::now_utc() - sent_at);
        if since < config.alert_cooldown_secs {
            info!(
                "Alert email suppressed; {}s of the resend cooldown remain",
                config.alert_cooldown_secs - since
            );
            return;
        }
    }

    let outcomes = dispatch(batch, &config.recipients, transport).await;
    let delivered = outcomes.iter().filter(|o| o.result.is_ok()).count();
    info!(
        "Alert email delivered to {}/{} recipients",
        delivered,
        outcomes.len()
    );

    if delivered > 0 {
        *last_alert_sent = Some(OffsetDateTime::now_utc());
    }
}

async fn main_loop(config: MonitorConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting indoor air quality monitoring service");

    let client = FeedClient::new(config.feed_url.clone())?;
    let transport = build_transport(&config.transport);
    let mut last_alert_sent: Option<OffsetDateTime> = None;

    loop {
        let tick_start = OffsetDateTime::now_utc();
        run_tick(&client, &config, transport.as_deref(), &mut last_alert_sent).await;

        // Wait out the remainder of the refresh interval; ticks never overlap
        let elapsed = duration_to_seconds(OffsetDateTime::now_utc() - tick_start);
        let wait_time = config.poll_interval_secs.saturating_sub(elapsed);
        if wait_time > 0 {
            sleep(Duration::from_secs(wait_time)).await;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_secs()
        .init();

    // Load configuration
    let config = match MonitorConfig::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Handle Ctrl+C gracefully
    let (tx, mut rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for Ctrl+C");
        let _ = tx.send(());
    });

    // Run main loop or wait for shutdown signal
    tokio::select! {
        result = main_loop(config) => {
            match result {
                Ok(_) => info!("Program completed successfully"),
                Err(e) => error!("Fatal error: {}", e),
            }
        }
        _ = &mut rx => {
            info!("Program terminated by user. Exiting gracefully.");
        }
    }

    Ok(())
}
