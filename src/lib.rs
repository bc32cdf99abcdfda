pub mod config;

pub mod client;
pub mod models;
pub mod station;
pub mod uploaders;

use crate::client::adafruit_io::FeedService;
use crate::client::{SimulatedChannelClient, SimulatedFeedService};
use crate::config::AppConfig;
use crate::models::SensorData;
use crate::station::{ReadingSource, SimulatedStation};
use crate::uploaders::{AdafruitIoUploader, ThingSpeakUploader, Uploader, UploaderList};
use anyhow::Context;
use log::{debug, error, info};
use std::sync::Arc;
use std::time::Duration;

pub async fn run() -> anyhow::Result<()> {
    info!("Starting uplink");

    tokio::select! {
        result = main_loop() => {
            match result {
                Ok(_) => info!("Uplink completed successfully"),
                Err(e) => {
                    error!("Uplink error: {e:#}");
                    // Print chain of error causes
                    for cause in e.chain().skip(1) {
                        error!("Caused by: {cause}");
                    }
                    return Err(e).context("Uplink failed to run");
                }
            }
        }
    }

    Ok(())
}

async fn main_loop() -> anyhow::Result<()> {
    debug!("Loading configuration");
    let config = AppConfig::new().context("Failed to load configuration")?;

    let mut uploaders = build_uploaders(&config);
    if uploaders.is_empty() {
        anyhow::bail!("No upload backend enabled in configuration");
    }

    for uploader in uploaders.iter_mut() {
        uploader.begin();
    }

    let mut station = SimulatedStation::new();
    let mut interval = tokio::time::interval(Duration::from_secs(config.station.interval));
    loop {
        interval.tick().await; // Wait for the next reporting cycle

        // Service established connections before pushing new data
        for uploader in uploaders.iter_mut() {
            uploader.run();
        }

        let data = station.acquire();
        info!(
            "Reporting cycle at {}",
            chrono::Local::now().format("%H:%M:%S")
        );
        debug!("{:?}", data);

        broadcast(&mut uploaders, &data);
    }
}

/// Hand the same record to every uploader; each one degrades independently.
fn broadcast(uploaders: &mut UploaderList, data: &SensorData) {
    for uploader in uploaders.iter_mut() {
        uploader.upload_data(data);
    }
}

fn build_uploaders(config: &AppConfig) -> UploaderList {
    let mut uploaders: UploaderList = Vec::new();

    if config.adafruit_io.enabled {
        // Real deployments pass the vendor session here; the demo binary
        // wires the simulated stand-in from `client::simulated`.
        let io: Arc<dyn FeedService> = Arc::new(SimulatedFeedService::new());
        uploaders.push(Box::new(AdafruitIoUploader::new(Some(io))));
    }

    if config.thingspeak.enabled {
        let client = SimulatedChannelClient::new().into_handle();
        uploaders.push(Box::new(ThingSpeakUploader::new(
            client,
            config.thingspeak.channel_id,
            config.thingspeak.write_api_key.clone(),
        )));
    }

    uploaders
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_uploaders_honours_enable_flags() {
        let mut config = AppConfig::default();
        config.adafruit_io.enabled = true;
        config.thingspeak.enabled = true;
        assert_eq!(build_uploaders(&config).len(), 2);

        config.adafruit_io.enabled = false;
        config.thingspeak.enabled = false;
        assert!(build_uploaders(&config).is_empty());
    }

    #[test]
    fn test_broadcast_reaches_every_uploader_each_cycle() {
        let mut config = AppConfig::default();
        config.adafruit_io.enabled = true;
        config.thingspeak.enabled = true;
        let mut uploaders = build_uploaders(&config);
        for uploader in uploaders.iter_mut() {
            uploader.begin();
        }

        let mut station = SimulatedStation::new();
        for _ in 0..6 {
            let data = station.acquire();
            broadcast(&mut uploaders, &data);
        }
    }
}
