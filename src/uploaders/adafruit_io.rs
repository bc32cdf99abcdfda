use std::sync::Arc;

use crate::client::adafruit_io::{Feed, FeedService};
use crate::models::SensorData;
use crate::uploaders::diagnostics::{DiagnosticSink, LogSink, Scope, UploadEvent};
use crate::uploaders::Uploader;

// Feed keys are a compatibility surface: existing dashboards reference them
// by name, so they must match the account's feed keys exactly.
pub const INDOOR_TEMP_FEED: &str = "indoortemp";
pub const INDOOR_HUM_FEED: &str = "indoorhum";
pub const INDOOR_DEW_FEED: &str = "indoordp";
pub const OUTDOOR_TEMP_FEED: &str = "outdoortemp";
pub const OUTDOOR_HUM_FEED: &str = "outdoorhum";
pub const OUTDOOR_DEW_FEED: &str = "outdoordp";
pub const BATTERY_VOLTAGE_FEED: &str = "batteryvoltage";

/// Multi-feed uploader for an Adafruit-IO-style dashboard backend.
///
/// Feed handles are resolved lazily on the first `begin()` with a live
/// session; the lifecycle is one-way (`Unresolved -> Resolved`) and a second
/// `begin()` is a no-op. Without a session the adapter stays inert and every
/// upload degrades to diagnostic events.
pub struct AdafruitIoUploader {
    io: Option<Arc<dyn FeedService>>,
    feeds: FeedBindings,
    sink: Box<dyn DiagnosticSink>,
}

enum FeedBindings {
    Unresolved,
    Resolved(ResolvedFeeds),
}

struct ResolvedFeeds {
    indoor_temp: Option<Arc<dyn Feed>>,
    indoor_hum: Option<Arc<dyn Feed>>,
    indoor_dew: Option<Arc<dyn Feed>>,
    outdoor_temp: Option<Arc<dyn Feed>>,
    outdoor_hum: Option<Arc<dyn Feed>>,
    outdoor_dew: Option<Arc<dyn Feed>>,
    battery_voltage: Option<Arc<dyn Feed>>,
}

impl ResolvedFeeds {
    fn triple(&self, scope: Scope) -> Option<(&dyn Feed, &dyn Feed, &dyn Feed)> {
        let (temp, hum, dew) = match scope {
            Scope::Indoor => (&self.indoor_temp, &self.indoor_hum, &self.indoor_dew),
            Scope::Outdoor => (&self.outdoor_temp, &self.outdoor_hum, &self.outdoor_dew),
        };
        match (temp, hum, dew) {
            (Some(t), Some(h), Some(d)) => Some((t.as_ref(), h.as_ref(), d.as_ref())),
            _ => None,
        }
    }
}

impl AdafruitIoUploader {
    /// `io` is the caller's already-configured session; `None` models an
    /// absent connection and leaves the adapter permanently inert.
    pub fn new(io: Option<Arc<dyn FeedService>>) -> Self {
        Self {
            io,
            feeds: FeedBindings::Unresolved,
            sink: Box::new(LogSink),
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    fn save(&self, feed: &dyn Feed, value: f32) {
        if let Err(e) = feed.save(value) {
            self.sink.emit(UploadEvent::FeedWriteFailed {
                key: feed.key().to_string(),
                reason: e.to_string(),
            });
        }
    }

    fn upload_triple(&self, scope: Scope, valid: bool, temp: f32, hum: f32, dew: f32) {
        let feeds = match &self.feeds {
            FeedBindings::Resolved(feeds) => feeds.triple(scope),
            FeedBindings::Unresolved => None,
        };
        match (valid, feeds) {
            (true, Some((temp_feed, hum_feed, dew_feed))) => {
                self.save(temp_feed, temp);
                self.save(hum_feed, hum);
                self.save(dew_feed, dew);
                self.sink.emit(UploadEvent::TripleUploaded {
                    scope,
                    temperature: temp,
                    humidity: hum,
                    dew_point: dew,
                });
            }
            _ => self.sink.emit(UploadEvent::TripleSkipped { scope }),
        }
    }
}

impl Uploader for AdafruitIoUploader {
    fn begin(&mut self) {
        let Some(io) = &self.io else {
            return;
        };
        if matches!(self.feeds, FeedBindings::Resolved(_)) {
            return;
        }
        self.feeds = FeedBindings::Resolved(ResolvedFeeds {
            indoor_temp: io.feed(INDOOR_TEMP_FEED),
            indoor_hum: io.feed(INDOOR_HUM_FEED),
            indoor_dew: io.feed(INDOOR_DEW_FEED),
            outdoor_temp: io.feed(OUTDOOR_TEMP_FEED),
            outdoor_hum: io.feed(OUTDOOR_HUM_FEED),
            outdoor_dew: io.feed(OUTDOOR_DEW_FEED),
            battery_voltage: io.feed(BATTERY_VOLTAGE_FEED),
        });
        self.sink.emit(UploadEvent::FeedsResolved);
    }

    fn run(&mut self) {
        if let Some(io) = &self.io {
            io.run();
        }
    }

    fn upload_data(&mut self, data: &SensorData) {
        if self.io.is_none() {
            self.sink.emit(UploadEvent::MissingConnection {
                backend: "adafruit-io",
            });
            return;
        }

        self.upload_triple(
            Scope::Outdoor,
            data.outdoor_data_valid,
            data.outdoor_temp,
            data.outdoor_hum,
            data.outdoor_dew,
        );
        self.upload_triple(
            Scope::Indoor,
            data.indoor_data_valid,
            data.indoor_temp,
            data.indoor_hum,
            data.indoor_dew,
        );

        // Battery is written even when it is the 0.0 "no reading" sentinel;
        // dashboards chart the gap explicitly.
        let battery = match &self.feeds {
            FeedBindings::Resolved(feeds) => feeds.battery_voltage.as_deref(),
            FeedBindings::Unresolved => None,
        };
        match battery {
            Some(feed) => {
                self.save(feed, data.battery_voltage);
                self.sink.emit(UploadEvent::BatteryUploaded {
                    volts: data.battery_voltage,
                });
            }
            None => self.sink.emit(UploadEvent::BatteryFeedMissing),
        }
    }
}
