use log::{debug, error, info, warn};
use std::sync::{Arc, Mutex};

/// Which reading triple an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Indoor,
    Outdoor,
}

impl Scope {
    fn label(self) -> &'static str {
        match self {
            Scope::Indoor => "indoor",
            Scope::Outdoor => "outdoor",
        }
    }
}

/// Outcome of a single upload branch. Uploaders emit one event per branch
/// decision instead of returning errors; the caller's loop never inspects
/// upload results.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    /// The backend connection handle was never supplied.
    MissingConnection { backend: &'static str },
    /// Dashboard feed handles were resolved (happens at most once).
    FeedsResolved,
    /// A triple was pushed, one feed write per field.
    TripleUploaded {
        scope: Scope,
        temperature: f32,
        humidity: f32,
        dew_point: f32,
    },
    /// A triple was skipped: validity flag false or feeds unresolved.
    TripleSkipped { scope: Scope },
    /// A single feed write was rejected by the backend.
    FeedWriteFailed { key: String, reason: String },
    /// Battery voltage was pushed to its feed.
    BatteryUploaded { volts: f32 },
    /// The battery feed handle is unresolved.
    BatteryFeedMissing,
    /// The channel backend accepted a staged-field write.
    ChannelWritten { channel_id: u64 },
    /// The channel backend returned a non-success result code.
    ChannelRejected { channel_id: u64, code: i32 },
    /// Nothing in the record was valid; no network call was made.
    NoValidData,
}

/// Destination for upload events. Injected so tests can assert on events
/// rather than on log text.
pub trait DiagnosticSink: Send {
    fn emit(&self, event: UploadEvent);
}

/// Default sink: renders each event through the `log` macros.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&self, event: UploadEvent) {
        match event {
            UploadEvent::MissingConnection { backend } => {
                error!("{backend}: connection handle is missing, upload skipped")
            }
            UploadEvent::FeedsResolved => info!("Dashboard feeds resolved"),
            UploadEvent::TripleUploaded {
                scope,
                temperature,
                humidity,
                dew_point,
            } => info!(
                "Uploaded {} data: temp={temperature} hum={humidity} dew={dew_point}",
                scope.label()
            ),
            UploadEvent::TripleSkipped { scope } => debug!(
                "{} data not valid or feeds not initialized, skipped",
                scope.label()
            ),
            UploadEvent::FeedWriteFailed { key, reason } => {
                warn!("Feed {key} write failed: {reason}")
            }
            UploadEvent::BatteryUploaded { volts } => {
                info!("Uploaded battery voltage: {volts}")
            }
            UploadEvent::BatteryFeedMissing => warn!("Battery voltage feed not initialized"),
            UploadEvent::ChannelWritten { channel_id } => {
                info!("Channel {channel_id} update successful")
            }
            UploadEvent::ChannelRejected { channel_id, code } => {
                warn!("Channel {channel_id} update error, result code {code}")
            }
            UploadEvent::NoValidData => debug!("No valid data to update, skipping write"),
        }
    }
}

/// Recording sink used by tests and diagnostics tooling.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<UploadEvent>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<UploadEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn contains(&self, event: &UploadEvent) -> bool {
        self.events().iter().any(|e| e == event)
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, event: UploadEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
