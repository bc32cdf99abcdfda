use log::debug;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use super::adafruit_io::{Feed, FeedError, FeedService};
use super::thingspeak::{ChannelClient, ChannelClientHandle, CHANNEL_WRITE_OK};

/// In-memory dashboard session standing in for the vendor SDK. Every feed
/// write is recorded so the demo binary and the tests can inspect it.
#[derive(Default)]
pub struct SimulatedFeedService {
    saved: Arc<Mutex<Vec<(String, f32)>>>,
    missing: HashSet<String>,
    run_calls: Mutex<usize>,
    feed_lookups: Mutex<usize>,
}

impl SimulatedFeedService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat `keys` as unknown to the backend: `feed()` returns `None` for them.
    pub fn with_missing_feeds<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.missing = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Every `(feed key, value)` pair saved so far, in write order.
    pub fn saved(&self) -> Vec<(String, f32)> {
        self.saved.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn run_calls(&self) -> usize {
        self.run_calls.lock().map(|c| *c).unwrap_or(0)
    }

    /// Number of `feed()` resolutions performed against this session.
    pub fn feed_lookups(&self) -> usize {
        self.feed_lookups.lock().map(|c| *c).unwrap_or(0)
    }
}

impl FeedService for SimulatedFeedService {
    fn feed(&self, key: &str) -> Option<Arc<dyn Feed>> {
        if let Ok(mut lookups) = self.feed_lookups.lock() {
            *lookups += 1;
        }
        if self.missing.contains(key) {
            return None;
        }
        Some(Arc::new(SimulatedFeed {
            key: key.to_string(),
            saved: Arc::clone(&self.saved),
        }))
    }

    fn run(&self) {
        if let Ok(mut calls) = self.run_calls.lock() {
            *calls += 1;
        }
    }
}

struct SimulatedFeed {
    key: String,
    saved: Arc<Mutex<Vec<(String, f32)>>>,
}

impl Feed for SimulatedFeed {
    fn key(&self) -> &str {
        &self.key
    }

    fn save(&self, value: f32) -> Result<(), FeedError> {
        debug!("[sim] feed {} <- {}", self.key, value);
        let mut saved = self.saved.lock().map_err(|_| FeedError::Disconnected)?;
        saved.push((self.key.clone(), value));
        Ok(())
    }
}

/// One flushed channel write as seen by the simulated backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelWrite {
    pub channel_id: u64,
    pub write_api_key: String,
    pub fields: Vec<(u8, f32)>,
}

#[derive(Default)]
struct ChannelState {
    staged: Vec<(u8, f32)>,
    writes: Vec<ChannelWrite>,
    begin_calls: usize,
}

/// In-memory channel writer standing in for the ThingSpeak library. Cloning
/// shares the state, so a test can keep a probe while the uploader owns the
/// boxed handle.
#[derive(Clone)]
pub struct SimulatedChannelClient {
    state: Arc<Mutex<ChannelState>>,
    result_code: i32,
}

impl Default for SimulatedChannelClient {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(ChannelState::default())),
            result_code: CHANNEL_WRITE_OK,
        }
    }
}

impl SimulatedChannelClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `write_fields` call return `code`.
    pub fn with_result_code(mut self, code: i32) -> Self {
        self.result_code = code;
        self
    }

    /// Wrap this client in the shared handle the uploader expects.
    pub fn into_handle(self) -> ChannelClientHandle {
        Arc::new(Mutex::new(Box::new(self) as Box<dyn ChannelClient + Send>))
    }

    pub fn writes(&self) -> Vec<ChannelWrite> {
        self.state.lock().map(|s| s.writes.clone()).unwrap_or_default()
    }

    pub fn begin_calls(&self) -> usize {
        self.state.lock().map(|s| s.begin_calls).unwrap_or(0)
    }
}

impl ChannelClient for SimulatedChannelClient {
    fn begin(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            state.begin_calls += 1;
        }
    }

    fn set_field(&mut self, index: u8, value: f32) {
        if let Ok(mut state) = self.state.lock() {
            state.staged.push((index, value));
        }
    }

    fn write_fields(&mut self, channel_id: u64, write_api_key: &str) -> i32 {
        let Ok(mut state) = self.state.lock() else {
            return -1;
        };
        let fields = std::mem::take(&mut state.staged);
        debug!(
            "[sim] channel {} write: {} field(s), code {}",
            channel_id,
            fields.len(),
            self.result_code
        );
        state.writes.push(ChannelWrite {
            channel_id,
            write_api_key: write_api_key.to_string(),
            fields,
        });
        self.result_code
    }
}
