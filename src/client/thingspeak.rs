use std::sync::{Arc, Mutex};

/// Result code the channel backend returns for a successful write.
pub const CHANNEL_WRITE_OK: i32 = 200;

/// Shared handle to a channel client. The client itself stays owned by the
/// caller; the uploader only locks it for the duration of a call.
pub type ChannelClientHandle = Arc<Mutex<Box<dyn ChannelClient + Send>>>;

/// ThingSpeak-style channel writer: stage up to eight numbered fields, then
/// flush them to a channel in one synchronous network write.
pub trait ChannelClient {
    /// Bind the write mechanism to the underlying transport. Called once
    /// from `Uploader::begin`.
    fn begin(&mut self) {}

    /// Stage `value` into field slot `index` (1-based) for the next write.
    fn set_field(&mut self, index: u8, value: f32);

    /// Write all staged fields to `channel_id`, clearing the staging area.
    /// Returns the backend's HTTP-style result code.
    fn write_fields(&mut self, channel_id: u64, write_api_key: &str) -> i32;
}
