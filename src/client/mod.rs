pub mod adafruit_io;
pub mod simulated;
pub mod thingspeak;

pub use adafruit_io::{Feed, FeedError, FeedService};
pub use simulated::{SimulatedChannelClient, SimulatedFeedService};
pub use thingspeak::{ChannelClient, ChannelClientHandle, CHANNEL_WRITE_OK};
