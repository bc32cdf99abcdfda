use crate::client::thingspeak::{ChannelClientHandle, CHANNEL_WRITE_OK};
use crate::models::SensorData;
use crate::uploaders::diagnostics::{DiagnosticSink, LogSink, UploadEvent};
use crate::uploaders::Uploader;

// Field slot assignments are a compatibility surface: existing channel
// visualisations reference these numbers, so the order is fixed.
pub const INDOOR_TEMP_FIELD: u8 = 1;
pub const INDOOR_HUM_FIELD: u8 = 2;
pub const INDOOR_DEW_FIELD: u8 = 3;
pub const OUTDOOR_TEMP_FIELD: u8 = 4;
pub const OUTDOOR_HUM_FIELD: u8 = 5;
pub const OUTDOOR_DEW_FIELD: u8 = 6;
pub const BATTERY_VOLTAGE_FIELD: u8 = 7;

/// Multi-field uploader for a ThingSpeak-style channel backend.
///
/// Holds no per-field state between calls: every upload stages the valid
/// fields fresh on the shared client and flushes them in one write. Uses the
/// interface's default `run()` because this backend needs no per-cycle
/// housekeeping.
pub struct ThingSpeakUploader {
    client: ChannelClientHandle,
    channel_id: u64,
    write_api_key: String,
    sink: Box<dyn DiagnosticSink>,
}

impl ThingSpeakUploader {
    /// `client` stays owned by the caller; the uploader only locks it for
    /// the duration of a call and never tears it down.
    pub fn new(client: ChannelClientHandle, channel_id: u64, write_api_key: impl Into<String>) -> Self {
        Self {
            client,
            channel_id,
            write_api_key: write_api_key.into(),
            sink: Box::new(LogSink),
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }
}

impl Uploader for ThingSpeakUploader {
    fn begin(&mut self) {
        if let Ok(mut client) = self.client.lock() {
            client.begin();
        }
    }

    fn upload_data(&mut self, data: &SensorData) {
        let Ok(mut client) = self.client.lock() else {
            self.sink.emit(UploadEvent::MissingConnection {
                backend: "thingspeak",
            });
            return;
        };

        let mut update_pending = false;

        if data.indoor_data_valid {
            client.set_field(INDOOR_TEMP_FIELD, data.indoor_temp);
            client.set_field(INDOOR_HUM_FIELD, data.indoor_hum);
            client.set_field(INDOOR_DEW_FIELD, data.indoor_dew);
            update_pending = true;
        }

        if data.outdoor_data_valid {
            client.set_field(OUTDOOR_TEMP_FIELD, data.outdoor_temp);
            client.set_field(OUTDOOR_HUM_FIELD, data.outdoor_hum);
            client.set_field(OUTDOOR_DEW_FIELD, data.outdoor_dew);
            update_pending = true;
        }

        // Unlike the dashboard adapter, the 0.0 sentinel is suppressed here:
        // field 7 only carries real readings.
        if data.has_battery_reading() {
            client.set_field(BATTERY_VOLTAGE_FIELD, data.battery_voltage);
            update_pending = true;
        }

        if update_pending {
            let code = client.write_fields(self.channel_id, &self.write_api_key);
            if code == CHANNEL_WRITE_OK {
                self.sink.emit(UploadEvent::ChannelWritten {
                    channel_id: self.channel_id,
                });
            } else {
                self.sink.emit(UploadEvent::ChannelRejected {
                    channel_id: self.channel_id,
                    code,
                });
            }
        } else {
            self.sink.emit(UploadEvent::NoValidData);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::simulated::SimulatedChannelClient;
    use crate::uploaders::diagnostics::MemorySink;

    const CHANNEL: u64 = 123456;
    const KEY: &str = "WRITEKEY";

    fn uploader(client: &SimulatedChannelClient) -> (ThingSpeakUploader, MemorySink) {
        let sink = MemorySink::new();
        let uploader = ThingSpeakUploader::new(client.clone().into_handle(), CHANNEL, KEY)
            .with_sink(Box::new(sink.clone()));
        (uploader, sink)
    }

    #[test]
    fn test_begin_binds_the_client_once() {
        let client = SimulatedChannelClient::new();
        let (mut uploader, _sink) = uploader(&client);
        uploader.begin();
        assert_eq!(client.begin_calls(), 1);
    }

    #[test]
    fn test_indoor_only_record_stages_fields_1_to_3() {
        let client = SimulatedChannelClient::new();
        let (mut uploader, sink) = uploader(&client);
        uploader.begin();

        let data = SensorData::default().with_indoor(20.0, 50.0, 9.0);
        uploader.upload_data(&data);

        let writes = client.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].channel_id, CHANNEL);
        assert_eq!(writes[0].write_api_key, KEY);
        assert_eq!(
            writes[0].fields,
            vec![
                (INDOOR_TEMP_FIELD, 20.0),
                (INDOOR_HUM_FIELD, 50.0),
                (INDOOR_DEW_FIELD, 9.0),
            ]
        );
        assert!(sink.contains(&UploadEvent::ChannelWritten {
            channel_id: CHANNEL
        }));
    }

    #[test]
    fn test_full_record_stages_all_seven_fields() {
        let client = SimulatedChannelClient::new();
        let (mut uploader, _sink) = uploader(&client);

        let data = SensorData::default()
            .with_indoor(21.0, 45.0, 8.5)
            .with_outdoor(-2.0, 85.0, -4.1)
            .with_battery(3.72);
        uploader.upload_data(&data);

        let writes = client.writes();
        assert_eq!(writes.len(), 1);
        let slots: Vec<u8> = writes[0].fields.iter().map(|(i, _)| *i).collect();
        assert_eq!(slots, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(writes[0].fields[6], (BATTERY_VOLTAGE_FIELD, 3.72));
    }

    #[test]
    fn test_invalid_triples_are_never_staged() {
        let client = SimulatedChannelClient::new();
        let (mut uploader, _sink) = uploader(&client);

        // Nonzero values with both flags false must not leak into fields.
        let mut data = SensorData::default();
        data.indoor_temp = 21.0;
        data.outdoor_temp = -3.0;
        data = data.with_battery(3.8);
        uploader.upload_data(&data);

        let writes = client.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].fields, vec![(BATTERY_VOLTAGE_FIELD, 3.8)]);
    }

    #[test]
    fn test_battery_sentinel_suppresses_field_7() {
        let client = SimulatedChannelClient::new();
        let (mut uploader, _sink) = uploader(&client);

        let data = SensorData::default()
            .with_indoor(20.0, 50.0, 9.0)
            .with_battery(0.0);
        uploader.upload_data(&data);

        let writes = client.writes();
        assert_eq!(writes.len(), 1);
        assert!(writes[0]
            .fields
            .iter()
            .all(|(slot, _)| *slot != BATTERY_VOLTAGE_FIELD));
    }

    #[test]
    fn test_empty_record_skips_the_network_write() {
        let client = SimulatedChannelClient::new();
        let (mut uploader, sink) = uploader(&client);

        uploader.upload_data(&SensorData::default());

        assert!(client.writes().is_empty());
        assert_eq!(sink.events(), vec![UploadEvent::NoValidData]);
    }

    #[test]
    fn test_backend_rejection_reports_the_result_code() {
        let client = SimulatedChannelClient::new().with_result_code(401);
        let (mut uploader, sink) = uploader(&client);

        uploader.upload_data(&SensorData::default().with_indoor(20.0, 50.0, 9.0));

        assert!(sink.contains(&UploadEvent::ChannelRejected {
            channel_id: CHANNEL,
            code: 401,
        }));
        // The write happened; only the report differs. The next cycle is the
        // implicit retry.
        assert_eq!(client.writes().len(), 1);
    }
}
