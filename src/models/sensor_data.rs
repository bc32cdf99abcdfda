/// One cycle's worth of station readings, assembled by the acquisition
/// side and handed to every uploader by shared reference.
///
/// The indoor and outdoor triples are each gated by a single validity
/// flag; a triple's fields are only meaningful together. `battery_voltage`
/// uses `0.0` as a sentinel for "no reading received this cycle".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorData {
    pub indoor_temp: f32,
    pub indoor_hum: f32,
    pub indoor_dew: f32,
    pub outdoor_temp: f32,
    pub outdoor_hum: f32,
    pub outdoor_dew: f32,
    pub indoor_data_valid: bool,
    pub outdoor_data_valid: bool,
    /// Battery voltage from the LoRa station; stays 0.0 when no packet arrived.
    pub battery_voltage: f32,
}

impl SensorData {
    pub fn with_indoor(mut self, temp: f32, hum: f32, dew: f32) -> Self {
        self.indoor_temp = temp;
        self.indoor_hum = hum;
        self.indoor_dew = dew;
        self.indoor_data_valid = true;
        self
    }

    pub fn with_outdoor(mut self, temp: f32, hum: f32, dew: f32) -> Self {
        self.outdoor_temp = temp;
        self.outdoor_hum = hum;
        self.outdoor_dew = dew;
        self.outdoor_data_valid = true;
        self
    }

    pub fn with_battery(mut self, volts: f32) -> Self {
        self.battery_voltage = volts;
        self
    }

    /// True when a real battery reading arrived (the sentinel 0.0 does not count).
    pub fn has_battery_reading(&self) -> bool {
        self.battery_voltage > 0.0
    }

    /// True when at least one triple is valid or a battery reading arrived.
    pub fn has_any_data(&self) -> bool {
        self.indoor_data_valid || self.outdoor_data_valid || self.has_battery_reading()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let data = SensorData::default();
        assert!(!data.indoor_data_valid);
        assert!(!data.outdoor_data_valid);
        assert!(!data.has_battery_reading());
        assert!(!data.has_any_data());
    }

    #[test]
    fn test_builders_set_validity() {
        let data = SensorData::default().with_indoor(20.0, 50.0, 9.0);
        assert!(data.indoor_data_valid);
        assert!(!data.outdoor_data_valid);
        assert_eq!(data.indoor_temp, 20.0);
        assert!(data.has_any_data());
    }

    #[test]
    fn test_battery_sentinel() {
        let none = SensorData::default().with_battery(0.0);
        assert!(!none.has_battery_reading());
        assert!(!none.has_any_data());

        let some = SensorData::default().with_battery(3.7);
        assert!(some.has_battery_reading());
        assert!(some.has_any_data());
    }
}
