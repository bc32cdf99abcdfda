use crate::models::SensorData;

/// Produces one record per reporting cycle. The real deployments back this
/// with thermistor/hygrometer drivers and the LoRa receiver; the library
/// only needs the assembled record.
pub trait ReadingSource {
    fn acquire(&mut self) -> SensorData;
}

/// Deterministic stand-in for the acquisition hardware. Drifts the readings
/// slowly, drops the outdoor link every fifth cycle and reports battery
/// voltage every third cycle, so the demo loop exercises every upload branch.
#[derive(Debug, Default)]
pub struct SimulatedStation {
    cycle: u64,
}

impl SimulatedStation {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Magnus approximation, good enough between -45 and 60 degrees C.
fn dew_point(temp: f32, relative_humidity: f32) -> f32 {
    let gamma = (relative_humidity / 100.0).ln() + (17.62 * temp) / (243.12 + temp);
    243.12 * gamma / (17.62 - gamma)
}

impl ReadingSource for SimulatedStation {
    fn acquire(&mut self) -> SensorData {
        self.cycle += 1;
        let phase = self.cycle as f32 * 0.1;

        let indoor_temp = 21.0 + 1.5 * phase.sin();
        let indoor_hum = 45.0 + 5.0 * (phase * 0.7).cos();
        let mut data = SensorData::default().with_indoor(
            indoor_temp,
            indoor_hum,
            dew_point(indoor_temp, indoor_hum),
        );

        if self.cycle % 5 != 0 {
            let outdoor_temp = 12.0 + 8.0 * (phase * 0.3).sin();
            let outdoor_hum = 70.0 + 15.0 * (phase * 0.5).cos();
            data = data.with_outdoor(
                outdoor_temp,
                outdoor_hum,
                dew_point(outdoor_temp, outdoor_hum),
            );
        }

        if self.cycle % 3 == 0 {
            data = data.with_battery(3.6 + 0.2 * (phase * 0.2).sin());
        }

        data
    }
}
