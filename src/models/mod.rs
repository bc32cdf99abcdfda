pub mod sensor_data;

pub use sensor_data::SensorData;
