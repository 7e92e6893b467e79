pub mod equipment_reader;
pub mod value_reader;
pub mod weather_client;

pub use equipment_reader::EquipmentReader;
pub use value_reader::ValueReader;
pub use weather_client::{HourlyTemperature, NoTemperatureSource, OpenMeteoClient, TemperatureSource};
