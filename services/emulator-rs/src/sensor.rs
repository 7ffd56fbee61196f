use serde::{Deserialize, Serialize};

use crate::error::SensorError;

/// Amount added to every sensor on each refresh.
pub const STEP: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FakeSensor {
    pub text: String,
    #[serde(rename = "Type")]
    pub kind: String,
    /// Always formatted with one decimal place.
    pub value: String,
    pub sensor_id: String,
}

impl FakeSensor {
    pub fn new(text: &str, kind: &str, value: f64, sensor_id: &str) -> Self {
        Self {
            text: text.to_string(),
            kind: kind.to_string(),
            value: format_value(value),
            sensor_id: sensor_id.to_string(),
        }
    }

    /// Adds `step` to the stored value. On a parse failure the value is left as is.
    pub fn advance(&mut self, step: f64) -> Result<(), SensorError> {
        let current: f64 = self
            .value
            .trim()
            .parse()
            .map_err(|source| SensorError::InvalidValue {
                sensor_id: self.sensor_id.clone(),
                value: self.value.clone(),
                source,
            })?;
        self.value = format_value(current + step);
        Ok(())
    }
}

fn format_value(value: f64) -> String {
    format!("{:.1}", value)
}

pub fn default_sensors() -> Vec<FakeSensor> {
    vec![
        FakeSensor::new("Fake Sensor 1", "Temperature", 88.0, "fake_sensor_1"),
        FakeSensor::new("Fake Sensor 2", "Humidity", 20.0, "fake_sensor_2"),
        FakeSensor::new("Fake Sensor 3", "Pressure", 11.0, "fake_sensor_3"),
    ]
}
