//! Parsing and rendering of posted sensor batches.
//!
//! The receiver never validates readings. Whatever JSON arrives is split into
//! elements and each element is rendered with `N/A` for missing keys.

use serde_json::Value;

use crate::error::ReceiveError;

const MISSING: &str = "N/A";

/// One posted batch, already known to carry data.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    elements: Vec<Value>,
}

impl Batch {
    /// Parses a raw request body. Empty, malformed or falsy bodies are rejected.
    pub fn parse(body: &[u8]) -> Result<Self, ReceiveError> {
        let value: Value = serde_json::from_slice(body).map_err(|_| ReceiveError::NoData)?;
        if !is_truthy(&value) {
            return Err(ReceiveError::NoData);
        }

        let elements = match value {
            Value::Array(items) => items,
            // einzelnes Objekt → Batch mit einem Element
            other => vec![other],
        };
        Ok(Self { elements })
    }

    pub fn count(&self) -> usize {
        self.elements.len()
    }

    /// One log line per element.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.elements.iter().map(render_reading)
    }
}

/// `application/json` or any `+json` media type, parameters ignored.
pub fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json"))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn field(reading: &Value, key: &str) -> String {
    match reading.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => MISSING.to_string(),
    }
}

pub fn render_reading(reading: &Value) -> String {
    format!(
        "Sensor ID: {}, Sensor Name: {}, Sensor Tag: {}, Value: {}",
        field(reading, "ExternalId"),
        field(reading, "Name"),
        field(reading, "SensorTag"),
        field(reading, "Value"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_full_reading() {
        let line = render_reading(&json!({
            "ExternalId": "1", "Name": "Temp", "Value": "20", "SensorTag": "T1"
        }));
        assert_eq!(line, "Sensor ID: 1, Sensor Name: Temp, Sensor Tag: T1, Value: 20");
    }

    #[test]
    fn missing_keys_render_as_na() {
        let line = render_reading(&json!({ "Name": "Humidity" }));
        assert_eq!(line, "Sensor ID: N/A, Sensor Name: Humidity, Sensor Tag: N/A, Value: N/A");
    }

    #[test]
    fn non_string_values_render_as_json() {
        let line = render_reading(&json!({ "ExternalId": 7, "Value": 20.5, "SensorTag": null }));
        assert_eq!(line, "Sensor ID: 7, Sensor Name: N/A, Sensor Tag: null, Value: 20.5");
    }

    #[test]
    fn non_object_element_is_all_na() {
        let line = render_reading(&json!("garbage"));
        assert_eq!(line, "Sensor ID: N/A, Sensor Name: N/A, Sensor Tag: N/A, Value: N/A");
    }

    #[test]
    fn rejects_bodies_without_data() {
        for body in ["", "   ", "null", "{}", "[]", "false", "0", "\"\"", "{not json"] {
            assert!(
                matches!(Batch::parse(body.as_bytes()), Err(ReceiveError::NoData)),
                "body {:?} should be rejected",
                body
            );
        }
    }

    #[test]
    fn array_elements_become_lines() {
        let batch = Batch::parse(br#"[{"ExternalId":"1"},{"ExternalId":"2","Value":"3.5"}]"#).unwrap();
        assert_eq!(batch.count(), 2);
        let lines: Vec<_> = batch.lines().collect();
        assert!(lines[0].starts_with("Sensor ID: 1,"));
        assert!(lines[1].ends_with("Value: 3.5"));
    }

    #[test]
    fn single_object_is_batch_of_one() {
        let batch = Batch::parse(br#"{"Name":"Temp"}"#).unwrap();
        assert_eq!(batch.count(), 1);
        assert_eq!(
            batch.lines().next().unwrap(),
            "Sensor ID: N/A, Sensor Name: Temp, Sensor Tag: N/A, Value: N/A"
        );
    }

    #[test]
    fn json_content_types() {
        assert!(is_json_content_type("application/json"));
        assert!(is_json_content_type("Application/JSON; charset=utf-8"));
        assert!(is_json_content_type("application/vnd.sensor+json"));
        assert!(!is_json_content_type("text/plain"));
        assert!(!is_json_content_type("application/x-www-form-urlencoded"));
        assert!(!is_json_content_type(""));
    }

    #[test]
    fn truthy_scalar_is_accepted() {
        let batch = Batch::parse(b"42").unwrap();
        assert_eq!(batch.count(), 1);
    }
}
