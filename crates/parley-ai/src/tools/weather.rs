//! Demo weather tool. Returns a canned reading; there is no weather service.

use super::FunctionTool;

/// Fetch the weather for a given location, returning a short description.
pub fn get_weather(location: &str, unit: &str) -> String {
    format!("The weather in {location} is 22 degrees {unit}.")
}

/// `get_weather(location, unit = "C")` as a model-callable tool.
pub fn get_weather_tool() -> FunctionTool {
    FunctionTool::new(
        "get_weather",
        "Fetch the weather for a given location, returning a short description.",
        serde_json::json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "City or place name"
                },
                "unit": {
                    "type": "string",
                    "description": "Temperature unit, C or F",
                    "default": "C"
                }
            },
            "required": ["location"]
        }),
        |args| {
            let location = args["location"]
                .as_str()
                .filter(|s| !s.trim().is_empty())
                .ok_or_else(|| "missing required argument 'location'".to_string())?;
            let unit = args["unit"].as_str().unwrap_or("C");
            Ok(get_weather(location, unit))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unit_defaults_to_celsius() {
        let out = get_weather_tool().call(&json!({"location": "Hyderabad"})).unwrap();
        assert_eq!(out, "The weather in Hyderabad is 22 degrees C.");
    }

    #[test]
    fn explicit_unit_is_used() {
        let out = get_weather_tool()
            .call(&json!({"location": "Oslo", "unit": "F"}))
            .unwrap();
        assert_eq!(out, "The weather in Oslo is 22 degrees F.");
    }

    #[test]
    fn missing_location_is_rejected() {
        assert!(get_weather_tool().call(&json!({})).is_err());
        assert!(get_weather_tool().call(&json!({"location": ""})).is_err());
    }
}
