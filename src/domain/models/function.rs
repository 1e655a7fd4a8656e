use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::Schema;
use crate::domain::DomainError;

/// A function the remote model may ask the caller to invoke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Schema,
}

impl FunctionDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Schema) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// A function invocation requested by the model.
///
/// `arguments` is the raw JSON text exactly as the service produced it. It is
/// not validated against the function's schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    /// Parse the raw arguments into a caller-chosen type.
    pub fn parse_arguments<T: DeserializeOwned>(&self) -> Result<T, DomainError> {
        serde_json::from_str(&self.arguments).map_err(|e| {
            DomainError::deserialization(format!(
                "invalid arguments for function '{}': {e}",
                self.name
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct WeatherArgs {
        city: String,
        days: Option<u32>,
    }

    #[test]
    fn arguments_stay_raw_on_the_wire() {
        let call = FunctionCall::new("get_weather", r#"{"city":"Oslo"}"#);
        let value = serde_json::to_value(&call).unwrap();
        assert_eq!(value["arguments"], r#"{"city":"Oslo"}"#);
    }

    #[test]
    fn parse_arguments_into_typed_struct() {
        let call = FunctionCall::new("get_weather", r#"{"city":"Oslo","days":3}"#);
        let args: WeatherArgs = call.parse_arguments().unwrap();
        assert_eq!(args.city, "Oslo");
        assert_eq!(args.days, Some(3));
    }

    #[test]
    fn parse_arguments_reports_malformed_json() {
        let call = FunctionCall::new("get_weather", "{city:");
        let err = call.parse_arguments::<WeatherArgs>().unwrap_err();
        assert!(err.to_string().contains("get_weather"));
    }
}
