//! Request and response documents of the `/v1/chat/completions` endpoint.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{FunctionDefinition, Message};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<FunctionDefinition>,
}

impl ChatRequest {
    /// Messages are always `[system] + history + [user]`; history is copied
    /// through untouched.
    pub fn new(
        model: &str,
        system: &str,
        user: &str,
        history: &[Message],
        functions: &[FunctionDefinition],
    ) -> Self {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(system));
        messages.extend_from_slice(history);
        messages.push(Message::user(user));

        Self {
            model: model.to_string(),
            messages,
            functions: functions.to_vec(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: Message,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiError {
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
}

/// Services send `null` for fields they have nothing to report in; read it
/// the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl ChatResponse {
    /// The service-supplied error text, if the body carried one.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FunctionCall, Role, Schema};
    use serde_json::json;

    fn weather_function() -> FunctionDefinition {
        FunctionDefinition::new(
            "get_weather",
            "Current weather for a city",
            Schema::object()
                .with_description("Weather query")
                .with_required_property("city", Schema::string().with_description("City name"))
                .with_property(
                    "unit",
                    Schema::string().with_enum(["celsius", "fahrenheit"]),
                )
                .with_property(
                    "days",
                    Schema::array(
                        Schema::object().with_required_property("offset", Schema::integer()),
                    ),
                ),
        )
    }

    #[test]
    fn history_sits_between_system_and_user() {
        let history = vec![
            Message::user("hi"),
            Message::assistant_function_call(FunctionCall::new("get_weather", "{}")),
            Message::function_result("get_weather", "12C"),
            Message::assistant("It is 12C."),
        ];

        let request = ChatRequest::new("m", "sys", "and tomorrow?", &history, &[]);

        assert_eq!(request.messages.len(), history.len() + 2);
        assert_eq!(request.messages[0], Message::system("sys"));
        assert_eq!(&request.messages[1..=history.len()], history.as_slice());
        assert_eq!(request.messages.last(), Some(&Message::user("and tomorrow?")));
    }

    #[test]
    fn empty_system_prompt_is_still_sent_first() {
        let request = ChatRequest::new("m", "", "question", &[], &[]);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[0].content(), Some(""));
    }

    #[test]
    fn functions_key_is_omitted_when_empty() {
        let request = ChatRequest::new("m", "sys", "user", &[], &[]);
        let value = serde_json::to_value(&request).unwrap();

        assert!(value.get("functions").is_none());
        assert_eq!(value["model"], "m");
    }

    #[test]
    fn functions_are_sent_when_present() {
        let request = ChatRequest::new("m", "sys", "user", &[], &[weather_function()]);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["functions"][0]["name"], "get_weather");
        assert_eq!(value["functions"][0]["parameters"]["required"], json!(["city"]));
    }

    #[test]
    fn schema_survives_request_round_trip() {
        let function = weather_function();
        let request = ChatRequest::new("m", "sys", "user", &[], std::slice::from_ref(&function));

        let encoded = serde_json::to_string(&request).unwrap();
        let decoded: ChatRequest = serde_json::from_str(&encoded).unwrap();

        assert_eq!(decoded, request);
        assert_eq!(decoded.functions[0].parameters, function.parameters);
    }

    #[test]
    fn error_only_body_parses_without_choices() {
        let response: ChatResponse =
            serde_json::from_value(json!({"error": {"message": "rate limited"}})).unwrap();

        assert!(response.choices.is_empty());
        assert_eq!(response.error_message(), Some("rate limited"));
    }

    #[test]
    fn null_fields_read_as_empty() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": null,
            "error": {"message": null}
        }))
        .unwrap();

        assert!(response.choices.is_empty());
        assert_eq!(response.error_message(), Some(""));
    }

    #[test]
    fn null_error_is_treated_as_absent() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "ok"}, "finish_reason": "stop"}],
            "error": null
        }))
        .unwrap();

        assert_eq!(response.choices.len(), 1);
        assert_eq!(response.error_message(), None);
    }
}
