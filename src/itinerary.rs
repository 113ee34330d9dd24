//! Itinerary generation: free text in, ordered place names out

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::Result;
use crate::llm::LanguageModel;

const GUIDE_PROMPT: &str = "You are a friendly, knowledgeable local city guide. \
Given a user request, return ONLY a JSON array of the most relevant place names (in order) for their day, with no extra text. \
Do not include directions or explanations. \
Example: [\"Sagrada Familia\", \"Park Güell\", \"Barceloneta Beach\"]";

/// Place names produced by the model for one request
#[derive(Debug, Clone, PartialEq)]
pub enum PlaceNames {
    /// Names in visiting order, never empty
    Found(Vec<String>),
    /// The reply held no usable list; not an error
    Empty,
}

/// Build the instruction prompt, with location and preference lines when given
#[must_use]
pub fn build_system_prompt(location: Option<&str>, profile: Option<&str>) -> String {
    let mut prompt = GUIDE_PROMPT.to_string();
    if let Some(location) = location.filter(|l| !l.is_empty()) {
        prompt.push_str(&format!("\nCurrent location: {location}"));
    }
    if let Some(profile) = profile.filter(|p| !p.is_empty()) {
        prompt.push_str(&format!("\nUser preferences: {profile}"));
    }
    prompt
}

/// Parse a model reply into place names.
///
/// Anything but a JSON array yields [`PlaceNames::Empty`]. Inside the array,
/// strings are kept as written, numbers and booleans keep their JSON text, and nulls,
/// objects and nested arrays are dropped.
#[must_use]
pub fn parse_place_names(reply: &str) -> PlaceNames {
    let items = match serde_json::from_str::<Value>(reply) {
        Ok(Value::Array(items)) => items,
        Ok(other) => {
            debug!(kind = json_kind(&other), "Model reply is not a list");
            return PlaceNames::Empty;
        }
        Err(e) => {
            debug!(error = %e, "Model reply is not valid JSON");
            return PlaceNames::Empty;
        }
    };

    let names: Vec<String> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
        .collect();

    if names.is_empty() {
        PlaceNames::Empty
    } else {
        PlaceNames::Found(names)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Asks the language model for a day's places
pub struct ItineraryGenerator {
    model: Arc<dyn LanguageModel>,
}

impl ItineraryGenerator {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Generate ordered place names for `user_input`.
    ///
    /// Malformed replies are not retried; they come back as [`PlaceNames::Empty`].
    /// Transport and provider failures are returned as errors.
    pub async fn generate(
        &self,
        user_input: &str,
        location: Option<&str>,
        profile: Option<&str>,
    ) -> Result<PlaceNames> {
        let system_prompt = build_system_prompt(location, profile);
        let reply = self.model.complete(&system_prompt, user_input).await?;

        let names = parse_place_names(&reply);
        match &names {
            PlaceNames::Found(list) => info!(count = list.len(), "Model suggested places"),
            PlaceNames::Empty => warn!("Model reply contained no places"),
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TourAiError;
    use async_trait::async_trait;
    use rstest::rstest;
    use std::sync::Mutex;

    struct CannedModel {
        reply: std::result::Result<String, String>,
        prompts: Mutex<Vec<(String, String)>>,
    }

    impl CannedModel {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LanguageModel for CannedModel {
        async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String> {
            self.prompts
                .lock()
                .unwrap()
                .push((system_prompt.to_string(), user_message.to_string()));
            self.reply.clone().map_err(TourAiError::api)
        }
    }

    #[rstest]
    #[case("not json at all")]
    #[case("```json\n[\"Louvre\"]\n```")]
    #[case("{\"places\": [\"Louvre\"]}")]
    #[case("\"Louvre\"")]
    #[case("[]")]
    #[case("[null, {}, []]")]
    #[case("")]
    fn test_unusable_replies_are_empty(#[case] reply: &str) {
        assert_eq!(parse_place_names(reply), PlaceNames::Empty);
    }

    #[test]
    fn test_string_array_kept_in_order() {
        assert_eq!(
            parse_place_names("[\"Park Güell\", \"Sagrada Familia\"]"),
            PlaceNames::Found(vec!["Park Güell".to_string(), "Sagrada Familia".to_string()])
        );
    }

    #[test]
    fn test_non_string_scalars_keep_json_text() {
        assert_eq!(
            parse_place_names("[\"Pier\", 39, null, {\"name\": \"x\"}, true]"),
            PlaceNames::Found(vec!["Pier".to_string(), "39".to_string(), "true".to_string()])
        );
    }

    #[test]
    fn test_string_elements_kept_as_written() {
        assert_eq!(
            parse_place_names("[\"Louvre \", \"\"]"),
            PlaceNames::Found(vec!["Louvre ".to_string(), String::new()])
        );
    }

    #[test]
    fn test_prompt_context_lines() {
        let bare = build_system_prompt(None, Some(""));
        assert!(bare.starts_with("You are a friendly, knowledgeable local city guide."));
        assert!(!bare.contains("Current location"));
        assert!(!bare.contains("User preferences"));

        let full = build_system_prompt(Some("Hotel Arts, Barcelona"), Some("loves architecture"));
        assert!(full.ends_with(
            "\nCurrent location: Hotel Arts, Barcelona\nUser preferences: loves architecture"
        ));
    }

    #[tokio::test]
    async fn test_generate_sends_raw_user_input() {
        let model = Arc::new(CannedModel::replying("[\"Park Güell\", \"Sagrada Familia\"]"));
        let generator = ItineraryGenerator::new(model.clone());

        let names = generator
            .generate("fun day in Barcelona", Some("Hotel Arts, Barcelona"), Some(""))
            .await
            .unwrap();

        assert_eq!(
            names,
            PlaceNames::Found(vec!["Park Güell".to_string(), "Sagrada Familia".to_string()])
        );
        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].1, "fun day in Barcelona");
        assert!(prompts[0].0.contains("Current location: Hotel Arts, Barcelona"));
    }

    #[tokio::test]
    async fn test_generate_malformed_reply_is_empty_not_error() {
        let model = Arc::new(CannedModel::replying("Sure! Here are some places: ..."));
        let generator = ItineraryGenerator::new(model);

        let names = generator.generate("museums", None, None).await.unwrap();
        assert_eq!(names, PlaceNames::Empty);
    }

    #[tokio::test]
    async fn test_generate_propagates_provider_errors() {
        let model = Arc::new(CannedModel {
            reply: Err("401 Unauthorized".to_string()),
            prompts: Mutex::new(Vec::new()),
        });
        let generator = ItineraryGenerator::new(model);

        let err = generator.generate("museums", None, None).await.unwrap_err();
        assert!(matches!(err, TourAiError::Api { .. }));
    }
}
