//! Route narration: turns stops and distances into guidebook prose

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::Result;
use crate::llm::LanguageModel;

const WRITER_PERSONA: &str = "You are a friendly, knowledgeable travel guidebook writer.";

/// Build the narration prompt around the request, stops and walking data
#[must_use]
pub fn build_summary_prompt(request_info: &str, places: &Value, walking_info: &Value) -> String {
    format!(
        "{WRITER_PERSONA} \
Given the following walking tour, write a rich, engaging summary for the user. \
Start with a short intro about the route and what the user will learn or experience. \
Then, for each stop, provide a bullet point with the name, a short description, and a fun fact. \
After the list, summarize the total walking distance and mention the distances between each stop. \
End with a friendly closing sentence.\n\
Request: {request_info}\n\
Stops (in order, with details): {places}\n\
Walking info (distances between stops): {walking_info}\n\
Format:\n\
Intro paragraph.\n\
- Stop 1: Name — Description (Fun fact: ...)\n\
- Stop 2: ...\n\
...\n\
Total walking distance: ...\n\
Distances between stops: ...\n\
Closing sentence."
    )
}

/// Asks the language model to narrate a finished route
pub struct Narrator {
    model: Arc<dyn LanguageModel>,
}

impl Narrator {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Return the model's text verbatim; its structure is not checked
    pub async fn summarize(
        &self,
        request_info: &str,
        places: &Value,
        walking_info: &Value,
    ) -> Result<String> {
        let prompt = build_summary_prompt(request_info, places, walking_info);
        let summary = self.model.complete(WRITER_PERSONA, &prompt).await?;
        info!(chars = summary.len(), "Generated route summary");
        Ok(summary)
    }
}
