// Resume analysis pipeline: extraction feeds prompt assembly feeds one completion.
// All model calls go through llm_client; no direct OpenAI calls here.

pub mod critique;
pub mod handlers;
pub mod prompts;
