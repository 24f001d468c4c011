// Soul animal quiz: question set, prompt compilation, response interpretation,
// the wizard state machine and the end-to-end reading pipeline.
// All text-generation calls go through llm_client; images through imaging.

pub mod handlers;
pub mod interpreter;
pub mod profile;
pub mod prompts;
pub mod questions;
pub mod reading;
pub mod theme;
pub mod view;
pub mod wizard;
