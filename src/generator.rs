// src/generator.rs

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    error::GenerationError,
    models::question::{DEFAULT_QUESTION_COUNT, Difficulty, QuizQuestion},
};

/// A text-generation backend asked to answer in JSON.
///
/// Returns the raw response text; parsing happens in [`QuizGenerator`].
#[async_trait]
pub trait QuizModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Turns a topic into a list of questions using a [`QuizModel`].
#[derive(Clone)]
pub struct QuizGenerator {
    model: Arc<dyn QuizModel>,
}

impl QuizGenerator {
    pub fn new(model: Arc<dyn QuizModel>) -> Self {
        Self { model }
    }

    /// Generates a quiz.
    ///
    /// * Empty `difficulty` means "default", empty `count` means "10".
    ///   Known difficulty labels are normalised to lowercase.
    /// * Makes exactly one call to the model. No retry, no caching.
    /// * Returns the `"quiz"` array as-is: the number of questions and the
    ///   answers are not checked.
    pub async fn generate(
        &self,
        topic: &str,
        difficulty: &str,
        count: &str,
    ) -> Result<Vec<QuizQuestion>, GenerationError> {
        let difficulty: &str = match Difficulty::from_label(difficulty) {
            Some(known) => known.as_str(),
            None => difficulty.trim(),
        };
        let count = or_default(count, DEFAULT_QUESTION_COUNT);

        let prompt = build_prompt(topic, difficulty, count);
        tracing::debug!(difficulty, count, "Requesting quiz from model");

        let raw = self.model.generate(&prompt).await?;
        let questions = parse_quiz(&raw)?;

        tracing::info!(returned = questions.len(), requested = count, "Quiz generated");
        Ok(questions)
    }
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    let value = value.trim();
    if value.is_empty() { default } else { value }
}

/// Builds the instruction sent to the model.
pub fn build_prompt(topic: &str, difficulty: &str, count: &str) -> String {
    format!(
        r#"You are an expert at generating quizzes based on a user prompt.
Generate {count} single choice quiz questions of {difficulty} difficulty about the topic provided below.
Every question must have a quiz_title, difficulty, question, choices and answer. The answer must be one of the choices.

JSON schema example:
{{
  "quiz": [
    {{
      "quiz_title": "Neural Network Basics",
      "difficulty": "easy",
      "question": "What is the basic unit of a neural network?",
      "choices": ["Synapse", "Neuron", "Axon", "Dendrite"],
      "answer": "Neuron"
    }}
  ]
}}

USER TOPIC: {topic}
"#
    )
}

/// Extracts the question list from the model's JSON answer.
pub fn parse_quiz(raw: &str) -> Result<Vec<QuizQuestion>, GenerationError> {
    let mut body: Value = serde_json::from_str(raw)?;

    let quiz = body
        .get_mut("quiz")
        .map(Value::take)
        .ok_or(GenerationError::MissingQuiz)?;

    if !quiz.is_array() {
        return Err(GenerationError::MalformedQuiz("expected an array".to_string()));
    }

    serde_json::from_value(quiz).map_err(|e| GenerationError::MalformedQuiz(e.to_string()))
}
