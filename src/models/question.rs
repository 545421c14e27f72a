// src/models/question.rs

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

pub const MAX_QUESTION_COUNT: u32 = 20;
pub const DEFAULT_QUESTION_COUNT: &str = "10";

/// Difficulty label. Only steers the prompt; returned data is not checked against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    #[default]
    Default,
}

/// Case-insensitive. `null` and labels the model invents become `Default`.
impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(label
            .as_deref()
            .and_then(Difficulty::from_label)
            .unwrap_or_default())
    }
}

/// Treats an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Default => "default",
        }
    }

    /// Parses a user-supplied label. Empty input means `Default`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "" | "default" => Some(Difficulty::Default),
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// One multiple-choice question as returned by the model.
///
/// Every field is optional on the wire: missing or `null` strings become
/// empty and `answer` is not checked against `choices`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizQuestion {
    /// Quiz-level title, repeated on every question.
    #[serde(rename = "quiz_title", deserialize_with = "null_as_default")]
    pub title: String,

    pub difficulty: Difficulty,

    #[serde(deserialize_with = "null_as_default")]
    pub question: String,

    #[serde(deserialize_with = "null_as_default")]
    pub choices: Vec<String>,

    #[serde(deserialize_with = "null_as_default")]
    pub answer: String,
}

/// DTO for the question currently on screen.
/// `answer` is withheld until the answer has been revealed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicQuestion {
    pub quiz_title: String,
    pub difficulty: Difficulty,
    pub question: String,
    pub choices: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

impl PublicQuestion {
    pub fn from_question(q: &QuizQuestion, reveal_answer: bool) -> Self {
        Self {
            quiz_title: q.title.clone(),
            difficulty: q.difficulty,
            question: q.question.clone(),
            choices: q.choices.clone(),
            answer: reveal_answer.then(|| q.answer.clone()),
        }
    }
}

/// DTO for requesting a new quiz.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct GenerateQuizRequest {
    #[serde(default)]
    #[validate(length(max = 4000, message = "Topic must be at most 4000 characters."))]
    pub topic: String,
    #[serde(default)]
    #[validate(custom(function = validate_difficulty))]
    pub difficulty: String,
    #[serde(default)]
    #[validate(custom(function = validate_count))]
    pub count: String,
}

/// DTO for choosing an option on the current question.
#[derive(Debug, Deserialize, Validate)]
pub struct SelectOptionRequest {
    #[validate(length(max = 1000))]
    pub value: String,
}

fn validate_difficulty(difficulty: &str) -> Result<(), validator::ValidationError> {
    if Difficulty::from_label(difficulty).is_none() {
        return Err(validator::ValidationError::new("unknown_difficulty"));
    }
    Ok(())
}

fn validate_count(count: &str) -> Result<(), validator::ValidationError> {
    let count = count.trim();
    if count.is_empty() {
        return Ok(());
    }
    match count.parse::<u32>() {
        Ok(n) if (1..=MAX_QUESTION_COUNT).contains(&n) => Ok(()),
        _ => Err(validator::ValidationError::new("count_out_of_range")),
    }
}
