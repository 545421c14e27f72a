// tests/generator_tests.rs

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cerebro::{
    error::GenerationError,
    generator::{QuizGenerator, QuizModel, build_prompt, parse_quiz},
    models::question::Difficulty,
};

/// Stub model that echoes back the requested number of questions and records prompts.
#[derive(Default)]
struct EchoModel {
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl QuizModel for EchoModel {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let count: usize = prompt
            .split_whitespace()
            .skip_while(|w| *w != "Generate")
            .nth(1)
            .and_then(|n| n.parse().ok())
            .unwrap_or(0);

        let quiz: Vec<_> = (0..count)
            .map(|i| {
                serde_json::json!({
                    "quiz_title": "Stub",
                    "difficulty": "easy",
                    "question": format!("Q{}", i),
                    "choices": ["x", "y"],
                    "answer": "x"
                })
            })
            .collect();

        Ok(serde_json::json!({ "quiz": quiz }).to_string())
    }
}

/// Stub model that always answers with the same text.
struct FixedModel(String);

#[async_trait]
impl QuizModel for FixedModel {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Ok(self.0.clone())
    }
}

/// Stub model whose transport always fails.
struct UnreachableModel;

#[async_trait]
impl QuizModel for UnreachableModel {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Transport("connection refused".to_string()))
    }
}

fn fixed(body: &str) -> QuizGenerator {
    QuizGenerator::new(Arc::new(FixedModel(body.to_string())))
}

#[tokio::test]
async fn returns_requested_count() {
    let generator = QuizGenerator::new(Arc::new(EchoModel::default()));

    for count in [1, 5, 10, 15, 20] {
        let questions = generator
            .generate("rivers", "medium", &count.to_string())
            .await
            .expect("generation should succeed");
        assert_eq!(questions.len(), count);
    }
}

#[tokio::test]
async fn applies_defaults_for_empty_inputs() {
    let model = Arc::new(EchoModel::default());
    let generator = QuizGenerator::new(model.clone());

    let questions = generator.generate("rivers", "", "").await.unwrap();

    assert_eq!(questions.len(), 10);
    let prompts = model.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Generate 10 "));
    assert!(prompts[0].contains("of default difficulty"));
}

#[test]
fn prompt_embeds_inputs_and_schema() {
    let prompt = build_prompt("the French revolution", "hard", "5");

    assert!(prompt.contains("USER TOPIC: the French revolution"));
    assert!(prompt.contains("Generate 5 "));
    assert!(prompt.contains("hard difficulty"));
    assert!(prompt.contains("\"quiz\""));
    assert!(prompt.contains("\"quiz_title\""));
    assert!(prompt.contains("\"answer\""));
}

#[test]
fn parses_quiz_array_without_validation() {
    let raw = r#"{
        "quiz": [
            {"quiz_title": "T", "difficulty": "hard", "question": "Q", "choices": ["a", "b"], "answer": "z"},
            {"question": "only a question", "difficulty": "impossible"}
        ],
        "extra": true
    }"#;

    let questions = parse_quiz(raw).unwrap();

    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0].title, "T");
    assert_eq!(questions[0].difficulty, Difficulty::Hard);
    assert_eq!(questions[0].answer, "z");
    assert_eq!(questions[1].difficulty, Difficulty::Default);
    assert!(questions[1].choices.is_empty());
    assert_eq!(questions[1].answer, "");
}

#[tokio::test]
async fn invalid_json_fails() {
    let err = fixed("this is not json").generate("t", "", "").await.unwrap_err();
    assert!(matches!(err, GenerationError::InvalidJson(_)));
}

#[tokio::test]
async fn missing_quiz_key_fails() {
    let err = fixed(r#"{"questions": []}"#).generate("t", "", "").await.unwrap_err();
    assert!(matches!(err, GenerationError::MissingQuiz));

    let err = fixed(r#"[1, 2, 3]"#).generate("t", "", "").await.unwrap_err();
    assert!(matches!(err, GenerationError::MissingQuiz));
}

#[tokio::test]
async fn non_array_quiz_fails() {
    let err = fixed(r#"{"quiz": {"question": "?"}}"#)
        .generate("t", "", "")
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::MalformedQuiz(_)));
}

#[tokio::test]
async fn model_errors_propagate() {
    let generator = QuizGenerator::new(Arc::new(UnreachableModel));

    let err = generator.generate("t", "easy", "3").await.unwrap_err();

    assert!(matches!(err, GenerationError::Transport(_)));
}

#[tokio::test]
async fn difficulty_label_is_normalised() {
    let model = Arc::new(EchoModel::default());
    let generator = QuizGenerator::new(model.clone());

    generator.generate("rivers", "EASY", "2").await.unwrap();
    generator.generate("rivers", " easy ", "2").await.unwrap();

    let prompts = model.prompts.lock().unwrap();
    assert_eq!(prompts[0], prompts[1]);
    assert!(prompts[0].contains("of easy difficulty"));
}

#[test]
fn null_fields_and_mixed_case_difficulty_are_tolerated() {
    let raw = r#"{
        "quiz": [
            {"quiz_title": null, "difficulty": "Easy", "question": null, "choices": null, "answer": null},
            {"difficulty": null, "question": "Q", "choices": ["a"], "answer": "a"},
            {"difficulty": "HARD", "question": "Q2"}
        ]
    }"#;

    let questions = parse_quiz(raw).unwrap();

    assert_eq!(questions.len(), 3);
    assert_eq!(questions[0].difficulty, Difficulty::Easy);
    assert_eq!(questions[0].title, "");
    assert_eq!(questions[0].question, "");
    assert!(questions[0].choices.is_empty());
    assert_eq!(questions[0].answer, "");
    assert_eq!(questions[1].difficulty, Difficulty::Default);
    assert_eq!(questions[2].difficulty, Difficulty::Hard);
}
