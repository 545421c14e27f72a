// src/models/session.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::question::{GenerateQuizRequest, PublicQuestion, QuizQuestion};

/// Lifecycle of a quiz attempt.
///
/// `Idle` until a quiz is generated, `InProgress` while answering, `Ended`
/// once the last question has been checked. Only `reset` leaves `Ended`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    InProgress,
    Ended,
}

/// In-memory state of one quiz attempt.
///
/// Invariant: `cursor < questions.len()` whenever `questions` is non-empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    cursor: usize,
    selected_option: String,
    answer_revealed: bool,
    correct_count: u32,
    ended: bool,
    /// Which questions have already been graded. Each one scores at most once.
    graded: Vec<bool>,
    inputs: Option<GenerateQuizRequest>,
    /// Ticket of the generation whose result this session still accepts.
    pending: Option<Uuid>,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces whatever was there with a fresh attempt over `questions`.
    ///
    /// Pending generation inputs are consumed.
    pub fn start(&mut self, questions: Vec<QuizQuestion>) {
        *self = Self {
            graded: vec![false; questions.len()],
            questions,
            ..Self::default()
        };
    }

    /// Records the inputs of a generation that is about to run under `ticket`.
    ///
    /// Returns `false` if one is already running for this session.
    pub fn begin_generation(&mut self, ticket: Uuid, inputs: GenerateQuizRequest) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.inputs = Some(inputs);
        self.pending = Some(ticket);
        true
    }

    /// Starts the quiz produced by the generation identified by `ticket`.
    ///
    /// Returns `false` and leaves the session alone if that generation is no
    /// longer the pending one (the session was reset or restarted meanwhile).
    pub fn finish_generation(&mut self, ticket: Uuid, questions: Vec<QuizQuestion>) -> bool {
        if self.pending != Some(ticket) {
            return false;
        }
        self.start(questions);
        true
    }

    /// Clears the in-flight flag after a failed generation. Inputs are kept so
    /// the user can resubmit. Stale tickets are ignored.
    pub fn fail_generation(&mut self, ticket: Uuid) {
        if self.pending == Some(ticket) {
            self.pending = None;
        }
    }

    pub fn select_option(&mut self, value: impl Into<String>) {
        self.selected_option = value.into();
        self.answer_revealed = false;
    }

    /// Reveals correctness for the current question.
    ///
    /// The first check of a question grades it; later checks only reveal.
    /// Checking the last question ends the quiz.
    pub fn check_answer(&mut self) {
        let Some(question) = self.questions.get(self.cursor) else {
            return;
        };

        self.answer_revealed = true;

        if !self.graded[self.cursor] {
            self.graded[self.cursor] = true;
            if self.selected_option == question.answer {
                self.correct_count += 1;
            }
        }

        if self.cursor + 1 == self.questions.len() {
            self.ended = true;
        }
    }

    pub fn next(&mut self) {
        if self.cursor + 1 < self.questions.len() {
            self.cursor += 1;
            self.selected_option.clear();
        }
        self.answer_revealed = false;
    }

    pub fn previous(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.selected_option.clear();
            self.answer_revealed = false;
        }
    }

    /// Back to the start screen.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn status(&self) -> SessionStatus {
        if self.questions.is_empty() {
            SessionStatus::Idle
        } else if self.ended {
            SessionStatus::Ended
        } else {
            SessionStatus::InProgress
        }
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected_option(&self) -> &str {
        &self.selected_option
    }

    pub fn answer_revealed(&self) -> bool {
        self.answer_revealed
    }

    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    pub fn ended(&self) -> bool {
        self.ended
    }

    pub fn inputs(&self) -> Option<&GenerateQuizRequest> {
        self.inputs.as_ref()
    }

    pub fn is_generating(&self) -> bool {
        self.pending.is_some()
    }

    /// 1-based position shown to the user.
    pub fn display_index(&self) -> usize {
        self.cursor + 1
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.cursor)
    }

    pub fn current_choices(&self) -> &[String] {
        self.current_question()
            .map(|q| q.choices.as_slice())
            .unwrap_or_default()
    }

    /// Only meaningful once the answer has been revealed.
    pub fn is_correct(&self) -> bool {
        self.current_question()
            .is_some_and(|q| self.selected_option == q.answer)
    }

    pub fn view(&self, id: Uuid, created_at: chrono::DateTime<chrono::Utc>) -> SessionView {
        let revealed = self.answer_revealed;
        SessionView {
            id,
            status: self.status(),
            display_index: self.display_index(),
            total_questions: self.questions.len(),
            current_question: self
                .current_question()
                .map(|q| PublicQuestion::from_question(q, revealed)),
            selected_option: self.selected_option.clone(),
            answer_revealed: revealed,
            is_correct: revealed.then(|| self.is_correct()),
            correct_count: self.correct_count,
            ended: self.ended,
            inputs: self.inputs.clone(),
            is_generating: self.is_generating(),
            created_at,
        }
    }
}

/// Serializable snapshot of a session, with derived values filled in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub id: Uuid,
    pub status: SessionStatus,
    pub display_index: usize,
    pub total_questions: usize,
    pub current_question: Option<PublicQuestion>,
    pub selected_option: String,
    pub answer_revealed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
    pub correct_count: u32,
    pub ended: bool,
    pub inputs: Option<GenerateQuizRequest>,
    pub is_generating: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
