use crate::{generator::QuizGenerator, store::SessionStore};
use axum::extract::FromRef;

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub generator: QuizGenerator,
}

impl FromRef<AppState> for SessionStore {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl FromRef<AppState> for QuizGenerator {
    fn from_ref(state: &AppState) -> Self {
        state.generator.clone()
    }
}
