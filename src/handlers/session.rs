// src/handlers/session.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    generator::QuizGenerator,
    models::{
        question::{GenerateQuizRequest, SelectOptionRequest},
        session::QuizSession,
    },
    store::SessionStore,
};

/// Opens a fresh, idle session (the start screen).
pub async fn create_session(
    State(sessions): State<SessionStore>,
) -> Result<impl IntoResponse, AppError> {
    let view = sessions.create()?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn get_session(
    State(sessions): State<SessionStore>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(sessions.get(id)?))
}

pub async fn delete_session(
    State(sessions): State<SessionStore>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    sessions.remove(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Generates a quiz for the session and starts it.
///
/// * Rejects a second request while one is in flight for the same session.
/// * The session lock is released during the model call.
/// * On failure the in-flight flag is cleared and the session keeps its inputs,
///   so the user stays on the start screen and can resubmit.
/// * A result that arrives after the session was reset is discarded.
pub async fn generate_quiz(
    State(sessions): State<SessionStore>,
    State(generator): State<QuizGenerator>,
    Path(id): Path<Uuid>,
    Json(payload): Json<GenerateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let generation = sessions.begin_generation(id, payload.clone())?;

    let questions = generator
        .generate(&payload.topic, &payload.difficulty, &payload.count)
        .await?;

    if questions.is_empty() {
        return Err(AppError::GenerationFailed(
            "model returned an empty quiz".to_string(),
        ));
    }

    let total = questions.len();
    let (applied, view) = generation.finish(questions)?;
    if !applied {
        tracing::info!(%id, "Discarding quiz generated for a reset session");
        return Err(AppError::Conflict(
            "The session was reset while the quiz was being generated".to_string(),
        ));
    }

    tracing::info!(%id, total, "Quiz started");
    Ok(Json(view))
}

pub async fn select_option(
    State(sessions): State<SessionStore>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SelectOptionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    Ok(Json(sessions.update(id, |s| s.select_option(payload.value))?))
}

pub async fn check_answer(
    State(sessions): State<SessionStore>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let view = sessions.update(id, QuizSession::check_answer)?;
    if view.ended {
        tracing::debug!(%id, correct = view.correct_count, "Quiz ended");
    }
    Ok(Json(view))
}

pub async fn next_question(
    State(sessions): State<SessionStore>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(sessions.update(id, QuizSession::next)?))
}

pub async fn previous_question(
    State(sessions): State<SessionStore>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(sessions.update(id, QuizSession::previous)?))
}

/// Returns the session to the start screen.
pub async fn reset_session(
    State(sessions): State<SessionStore>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let view = sessions.update(id, QuizSession::reset)?;
    tracing::info!(%id, "Session reset");
    Ok(Json(view))
}
