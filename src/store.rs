// src/store.rs

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        question::{GenerateQuizRequest, QuizQuestion},
        session::{QuizSession, SessionView},
    },
};

struct Entry {
    session: QuizSession,
    created_at: DateTime<Utc>,
    last_active: DateTime<Utc>,
    /// Outbound model call currently running for this session. Survives a
    /// reset: the call is still consuming the session's slot until it returns.
    in_flight: Option<Uuid>,
}

/// In-memory registry of quiz sessions, one per client.
///
/// The lock is held only for the duration of a single session mutation and
/// never across an await point.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<Uuid, Entry>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Entry>>, AppError> {
        self.inner
            .lock()
            .map_err(|_| AppError::InternalServerError("session store lock poisoned".to_string()))
    }

    fn with_entry<T>(&self, id: Uuid, f: impl FnOnce(&mut Entry) -> T) -> Result<(T, SessionView), AppError> {
        let mut sessions = self.lock()?;
        let entry = sessions
            .get_mut(&id)
            .ok_or(AppError::NotFound("Session not found".to_string()))?;

        let out = f(entry);
        entry.last_active = Utc::now();

        Ok((out, entry.session.view(id, entry.created_at)))
    }

    /// Creates an idle session. Expired sessions are dropped on the way.
    pub fn create(&self) -> Result<SessionView, AppError> {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let mut sessions = self.lock()?;

        let before = sessions.len();
        let ttl = self.ttl;
        sessions.retain(|_, e| now - e.last_active < ttl);
        let pruned = before - sessions.len();
        if pruned > 0 {
            tracing::info!("Pruned {} expired sessions", pruned);
        }

        let session = QuizSession::new();
        let view = session.view(id, now);
        sessions.insert(
            id,
            Entry {
                session,
                created_at: now,
                last_active: now,
                in_flight: None,
            },
        );
        tracing::info!(%id, "Session created");

        Ok(view)
    }

    pub fn get(&self, id: Uuid) -> Result<SessionView, AppError> {
        self.update(id, |_| ())
    }

    /// Applies `f` to the session and returns its value together with a fresh view.
    pub fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut QuizSession) -> T,
    ) -> Result<(T, SessionView), AppError> {
        self.with_entry(id, |entry| f(&mut entry.session))
    }

    pub fn update(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut QuizSession),
    ) -> Result<SessionView, AppError> {
        self.with_session(id, f).map(|(_, view)| view)
    }

    /// Reserves the session's generation slot.
    ///
    /// Fails with `Conflict` while an earlier call for the same session is still
    /// running, even if the session was reset since. The returned guard frees
    /// the slot when dropped, including when the request future is cancelled.
    pub fn begin_generation(
        &self,
        id: Uuid,
        inputs: GenerateQuizRequest,
    ) -> Result<PendingGeneration, AppError> {
        let ticket = Uuid::new_v4();

        let (started, _) = self.with_entry(id, |entry| {
            if entry.in_flight.is_some() || !entry.session.begin_generation(ticket, inputs) {
                return false;
            }
            entry.in_flight = Some(ticket);
            true
        })?;

        if !started {
            return Err(AppError::Conflict(
                "A quiz is already being generated for this session".to_string(),
            ));
        }

        Ok(PendingGeneration {
            store: self.clone(),
            id,
            ticket,
        })
    }

    fn release(&self, id: Uuid, ticket: Uuid) {
        let Ok(mut sessions) = self.inner.lock() else {
            return;
        };
        if let Some(entry) = sessions.get_mut(&id) {
            if entry.in_flight == Some(ticket) {
                entry.in_flight = None;
            }
            entry.session.fail_generation(ticket);
        }
    }

    pub fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.lock()?
            .remove(&id)
            .map(|_| tracing::info!(%id, "Session discarded"))
            .ok_or(AppError::NotFound("Session not found".to_string()))
    }
}

/// A running generation for one session. Dropping it without calling
/// [`PendingGeneration::finish`] counts as a failure.
pub struct PendingGeneration {
    store: SessionStore,
    id: Uuid,
    ticket: Uuid,
}

impl PendingGeneration {
    /// Hands the generated questions to the session.
    ///
    /// Returns `false` in the first slot if the session no longer waits for
    /// this generation, in which case nothing changes.
    pub fn finish(self, questions: Vec<QuizQuestion>) -> Result<(bool, SessionView), AppError> {
        let ticket = self.ticket;
        self.store.with_entry(self.id, |entry| {
            if entry.in_flight == Some(ticket) {
                entry.in_flight = None;
            }
            entry.session.finish_generation(ticket, questions)
        })
    }
}

impl Drop for PendingGeneration {
    fn drop(&mut self) {
        self.store.release(self.id, self.ticket);
    }
}
