use std::collections::HashMap;
use std::sync::{Arc, PoisonError};
use std::time::{Duration, Instant};

use iam_graph_application::{AssignmentEditor, GraphViewEvent, GraphViewSink};
use iam_graph_core::{AppError, AppResult};
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

/// Collects editor signals until the next response drains them.
#[derive(Debug, Default)]
pub struct SessionViewBuffer {
    events: std::sync::Mutex<Vec<GraphViewEvent>>,
}

impl SessionViewBuffer {
    pub fn drain(&self) -> Vec<GraphViewEvent> {
        let mut events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *events)
    }
}

impl GraphViewSink for SessionViewBuffer {
    fn publish(&self, event: GraphViewEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// One open graph editor and the signals it has not delivered yet.
pub struct EditorSession {
    pub editor: AssignmentEditor,
    pub view: Arc<SessionViewBuffer>,
}

/// Idle time after which an abandoned session is dropped.
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

struct SessionEntry {
    session: Arc<Mutex<EditorSession>>,
    last_used: Instant,
}

/// Open editor sessions.
///
/// Interactions within a session are serialized by its mutex; sessions never
/// share an editor. Sessions idle for longer than the TTL are evicted
/// whenever a new session is opened.
#[derive(Clone)]
pub struct EditorSessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
    idle_ttl: Duration,
}

impl Default for EditorSessionRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TTL)
    }
}

impl EditorSessionRegistry {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            idle_ttl,
        }
    }

    pub async fn insert(&self, session: EditorSession) -> (Uuid, Arc<Mutex<EditorSession>>) {
        let now = Instant::now();
        self.evict_idle(now).await;

        let session_id = Uuid::new_v4();
        let shared = Arc::new(Mutex::new(session));
        self.sessions.write().await.insert(
            session_id,
            SessionEntry {
                session: shared.clone(),
                last_used: now,
            },
        );
        (session_id, shared)
    }

    pub async fn get(&self, session_id: Uuid) -> AppResult<Arc<Mutex<EditorSession>>> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions
            .get_mut(&session_id)
            .ok_or_else(|| AppError::NotFound(format!("editor session {session_id} is not open")))?;
        entry.last_used = Instant::now();
        Ok(entry.session.clone())
    }

    pub async fn remove(&self, session_id: Uuid) -> AppResult<()> {
        self.sessions
            .write()
            .await
            .remove(&session_id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("editor session {session_id} is not open")))
    }

    /// Drops every session not used within the idle TTL before `now`.
    pub async fn evict_idle(&self, now: Instant) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| now.saturating_duration_since(entry.last_used) <= self.idle_ttl);
        let evicted = before.saturating_sub(sessions.len());

        if evicted > 0 {
            info!(evicted, open = sessions.len(), "evicted idle editor sessions");
        }
        evicted
    }
}
