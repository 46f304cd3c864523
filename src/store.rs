use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::models::session::{Role, Session};
use crate::utils::errors::WorkflowError;
use crate::workspace::Workspace;

pub const DEFAULT_SESSION_IDLE_MINUTES: i64 = 120;
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

/// One logged-in session and the dashboard state it owns.
pub struct SessionEntry {
    pub session: Session,
    pub workspace: Mutex<Workspace>,
    /// Held for the whole of a format check so a session runs at most one at a time.
    pub format_gate: Mutex<()>,
    last_seen: AtomicI64,
}

impl SessionEntry {
    fn new(session: Session, now: DateTime<Utc>) -> Self {
        SessionEntry {
            workspace: Mutex::new(Workspace::for_session(&session)),
            format_gate: Mutex::new(()),
            last_seen: AtomicI64::new(now.timestamp_millis()),
            session,
        }
    }

    /// Marks the session as used at `now`.
    pub fn touch(&self, now: DateTime<Utc>) {
        self.last_seen.fetch_max(now.timestamp_millis(), Ordering::Relaxed);
    }

    pub fn last_seen(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.last_seen.load(Ordering::Relaxed)).unwrap_or_default()
    }

    fn is_idle(&self, now: DateTime<Utc>, idle_timeout: Duration) -> bool {
        now - self.last_seen() > idle_timeout
    }
}

/// Live sessions keyed by the id carried in their token.
///
/// Tokens never expire, but a session left unused for longer than the idle
/// timeout is reclaimed the next time someone logs in. The number of live
/// sessions is capped.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Arc<SessionEntry>>>,
    idle_timeout: Duration,
    max_sessions: usize,
}

#[derive(Debug, Default, Serialize, ToSchema)]
pub struct SessionStats {
    pub teachers: usize,
    pub students: usize,
    pub admins: usize,
}

impl SessionStats {
    pub fn total(&self) -> usize {
        self.teachers + self.students + self.admins
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(Duration::minutes(DEFAULT_SESSION_IDLE_MINUTES), DEFAULT_MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(idle_timeout: Duration, max_sessions: usize) -> Self {
        SessionStore {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
            max_sessions,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::with_limits(
            Duration::minutes(config.session_idle_minutes as i64),
            config.max_sessions,
        )
    }

    /// Creates a session with a freshly seeded workspace for its role.
    pub fn open(&self, name: &str, role: Role) -> Result<Session, WorkflowError> {
        self.open_at(name, role, Utc::now())
    }

    pub fn open_at(&self, name: &str, role: Role, now: DateTime<Utc>) -> Result<Session, WorkflowError> {
        let session = Session {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            role,
        };

        let mut sessions = self.write();
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.is_idle(now, self.idle_timeout));
        if sessions.len() < before {
            log::info!("Evicted {} idle sessions", before - sessions.len());
        }

        if sessions.len() >= self.max_sessions {
            log::warn!("Session limit of {} reached, refusing login for {}", self.max_sessions, session.name);
            return Err(WorkflowError::SessionLimit {
                max: self.max_sessions,
            });
        }

        sessions.insert(session.id, Arc::new(SessionEntry::new(session.clone(), now)));
        drop(sessions);

        log::info!("Opened {:?} session {} for {}", role, session.id, session.name);
        Ok(session)
    }

    pub fn get(&self, id: &Uuid) -> Option<Arc<SessionEntry>> {
        self.read().get(id).cloned()
    }

    /// Drops the session and its workspace. Returns false when it was already gone.
    pub fn close(&self, id: &Uuid) -> bool {
        let removed = self.write().remove(id).is_some();
        if removed {
            log::info!("Closed session {}", id);
        }
        removed
    }

    pub fn stats(&self) -> SessionStats {
        self.read()
            .values()
            .fold(SessionStats::default(), |mut stats, entry| {
                match entry.session.role {
                    Role::Teacher => stats.teachers += 1,
                    Role::Student => stats.students += 1,
                    Role::Admin => stats.admins += 1,
                }
                stats
            })
    }

    // Poisoning leaves the map intact.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<Uuid, Arc<SessionEntry>>> {
        self.sessions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<Uuid, Arc<SessionEntry>>> {
        self.sessions.write().unwrap_or_else(|e| e.into_inner())
    }
}
