use chrono::{NaiveDate, Utc};
use formflow::config::WizardConfig;
use formflow::wizard::{SessionId, SessionStoreError, WizardSession, WizardSessionStore};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local session store; sessions vanish on restart and after
/// sitting idle for longer than the configured ttl.
#[derive(Clone)]
pub(crate) struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<SessionId, WizardSession>>>,
    capacity: usize,
    ttl: Duration,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::from_config(&WizardConfig::default())
    }
}

impl InMemorySessionStore {
    pub(crate) fn from_config(config: &WizardConfig) -> Self {
        Self::with_limits(config.session_capacity, config.session_ttl)
    }

    pub(crate) fn with_limits(capacity: usize, ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            capacity,
            ttl,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<SessionId, WizardSession>>, SessionStoreError> {
        self.sessions
            .lock()
            .map_err(|_| SessionStoreError::Unavailable("session store mutex poisoned".to_string()))
    }

    fn prune_expired(&self, sessions: &mut HashMap<SessionId, WizardSession>) {
        let now = Utc::now();
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now, self.ttl));
        let pruned = before - sessions.len();
        if pruned > 0 {
            debug!(pruned, "discarded idle wizard sessions");
        }
    }
}

impl WizardSessionStore for InMemorySessionStore {
    fn insert(&self, session: WizardSession) -> Result<WizardSession, SessionStoreError> {
        let mut guard = self.lock()?;
        self.prune_expired(&mut guard);
        if guard.contains_key(&session.id) {
            return Err(SessionStoreError::Conflict);
        }
        if guard.len() >= self.capacity {
            return Err(SessionStoreError::Unavailable(format!(
                "session capacity of {} reached",
                self.capacity
            )));
        }
        guard.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    fn update(&self, session: WizardSession) -> Result<(), SessionStoreError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&session.id) {
            guard.insert(session.id.clone(), session);
            Ok(())
        } else {
            Err(SessionStoreError::NotFound)
        }
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<WizardSession>, SessionStoreError> {
        let mut guard = self.lock()?;
        let expired = guard
            .get(id)
            .is_some_and(|session| session.is_expired(Utc::now(), self.ttl));
        if expired {
            debug!(session = %id, "wizard session expired");
            guard.remove(id);
            return Ok(None);
        }
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &SessionId) -> Result<Option<WizardSession>, SessionStoreError> {
        let mut guard = self.lock()?;
        Ok(guard.remove(id))
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
