use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::{json, Map, Value};

use crate::forms::WizardDefinition;
use crate::wizard::service::{StartRequest, WizardService};
use crate::wizard::session::{SessionId, SessionStoreError, WizardSession, WizardSessionStore};
use crate::wizard::wizard_router;

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    pub(super) sessions: Arc<Mutex<HashMap<SessionId, WizardSession>>>,
}

impl WizardSessionStore for MemoryStore {
    fn insert(&self, session: WizardSession) -> Result<WizardSession, SessionStoreError> {
        let mut guard = self.sessions.lock().expect("store mutex poisoned");
        if guard.contains_key(&session.id) {
            return Err(SessionStoreError::Conflict);
        }
        guard.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    fn update(&self, session: WizardSession) -> Result<(), SessionStoreError> {
        let mut guard = self.sessions.lock().expect("store mutex poisoned");
        guard.insert(session.id.clone(), session);
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<WizardSession>, SessionStoreError> {
        let guard = self.sessions.lock().expect("store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &SessionId) -> Result<Option<WizardSession>, SessionStoreError> {
        let mut guard = self.sessions.lock().expect("store mutex poisoned");
        Ok(guard.remove(id))
    }
}

impl MemoryStore {
    pub(super) fn len(&self) -> usize {
        self.sessions.lock().expect("store mutex poisoned").len()
    }
}

pub(super) struct UnavailableStore;

impl WizardSessionStore for UnavailableStore {
    fn insert(&self, _session: WizardSession) -> Result<WizardSession, SessionStoreError> {
        Err(SessionStoreError::Unavailable("cache offline".to_string()))
    }

    fn update(&self, _session: WizardSession) -> Result<(), SessionStoreError> {
        Err(SessionStoreError::Unavailable("cache offline".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<WizardSession>, SessionStoreError> {
        Err(SessionStoreError::Unavailable("cache offline".to_string()))
    }

    fn remove(&self, _id: &SessionId) -> Result<Option<WizardSession>, SessionStoreError> {
        Err(SessionStoreError::Unavailable("cache offline".to_string()))
    }
}

pub(super) fn build_service() -> (WizardService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = WizardService::new(store.clone(), WizardDefinition::splitted_input());
    (service, store)
}

pub(super) fn start(service: &WizardService<MemoryStore>) -> SessionId {
    service
        .start(StartRequest::default())
        .expect("session starts")
        .id
}

pub(super) fn router_with_service(service: WizardService<MemoryStore>) -> axum::Router {
    wizard_router(Arc::new(service))
}

pub(super) fn fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

pub(super) fn step1_input() -> Map<String, Value> {
    fields(json!({
        "name": "A",
        "age": 34,
        "birthday": "1990-04-01",
        "bloodtype": "AB",
        "sex": "M",
        "language": "EN",
        "memo": "not owned by input-1",
    }))
}

pub(super) fn step2_input() -> Map<String, Value> {
    fields(json!({ "name": "ignored", "language": ["EN", "JA"], "memo": "x" }))
}

pub(super) fn step3_input() -> Map<String, Value> {
    fields(json!({
        "educations": [{ "year": 2004, "description": "University" }],
        "jobs": [{ "year": 2008, "description": "Engineer" }],
    }))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
