//! In-memory `Backend` used by unit and router tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::database::backend::{Backend, BackendError, BackendResult, RowQuery};

#[derive(Default)]
pub struct MemoryBackend {
    tables: Mutex<HashMap<String, BackendResult<Value>>>,
    procedures: Mutex<HashMap<String, VecDeque<BackendResult<Value>>>>,
    stalls: Mutex<HashMap<String, usize>>,
    insert_failure: Mutex<Option<BackendError>>,
    rpc_calls: Mutex<Vec<(String, Value)>>,
    select_calls: Mutex<Vec<(String, RowQuery)>>,
    inserts: Mutex<Vec<(String, Value)>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(self, table: &str, rows: Value) -> Self {
        self.tables
            .lock()
            .unwrap()
            .insert(table.to_string(), Ok(rows));
        self
    }

    pub fn with_failing_table(self, table: &str, error: BackendError) -> Self {
        self.tables
            .lock()
            .unwrap()
            .insert(table.to_string(), Err(error));
        self
    }

    pub fn with_failing_inserts(self, error: BackendError) -> Self {
        *self.insert_failure.lock().unwrap() = Some(error);
        self
    }

    /// Queue a response. The last queued response keeps answering once the
    /// earlier ones are consumed.
    pub fn on_rpc(self, function: &str, response: BackendResult<Value>) -> Self {
        self.procedures
            .lock()
            .unwrap()
            .entry(function.to_string())
            .or_default()
            .push_back(response);
        self
    }

    /// The next `times` calls to `function` never complete.
    pub fn stall_rpc(self, function: &str, times: usize) -> Self {
        self.stalls
            .lock()
            .unwrap()
            .insert(function.to_string(), times);
        self
    }

    pub fn rpc_calls(&self, function: &str) -> Vec<Value> {
        self.rpc_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| name == function)
            .map(|(_, params)| params.clone())
            .collect()
    }

    pub fn select_calls(&self, table: &str) -> Vec<RowQuery> {
        self.select_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| name == table)
            .map(|(_, q)| q.clone())
            .collect()
    }

    pub fn inserted(&self, table: &str) -> Vec<Value> {
        self.inserts
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| name == table)
            .map(|(_, rows)| rows.clone())
            .collect()
    }

    fn take_stall(&self, function: &str) -> bool {
        let mut stalls = self.stalls.lock().unwrap();
        match stalls.get_mut(function) {
            Some(left) if *left > 0 => {
                *left -= 1;
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn select(&self, table: &str, query: &RowQuery) -> BackendResult<Value> {
        self.select_calls
            .lock()
            .unwrap()
            .push((table.to_string(), query.clone()));
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_else(|| Ok(json!([])))
    }

    async fn insert(&self, table: &str, rows: Value) -> BackendResult<()> {
        self.inserts
            .lock()
            .unwrap()
            .push((table.to_string(), rows));
        match self.insert_failure.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn rpc(&self, function: &str, params: Value) -> BackendResult<Value> {
        self.rpc_calls
            .lock()
            .unwrap()
            .push((function.to_string(), params));
        if self.take_stall(function) {
            std::future::pending::<()>().await;
        }
        let mut procedures = self.procedures.lock().unwrap();
        let Some(queue) = procedures.get_mut(function) else {
            return Err(BackendError::Status {
                status: 404,
                message: format!("unknown procedure {}", function),
            });
        };
        if queue.len() > 1 {
            queue.pop_front().unwrap_or_else(|| Ok(Value::Null))
        } else {
            queue.front().cloned().unwrap_or_else(|| Ok(Value::Null))
        }
    }
}

pub fn member_json(id: &str, name: &str, club: &str, status: &str) -> Value {
    json!({
        "member_id": id,
        "name": name,
        "display_name": null,
        "club": club,
        "division": "신인부",
        "grade": "B",
        "gender": "M",
        "status": status,
    })
}

pub fn event_json(id: &str, limit: Option<i64>) -> Value {
    json!({
        "event_id": id,
        "event_name": format!("대회 {}", id),
        "event_date": "2026-05-01",
        "status": "OPEN",
        "team_member_limit": limit,
        "entry_fee_team": null,
    })
}
