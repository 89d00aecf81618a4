//! Free-form document collection behind `/api/items`.
//!
//! Documents are arbitrary JSON objects. Each one gets a fresh `_id` on
//! insert. With a backing file the whole collection is rewritten on every
//! insert; otherwise it lives in memory only.

use std::path::PathBuf;

use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::persist::{load_json, write_json};

pub struct ItemStore {
    docs: Mutex<Vec<Value>>,
    file: Option<PathBuf>,
}

impl ItemStore {
    pub fn in_memory() -> Self {
        Self {
            docs: Mutex::new(Vec::new()),
            file: None,
        }
    }

    /// Back the collection with `path`, loading what is already there.
    pub fn open(path: PathBuf) -> Result<Self, AppError> {
        let docs: Vec<Value> = load_json(&path)?.unwrap_or_default();
        Ok(Self {
            docs: Mutex::new(docs),
            file: Some(path),
        })
    }

    pub async fn list(&self) -> Vec<Value> {
        self.docs.lock().await.clone()
    }

    /// Store `doc`, returning it with its `_id`.
    pub async fn insert(&self, doc: Value) -> Result<Value, AppError> {
        let Value::Object(fields) = doc else {
            return Err(AppError::BadRequest("item must be a JSON object".into()));
        };
        let doc = stamp(fields);

        let mut docs = self.docs.lock().await;
        docs.push(doc.clone());
        if let Some(path) = &self.file {
            if let Err(e) = write_json(path, &*docs).await {
                docs.pop();
                return Err(e);
            }
        }
        Ok(doc)
    }
}

fn stamp(mut fields: Map<String, Value>) -> Value {
    let bytes: [u8; 12] = rand::random();
    let id: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    fields.insert("_id".to_string(), Value::String(id));
    Value::Object(fields)
}
