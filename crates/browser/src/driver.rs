//! The automation backend behind the browser ability

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::command::{Instruction, Query};
use crate::error::BrowserResult;

/// Executes queued browser instructions.
///
/// Implementations run every instruction in order and return exactly one
/// JSON answer per [`Instruction::Query`], in queue order.
#[async_trait]
pub trait Driver: Send + Sync {
    async fn run(&self, instructions: &[Instruction]) -> BrowserResult<Vec<Value>>;
}

type Responder = Box<dyn Fn(&Query) -> Value + Send + Sync>;

/// In-memory driver for tests and dry runs.
///
/// Records every batch it receives and answers queries from a responder
/// function.
pub struct RecordingDriver {
    batches: Mutex<Vec<Vec<Instruction>>>,
    responder: Responder,
}

impl RecordingDriver {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&Query) -> Value + Send + Sync + 'static,
    {
        Self {
            batches: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        }
    }

    /// A driver that answers every query with `null`.
    pub fn silent() -> Self {
        Self::new(|_| Value::Null)
    }

    /// Batches received so far, one per `run` call.
    pub fn batches(&self) -> Vec<Vec<Instruction>> {
        self.batches.lock().clone()
    }

    /// Every instruction received so far, flattened.
    pub fn instructions(&self) -> Vec<Instruction> {
        self.batches.lock().iter().flatten().cloned().collect()
    }
}

#[async_trait]
impl Driver for RecordingDriver {
    async fn run(&self, instructions: &[Instruction]) -> BrowserResult<Vec<Value>> {
        self.batches.lock().push(instructions.to_vec());
        Ok(instructions
            .iter()
            .filter_map(|instruction| match instruction {
                Instruction::Query(query) => Some((self.responder)(query)),
                Instruction::Command(_) => None,
            })
            .collect())
    }
}
