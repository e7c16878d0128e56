//! Mock session handler for testing without real session semantics.
//!
//! Records every handler invocation in order and supports scripted
//! failures per capability.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::handler::{HandlerError, SessionHandler};

/// A recorded handler invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerEvent {
    Connect,
    Publish { topic: String, payload: Vec<u8> },
    Disconnect,
}

/// Mock implementation of the `SessionHandler` trait.
///
/// Thread-safe via `Mutex` (fine for test contexts). A scripted failure
/// applies to every subsequent call of that capability.
#[derive(Default)]
pub struct MockSessionHandler {
    events: Mutex<Vec<HandlerEvent>>,
    fail_connect: Mutex<Option<String>>,
    fail_publish: Mutex<Option<String>>,
    fail_disconnect: Mutex<Option<String>>,
}

impl MockSessionHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `connect` call fail with `msg`.
    pub fn fail_connect(&self, msg: impl Into<String>) {
        *self.fail_connect.lock().unwrap() = Some(msg.into());
    }

    /// Make every `publish` call fail with `msg`.
    pub fn fail_publish(&self, msg: impl Into<String>) {
        *self.fail_publish.lock().unwrap() = Some(msg.into());
    }

    /// Make every `disconnect` call fail with `msg`.
    pub fn fail_disconnect(&self, msg: impl Into<String>) {
        *self.fail_disconnect.lock().unwrap() = Some(msg.into());
    }

    /// All recorded invocations, in order.
    pub fn events(&self) -> Vec<HandlerEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn connect_count(&self) -> usize {
        self.count(|e| matches!(e, HandlerEvent::Connect))
    }

    pub fn publish_count(&self) -> usize {
        self.count(|e| matches!(e, HandlerEvent::Publish { .. }))
    }

    pub fn disconnect_count(&self) -> usize {
        self.count(|e| matches!(e, HandlerEvent::Disconnect))
    }

    fn count(&self, pred: impl Fn(&HandlerEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| pred(e)).count()
    }

    fn scripted(&self, slot: &Mutex<Option<String>>) -> Result<(), HandlerError> {
        match slot.lock().unwrap().as_ref() {
            Some(msg) => Err(HandlerError::new(msg.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SessionHandler for MockSessionHandler {
    async fn connect(&self) -> Result<(), HandlerError> {
        self.events.lock().unwrap().push(HandlerEvent::Connect);
        self.scripted(&self.fail_connect)
    }

    async fn publish(&self, topic: &str, payload: &[u8]) -> Result<(), HandlerError> {
        self.events.lock().unwrap().push(HandlerEvent::Publish {
            topic: topic.to_string(),
            payload: payload.to_vec(),
        });
        self.scripted(&self.fail_publish)
    }

    async fn disconnect(&self) -> Result<(), HandlerError> {
        self.events.lock().unwrap().push(HandlerEvent::Disconnect);
        self.scripted(&self.fail_disconnect)
    }
}
