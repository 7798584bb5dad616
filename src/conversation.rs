//! Bounded per-session conversation history.
//!
//! History is capped to an even number of turns so truncation never
//! splits a user/assistant exchange. Turns are appended only after a
//! complete successful exchange; failed or short-circuited requests
//! leave the history untouched.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::llm::Turn;

/// Session id used when the client sends none.
pub const DEFAULT_SESSION: &str = "default";

/// One session's rolling window of turns.
#[derive(Debug)]
pub struct ConversationState {
    turns: Vec<Turn>,
    cap: usize,
}

impl ConversationState {
    /// `cap` must be even; the config layer validates this before
    /// construction.
    pub fn new(cap: usize) -> Self {
        Self {
            turns: Vec::new(),
            cap,
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Record one completed exchange, dropping the oldest turns once the
    /// window is full.
    pub fn append_exchange(&mut self, user: &str, assistant: &str) {
        self.turns.push(Turn::user(user));
        self.turns.push(Turn::assistant(assistant));
        if self.turns.len() > self.cap {
            let excess = self.turns.len() - self.cap;
            self.turns.drain(..excess);
        }
    }
}

/// All live sessions. The outer lock is held only to look up or create
/// a session; each conversation carries its own lock so one slow
/// session never blocks the others.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Arc<Mutex<ConversationState>>>>,
    cap: usize,
}

impl SessionStore {
    pub fn new(cap: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            cap,
        }
    }

    /// Fetch the session's conversation, creating it on first use.
    pub fn session(&self, id: &str) -> Arc<Mutex<ConversationState>> {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(ConversationState::new(self.cap))))
            .clone()
    }
}
