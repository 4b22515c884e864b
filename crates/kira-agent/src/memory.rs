// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Conversation Memory (C14): a per-`trace_id` FIFO-bounded window over
//! recent exchanges, fed to the LLM as context on the next turn. Grounded
//! on `original_source/tests/unit/test_conversation_memory.py` — note the
//! limit is in *exchanges* (one user turn + one assistant turn), not raw
//! messages.

use std::collections::{HashMap, VecDeque};

use crate::router::{Message, Role};

const DEFAULT_MAX_EXCHANGES: usize = 5;

/// One round: a user message and the assistant's reply to it.
#[derive(Debug, Clone)]
struct Exchange {
    user: String,
    assistant: String,
}

/// Bounded, per-session conversation history. Each session independently
/// keeps at most `max_exchanges` most recent exchanges; older ones are
/// evicted first.
pub struct ConversationMemory {
    max_exchanges: usize,
    sessions: HashMap<String, VecDeque<Exchange>>,
}

impl ConversationMemory {
    pub fn new(max_exchanges: usize) -> Self {
        Self { max_exchanges, sessions: HashMap::new() }
    }

    pub fn has_context(&self, trace_id: &str) -> bool {
        self.sessions.contains_key(trace_id)
    }

    /// Records one exchange, evicting the oldest if the session is at
    /// capacity.
    pub fn add_turn(&mut self, trace_id: &str, user: impl Into<String>, assistant: impl Into<String>) {
        let session = self.sessions.entry(trace_id.to_string()).or_default();
        if session.len() >= self.max_exchanges {
            session.pop_front();
        }
        session.push_back(Exchange { user: user.into(), assistant: assistant.into() });
    }

    /// Flattens the session's exchanges into alternating user/assistant
    /// [`Message`]s, oldest first. Returns an empty vec for an unknown
    /// session.
    pub fn get_context_messages(&self, trace_id: &str) -> Vec<Message> {
        let Some(session) = self.sessions.get(trace_id) else {
            return Vec::new();
        };
        let mut messages = Vec::with_capacity(session.len() * 2);
        for exchange in session {
            messages.push(Message { role: Role::User, content: exchange.user.clone() });
            messages.push(Message { role: Role::Assistant, content: exchange.assistant.clone() });
        }
        messages
    }

    pub fn clear_session(&mut self, trace_id: &str) {
        self.sessions.remove(trace_id);
    }
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_EXCHANGES)
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
