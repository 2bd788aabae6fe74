//! Test-only generator fakes and payload builders.

use crate::lm::{TextGenerator, TransportError};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::VecDeque;

/// Build a well-formed generation payload carrying `text`.
pub fn candidate_payload(text: &str) -> Value {
    json!({
        "candidates": [
            { "content": { "parts": [{ "text": text }] } }
        ]
    })
}

/// Generator that replays scripted replies in order and records prompts.
///
/// Once the script runs out the last reply is repeated.
pub struct ScriptedGenerator {
    replies: RefCell<VecDeque<Result<Value, TransportError>>>,
    last: RefCell<Option<Result<Value, TransportError>>>,
    prompts: RefCell<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(replies: Vec<Result<Value, TransportError>>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
            last: RefCell::new(None),
            prompts: RefCell::new(Vec::new()),
        }
    }

    /// Generator whose every call returns a joke with `text`.
    pub fn always(text: &str) -> Self {
        Self::new(vec![Ok(candidate_payload(text))])
    }

    pub fn calls(&self) -> usize {
        self.prompts.borrow().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }
}

impl TextGenerator for ScriptedGenerator {
    fn generate(&self, prompt: &str) -> Result<Value, TransportError> {
        self.prompts.borrow_mut().push(prompt.to_string());
        let next = self.replies.borrow_mut().pop_front();
        match next {
            Some(reply) => {
                *self.last.borrow_mut() = Some(reply.clone());
                reply
            }
            None => self
                .last
                .borrow()
                .clone()
                .unwrap_or_else(|| Err(TransportError::Connection("script empty".to_string()))),
        }
    }
}
