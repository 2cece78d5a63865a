//! Runtime environment: a single stack of scope frames.

use std::collections::HashMap;

use crate::interpreter::value::Value;

type Frame = HashMap<String, Value>;

/// Variable bindings for one interpreter.
///
/// Blocks and calls push a frame on entry and pop it on exit. Lookups and
/// assignments search from the innermost frame outwards, so a function sees
/// whatever frames are on the stack when it is called.
#[derive(Debug, Clone)]
pub struct Environment {
    frames: Vec<Frame>,
}

impl Environment {
    /// An environment holding a single, empty global frame.
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::new()],
        }
    }

    pub fn push_frame(&mut self) {
        self.frames.push(Frame::new());
    }

    /// Pop the innermost frame. The global frame is never popped.
    pub fn pop_frame(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Number of frames currently on the stack.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Define a new variable in the innermost frame.
    /// Returns false if that frame already binds `name`.
    pub fn define(&mut self, name: &str, value: Value) -> bool {
        let frame = self.top_mut();
        if frame.contains_key(name) {
            return false;
        }
        frame.insert(name.to_string(), value);
        true
    }

    /// Get a variable's value, searching from the innermost frame.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(name))
            .cloned()
    }

    /// Assign to the innermost existing binding of `name`.
    /// Returns false if no frame binds it.
    pub fn assign(&mut self, name: &str, value: Value) -> bool {
        match self
            .frames
            .iter_mut()
            .rev()
            .find_map(|frame| frame.get_mut(name))
        {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Check if a variable exists in the innermost frame only.
    pub fn contains_local(&self, name: &str) -> bool {
        self.frames
            .last()
            .is_some_and(|frame| frame.contains_key(name))
    }

    fn top_mut(&mut self) -> &mut Frame {
        if self.frames.is_empty() {
            self.frames.push(Frame::new());
        }
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
