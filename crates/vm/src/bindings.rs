//! Lexical scope chain for a single subroutine call.
//!
//! Frames live in an arena and point at their parent by index. A child frame
//! is pushed when a branch or loop body starts and popped when it returns,
//! so the innermost frame is always the last one in the arena.

use std::collections::HashMap;

use crate::error::RuntimeError;
use imperivm_common::Value;

#[derive(Debug, Default)]
struct Frame {
    names: HashMap<String, Value>,
    /// Index of the enclosing frame. `None` for the root.
    parent: Option<usize>,
}

/// A chain of scope frames rooted at a subroutine call.
#[derive(Debug)]
pub struct Bindings {
    frames: Vec<Frame>,
}

impl Default for Bindings {
    fn default() -> Self {
        Self::new()
    }
}

impl Bindings {
    /// A chain holding only an empty root frame.
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::default()],
        }
    }

    fn current(&self) -> usize {
        self.frames.len() - 1
    }

    /// Number of frames in the chain, root included.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Look `name` up in the innermost frame, then in each parent in turn.
    pub fn resolve(&self, name: &str) -> Result<&Value, RuntimeError> {
        let mut frame = Some(self.current());
        while let Some(index) = frame {
            let f = &self.frames[index];
            if let Some(value) = f.names.get(name) {
                return Ok(value);
            }
            frame = f.parent;
        }
        Err(RuntimeError::UnboundName {
            name: name.to_string(),
        })
    }

    /// Write `value` to the nearest frame that already binds `name`.
    ///
    /// Outer bindings are mutated in place, never shadowed. When no frame
    /// binds `name`, it is created in the innermost frame.
    pub fn assign(&mut self, name: &str, value: Value) {
        let innermost = self.current();
        let mut frame = Some(innermost);
        while let Some(index) = frame {
            if let Some(slot) = self.frames[index].names.get_mut(name) {
                *slot = value;
                return;
            }
            frame = self.frames[index].parent;
        }
        self.frames[innermost]
            .names
            .insert(name.to_string(), value);
    }

    /// Open an empty child frame whose parent is the current frame.
    pub fn inherit(&mut self) {
        let parent = self.current();
        self.frames.push(Frame {
            names: HashMap::new(),
            parent: Some(parent),
        });
    }

    /// Discard the innermost child frame and everything bound in it.
    ///
    /// The root frame is never discarded.
    pub fn leave(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Whether the innermost frame itself binds `name`.
    pub fn binds_locally(&self, name: &str) -> bool {
        self.frames[self.current()].names.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_unbound_fails() {
        let bindings = Bindings::new();
        assert_eq!(
            bindings.resolve("x"),
            Err(RuntimeError::UnboundName {
                name: "x".to_string()
            })
        );
    }

    #[test]
    fn assign_then_resolve() {
        let mut bindings = Bindings::new();
        bindings.assign("x", Value::Integer(3));
        assert_eq!(bindings.resolve("x"), Ok(&Value::Integer(3)));
    }

    #[test]
    fn child_reads_parent() {
        let mut bindings = Bindings::new();
        bindings.assign("x", Value::Integer(1));
        bindings.inherit();
        assert_eq!(bindings.resolve("x"), Ok(&Value::Integer(1)));
    }

    #[test]
    fn child_assign_mutates_parent_without_shadowing() {
        let mut bindings = Bindings::new();
        bindings.assign("x", Value::Integer(1));
        bindings.inherit();
        bindings.assign("x", Value::Integer(2));
        assert!(!bindings.binds_locally("x"));
        bindings.leave();
        assert_eq!(bindings.resolve("x"), Ok(&Value::Integer(2)));
    }

    #[test]
    fn mutation_reaches_grandparent() {
        let mut bindings = Bindings::new();
        bindings.assign("x", Value::Integer(1));
        bindings.inherit();
        bindings.inherit();
        bindings.assign("x", Value::from("deep"));
        bindings.leave();
        bindings.leave();
        assert_eq!(bindings.resolve("x"), Ok(&Value::from("deep")));
        assert_eq!(bindings.depth(), 1);
    }

    #[test]
    fn new_name_in_child_is_local() {
        let mut bindings = Bindings::new();
        bindings.inherit();
        bindings.assign("y", Value::Integer(5));
        assert!(bindings.binds_locally("y"));
        bindings.leave();
        assert!(bindings.resolve("y").is_err());
    }

    #[test]
    fn root_is_never_discarded() {
        let mut bindings = Bindings::new();
        bindings.assign("x", Value::Integer(1));
        bindings.leave();
        assert_eq!(bindings.depth(), 1);
        assert_eq!(bindings.resolve("x"), Ok(&Value::Integer(1)));
    }
}
