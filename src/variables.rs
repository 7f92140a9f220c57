// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2022, graphscript authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

use std::cell::Cell;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::rc::Weak;

use log::trace;
use thiserror::Error;

use crate::values::Value;
use crate::Identifier;

#[derive(Debug, Error)]
pub enum VariableError {
    #[error("Unknown identifier '{0}'")]
    UndefinedVariable(String),
}

/// A lexical environment of named variables.
///
/// Each scope is one frame of bindings plus an optional parent; looking up a name searches this
/// frame and then each ancestor in turn.  Creating a nested scope never copies any bindings.
///
/// `Scope` is a cheap, shared handle: clones refer to the same frame.  A frame that binds a
/// closure which captured that same frame forms a reference cycle, so the handles that the host
/// creates with [`new`][Scope::new] and [`nested`][Scope::nested] jointly own every frame that is
/// created underneath their root.  Once the last of them is dropped, all of those frames are
/// emptied, and closures that outlive their root no longer see any variables.
#[derive(Clone)]
pub struct Scope {
    frame: Rc<Frame>,
    owner: Option<Rc<Owner>>,
}

struct Frame {
    parent: Option<Rc<Frame>>,
    values: RefCell<HashMap<Identifier, Value>>,
    frames: Rc<Frames>,
}

/// The smallest number of tracked frames at which dead entries are pruned
const MIN_PRUNE: usize = 64;

/// Every frame created under one root.  Frames are tracked weakly, so tracking them never keeps
/// them alive.
struct Frames {
    frames: RefCell<Vec<Weak<Frame>>>,
    prune_at: Cell<usize>,
}

impl Frames {
    fn new() -> Frames {
        Frames {
            frames: RefCell::new(Vec::new()),
            prune_at: Cell::new(MIN_PRUNE),
        }
    }

    fn register(&self, frame: &Rc<Frame>) {
        let mut frames = self.frames.borrow_mut();
        if frames.len() >= self.prune_at.get() {
            frames.retain(|frame| frame.strong_count() > 0);
            self.prune_at.set((frames.len() * 2).max(MIN_PRUNE));
        }
        frames.push(Rc::downgrade(frame));
    }

    /// Empties every frame that is still alive.
    fn clear(&self) {
        let frames = std::mem::take(&mut *self.frames.borrow_mut());
        trace!("clearing {} frames", frames.len());
        for frame in frames.iter().filter_map(Weak::upgrade) {
            // dropped outside of the borrow, since dropping a closure can drop other frames
            let values = std::mem::take(&mut *frame.values.borrow_mut());
            drop(values);
        }
    }
}

/// Shared by the handles that the host holds on to
struct Owner(Rc<Frames>);

impl Drop for Owner {
    fn drop(&mut self) {
        self.0.clear();
    }
}

impl Scope {
    /// Creates a new, empty root scope.
    pub fn new() -> Scope {
        let frames = Rc::new(Frames::new());
        let frame = Rc::new(Frame {
            parent: None,
            values: RefCell::new(HashMap::new()),
            frames: frames.clone(),
        });
        frames.register(&frame);
        Scope {
            frame,
            owner: Some(Rc::new(Owner(frames))),
        }
    }

    /// Creates a new, empty scope whose parent is this one.
    pub fn nested(&self) -> Scope {
        let frame = Rc::new(Frame {
            parent: Some(self.frame.clone()),
            values: RefCell::new(HashMap::new()),
            frames: self.frame.frames.clone(),
        });
        self.frame.frames.register(&frame);
        Scope {
            frame,
            owner: self.owner.clone(),
        }
    }

    /// Returns a handle to the same frame that does not keep the root's frames from being
    /// emptied.  Closures and running evaluations hold these.
    pub(crate) fn capture(&self) -> Scope {
        Scope {
            frame: self.frame.clone(),
            owner: None,
        }
    }

    /// Returns whether two handles refer to the same frame.
    pub fn ptr_eq(&self, other: &Scope) -> bool {
        Rc::ptr_eq(&self.frame, &other.frame)
    }

    /// Returns the value of a variable from the nearest frame that defines it.
    pub fn get(&self, name: &str) -> Option<Value> {
        let mut frame = &*self.frame;
        loop {
            if let Some(value) = frame.values.borrow().get(name) {
                return Some(value.clone());
            }
            frame = frame.parent.as_deref()?;
        }
    }

    /// Returns whether this frame itself defines a variable, ignoring its ancestors.
    pub fn contains_local(&self, name: &str) -> bool {
        self.frame.values.borrow().contains_key(name)
    }

    /// Defines a variable in this frame, shadowing any definition in an ancestor and replacing
    /// any previous definition in this frame.
    pub fn declare(&self, name: Identifier, value: Value) {
        self.frame.values.borrow_mut().insert(name, value);
    }

    /// Defines a variable in this frame from any value that can be converted into a script value.
    pub fn set<V: Into<Value>>(&self, name: &str, value: V) {
        self.declare(Identifier::from(name), value.into());
    }

    /// Overwrites the variable in the nearest frame that defines it, returning an error if no
    /// frame does.
    pub fn set_existing(&self, name: &str, value: Value) -> Result<(), VariableError> {
        let mut frame = &*self.frame;
        loop {
            if let Some(slot) = frame.values.borrow_mut().get_mut(name) {
                *slot = value;
                return Ok(());
            }
            frame = match frame.parent.as_deref() {
                Some(parent) => parent,
                None => return Err(VariableError::UndefinedVariable(name.to_string())),
            };
        }
    }
}

impl Default for Scope {
    fn default() -> Scope {
        Scope::new()
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.frame.fmt(f)
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let values = self.values.borrow();
        let mut names = values.keys().map(|name| name.as_str()).collect::<Vec<_>>();
        names.sort_unstable();
        f.debug_struct("Scope")
            .field("names", &names)
            .field("parent", &self.parent)
            .finish()
    }
}
