//! Lexical scopes as a stack of frames.
//!
//! Frame 0 is the global frame and is never popped. Name resolution walks
//! from the innermost frame outward. While *local mode* is on, resolution
//! and binding see only the innermost frame; the evaluator switches it on
//! for `local` declarations.
//!
//! A user function call detaches every frame above the global one and
//! pushes a fresh frame, so a function body sees its own locals and the
//! globals but never its caller's locals. [`SymbolTableStack::leave_call`]
//! puts the caller's frames back.

use rustc_hash::FxHashMap;

use carbon_patterns::Value;

/// Bindings of one scope.
pub type Frame = FxHashMap<String, Value>;

/// Caller frames set aside for the duration of a call.
#[must_use = "the caller's frames must be restored with leave_call"]
pub struct CallScope {
    frames: Vec<Frame>,
    base: usize,
    local_mode: bool,
}

/// The scope chain of one interpreter.
pub struct SymbolTableStack {
    frames: Vec<Frame>,
    /// Frame receiving assignments to names bound nowhere: the current
    /// call's frame, or the global frame at top level.
    base: usize,
    local_mode: bool,
}

impl SymbolTableStack {
    pub fn new() -> Self {
        SymbolTableStack {
            frames: vec![Frame::default()],
            base: 0,
            local_mode: false,
        }
    }

    /// A stack whose global frame is `global`.
    pub fn with_global(global: Frame) -> Self {
        SymbolTableStack {
            frames: vec![global],
            base: 0,
            local_mode: false,
        }
    }

    /// Number of frames, global included.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn push(&mut self) {
        self.frames.push(Frame::default());
    }

    /// # Panics
    ///
    /// Popping the global frame or the current call's own frame is an
    /// evaluator bug.
    pub fn pop(&mut self) {
        if self.frames.len() <= self.base.max(1) {
            panic!("implementation error: scope pop below frame {}", self.base);
        }
        self.frames.pop();
    }

    pub fn local_mode(&self) -> bool {
        self.local_mode
    }

    /// Switch local mode, returning the previous setting.
    pub fn set_local_mode(&mut self, on: bool) -> bool {
        std::mem::replace(&mut self.local_mode, on)
    }

    fn innermost(&mut self) -> &mut Frame {
        match self.frames.last_mut() {
            Some(frame) => frame,
            None => panic!("implementation error: symbol table without frames"),
        }
    }

    /// Look `name` up, innermost frame first.
    pub fn resolve(&self, name: &str) -> Option<&Value> {
        if self.local_mode {
            return self.frames.last().and_then(|frame| frame.get(name));
        }
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    /// Bind `name` in the innermost frame, shadowing outer bindings.
    pub fn define_local(&mut self, name: &str, value: Value) {
        self.innermost().insert(name.to_string(), value);
    }

    /// Bind `name` in the global frame.
    pub fn define_global(&mut self, name: &str, value: Value) {
        self.frames[0].insert(name.to_string(), value);
    }

    /// Plain assignment.
    ///
    /// In local mode the innermost frame gets the binding. Otherwise the
    /// nearest existing binding is rebound, and a name bound nowhere is
    /// created in the current call's frame.
    pub fn assign(&mut self, name: &str, value: Value) {
        if self.local_mode {
            self.define_local(name, value);
            return;
        }
        if let Some(slot) = self
            .frames
            .iter_mut()
            .rev()
            .find_map(|frame| frame.get_mut(name))
        {
            *slot = value;
            return;
        }
        self.frames[self.base].insert(name.to_string(), value);
    }

    /// Remove the binding from the innermost frame that has one.
    pub fn delete(&mut self, name: &str) -> bool {
        self.frames
            .iter_mut()
            .rev()
            .any(|frame| frame.remove(name).is_some())
    }

    /// Set the caller's frames aside and open the frame of a new call.
    pub fn enter_call(&mut self) -> CallScope {
        let frames = self.frames.split_off(1);
        self.frames.push(Frame::default());
        CallScope {
            frames,
            base: std::mem::replace(&mut self.base, 1),
            local_mode: self.set_local_mode(false),
        }
    }

    /// Drop the call's frames and restore the caller's.
    pub fn leave_call(&mut self, scope: CallScope) {
        self.frames.truncate(1);
        self.frames.extend(scope.frames);
        self.base = scope.base;
        self.local_mode = scope.local_mode;
    }

    pub fn global(&self) -> &Frame {
        &self.frames[0]
    }

    /// Sorted names visible from the innermost frame.
    pub fn visible_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .frames
            .iter()
            .flat_map(|frame| frame.keys().map(String::as_str))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

impl Default for SymbolTableStack {
    fn default() -> Self {
        Self::new()
    }
}
