//! Shared serializer state: the visit stack, variables, the endianness
//! latch, and the sticky failure flags.

use indexmap::IndexMap;

use crate::flags::Flags;
use crate::node::SerializerNode;
use crate::scalar::SCRATCH_LEN;

/// State shared by every backend while a serialize call is live.
///
/// One instance is created per top-level call; the stack must be empty
/// again when the call returns. Failures do not propagate as results from
/// individual field emitters: they stick as flags here, and the top-level
/// caller inspects them afterwards.
#[derive(Debug, Default)]
pub struct SerializerState {
    stack: Vec<SerializerNode>,
    variables: IndexMap<&'static str, i32>,
    big_endian: bool,
    condition_was_true: bool,
    errored: bool,
    eof: bool,
}

impl SerializerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Visit a new child node.
    pub fn begin(&mut self, type_name: &'static str, name: &'static str, flags: Flags) {
        self.stack.push(SerializerNode::new(type_name, name, flags));
    }

    /// Leave the current node, applying its post-hooks: variable capture,
    /// the endianness latch, and the conditional bookkeeping flag.
    pub fn end(&mut self) {
        let Some(node) = self.stack.pop() else {
            debug_assert!(false, "end() without a matching begin()");
            self.errored = true;
            return;
        };
        if node.flags.contains(Flags::VARIABLE) {
            match node.captured_int() {
                Some(value) => self.set_variable(node.name, value),
                None => {
                    debug_assert!(
                        false,
                        "Variable flag requires a single 1, 2, or 4 byte scalar"
                    );
                    self.errored = true;
                }
            }
        }
        if node.flags.contains(Flags::BIG_ENDIAN_WHEN_TRUE) && node.captured_truthy() {
            // The latch only ever sets within one serialize call.
            self.big_endian = true;
        }
        if node.flags.contains(Flags::CONDITIONAL_IF) {
            self.condition_was_true = true;
        }
        if node.flags.contains(Flags::CONDITIONAL_ELSE) {
            self.condition_was_true = false;
        }
    }

    /// Evaluate `condition` against `variables[var_name]` and enter the
    /// taken branch. Returns false without pushing a node when the branch
    /// is not taken. Missing variables read as zero, so gates for unknown
    /// versions simply don't fire.
    pub fn begin_if(
        &mut self,
        var_name: &'static str,
        label: &'static str,
        condition: impl FnOnce(i32) -> bool,
    ) -> bool {
        self.condition_was_true = condition(self.variable(var_name));
        if self.condition_was_true {
            self.begin("if", label, Flags::CONDITIONAL_IF);
            return true;
        }
        false
    }

    /// Enter the else branch when the preceding if was not taken.
    pub fn begin_else(&mut self) -> bool {
        if self.condition_was_true {
            return false;
        }
        self.begin("else", "", Flags::CONDITIONAL_ELSE);
        true
    }

    /// Record one scalar's little-endian value bytes against the stack:
    /// the innermost non-array node keeps the bytes, and every enclosing
    /// node up to the nearest array root accumulates the size.
    pub fn record_scalar(&mut self, bytes: &[u8]) {
        debug_assert!(bytes.len() <= SCRATCH_LEN);
        let top = self.stack.len();
        for (i, node) in self.stack.iter_mut().enumerate().rev() {
            if node.is_array_root() {
                break;
            }
            if i + 1 == top {
                node.data[..bytes.len()].copy_from_slice(bytes);
            }
            node.size += bytes.len() as i32;
        }
    }

    pub fn set_variable(&mut self, name: &'static str, value: i32) {
        self.variables.insert(name, value);
    }

    /// Current value of a captured variable; zero when unset.
    pub fn variable(&self, name: &str) -> i32 {
        self.variables.get(name).copied().unwrap_or(0)
    }

    pub fn variables(&self) -> &IndexMap<&'static str, i32> {
        &self.variables
    }

    /// Effective endianness for the scalar being serialized: the sticky
    /// latch, or the current node's own `BigEndian` flag before the latch
    /// is set.
    pub fn is_big_endian(&self) -> bool {
        self.big_endian
            || self
                .stack
                .last()
                .is_some_and(|node| node.flags.contains(Flags::BIG_ENDIAN))
    }

    /// Whether the stream latch itself is set, independent of any node.
    pub fn big_endian_latched(&self) -> bool {
        self.big_endian
    }

    pub fn mark_errored(&mut self) {
        self.errored = true;
    }

    pub fn mark_eof(&mut self) {
        self.eof = true;
    }

    pub fn is_errored(&self) -> bool {
        self.errored
    }

    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// Current stack depth.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The node currently being visited.
    pub fn current(&self) -> Option<&SerializerNode> {
        self.stack.last()
    }

    /// The node `levels_up` levels above the current one (0 = current).
    pub fn ancestor(&self, levels_up: usize) -> Option<&SerializerNode> {
        self.stack
            .len()
            .checked_sub(levels_up + 1)
            .and_then(|i| self.stack.get(i))
    }
}
