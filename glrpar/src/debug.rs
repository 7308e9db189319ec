// Copyright (c) 2018 King's College London
// created by the Software Development Team <http://soft-dev.org/>
//
// The Universal Permissive License (UPL), Version 1.0. See glrtable's idx.rs for the full text.

//! The optional logging sink described in the distilled spec's design notes: a callback fed
//! formatted text lines tagged as PARSE events, plus a second channel for stack graph snapshots.
//! Both are side-effect-only and entirely optional; a parser with no debugger installed pays
//! nothing beyond the tag check.

/// Which of the two channels a debugger message belongs to.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DebugEventKind {
    /// A single formatted line describing a shift/reduce/accept/recover/error step.
    Parse,
    /// A snapshot of the stack graph (versions and frames), emitted at points a caller might want
    /// to visualize the GSS mid-parse.
    Stack
}

/// Installed on a `Parser` with `Parser::set_debugger`; `message` is called at each
/// shift/reduce/accept/recover/error boundary. Implementations are expected to be cheap and
/// infallible (formatting and writing to a log sink), since the driver never suspends.
pub trait ParseDebugger {
    fn message(&mut self, kind: DebugEventKind, text: &str);
}

/// The default "no debugger installed" sink.
pub struct NullDebugger;

impl ParseDebugger for NullDebugger {
    fn message(&mut self, _kind: DebugEventKind, _text: &str) {}
}

/// A debugger that appends every message to an in-memory buffer, handy for tests that want to
/// assert on what the driver logged without wiring up real I/O.
#[derive(Default)]
pub struct RecordingDebugger {
    pub lines: Vec<(DebugEventKind, String)>
}

impl ParseDebugger for RecordingDebugger {
    fn message(&mut self, kind: DebugEventKind, text: &str) {
        self.lines.push((kind, text.to_string()));
    }
}
