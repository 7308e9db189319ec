// Copyright (c) 2018 King's College London
// created by the Software Development Team <http://soft-dev.org/>
//
// The Universal Permissive License (UPL), Version 1.0. See glrtable's idx.rs for the full text.

//! The `Parser`: owns everything a single parse needs (the stack, the lexer, a reusable scratch
//! buffer for `handle_error`'s gathered reductions, the finished tree, and an optional debug
//! sink). Per the distilled spec's resource model, one of these belongs to exactly one parse at a
//! time; `init`/`destroy` collapse into the constructor and `Drop`.

use glrtable::{ParseTable, StateId, Symbol};

use crate::debug::{NullDebugger, ParseDebugger};
use crate::lexer::Lexer;
use crate::stack::Stack;
use crate::tree::Tree;

pub struct Parser<'t, L: Lexer> {
    pub(crate) table: &'t dyn ParseTable,
    pub(crate) lexer: L,
    pub(crate) stack: Stack,
    pub(crate) reduce_scratch: Vec<(Symbol, u32)>,
    pub(crate) finished_tree: Option<Tree>,
    pub(crate) debugger: Box<dyn ParseDebugger>
}

impl<'t, L: Lexer> Parser<'t, L> {
    /// Builds a parser over `table` (shared read-only, may outlive many parsers) and `lexer`
    /// (owned exclusively by this parser for the life of one parse).
    pub fn new(table: &'t dyn ParseTable, lexer: L) -> Self {
        Parser {
            table,
            lexer,
            stack: Stack::new(StateId(0)),
            reduce_scratch: Vec::new(),
            finished_tree: None,
            debugger: Box::new(NullDebugger)
        }
    }

    /// Installs a sink that receives a text line at each shift/reduce/accept/recover/error
    /// boundary the driver considers notable. Replaces whatever debugger (if any) was installed
    /// before.
    pub fn set_debugger(&mut self, debugger: Box<dyn ParseDebugger>) {
        self.debugger = debugger;
    }

    pub fn debugger(&mut self) -> &mut dyn ParseDebugger {
        &mut *self.debugger
    }
}
