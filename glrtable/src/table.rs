// Copyright (c) 2018 King's College London
// created by the Software Development Team <http://soft-dev.org/>
//
// The Universal Permissive License (UPL), Version 1.0. See idx.rs for the full text.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::action::{Action, SymbolMetadata};
use crate::idx::{LexStateId, StateId, Symbol};

/// Read-only lookup of actions and lex states keyed by `(state, symbol)`.
///
/// A `ParseTable` is produced by a generator that sits outside this crate (compiling a grammar
/// down to LR tables, possibly with GLR conflicts left unresolved as multiple actions per cell)
/// and is immutable for the life of every parser that uses it; per the distilled spec's
/// concurrency model, one table may be shared read-only across many `Parser` instances.
pub trait ParseTable {
    /// All actions defined for `(state, symbol)`, in generator order. Empty if none are defined.
    /// More than one entry means a shift/reduce or reduce/reduce conflict that GLR explores by
    /// splitting the stack.
    fn actions(&self, state: StateId, symbol: Symbol) -> &[Action];

    /// The last action in `actions(state, symbol)`, or `Action::Error` if none are defined. Used
    /// whenever the caller expects exactly one action (e.g. "what state does shifting `sym` from
    /// `state` lead to").
    fn last_action(&self, state: StateId, symbol: Symbol) -> Action {
        match self.actions(state, symbol).last() {
            Some(a) => *a,
            None => Action::Error
        }
    }

    /// True iff at least one action is defined for `(state, symbol)`.
    fn has_action(&self, state: StateId, symbol: Symbol) -> bool {
        !self.actions(state, symbol).is_empty()
    }

    /// The lex state the lexer should be started in while the parser is in `state`.
    fn lex_state(&self, state: StateId) -> LexStateId;

    /// Total number of distinct symbols in the grammar (terminals and non-terminals together).
    fn symbol_count(&self) -> u32;

    fn symbol_metadata(&self, symbol: Symbol) -> SymbolMetadata;

    /// Debug-only: a human readable name for `symbol`, used by logging and `Tree::pp`.
    fn symbol_name(&self, symbol: Symbol) -> &str;
}

/// A `ParseTable` built up cell by cell and then frozen. Real deployments will usually generate
/// this (or an equivalent) at build time from a grammar; `StaticParseTable` exists so that this
/// crate's own tests (and small embedders) can hand-assemble a table without pulling in a grammar
/// compiler, which the distilled spec explicitly treats as an external collaborator.
#[derive(Debug, Default)]
pub struct StaticParseTable {
    cells: HashMap<(StateId, Symbol), Vec<Action>>,
    lex_states: HashMap<StateId, LexStateId>,
    symbol_metadata: IndexMap<Symbol, SymbolMetadata>,
    symbol_names: IndexMap<Symbol, String>
}

impl StaticParseTable {
    pub fn new() -> Self {
        StaticParseTable::default()
    }

    pub fn set_actions(&mut self, state: StateId, symbol: Symbol, actions: Vec<Action>) -> &mut Self {
        self.cells.insert((state, symbol), actions);
        self
    }

    pub fn add_action(&mut self, state: StateId, symbol: Symbol, action: Action) -> &mut Self {
        self.cells.entry((state, symbol)).or_default().push(action);
        self
    }

    pub fn set_lex_state(&mut self, state: StateId, lex_state: LexStateId) -> &mut Self {
        self.lex_states.insert(state, lex_state);
        self
    }

    pub fn set_symbol(&mut self, symbol: Symbol, name: &str, meta: SymbolMetadata) -> &mut Self {
        self.symbol_names.insert(symbol, name.to_string());
        self.symbol_metadata.insert(symbol, meta);
        self
    }
}

const NO_ACTIONS: &[Action] = &[];

impl ParseTable for StaticParseTable {
    fn actions(&self, state: StateId, symbol: Symbol) -> &[Action] {
        match self.cells.get(&(state, symbol)) {
            Some(v) => v.as_slice(),
            None => NO_ACTIONS
        }
    }

    fn lex_state(&self, state: StateId) -> LexStateId {
        self.lex_states
            .get(&state)
            .copied()
            .unwrap_or(LexStateId::ERROR_MODE)
    }

    fn symbol_count(&self) -> u32 {
        self.symbol_metadata.len() as u32
    }

    fn symbol_metadata(&self, symbol: Symbol) -> SymbolMetadata {
        self.symbol_metadata.get(&symbol).copied().unwrap_or_default()
    }

    fn symbol_name(&self, symbol: Symbol) -> &str {
        self.symbol_names
            .get(&symbol)
            .map(|s| s.as_str())
            .unwrap_or("<unknown>")
    }
}
