// Copyright (c) 2018 King's College London
// created by the Software Development Team <http://soft-dev.org/>
//
// The Universal Permissive License (UPL), Version 1.0. See idx.rs for the full text.

//! Read-only parse-table types consumed by the `glrpar` GLR driver.
//!
//! This crate plays the role `cfgrammar`+`lrtable` play for `lrpar`: it owns the vocabulary a
//! compiled grammar is described in (symbols, states, actions, lex states) but not the compiler
//! that produces one. Building a `ParseTable` from a grammar source is an external concern (the
//! distilled spec calls out "the parse-table generator" as out of scope for the GLR core); this
//! crate only has to make a finished table cheap to query and share.

mod action;
mod idx;
mod table;

pub use action::{Action, SymbolMetadata};
pub use idx::{LexStateId, StateId, Symbol};
pub use table::{ParseTable, StaticParseTable};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_cell_has_no_actions() {
        let t = StaticParseTable::new();
        assert!(t.actions(StateId(0), Symbol::END).is_empty());
        assert!(!t.has_action(StateId(0), Symbol::END));
        assert_eq!(t.last_action(StateId(0), Symbol::END), Action::Error);
    }

    #[test]
    fn last_action_is_the_final_entry() {
        let mut t = StaticParseTable::new();
        t.add_action(
            StateId(0),
            Symbol(1),
            Action::Reduce {
                symbol: Symbol(2),
                child_count: 1,
                extra: false,
                fragile: false
            }
        );
        t.add_action(
            StateId(0),
            Symbol(1),
            Action::Shift {
                to_state: StateId(3),
                extra: false,
                can_hide_split: false
            }
        );
        assert_eq!(t.actions(StateId(0), Symbol(1)).len(), 2);
        assert_eq!(
            t.last_action(StateId(0), Symbol(1)),
            Action::Shift {
                to_state: StateId(3),
                extra: false,
                can_hide_split: false
            }
        );
    }

    #[test]
    fn lex_state_defaults_to_error_mode() {
        let t = StaticParseTable::new();
        assert_eq!(t.lex_state(StateId(42)), LexStateId::ERROR_MODE);
    }
}
