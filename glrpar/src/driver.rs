// Copyright (c) 2018 King's College London
// created by the Software Development Team <http://soft-dev.org/>
//
// The Universal Permissive License (UPL), Version 1.0. See glrtable's idx.rs for the full text.

//! The Parse Driver: the outer loop over stack versions. Advances whichever version is "leftmost
//! behind" the current input position one step at a time, deferring to the Action Engine for what
//! a step actually does, until either one finished tree remains or every version has been pruned
//! away by error recovery.

use std::collections::HashMap;

use glrtable::{ParseTable, StateId, Symbol};

use crate::actions::ConsumeOutcome;
use crate::cursor::ReusableNodeCursor;
use crate::debug::DebugEventKind;
use crate::error::ParseFailure;
use crate::lexer::Lexer;
use crate::length::Length;
use crate::parser::Parser;
use crate::stack::{Stack, VersionId};
use crate::tree::{self, Tree};

/// A lookahead obtained for a version at a particular `(position, state)`; cached across outer
/// rounds so a version that is merely "caught up to the frontier" this round (and so never calls
/// `consume_lookahead`) does not pay for re-lexing or re-walking the reusable-node cursor next
/// round at the same spot. Keyed on state as well as position because the error state requests a
/// different lex state than whatever state produced an earlier cache entry at the same position.
struct CachedLookahead {
    position: Length,
    state: StateId,
    tree: Tree
}

impl<'t, L: Lexer> Parser<'t, L> {
    /// Runs the driver to completion: shifts, reduces, recovers and (if given one) reuses subtrees
    /// from `previous_tree` until either a tree is accepted or every version has been discarded by
    /// failed error recovery. Resets the parser's stack first, so one `Parser` may run several
    /// parses in sequence (never concurrently — see the Concurrency & Resource Model).
    pub fn parse(&mut self, previous_tree: Option<Tree>) -> Result<Tree, ParseFailure> {
        self.stack = Stack::new(StateId(0));
        self.finished_tree = None;

        let mut cursor = ReusableNodeCursor::new(previous_tree);
        let mut max_position = Length::ZERO;
        let mut cache: HashMap<VersionId, CachedLookahead> = HashMap::new();

        while self.stack.version_count() > 0 {
            let is_split = self.stack.version_count() > 1;
            let versions: Vec<VersionId> = self.stack.versions().collect();
            let mut adopted_cursor = cursor.snapshot();

            for v in versions {
                if !self.stack.exists(v) {
                    continue;
                }
                let mut local_cursor = cursor.snapshot();

                loop {
                    if !self.stack.exists(v) {
                        cache.remove(&v);
                        break;
                    }
                    let position = self.stack.top_position(v);
                    if position.chars > max_position.chars {
                        max_position = position;
                        break;
                    }
                    if position.chars == max_position.chars && v > 0 {
                        break;
                    }

                    let state = self.stack.top_state(v);
                    let lookahead = match cache.get(&v) {
                        Some(c) if c.position == position && c.state == state => c.tree.clone(),
                        _ => {
                            let tree = self.obtain_lookahead(v, state, &mut local_cursor);
                            cache.insert(
                                v,
                                CachedLookahead {
                                    position,
                                    state,
                                    tree: tree.clone()
                                }
                            );
                            tree
                        }
                    };

                    match self.consume_lookahead(v, lookahead, is_split)? {
                        ConsumeOutcome::Updated => {
                            cache.remove(&v);
                            continue;
                        }
                        ConsumeOutcome::Removed => {
                            cache.remove(&v);
                            break;
                        }
                    }
                }

                adopted_cursor = local_cursor;
            }

            cursor = adopted_cursor;
            self.stack.condense();
            cache.clear();
        }

        match self.finished_tree.take() {
            Some(tree) => {
                tree::link_parent_pointers(&tree);
                self.debugger
                    .message(DebugEventKind::Parse, "parse: finished, one tree remains");
                Ok(tree)
            }
            None => Err(ParseFailure::RecoveryExhausted)
        }
    }

    /// Obtains the next lookahead tree for `v` at `state`: a reusable subtree from the previous
    /// parse if the cursor offers one, otherwise a freshly lexed leaf. Error tokens become error
    /// leaves; everything else becomes a plain lexed leaf via `tree::make_leaf`.
    fn obtain_lookahead(&mut self, v: VersionId, state: StateId, cursor: &mut ReusableNodeCursor) -> Tree {
        if let Some(tree) = cursor.get_lookahead(&self.stack, v, self.table) {
            return tree;
        }

        let lex_state = if state == StateId::ERROR {
            glrtable::LexStateId::ERROR_MODE
        } else {
            self.table.lex_state(state)
        };
        let position = self.stack.top_position(v);
        if self.lexer.position() != position {
            self.lexer.reset(position);
        }
        self.lexer.start(lex_state);
        let lexeme = self.lexer.finish();

        if lexeme.symbol == Symbol::ERROR {
            tree::make_error_leaf(lexeme.size, lexeme.padding, lexeme.first_unexpected_character)
        } else {
            tree::make_leaf(self.table, lexeme.symbol, lexeme.size, lexeme.padding, lex_state, lexeme.is_fragile)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glrtable::{Action, LexStateId, StaticParseTable, Symbol, SymbolMetadata};

    use super::*;
    use crate::lexer::Lexeme;

    /// A lexer over a fixed token list, driven purely by position (the minimal arithmetic grammar
    /// used across this crate's tests never needs real text scanning, only a sequence of
    /// pre-classified lexemes to hand back in order).
    struct ScriptedLexer {
        tokens: Vec<Lexeme>,
        idx: RefCell<usize>,
        position: Length
    }

    impl ScriptedLexer {
        fn new(tokens: Vec<Lexeme>) -> Self {
            ScriptedLexer {
                tokens,
                idx: RefCell::new(0),
                position: Length::ZERO
            }
        }
    }

    impl Lexer for ScriptedLexer {
        fn start(&mut self, _state: LexStateId) {}

        fn finish(&mut self) -> Lexeme {
            let mut idx = self.idx.borrow_mut();
            let lexeme = self
                .tokens
                .get(*idx)
                .copied()
                .unwrap_or(Lexeme {
                    symbol: Symbol::END,
                    padding: Length::ZERO,
                    size: Length::ZERO,
                    is_fragile: false,
                    first_unexpected_character: None
                });
            *idx += 1;
            self.position += lexeme.padding;
            self.position += lexeme.size;
            lexeme
        }

        fn reset(&mut self, position: Length) {
            self.position = position;
        }

        fn position(&self) -> Length {
            self.position
        }
    }

    // A two-token grammar: state 0 shifts NUM to state 1, state 1 accepts on END.
    fn trivial_table() -> StaticParseTable {
        let mut t = StaticParseTable::new();
        t.set_symbol(
            Symbol(1),
            "NUM",
            SymbolMetadata {
                extra: false,
                structural: true,
                named: true,
                visible: true
            }
        );
        t.add_action(
            StateId(0),
            Symbol(1),
            Action::Shift {
                to_state: StateId(1),
                extra: false,
                can_hide_split: false
            }
        );
        t.add_action(StateId(1), Symbol::END, Action::Accept);
        t
    }

    #[test]
    fn parses_a_single_token_to_acceptance() {
        let table = trivial_table();
        let lexer = ScriptedLexer::new(vec![Lexeme {
            symbol: Symbol(1),
            padding: Length::ZERO,
            size: Length::new(1, 1),
            is_fragile: false,
            first_unexpected_character: None
        }]);
        let mut parser = Parser::new(&table, lexer);
        let tree = parser.parse(None).expect("parse should succeed");
        assert_eq!(tree.symbol, Symbol(1));
        assert_eq!(tree.total_chars(), 1);
        assert_eq!(tree.error_size, 0);
    }

    #[test]
    fn reused_tree_round_trips_with_no_lexer_calls() {
        let table = trivial_table();
        let leaf = tree::make_leaf(&table, Symbol(1), Length::new(1, 1), Length::ZERO, LexStateId(0), false);
        // A lexer with no tokens at all: if the driver needed to call it, `finish` would hand back
        // a synthetic END and the parse would fail to shift NUM.
        let lexer = ScriptedLexer::new(Vec::new());
        let mut parser = Parser::new(&table, lexer);
        let tree = parser.parse(Some(Rc::clone(&leaf))).expect("parse should reuse the leaf");
        assert!(Rc::ptr_eq(&tree, &leaf));
    }
}
