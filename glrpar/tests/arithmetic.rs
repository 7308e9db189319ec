// Copyright (c) 2018 King's College London
// created by the Software Development Team <http://soft-dev.org/>
//
// The Universal Permissive License (UPL), Version 1.0. See glrtable's idx.rs for the full text.

//! An end-to-end drive of a hand-built arithmetic grammar through a real `Lexer`, exercising the
//! full pipeline (driver, action engine, tree model) together rather than one component at a time.
//!
//! Grammar: `expr -> expr '+' term | term`, `term -> term '*' factor | factor`,
//! `factor -> '(' expr ')' | NUM`. The table below is the textbook SLR(1) automaton for this
//! grammar, hand-transcribed into `glrtable`'s cell format.

use std::cell::Cell;

use glrpar::{Length, Lexeme, Lexer, Parser};
use glrtable::{Action, LexStateId, StateId, StaticParseTable, Symbol, SymbolMetadata};

const NUM: Symbol = Symbol(1);
const PLUS: Symbol = Symbol(2);
const STAR: Symbol = Symbol(3);
const LPAREN: Symbol = Symbol(4);
const RPAREN: Symbol = Symbol(5);
const EXPR: Symbol = Symbol(6);
const TERM: Symbol = Symbol(7);
const FACTOR: Symbol = Symbol(8);

fn shift(to: u32, extra: bool) -> Action {
    Action::Shift {
        to_state: StateId(to),
        extra,
        can_hide_split: false
    }
}

fn reduce(symbol: Symbol, child_count: u32) -> Action {
    Action::Reduce {
        symbol,
        child_count,
        extra: false,
        fragile: false
    }
}

/// The 12-state SLR(1) automaton for the grammar above (states numbered as in the textbook
/// derivation: 0 is the start state, 1-11 follow from the closures of its item sets).
fn arithmetic_table() -> StaticParseTable {
    let mut t = StaticParseTable::new();
    let terminal = SymbolMetadata {
        extra: false,
        structural: false,
        named: true,
        visible: true
    };
    let nonterminal = SymbolMetadata {
        extra: false,
        structural: true,
        named: true,
        visible: true
    };
    t.set_symbol(NUM, "NUM", terminal);
    t.set_symbol(PLUS, "+", terminal);
    t.set_symbol(STAR, "*", terminal);
    t.set_symbol(LPAREN, "(", terminal);
    t.set_symbol(RPAREN, ")", terminal);
    t.set_symbol(EXPR, "expr", nonterminal);
    t.set_symbol(TERM, "term", nonterminal);
    t.set_symbol(FACTOR, "factor", nonterminal);

    t.add_action(StateId(0), NUM, shift(5, false));
    t.add_action(StateId(0), LPAREN, shift(4, false));
    t.add_action(StateId(0), EXPR, shift(1, false));
    t.add_action(StateId(0), TERM, shift(2, false));
    t.add_action(StateId(0), FACTOR, shift(3, false));

    t.add_action(StateId(1), PLUS, shift(6, false));
    t.add_action(StateId(1), Symbol::END, Action::Accept);

    t.add_action(StateId(2), STAR, shift(7, false));
    t.add_action(StateId(2), PLUS, reduce(EXPR, 1));
    t.add_action(StateId(2), RPAREN, reduce(EXPR, 1));
    t.add_action(StateId(2), Symbol::END, reduce(EXPR, 1));

    t.add_action(StateId(3), PLUS, reduce(TERM, 1));
    t.add_action(StateId(3), STAR, reduce(TERM, 1));
    t.add_action(StateId(3), RPAREN, reduce(TERM, 1));
    t.add_action(StateId(3), Symbol::END, reduce(TERM, 1));

    t.add_action(StateId(4), NUM, shift(5, false));
    t.add_action(StateId(4), LPAREN, shift(4, false));
    t.add_action(StateId(4), EXPR, shift(8, false));
    t.add_action(StateId(4), TERM, shift(2, false));
    t.add_action(StateId(4), FACTOR, shift(3, false));

    t.add_action(StateId(5), PLUS, reduce(FACTOR, 1));
    t.add_action(StateId(5), STAR, reduce(FACTOR, 1));
    t.add_action(StateId(5), RPAREN, reduce(FACTOR, 1));
    t.add_action(StateId(5), Symbol::END, reduce(FACTOR, 1));

    t.add_action(StateId(6), NUM, shift(5, false));
    t.add_action(StateId(6), LPAREN, shift(4, false));
    t.add_action(StateId(6), TERM, shift(9, false));
    t.add_action(StateId(6), FACTOR, shift(3, false));

    t.add_action(StateId(7), NUM, shift(5, false));
    t.add_action(StateId(7), LPAREN, shift(4, false));
    t.add_action(StateId(7), FACTOR, shift(10, false));

    t.add_action(StateId(8), PLUS, shift(6, false));
    t.add_action(StateId(8), RPAREN, shift(11, false));

    t.add_action(StateId(9), STAR, shift(7, false));
    t.add_action(StateId(9), PLUS, reduce(EXPR, 3));
    t.add_action(StateId(9), RPAREN, reduce(EXPR, 3));
    t.add_action(StateId(9), Symbol::END, reduce(EXPR, 3));

    t.add_action(StateId(10), PLUS, reduce(TERM, 3));
    t.add_action(StateId(10), STAR, reduce(TERM, 3));
    t.add_action(StateId(10), RPAREN, reduce(TERM, 3));
    t.add_action(StateId(10), Symbol::END, reduce(TERM, 3));

    t.add_action(StateId(11), PLUS, reduce(FACTOR, 3));
    t.add_action(StateId(11), STAR, reduce(FACTOR, 3));
    t.add_action(StateId(11), RPAREN, reduce(FACTOR, 3));
    t.add_action(StateId(11), Symbol::END, reduce(FACTOR, 3));

    t
}

/// Scans ASCII digits and the four operator/paren characters directly out of a source string,
/// skipping spaces as padding. Never produces a fragile leaf: this grammar's lexing never depends
/// on parser state, so nothing here needs to be re-lexed differently across a reparse.
struct StrLexer<'a> {
    src: &'a str,
    pos: Cell<Length>
}

impl<'a> StrLexer<'a> {
    fn new(src: &'a str) -> Self {
        StrLexer {
            src,
            pos: Cell::new(Length::ZERO)
        }
    }
}

impl<'a> Lexer for StrLexer<'a> {
    fn start(&mut self, _state: LexStateId) {}

    fn finish(&mut self) -> Lexeme {
        let bytes = self.src.as_bytes();
        let mut i = self.pos.get().bytes as usize;
        let mut padding_len = 0u32;
        while i < bytes.len() && bytes[i] == b' ' {
            i += 1;
            padding_len += 1;
        }
        let padding = Length::new(padding_len, padding_len);

        if i >= bytes.len() {
            self.pos.set(self.pos.get() + padding);
            return Lexeme {
                symbol: Symbol::END,
                padding,
                size: Length::ZERO,
                is_fragile: false,
                first_unexpected_character: None
            };
        }

        let c = bytes[i] as char;
        let (symbol, len) = if c.is_ascii_digit() {
            let start = i;
            while i < bytes.len() && (bytes[i] as char).is_ascii_digit() {
                i += 1;
            }
            (NUM, i - start)
        } else {
            let sym = match c {
                '+' => PLUS,
                '*' => STAR,
                '(' => LPAREN,
                ')' => RPAREN,
                _ => {
                    self.pos.set(self.pos.get() + padding + Length::new(1, 1));
                    return Lexeme {
                        symbol: Symbol::ERROR,
                        padding,
                        size: Length::new(1, 1),
                        is_fragile: false,
                        first_unexpected_character: Some(c)
                    };
                }
            };
            (sym, 1)
        };

        let size = Length::new(len as u32, len as u32);
        self.pos.set(self.pos.get() + padding + size);
        Lexeme {
            symbol,
            padding,
            size,
            is_fragile: false,
            first_unexpected_character: None
        }
    }

    fn reset(&mut self, position: Length) {
        self.pos.set(position);
    }

    fn position(&self) -> Length {
        self.pos.get()
    }
}

#[test]
fn parses_nested_precedence_with_no_errors() {
    let table = arithmetic_table();
    let lexer = StrLexer::new("1+2*3");
    let mut parser = Parser::new(&table, lexer);

    let tree = parser.parse(None).expect("a well-formed expression should parse");

    assert_eq!(tree.symbol, EXPR);
    assert_eq!(tree.error_size, 0);
    assert_eq!(tree.total_chars(), 5);

    // (1 + (2 * 3)): the outer node is `expr '+' term`.
    assert_eq!(tree.children.len(), 3);
    assert_eq!(tree.children[0].symbol, EXPR);
    assert_eq!(tree.children[1].symbol, PLUS);
    assert_eq!(tree.children[2].symbol, TERM);

    // The left child reduces straight down to the leading NUM.
    let left = &tree.children[0];
    assert_eq!(left.children.len(), 1);
    assert_eq!(left.children[0].symbol, TERM);

    // The right child is `term '*' factor`, i.e. `2 * 3` grouped tighter than the `+`.
    let right = &tree.children[2];
    assert_eq!(right.children.len(), 3);
    assert_eq!(right.children[0].symbol, TERM);
    assert_eq!(right.children[1].symbol, STAR);
    assert_eq!(right.children[2].symbol, FACTOR);
}

#[test]
fn parses_a_single_parenthesised_number() {
    let table = arithmetic_table();
    let lexer = StrLexer::new("(42)");
    let mut parser = Parser::new(&table, lexer);

    let tree = parser.parse(None).expect("a parenthesised number should parse");

    assert_eq!(tree.symbol, EXPR);
    assert_eq!(tree.error_size, 0);
    assert_eq!(tree.total_chars(), 4);
}

#[test]
fn accepts_idempotently_on_repeated_parses_of_the_same_input() {
    let table = arithmetic_table();
    let mut parser = Parser::new(&table, StrLexer::new("1+2*3"));
    let first = parser.parse(None).expect("first parse should succeed");

    let mut parser2 = Parser::new(&table, StrLexer::new("1+2*3"));
    let second = parser2.parse(None).expect("second parse should succeed");

    assert_eq!(first.total_chars(), second.total_chars());
    assert_eq!(first.error_size, second.error_size);
    assert_eq!(glrpar::compare(&first, &second), 0);
}
