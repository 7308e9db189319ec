// Copyright (c) 2018 King's College London
// created by the Software Development Team <http://soft-dev.org/>
//
// The Universal Permissive License (UPL), Version 1.0. See glrtable's idx.rs for the full text.

//! The lexer collaborator. The per-language scan function and its lex states are, per the
//! distilled spec, external to the core: this module only fixes the calling convention the
//! driver relies on (`start`/`finish`/`reset`) and the shape of a finished token.

use glrtable::{LexStateId, Symbol};

use crate::length::Length;

/// The result of scanning one token, returned by `Lexer::finish`.
#[derive(Clone, Copy, Debug)]
pub struct Lexeme {
    pub symbol: Symbol,
    /// Leading whitespace/comment-like content skipped before the token itself starts.
    pub padding: Length,
    /// The token's own size, excluding `padding`.
    pub size: Length,
    /// Whether this token's validity depends on the lex state it was produced in (and so cannot
    /// be reused from a previous parse under a different lex state).
    pub is_fragile: bool,
    /// Set when the lexer could not recognise a token at all (error mode) and instead skipped
    /// one character; `symbol` is `Symbol::ERROR` in that case.
    pub first_unexpected_character: Option<char>
}

/// A positioned lexical scanner. One `Lexer` belongs to exactly one `Parser` (see Concurrency &
/// Resource Model); it is never shared or used concurrently.
pub trait Lexer {
    /// Position the lexer at its current cursor and request a token appropriate for `state`. When
    /// `state` is `LexStateId::ERROR_MODE` the lexer is in the driver's error-recovery mode and
    /// should do best-effort token boundary discovery rather than applying the grammar's normal
    /// lex rules.
    fn start(&mut self, state: LexStateId);

    /// Complete the scan requested by the most recent `start` and return the lexeme found.
    fn finish(&mut self) -> Lexeme;

    /// Reposition the lexer's cursor to an absolute `(chars, bytes)` offset, e.g. after the
    /// Reusable-Node Cursor or a breakdown has moved the parse to a point other than "wherever the
    /// last lex call left off".
    fn reset(&mut self, position: Length);

    /// The lexer's current absolute cursor position.
    fn position(&self) -> Length;
}
