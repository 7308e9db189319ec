// Copyright (c) 2018 King's College London
// created by the Software Development Team <http://soft-dev.org/>
//
// The Universal Permissive License (UPL), Version 1.0
//
// Subject to the condition set forth below, permission is hereby granted to any person obtaining a
// copy of this software, associated documentation and/or data (collectively the "Software"), free
// of charge and under any and all copyright rights in the Software, and any and all patent rights
// owned or freely licensable by each licensor hereunder covering either (i) the unmodified
// Software as contributed to or provided by such licensor, or (ii) the Larger Works (as defined
// below), to deal in both
//
// (a) the Software, and
// (b) any piece of software and/or hardware listed in the lrgrwrks.txt file
// if one is included with the Software (each a "Larger Work" to which the Software is contributed
// by such licensors),
//
// without restriction, including without limitation the rights to copy, create derivative works
// of, display, perform, and distribute the Software and make, use, sell, offer for sale, import,
// export, have made, and have sold the Software and the Larger Work(s), and to sublicense the
// foregoing rights on either these or other terms.
//
// This license is subject to the following condition: The above copyright notice and either this
// complete permission notice or at a minimum a reference to the UPL must be included in all copies
// or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
// BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Newtype indices used throughout the table and parser crates. Keeping these as distinct types
//! (rather than passing bare `u16`/`u32` around) catches a whole class of "passed a state where a
//! symbol was expected" bugs at compile time, in the same spirit as `cfgrammar`'s `PIdx`/`RIdx`/
//! `SIdx`/`TIdx`.

use std::fmt;

/// A grammar symbol, terminal or non-terminal, drawn from a single shared id space (so that a
/// parse table cell can be keyed uniformly on `(StateId, Symbol)` regardless of which kind of
/// symbol it is).
#[derive(Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Symbol(pub u16);

impl Symbol {
    /// The builtin end-of-input symbol.
    pub const END: Symbol = Symbol(0);
    /// The builtin error symbol; trees with this symbol are error nodes.
    pub const ERROR: Symbol = Symbol(u16::MAX);

    pub fn is_builtin(self) -> bool {
        self == Symbol::END || self == Symbol::ERROR
    }

    pub fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Symbol::END => write!(f, "Symbol(END)"),
            Symbol::ERROR => write!(f, "Symbol(ERROR)"),
            Symbol(n) => write!(f, "Symbol({})", n)
        }
    }
}

/// A parse table state.
#[derive(Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateId(pub u32);

impl StateId {
    /// The builtin error parse state: "do not reuse across parse states" and the state every
    /// synthesized error frame is pushed at.
    pub const ERROR: StateId = StateId(u32::MAX);
    /// The state an empty error node is pushed at when `recover_eof` fires.
    pub const INITIAL_AFTER_EOF_RECOVERY: StateId = StateId(1);

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for StateId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            StateId::ERROR => write!(f, "StateId(ERROR)"),
            StateId(n) => write!(f, "StateId({})", n)
        }
    }
}

/// The lex state a parse state requests of the lexer. `INDEPENDENT` lex state 0 is reserved for
/// the error-mode lexing request described in the distilled spec's Lexer Interface section.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LexStateId(pub u16);

impl LexStateId {
    /// Requested from the lexer when the driver is in error-recovery mode.
    pub const ERROR_MODE: LexStateId = LexStateId(0);
}
