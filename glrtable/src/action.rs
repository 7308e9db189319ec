// Copyright (c) 2018 King's College London
// created by the Software Development Team <http://soft-dev.org/>
//
// The Universal Permissive License (UPL), Version 1.0. See idx.rs for the full text.

use crate::idx::{StateId, Symbol};

/// One entry in a parse table cell. A sum type rather than a tagged struct, per the distilled
/// spec's design notes (§9): the driver needs to be able to synthesize an `Error` action when it
/// runs off the end of a cell's action list, which is awkward to express with a C-style tagged
/// union but free with an enum.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    /// Shift the lookahead and move to `to_state`. `extra` shifts mark the lookahead as an extra
    /// (whitespace/comment-like) tree and do not change state. `can_hide_split` marks shifts that
    /// may obscure a GLR ambiguity and must block node reuse (see the Reusable-Node Cursor).
    Shift {
        to_state: StateId,
        extra: bool,
        can_hide_split: bool
    },
    /// Reduce `child_count` symbols to `symbol`.
    Reduce {
        symbol: Symbol,
        child_count: u32,
        extra: bool,
        fragile: bool
    },
    /// Accept: the input has been fully recognised along this path.
    Accept,
    /// Recover to `to_state` (used only when the current state is the error state).
    Recover { to_state: StateId },
    /// No action defined for this cell; implicit unless a generator chooses to say so
    /// explicitly.
    Error
}

impl Action {
    pub fn is_error(&self) -> bool {
        matches!(self, Action::Error)
    }

    pub fn is_shift(&self) -> bool {
        matches!(self, Action::Shift { .. })
    }

    pub fn is_reduce(&self) -> bool {
        matches!(self, Action::Reduce { .. })
    }

    pub fn can_hide_split(&self) -> bool {
        matches!(
            self,
            Action::Shift {
                can_hide_split: true,
                ..
            }
        )
    }
}

/// Per-symbol metadata, queried once per reduce/reuse decision rather than baked into `Action` so
/// that it can be shared across every cell that mentions the symbol.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SymbolMetadata {
    /// May appear anywhere in the input (whitespace, comments, ...) and is not counted as a
    /// structural child for reductions.
    pub extra: bool,
    /// Contributes to the grammar's structure (as opposed to punctuation symbols that exist only
    /// to drive the parser).
    pub structural: bool,
    /// Should be counted in `named_child_count`.
    pub named: bool,
    /// Should be counted in `visible_child_count`.
    pub visible: bool
}
