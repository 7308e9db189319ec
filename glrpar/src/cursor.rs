// Copyright (c) 2018 King's College London
// created by the Software Development Team <http://soft-dev.org/>
//
// The Universal Permissive License (UPL), Version 1.0. See glrtable's idx.rs for the full text.

//! The Reusable-Node Cursor: walks a previous parse's tree alongside the new parse, offering up
//! unchanged subtrees as lookahead instead of asking the lexer to re-scan them.

use glrtable::{Action, ParseTable, StateId};

use crate::length::Length;
use crate::stack::{Stack, VersionId};
use crate::tree::{LexState, ParseState, Tree};

/// Points at a candidate subtree of the previous parse tree, identified by the char offset where
/// it begins. `None` once the cursor has run off the end of the previous tree.
pub struct ReusableNodeCursor {
    tree: Option<Tree>,
    char_index: u32
}

impl ReusableNodeCursor {
    /// Starts a cursor over `previous_tree` at the very beginning of the input. Pass `None` when
    /// there is no previous tree (a from-scratch parse); every lookahead then falls through to
    /// the lexer.
    pub fn new(previous_tree: Option<Tree>) -> Self {
        ReusableNodeCursor {
            tree: previous_tree,
            char_index: 0
        }
    }

    pub fn is_retired(&self) -> bool {
        self.tree.is_none()
    }

    /// A shallow snapshot so the driver can roll a version's cursor back to where it started this
    /// iteration if the version doesn't make progress.
    pub fn snapshot(&self) -> ReusableNodeCursor {
        ReusableNodeCursor {
            tree: self.tree.clone(),
            char_index: self.char_index
        }
    }

    /// Moves the cursor past the subtree it currently points at: advances `char_index` by the
    /// subtree's total size, then walks up through ancestors until one with a right sibling is
    /// found (becoming `None` at the end of the tree).
    fn pop_reusable_node(&mut self) {
        let Some(cur) = self.tree.take() else { return };
        self.char_index += cur.total_chars();
        let mut node = cur;
        loop {
            match node.context() {
                Some((parent, index)) => {
                    if index + 1 < parent.children.len() {
                        self.tree = Some(parent.children[index + 1].clone());
                        return;
                    }
                    node = parent;
                }
                None => {
                    self.tree = None;
                    return;
                }
            }
        }
    }

    /// Descends into the first child of the current subtree, repeating while that child is
    /// itself fragile, so that the next reuse attempt is made at the coarsest safe granularity.
    fn breakdown(&mut self) {
        let Some(mut node) = self.tree.take() else { return };
        loop {
            match node.children.first() {
                Some(first) if first.is_fragile() => node = first.clone(),
                Some(first) => {
                    self.tree = Some(first.clone());
                    return;
                }
                None => {
                    // A leaf with `has_changes` set: nothing to descend into; give up on this
                    // subtree entirely and move to its successor.
                    self.tree = Some(node);
                    self.pop_reusable_node();
                    return;
                }
            }
        }
    }

    fn can_reuse(&self, table: &dyn ParseTable, top_state: StateId, tree: &Tree) -> bool {
        if tree.is_error() {
            return false;
        }
        if tree.is_fragile() {
            if let ParseState::Specific(st) = tree.parse_state {
                if st != top_state {
                    return false;
                }
            } else if tree.parse_state == ParseState::Error {
                return false;
            }
        }
        if let LexState::Specific(used) = tree.lex_state {
            if used != table.lex_state(top_state) {
                return false;
            }
        }
        let last = table.last_action(top_state, tree.symbol);
        if last.is_error() || last.can_hide_split() {
            return false;
        }
        if tree.is_extra() {
            let allows_extra = match last {
                Action::Shift { extra, .. } => extra,
                Action::Reduce { extra, .. } => extra,
                _ => false
            };
            if !allows_extra {
                return false;
            }
        }
        true
    }

    /// Returns a reusable subtree at the current input position for `version`, or `None` if the
    /// cursor cannot offer one (the caller should fall back to the lexer).
    pub fn get_lookahead(
        &mut self,
        stack: &Stack,
        version: VersionId,
        table: &dyn ParseTable
    ) -> Option<Tree> {
        loop {
            let top_position = stack.top_position(version);
            let Some(candidate) = self.tree.clone() else {
                return None;
            };
            if self.char_index > top_position.chars {
                return None;
            }
            if self.char_index < top_position.chars {
                self.pop_reusable_node();
                continue;
            }
            if candidate.has_changes {
                // If `candidate` is itself a leaf, the stack-top breakdown this also requires is
                // the action engine's responsibility (`breakdown_top_of_stack`); the cursor only
                // ever breaks down its own view of the previous tree.
                self.breakdown();
                continue;
            }
            if !self.can_reuse(table, stack.top_state(version), &candidate) {
                self.breakdown();
                continue;
            }
            self.pop_reusable_node();
            return Some(candidate);
        }
    }
}

/// True when `tree` overlaps the half-open byte range `[a, b)`, i.e. when the edit that produced
/// `has_changes` flags could have touched it. Exposed for callers that build a previous tree by
/// hand in tests; the driver itself only reads `has_changes`, which a caller is expected to have
/// already computed this way before calling `parse`.
pub fn overlaps_edit(start_bytes: u32, tree: &Tree, a: u32, b: u32) -> bool {
    let end_bytes = start_bytes + tree.size.bytes;
    start_bytes < b && a < end_bytes
}
