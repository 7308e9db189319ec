// Copyright (c) 2018 King's College London
// created by the Software Development Team <http://soft-dev.org/>
//
// The Universal Permissive License (UPL), Version 1.0. See glrtable's idx.rs for the full text.

//! The Action Engine: the inner loop that turns one lookahead tree into zero or more stack
//! mutations for a single version. `consume_lookahead` is the entry point the driver calls once
//! per version per round; everything else here (`breakdown_top_of_stack`, `reduce`,
//! `handle_error`, `repair_error`, `recover`/`recover_eof`, `accept`) is a helper it dispatches to.

use cactus::Cactus;
use glrtable::{Action, ParseTable, StateId, Symbol};

use crate::debug::DebugEventKind;
use crate::error::ParseFailure;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::stack::{Slice, PopOutcome, VersionId, ITER_CONTINUE, ITER_POP, ITER_STOP};
use crate::tree::{self, ParseState, Tree};

/// Count of non-extra ("essential") trees in a sequence, per the Glossary.
fn essential_count(trees: &[Tree]) -> usize {
    trees.iter().filter(|t| !t.is_extra()).count()
}

fn trailing_extra_count(trees: &[Tree]) -> usize {
    trees.iter().rev().take_while(|t| t.is_extra()).count()
}

/// What happened to a version after `consume_lookahead` ran out of reasons to keep looping.
pub(crate) enum ConsumeOutcome {
    /// The version is still live; the driver should obtain a fresh lookahead and call again.
    Updated,
    /// The version no longer exists (accepted, or folded away during error handling).
    Removed
}

enum BreakdownOutcome {
    Performed,
    Aborted
}

enum ReduceOutcome {
    Succeeded,
    StoppedAtError(Slice)
}

enum RepairOutcome {
    Repaired,
    NotFound
}

impl<'t, L: Lexer> Parser<'t, L> {
    /// Drives `v` through zero or more ERROR/REDUCE steps and exactly one SHIFT, ACCEPT, RECOVER
    /// or synthesized error frame, all against the single `lookahead` the driver obtained for
    /// this round.
    pub(crate) fn consume_lookahead(
        &mut self,
        v: VersionId,
        lookahead: Tree,
        is_split: bool
    ) -> Result<ConsumeOutcome, ParseFailure> {
        'outer: loop {
            let state = self.stack.top_state(v);
            let mut actions: Vec<Action> = self.table.actions(state, lookahead.symbol).to_vec();
            if actions.is_empty() {
                // No action is an implicit ERROR per the Parse Table Interface.
                actions.push(Action::Error);
            }

            let mut error_repair_depth: Option<u32> = None;
            let mut last_reduction_version: Option<VersionId> = None;
            let mut error_repair_failed = false;

            let mut idx = 0;
            loop {
                let action = if idx < actions.len() {
                    actions[idx]
                } else if error_repair_failed {
                    Action::Error
                } else {
                    break;
                };
                idx += 1;

                if let (Some(depth), Action::Reduce { child_count, .. }) = (error_repair_depth, action) {
                    if child_count > depth {
                        continue;
                    }
                }

                match action {
                    Action::Error => match self.breakdown_top_of_stack(v) {
                        BreakdownOutcome::Performed => continue 'outer,
                        BreakdownOutcome::Aborted => {
                            self.handle_error(v, state, is_split)?;
                            return Ok(ConsumeOutcome::Updated);
                        }
                    },
                    Action::Shift { to_state, extra, .. } => {
                        let tree = if extra {
                            let structural = self.table.symbol_metadata(lookahead.symbol).structural;
                            tree::mark_extra(&lookahead, is_split, structural)
                        } else {
                            lookahead.clone()
                        };
                        let new_state = if extra { state } else { to_state };
                        let pending = !tree.is_leaf();
                        self.stack.push(v, Some(tree), pending, new_state);
                        return Ok(ConsumeOutcome::Updated);
                    }
                    Action::Reduce { symbol, child_count, extra, fragile } => {
                        match self.reduce(v, symbol, child_count, extra, fragile, is_split)? {
                            ReduceOutcome::Succeeded => last_reduction_version = Some(v),
                            ReduceOutcome::StoppedAtError(slice) => {
                                error_repair_depth = Some(essential_count(&slice.trees) as u32);
                                let cell_actions = actions.clone();
                                match self.repair_error(v, slice, &lookahead, &cell_actions)? {
                                    RepairOutcome::Repaired => continue 'outer,
                                    RepairOutcome::NotFound => {
                                        if !self.stack.exists(v) {
                                            return Ok(ConsumeOutcome::Removed);
                                        }
                                        error_repair_failed = true;
                                    }
                                }
                            }
                        }
                    }
                    Action::Accept => {
                        self.accept(v);
                        return Ok(ConsumeOutcome::Removed);
                    }
                    Action::Recover { to_state } => {
                        if lookahead.symbol == Symbol::END {
                            self.recover_eof(v);
                        } else {
                            self.recover(v, to_state, lookahead.clone());
                        }
                        return Ok(ConsumeOutcome::Updated);
                    }
                }
            }

            if let Some(lr) = last_reduction_version {
                self.stack.renumber_version(lr, v);
                continue 'outer;
            }
            return Ok(ConsumeOutcome::Updated);
        }
    }

    /// Breaks the pending composite at the top of `v` down into its children, trying successively
    /// finer granularity until a leaf surfaces or there is nothing left to break down.
    fn breakdown_top_of_stack(&mut self, v: VersionId) -> BreakdownOutcome {
        let mut broke_down_any = false;
        loop {
            let popped: Vec<Slice> = self
                .stack
                .pop_pending(v)
                .into_iter()
                .filter(|s| !s.trees.is_empty())
                .collect();
            if popped.is_empty() {
                return if broke_down_any {
                    BreakdownOutcome::Performed
                } else {
                    BreakdownOutcome::Aborted
                };
            }

            let mut last_pushed_is_leaf = true;
            for slice in popped {
                broke_down_any = true;
                let parent = slice.trees[0].clone();
                let mut state = self.stack.top_state(slice.version);
                for child in &parent.children {
                    let next_state = Self::successor_state(self.table, state, child);
                    let pending = !child.is_leaf();
                    self.stack.push(slice.version, Some(child.clone()), pending, next_state);
                    state = next_state;
                    last_pushed_is_leaf = child.is_leaf();
                }
                for rest in &slice.trees[1..] {
                    let next_state = Self::successor_state(self.table, state, rest);
                    self.stack.push(slice.version, Some(rest.clone()), false, next_state);
                    state = next_state;
                }
            }
            if last_pushed_is_leaf {
                return BreakdownOutcome::Performed;
            }
        }
    }

    fn successor_state(table: &dyn ParseTable, state: StateId, child: &Tree) -> StateId {
        if child.is_error() {
            StateId::ERROR
        } else if child.is_extra() {
            state
        } else {
            match table.last_action(state, child.symbol) {
                Action::Shift { to_state, .. } | Action::Recover { to_state } => to_state,
                _ => StateId::ERROR
            }
        }
    }

    /// Reduces `child_count` trees on top of `v` to `symbol`, once per distinct path popped.
    fn reduce(
        &mut self,
        v: VersionId,
        symbol: Symbol,
        child_count: u32,
        extra: bool,
        fragile: bool,
        is_split: bool
    ) -> Result<ReduceOutcome, ParseFailure> {
        let initial_slot_count = self.stack.slot_count();
        let slices = match self.stack.pop_count(v, child_count as usize) {
            PopOutcome::Failed => return Err(ParseFailure::StackExhausted),
            PopOutcome::StoppedAtError(slice) => return Ok(ReduceOutcome::StoppedAtError(slice)),
            PopOutcome::Ok(slices) => slices
        };

        for slice in slices {
            let n = slice.trees.len() - trailing_extra_count(&slice.trees);
            let state = self.stack.top_state(slice.version);
            let version_count = self.stack.version_count();
            let node_fragile = fragile || is_split || version_count > 1;
            let parse_state = if node_fragile {
                ParseState::Error
            } else {
                ParseState::Specific(state)
            };
            let parent = tree::make_node(self.table, symbol, n, &slice.trees, parse_state, node_fragile);
            let new_state = if extra {
                state
            } else {
                match self.table.last_action(state, symbol) {
                    Action::Shift { to_state, .. } | Action::Recover { to_state } => to_state,
                    _ => StateId::ERROR
                }
            };
            let parent = if extra {
                let structural = self.table.symbol_metadata(symbol).structural;
                tree::mark_extra(&parent, is_split, structural)
            } else {
                parent
            };
            self.stack.push(slice.version, Some(parent), false, new_state);
            for rest in &slice.trees[n..] {
                self.stack.push(slice.version, Some(rest.clone()), false, new_state);
            }
        }

        self.stack.merge_from(initial_slot_count);
        Ok(ReduceOutcome::Succeeded)
    }

    /// Synthesizes an error frame on `v`, first trying every non-extra reduction the error state
    /// itself offers (so as much of the already-shifted prefix as possible is folded into real
    /// productions before being wrapped in an error node).
    fn handle_error(&mut self, v: VersionId, state: StateId, is_split: bool) -> Result<(), ParseFailure> {
        self.reduce_scratch.clear();
        let mut has_shift_action = false;
        // Symbol ids are 1-based (`Symbol::END` is the reserved id 0, and `symbol_count` counts
        // only the registered, non-END symbols), so the alphabet to scan is `1..=symbol_count()`.
        for i in 1..=self.table.symbol_count() as u16 {
            let s = Symbol(i);
            for action in self.table.actions(state, s) {
                match action {
                    Action::Reduce { symbol, child_count, extra, .. } if !*extra && *child_count > 0 => {
                        self.reduce_scratch.push((*symbol, *child_count));
                    }
                    Action::Shift { extra, .. } if !*extra => has_shift_action = true,
                    Action::Recover { .. } => has_shift_action = true,
                    _ => {}
                }
            }
        }

        let pre_error_slot_count = self.stack.slot_count();
        let reduces: Vec<(Symbol, u32)> = self.reduce_scratch.drain(..).collect();
        let mut did_reduce = false;
        for (symbol, child_count) in reduces {
            if let ReduceOutcome::Succeeded = self.reduce(v, symbol, child_count, false, true, is_split)? {
                did_reduce = true;
            }
        }

        if did_reduce && !has_shift_action && self.stack.exists(pre_error_slot_count) {
            // The raw pre-reduce state has no way to shift or recover at all, so it is a dead end
            // once we already have a reduced alternative; fold onto that alternative instead of
            // carrying the dead end into the merge below.
            self.stack.renumber_version(pre_error_slot_count, v);
        }

        let post_reduce_slot_count = self.stack.slot_count();
        self.stack.push(v, None, false, StateId::ERROR);
        for extra_v in pre_error_slot_count..post_reduce_slot_count {
            if self.stack.exists(extra_v) {
                self.stack.push(extra_v, None, false, StateId::ERROR);
                self.stack.merge(v, extra_v);
            }
        }

        self.debugger
            .message(DebugEventKind::Parse, &format!("handle_error: synthesized error frame on v{v} at state {state:?}"));
        Ok(())
    }

    /// Attempts to bridge the error boundary `slice` stopped at by finding a reduction whose
    /// missing children can be supplied by skipping some of the trees below the error frame.
    fn repair_error(
        &mut self,
        v: VersionId,
        slice: Slice,
        lookahead: &Tree,
        actions: &[Action]
    ) -> Result<RepairOutcome, ParseFailure> {
        let trees_above_error = slice.trees;
        let count_above_error = essential_count(&trees_above_error) as u32;

        let mut candidates: Vec<(Symbol, u32)> = actions
            .iter()
            .filter_map(|a| match a {
                Action::Reduce { symbol, child_count, .. } if *child_count > count_above_error => {
                    Some((*symbol, *child_count - count_above_error))
                }
                _ => None
            })
            .collect();

        if candidates.is_empty() {
            self.stack.remove_version(v);
            return Ok(RepairOutcome::NotFound);
        }

        struct Resolution {
            symbol: Symbol,
            next_state: StateId
        }
        struct Best {
            index: usize,
            skip_count: usize
        }

        let mut recorded: Vec<Resolution> = Vec::new();
        let mut best: Option<Best> = None;
        let table = self.table;
        let lookahead_symbol = lookahead.symbol;
        let trees_above_for_sim = trees_above_error.clone();

        let slices = self.stack.iterate(v, |state, trees_below, tree_count, _is_done, _is_pending| {
            let mut mask = ITER_CONTINUE;
            let mut i = 0;
            while i < candidates.len() {
                let (symbol, count) = candidates[i];
                if count as usize > tree_count {
                    i += 1;
                    continue;
                }
                let skip_count = tree_count - count as usize;
                if let Some(b) = &best {
                    if skip_count >= b.skip_count {
                        candidates.remove(i);
                        continue;
                    }
                }
                let next_state = match table.last_action(state, symbol) {
                    Action::Shift { to_state, .. } => to_state,
                    _ => {
                        i += 1;
                        continue;
                    }
                };
                if !table.has_action(next_state, lookahead_symbol) {
                    i += 1;
                    continue;
                }
                let resolved = simulate_repair(table, state, trees_below, count, &trees_above_for_sim)
                    .filter(|&final_state| matches!(table.last_action(final_state, symbol), Action::Reduce { .. }));
                if resolved.is_some() {
                    recorded.push(Resolution { symbol, next_state });
                    best = Some(Best { index: recorded.len() - 1, skip_count });
                    mask |= ITER_POP;
                    candidates.remove(i);
                    continue;
                }
                i += 1;
            }
            if candidates.is_empty() {
                mask |= ITER_STOP;
            }
            mask
        });

        let Some(best) = best else {
            self.stack.remove_version(v);
            for s in slices {
                self.stack.remove_version(s.version);
            }
            return Ok(RepairOutcome::NotFound);
        };

        let resolution_symbol = recorded[best.index].symbol;
        let resolution_next_state = recorded[best.index].next_state;
        let mut winning: Option<Slice> = None;
        for (i, s) in slices.into_iter().enumerate() {
            if i == best.index {
                winning = Some(s);
            } else {
                self.stack.remove_version(s.version);
            }
        }
        let winning = winning.expect("best.index indexes one of iterate's returned slices");

        self.stack.renumber_version(winning.version, v);

        let split_at = winning.trees.len().saturating_sub(best.skip_count);
        let mut head: Vec<Tree> = winning.trees[..split_at].to_vec();
        let tail: Vec<Tree> = winning.trees[split_at..].to_vec();
        let error_node = tree::make_error_node(tail);
        head.push(error_node);
        head.extend(trees_above_error.iter().cloned());
        let n = head.len();
        let parent = tree::make_node(self.table, resolution_symbol, n, &head, ParseState::Error, true);
        self.stack.push(v, Some(parent), false, resolution_next_state);

        self.debugger
            .message(DebugEventKind::Parse, &format!("repair_error: bridged v{v} by skipping {} tree(s)", best.skip_count));
        Ok(RepairOutcome::Repaired)
    }

    /// Splits `v` into a recovery branch (stays in the error state, absorbing `lookahead`) and a
    /// continuation branch (shifts `lookahead` normally at `to_state`), so both possibilities
    /// survive as separate GLR versions.
    fn recover(&mut self, v: VersionId, to_state: StateId, lookahead: Tree) {
        let is_split = self.stack.version_count() > 1;
        let meta = self.table.symbol_metadata(lookahead.symbol);
        let v2 = self.stack.duplicate_version(v);
        let error_branch_tree = if meta.extra {
            tree::mark_extra(&lookahead, is_split, meta.structural)
        } else {
            lookahead.clone()
        };
        self.stack.push(v2, Some(error_branch_tree), false, StateId::ERROR);
        self.stack.push(v, Some(lookahead), false, to_state);
        self.debugger
            .message(DebugEventKind::Parse, &format!("recover: split v{v} into recovery v{v2} and continuation at {to_state:?}"));
    }

    /// Terminates a parse that ran off the end of input while in the error state: an empty error
    /// node covers whatever remained unconsumed.
    fn recover_eof(&mut self, v: VersionId) {
        let error_node = tree::make_error_node(Vec::new());
        self.stack.push(v, Some(error_node), false, StateId::INITIAL_AFTER_EOF_RECOVERY);
        self.debugger.message(DebugEventKind::Parse, &format!("recover_eof: v{v} terminated in error state"));
    }

    /// Pops `v` to its root and offers every resulting candidate root to `select` against
    /// whatever `finished_tree` currently holds.
    fn accept(&mut self, v: VersionId) {
        for slice in self.stack.pop_all(v) {
            let trees = slice.trees;
            let Some(root_idx) = trees.iter().rposition(|t| !t.is_extra()) else {
                self.stack.remove_version(slice.version);
                continue;
            };
            let root = &trees[root_idx];
            let trailing = &trees[root_idx + 1..];
            // When there is nothing to splice on, keep the root's own identity rather than
            // rebuilding an identical node: this is what lets re-parsing unchanged input reuse the
            // previous tree's root by reference (see the Reuse soundness property).
            let candidate = if trailing.is_empty() {
                Tree::clone(root)
            } else {
                let mut children: Vec<Tree> = root.children.clone();
                children.extend(trailing.iter().cloned());
                tree::set_children(self.table, root.symbol, children, root.parse_state, root.is_fragile())
            };

            let replace = match &self.finished_tree {
                None => true,
                Some(incumbent) => tree::select(incumbent, &candidate)
            };
            if replace {
                self.finished_tree = Some(candidate);
            }
            self.stack.remove_version(slice.version);
        }
        self.debugger.message(DebugEventKind::Parse, "accept: version reached ACCEPT");
    }
}

/// Simulates shifting `count` essential trees from `trees_below` (oldest first) starting at
/// `state`, then every tree in `trees_above_error`, using a `Cactus`-backed state stack so the
/// simulation never touches the real GSS. Returns the resulting state, or `None` if any step is
/// not a SHIFT.
fn simulate_repair(
    table: &dyn ParseTable,
    state: StateId,
    trees_below: &[Tree],
    count: u32,
    trees_above_error: &[Tree]
) -> Option<StateId> {
    let mut states = Cactus::new().child(state);
    let mut consumed = 0u32;
    for t in trees_below {
        if consumed >= count {
            break;
        }
        if t.is_extra() {
            continue;
        }
        let cur = *states.val().unwrap();
        match table.last_action(cur, t.symbol) {
            Action::Shift { to_state, .. } => {
                states = states.child(to_state);
                consumed += 1;
            }
            _ => return None
        }
    }
    if consumed < count {
        return None;
    }
    for t in trees_above_error {
        if t.is_extra() {
            continue;
        }
        let cur = *states.val().unwrap();
        match table.last_action(cur, t.symbol) {
            Action::Shift { to_state, .. } => states = states.child(to_state),
            _ => return None
        }
    }
    Some(*states.val().unwrap())
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use glrtable::{LexStateId, StaticParseTable, SymbolMetadata};

    use super::*;
    use crate::length::Length;
    use crate::lexer::Lexeme;

    struct DummyLexer;

    impl Lexer for DummyLexer {
        fn start(&mut self, _state: LexStateId) {}

        fn finish(&mut self) -> Lexeme {
            unreachable!("action-engine tests drive the stack directly, without a real lexer")
        }

        fn reset(&mut self, _position: Length) {}

        fn position(&self) -> Length {
            Length::ZERO
        }
    }

    #[test]
    fn handle_error_synthesizes_error_frame_with_no_repair_options() {
        let table = StaticParseTable::new();
        let mut parser = Parser::new(&table, DummyLexer);
        parser
            .handle_error(0, StateId(99), false)
            .expect("handle_error never fails outright");
        assert_eq!(parser.stack.version_count(), 1);
        assert_eq!(parser.stack.top_state(0), StateId::ERROR);
        assert_eq!(parser.stack.top_position(0), Length::ZERO);
    }

    #[test]
    fn recover_splits_into_error_branch_and_continuation() {
        let mut table = StaticParseTable::new();
        table.set_symbol(
            Symbol(1),
            "a",
            SymbolMetadata {
                extra: false,
                structural: true,
                named: true,
                visible: true
            }
        );
        let mut parser = Parser::new(&table, DummyLexer);
        let lookahead = tree::make_leaf(&table, Symbol(1), Length::new(1, 1), Length::ZERO, LexStateId(0), false);

        parser.recover(0, StateId(7), lookahead);

        assert_eq!(parser.stack.version_count(), 2);
        assert_eq!(parser.stack.top_state(0), StateId(7));
        assert_eq!(parser.stack.top_position(0), Length::new(1, 1));
        assert_eq!(parser.stack.top_state(1), StateId::ERROR);
        assert_eq!(parser.stack.top_position(1), Length::new(1, 1));
    }

    #[test]
    fn recover_eof_lands_at_initial_after_eof_recovery_with_zero_width() {
        let table = StaticParseTable::new();
        let mut parser = Parser::new(&table, DummyLexer);
        parser.recover_eof(0);
        assert_eq!(parser.stack.version_count(), 1);
        assert_eq!(parser.stack.top_state(0), StateId::INITIAL_AFTER_EOF_RECOVERY);
        assert_eq!(parser.stack.top_position(0), Length::ZERO);
    }

    #[test]
    fn accept_splices_trailing_extras_onto_the_chosen_root() {
        let mut table = StaticParseTable::new();
        table.set_symbol(
            Symbol(1),
            "NUM",
            SymbolMetadata {
                extra: false,
                structural: true,
                named: true,
                visible: true
            }
        );
        table.set_symbol(
            Symbol(2),
            "expr",
            SymbolMetadata {
                extra: false,
                structural: true,
                named: true,
                visible: true
            }
        );
        table.set_symbol(
            Symbol(3),
            "ws",
            SymbolMetadata {
                extra: true,
                structural: false,
                named: false,
                visible: false
            }
        );
        let mut parser = Parser::new(&table, DummyLexer);

        let num_leaf = tree::make_leaf(&table, Symbol(1), Length::new(1, 1), Length::ZERO, LexStateId(0), false);
        let root = tree::make_node(&table, Symbol(2), 1, &[Rc::clone(&num_leaf)], ParseState::Independent, false);
        let extra_leaf = tree::make_leaf(&table, Symbol(3), Length::new(1, 1), Length::ZERO, LexStateId(0), false);
        assert!(extra_leaf.is_extra());

        parser.stack.push(0, Some(Rc::clone(&root)), false, StateId(1));
        parser.stack.push(0, Some(Rc::clone(&extra_leaf)), false, StateId(2));

        parser.accept(0);

        let accepted = parser.finished_tree.take().expect("accept should have produced a tree");
        assert!(!Rc::ptr_eq(&accepted, &root));
        assert_eq!(accepted.symbol, Symbol(2));
        assert_eq!(accepted.children.len(), 2);
        assert!(accepted.children[1].is_extra());
        assert_eq!(accepted.total_chars(), 2);
        assert_eq!(parser.stack.version_count(), 0);
    }

    #[test]
    fn repair_error_bridges_a_gap_by_skipping_back_across_one_tree() {
        let mut table = StaticParseTable::new();
        table.add_action(
            StateId(0),
            Symbol(1),
            Action::Shift {
                to_state: StateId(10),
                extra: false,
                can_hide_split: false
            }
        );
        table.add_action(
            StateId(0),
            Symbol(3),
            Action::Shift {
                to_state: StateId(5),
                extra: false,
                can_hide_split: false
            }
        );
        table.add_action(
            StateId(10),
            Symbol(2),
            Action::Shift {
                to_state: StateId(11),
                extra: false,
                can_hide_split: false
            }
        );
        table.add_action(
            StateId(11),
            Symbol(3),
            Action::Reduce {
                symbol: Symbol(3),
                child_count: 2,
                extra: false,
                fragile: false
            }
        );
        table.add_action(StateId(5), Symbol::END, Action::Accept);

        let mut parser = Parser::new(&table, DummyLexer);
        let a_leaf = tree::make_leaf(&table, Symbol(1), Length::new(1, 1), Length::ZERO, LexStateId(0), false);
        let x_leaf = tree::make_leaf(&table, Symbol(2), Length::new(1, 1), Length::ZERO, LexStateId(0), false);
        parser.stack.push(0, Some(a_leaf), false, StateId(2));
        parser.stack.push(0, None, false, StateId::ERROR);
        parser.stack.push(0, Some(x_leaf), false, StateId(3));

        let slice = match parser.stack.pop_count(0, 2) {
            PopOutcome::StoppedAtError(s) => s,
            other => panic!("expected StoppedAtError, got {other:?}")
        };
        assert_eq!(slice.trees.len(), 1);

        let lookahead = tree::make_leaf(&table, Symbol::END, Length::ZERO, Length::ZERO, LexStateId(0), false);
        let cell_actions = [Action::Reduce {
            symbol: Symbol(3),
            child_count: 2,
            extra: false,
            fragile: false
        }];
        let outcome = parser
            .repair_error(0, slice, &lookahead, &cell_actions)
            .expect("repair_error should not fail");
        assert!(matches!(outcome, RepairOutcome::Repaired));

        assert!(parser.stack.exists(0));
        assert_eq!(parser.stack.version_count(), 1);
        assert_eq!(parser.stack.top_state(0), StateId(5));
    }
}
