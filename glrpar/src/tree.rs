// Copyright (c) 2018 King's College London
// created by the Software Development Team <http://soft-dev.org/>
//
// The Universal Permissive License (UPL), Version 1.0. See glrtable's idx.rs for the full text.

//! The parse tree model: immutable, reference-counted nodes. Once a node's children are set its
//! content never changes again; the one mutable corner is the cursor back-pointer (`context`),
//! which exists purely so the Reusable-Node Cursor can walk back up to a node's right sibling and
//! carries no ownership implication, and the `extra` flag, which a shift action may flip after
//! the tree already exists (see `Tree::mark_extra`).

use std::cell::{Cell, RefCell};
use std::fmt::Write as _;
use std::rc::{Rc, Weak};

use glrtable::{LexStateId, ParseTable, StateId, Symbol};

use crate::length::Length;

/// Reference-counted handle to a tree node. Cloning is O(1) (it bumps a refcount); dropping the
/// last handle frees the node. There is no cycle risk because `context`, the only back-edge, is
/// a `Weak` reference.
pub type Tree = Rc<TreeData>;

/// Whether a lexed leaf may be reused regardless of the lex state it is offered at, or only under
/// the specific lex state it was produced in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LexState {
    Independent,
    Specific(LexStateId)
}

/// Whether a subtree may be reused regardless of the parse state it is offered at, must never be
/// reused across parse states, or was built at a specific state.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseState {
    Independent,
    Error,
    Specific(StateId)
}

#[derive(Debug, Clone)]
pub struct TreeData {
    pub symbol: Symbol,
    pub size: Length,
    pub padding: Length,
    pub children: Vec<Tree>,
    pub child_count: u32,
    pub named_child_count: u32,
    pub visible_child_count: u32,
    pub error_size: u32,
    extra: Cell<bool>,
    pub has_changes: bool,
    pub fragile_left: bool,
    pub fragile_right: bool,
    pub lex_state: LexState,
    pub parse_state: ParseState,
    pub first_unexpected_character: Option<char>,
    named: bool,
    visible: bool,
    /// (parent, index in parent's children) — non-owning, cursor-only. `None` until
    /// `link_parent_pointers` has run (or for a node with no parent yet).
    context: RefCell<Option<(Weak<TreeData>, usize)>>
}

impl TreeData {
    pub fn is_fragile(&self) -> bool {
        self.fragile_left || self.fragile_right
    }

    pub fn is_extra(&self) -> bool {
        self.extra.get()
    }

    pub fn is_named(&self) -> bool {
        self.named
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_error(&self) -> bool {
        self.symbol == Symbol::ERROR
    }

    pub fn total_size(&self) -> Length {
        self.size + self.padding
    }

    pub fn total_chars(&self) -> u32 {
        self.total_size().chars
    }

    /// The node's own `(parent, index)` back-reference, if it has been linked.
    pub fn context(&self) -> Option<(Tree, usize)> {
        self.context
            .borrow()
            .as_ref()
            .and_then(|(w, i)| w.upgrade().map(|p| (p, *i)))
    }

    fn set_context(&self, parent: &Tree, index: usize) {
        *self.context.borrow_mut() = Some((Rc::downgrade(parent), index));
    }
}

/// Marks `t`'s `extra` flag, copying the node first if it is shared by more than one live
/// reference (the driver's stack may have duplicated a version, so the same tree can sit on two
/// paths at once; only one of them should become `extra`). Mirrors the distilled spec's
/// instruction in the SHIFT action: "Mark the tree extra if action.extra (copy-on-write when
/// versions > 1 and the symbol is structural)."
pub fn mark_extra(t: &Tree, is_split: bool, structural: bool) -> Tree {
    if t.extra.get() {
        return Rc::clone(t);
    }
    if is_split && structural && Rc::strong_count(t) > 1 {
        let copy = make_copy(t);
        copy.extra.set(true);
        copy
    } else {
        t.extra.set(true);
        Rc::clone(t)
    }
}

pub fn make_copy(t: &Tree) -> Tree {
    Rc::new((**t).clone())
}

fn error_contribution(c: &Tree) -> u32 {
    if c.is_error() {
        c.size.chars
    } else {
        c.error_size
    }
}

fn compute_error_size(children: &[Tree]) -> u32 {
    children
        .iter()
        .filter(|c| !c.is_extra())
        .map(error_contribution)
        .sum()
}

fn compute_size_and_padding(children: &[Tree]) -> (Length, Length) {
    let padding = children.first().map(|c| c.padding).unwrap_or(Length::ZERO);
    let total: Length = children.iter().fold(Length::ZERO, |acc, c| acc + c.total_size());
    (total - padding, padding)
}

/// Constructs a lexed leaf. `is_fragile` comes straight from the lexer; per the Lexer Interface
/// section, a leaf is `LexState::Independent` unless the lexer marked it fragile, in which case it
/// is tagged with the lex state that produced it.
pub fn make_leaf(
    table: &dyn ParseTable,
    symbol: Symbol,
    size: Length,
    padding: Length,
    lex_state_used: LexStateId,
    is_fragile: bool
) -> Tree {
    let meta = table.symbol_metadata(symbol);
    Rc::new(TreeData {
        symbol,
        size,
        padding,
        children: Vec::new(),
        child_count: 0,
        named_child_count: 0,
        visible_child_count: 0,
        error_size: 0,
        extra: Cell::new(meta.extra),
        has_changes: false,
        fragile_left: is_fragile,
        fragile_right: is_fragile,
        lex_state: if is_fragile {
            LexState::Specific(lex_state_used)
        } else {
            LexState::Independent
        },
        parse_state: ParseState::Independent,
        first_unexpected_character: None,
        named: meta.named,
        visible: meta.visible,
        context: RefCell::new(None)
    })
}

/// Constructs an error leaf carrying the first unexpected character the lexer encountered while
/// scanning for a token boundary in error mode.
pub fn make_error_leaf(size: Length, padding: Length, first_unexpected_character: Option<char>) -> Tree {
    Rc::new(TreeData {
        symbol: Symbol::ERROR,
        size,
        padding,
        children: Vec::new(),
        child_count: 0,
        named_child_count: 0,
        visible_child_count: 0,
        error_size: size.chars,
        extra: Cell::new(false),
        has_changes: false,
        fragile_left: true,
        fragile_right: true,
        lex_state: LexState::Independent,
        parse_state: ParseState::Error,
        first_unexpected_character,
        named: false,
        visible: true,
        context: RefCell::new(None)
    })
}

/// Builds an internal node for `symbol` from the first `n` entries of `children` (the distilled
/// spec allows the caller to pass a longer slice than it intends to attach — e.g. the trailing
/// extras a reduce trims off — and only the prefix of length `n` becomes this node's children;
/// the rest remain the caller's to re-push).
pub fn make_node(
    table: &dyn ParseTable,
    symbol: Symbol,
    n: usize,
    children: &[Tree],
    parse_state: ParseState,
    fragile: bool
) -> Tree {
    let children: Vec<Tree> = children[..n].to_vec();
    build_node(table, symbol, children, parse_state, fragile)
}

fn build_node(
    table: &dyn ParseTable,
    symbol: Symbol,
    children: Vec<Tree>,
    parse_state: ParseState,
    fragile: bool
) -> Tree {
    let meta = table.symbol_metadata(symbol);
    let (size, padding) = compute_size_and_padding(&children);
    let error_size = compute_error_size(&children);
    let child_count = children.len() as u32;
    let named_child_count = children
        .iter()
        .filter(|c| c.is_named() && !c.is_extra())
        .count() as u32;
    let visible_child_count = children
        .iter()
        .filter(|c| c.is_visible() && !c.is_extra())
        .count() as u32;
    let has_changes = children.iter().any(|c| c.has_changes);
    Rc::new(TreeData {
        symbol,
        size,
        padding,
        children,
        child_count,
        named_child_count,
        visible_child_count,
        error_size,
        extra: Cell::new(meta.extra),
        has_changes,
        fragile_left: fragile,
        fragile_right: fragile,
        lex_state: LexState::Independent,
        parse_state,
        first_unexpected_character: None,
        named: meta.named,
        visible: meta.visible,
        context: RefCell::new(None)
    })
}

/// Wraps `children` (content already attributed to an error: skipped tokens, partially-matched
/// subtrees, ...) in a synthetic `ERROR` node. Used by `handle_error`, `repair_error`, and
/// `recover_eof`.
pub fn make_error_node(children: Vec<Tree>) -> Tree {
    let (size, padding) = compute_size_and_padding(&children);
    let has_changes = children.iter().any(|c| c.has_changes);
    Rc::new(TreeData {
        symbol: Symbol::ERROR,
        size,
        padding,
        children,
        child_count: 0,
        named_child_count: 0,
        visible_child_count: 0,
        error_size: size.chars,
        extra: Cell::new(false),
        has_changes,
        fragile_left: true,
        fragile_right: true,
        lex_state: LexState::Independent,
        parse_state: ParseState::Error,
        first_unexpected_character: None,
        named: false,
        visible: true,
        context: RefCell::new(None)
    })
}

/// Rebuilds `symbol`'s node with a new, complete child list. Used by `accept` to splice
/// additional top-of-stack siblings into the chosen root before the parse finishes.
pub fn set_children(
    table: &dyn ParseTable,
    symbol: Symbol,
    children: Vec<Tree>,
    parse_state: ParseState,
    fragile: bool
) -> Tree {
    build_node(table, symbol, children, parse_state, fragile)
}

/// Total order over trees used to break ties between equally-erroneous ambiguous parses.
/// Compares by symbol, then child count, then recursively by each child pair, then (for leaves)
/// by the first unexpected character of an error leaf. Plain leaves of the same symbol compare
/// equal — this is a deliberate, documented choice (see SPEC_FULL.md) since the distilled spec
/// leaves the exact order unspecified beyond "a total order used for tie-breaks".
pub fn compare(a: &Tree, b: &Tree) -> i32 {
    if a.symbol != b.symbol {
        return if a.symbol.as_u16() < b.symbol.as_u16() {
            -1
        } else {
            1
        };
    }
    if a.children.len() != b.children.len() {
        return if a.children.len() < b.children.len() {
            -1
        } else {
            1
        };
    }
    for (ca, cb) in a.children.iter().zip(b.children.iter()) {
        let c = compare(ca, cb);
        if c != 0 {
            return c;
        }
    }
    if a.children.is_empty() {
        if let (Some(x), Some(y)) = (a.first_unexpected_character, b.first_unexpected_character) {
            if x != y {
                return if x < y { -1 } else { 1 };
            }
        }
    }
    0
}

/// The sole ambiguity-resolution policy: does `candidate` replace `incumbent`? Smaller
/// `error_size` wins; ties are broken by `compare`; a full tie keeps the incumbent. This makes
/// the choice deterministic and (by induction on the two rules) transitive and antisymmetric.
pub fn select(incumbent: &Tree, candidate: &Tree) -> bool {
    if candidate.error_size != incumbent.error_size {
        return candidate.error_size < incumbent.error_size;
    }
    compare(candidate, incumbent) < 0
}

/// Walks `root` and sets every descendant's `context` back-pointer to `(parent, index)`. Done
/// once, at the end of a successful parse, so that a future incremental parse using this tree as
/// `previous_tree` can walk it with the Reusable-Node Cursor.
pub fn link_parent_pointers(root: &Tree) {
    fn walk(node: &Tree) {
        for (i, c) in node.children.iter().enumerate() {
            c.set_context(node, i);
            walk(c);
        }
    }
    walk(root);
}

/// Renders an indented, s-expression-like dump of `t` against its source text. A debugging
/// convenience (grounded in lrpar's `ParseTree::pp`), not part of any invariant.
pub fn pp(t: &Tree, table: &dyn ParseTable, src: &str) -> String {
    pp_at(t, table, src, &mut 0, 0)
}

fn pp_at(t: &Tree, table: &dyn ParseTable, src: &str, byte_pos: &mut usize, depth: usize) -> String {
    let mut out = String::new();
    let indent = " ".repeat(depth);
    *byte_pos += t.padding.bytes as usize;
    if t.is_error() {
        let _ = write!(out, "{}ERROR", indent);
    } else {
        let _ = write!(out, "{}{}", indent, table.symbol_name(t.symbol));
    }
    if t.is_leaf() {
        let end = (*byte_pos + t.size.bytes as usize).min(src.len());
        let text = src.get(*byte_pos..end).unwrap_or("");
        let _ = write!(out, " {}", text);
    }
    out.push('\n');
    for c in &t.children {
        out.push_str(&pp_at(c, table, src, byte_pos, depth + 1));
    }
    if t.is_leaf() {
        *byte_pos += t.size.bytes as usize;
    }
    out
}
