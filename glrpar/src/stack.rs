// Copyright (c) 2018 King's College London
// created by the Software Development Team <http://soft-dev.org/>
//
// The Universal Permissive License (UPL), Version 1.0. See glrtable's idx.rs for the full text.

//! The graph-structured parse stack (GSS). Modelled as an arena of frames plus a table of live
//! "version" frontiers, per the distilled spec's design notes: this replaces the pointer-heavy
//! cyclic graphs a naive port would reach for with arena+index ownership, so there is no need for
//! `Rc`/`Weak` cycles here at all (only the tree model needs that, for its cursor back-pointer).
//!
//! A frame never moves once created; `merge` unions two frames' incoming edges onto one of them
//! and repoints the other version at it, but it never mutates a frame a third party might already
//! be mid-traversal over (the arena only ever grows).

use glrtable::StateId;

use crate::length::Length;
use crate::tree::Tree;

pub type VersionId = usize;
type FrameId = usize;

#[derive(Clone)]
struct InEdge {
    predecessor: Option<FrameId>,
    tree: Option<Tree>,
    pending: bool
}

struct Frame {
    state: StateId,
    position: Length,
    in_edges: Vec<InEdge>
}

/// A path popped from the stack, carrying its trees left-to-right (oldest/bottom-most first,
/// matching production order) and the version the path continues from afterwards.
#[derive(Debug, Clone)]
pub struct Slice {
    pub version: VersionId,
    pub trees: Vec<Tree>
}

#[derive(Debug)]
pub enum PopOutcome {
    Ok(Vec<Slice>),
    Failed,
    /// The path crossed an error frame before `n` frames were popped; `slice` holds only the
    /// frames traversed so far (fewer than `n` trees).
    StoppedAtError(Slice)
}

/// Bitmask returned by an `iterate` callback.
pub const ITER_CONTINUE: u8 = 0;
pub const ITER_POP: u8 = 1;
pub const ITER_STOP: u8 = 2;

pub struct Stack {
    frames: Vec<Frame>,
    tops: Vec<Option<FrameId>>
}

impl Stack {
    pub fn new(initial_state: StateId) -> Self {
        Stack {
            frames: vec![Frame {
                state: initial_state,
                position: Length::ZERO,
                in_edges: Vec::new()
            }],
            tops: vec![Some(0)]
        }
    }

    pub fn version_count(&self) -> usize {
        self.tops.iter().filter(|t| t.is_some()).count()
    }

    /// Live version ids in ascending order; index order is the "leftmost behind" ordering the
    /// driver advances over.
    pub fn versions(&self) -> impl Iterator<Item = VersionId> + '_ {
        self.tops
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.map(|_| i))
    }

    fn frame_of(&self, v: VersionId) -> FrameId {
        self.tops[v].expect("operation on a removed stack version")
    }

    /// True iff `v` is a live version (not yet removed or renumbered away).
    pub fn exists(&self, v: VersionId) -> bool {
        matches!(self.tops.get(v), Some(Some(_)))
    }

    /// Total number of version slots ever allocated, including removed ones. A fresh version
    /// minted by a split always lands at this index, which is what `merge_from` and the action
    /// engine's "fold duplicates created by this call" bookkeeping key off.
    pub fn slot_count(&self) -> usize {
        self.tops.len()
    }

    pub fn top_state(&self, v: VersionId) -> StateId {
        self.frames[self.frame_of(v)].state
    }

    pub fn top_position(&self, v: VersionId) -> Length {
        self.frames[self.frame_of(v)].position
    }

    pub fn push(&mut self, v: VersionId, tree: Option<Tree>, pending: bool, state: StateId) -> bool {
        let cur = self.frame_of(v);
        let advance = tree.as_ref().map(|t| t.total_size()).unwrap_or(Length::ZERO);
        let position = self.frames[cur].position + advance;
        let fid = self.frames.len();
        self.frames.push(Frame {
            state,
            position,
            in_edges: vec![InEdge {
                predecessor: Some(cur),
                tree,
                pending
            }]
        });
        self.tops[v] = Some(fid);
        true
    }

    pub fn duplicate_version(&mut self, v: VersionId) -> VersionId {
        let fid = self.frame_of(v);
        self.new_version_at(fid)
    }

    fn new_version_at(&mut self, fid: FrameId) -> VersionId {
        self.tops.push(Some(fid));
        self.tops.len() - 1
    }

    fn retarget(&mut self, v: VersionId, fid: FrameId) {
        self.tops[v] = Some(fid);
    }

    /// Renumbers `from` onto `to`: `to` adopts `from`'s current top frame and `from` is removed.
    /// Used after a reduce (fold the post-reduce frontier back onto the version the driver is
    /// tracking) and after `handle_error` (keep only the post-reduce version). A no-op when `from`
    /// and `to` are the same version: that happens whenever the reduce or repair that produced the
    /// renumber took the single-path (non-split) route and already left `to` at the right frame,
    /// and clearing it here would otherwise discard the version it was asked to keep.
    pub fn renumber_version(&mut self, from: VersionId, to: VersionId) {
        if from == to {
            return;
        }
        self.tops[to] = self.tops[from];
        self.tops[from] = None;
    }

    pub fn remove_version(&mut self, v: VersionId) {
        self.tops[v] = None;
    }

    fn compatible(&self, a: VersionId, b: VersionId) -> bool {
        self.tops[a].is_some()
            && self.tops[b].is_some()
            && self.top_state(a) == self.top_state(b)
            && self.top_position(a) == self.top_position(b)
    }

    /// Merges `b` into `a`: `a`'s frame gains `b`'s incoming edges (so paths through either
    /// version's history remain reachable from the single shared frame) and `b` is repointed at
    /// it. A no-op if they already share a frame.
    pub fn merge(&mut self, a: VersionId, b: VersionId) {
        let fa = self.frame_of(a);
        let fb = self.frame_of(b);
        if fa == fb {
            self.tops[b] = Some(fa);
            return;
        }
        let mut b_edges = std::mem::take(&mut self.frames[fb].in_edges);
        self.frames[fa].in_edges.append(&mut b_edges);
        self.tops[b] = Some(fa);
    }

    /// Merges any pair of live versions at index `>= n` that share `(state, position)`.
    pub fn merge_from(&mut self, n: usize) {
        let mut i = n;
        while i < self.tops.len() {
            if self.tops[i].is_some() {
                let mut j = i + 1;
                while j < self.tops.len() {
                    if self.compatible(i, j) {
                        self.merge(i, j);
                    }
                    j += 1;
                }
            }
            i += 1;
        }
    }

    /// Merges every pair of compatible live versions. Because `merge` always folds exactly
    /// compatible frontiers onto a single shared frame (rather than leaving an equivalent-but-
    /// distinct copy behind), there is nothing left for a separate "drop dominated versions" pass
    /// to do; `condense` is `merge_from(0)`.
    pub fn condense(&mut self) {
        self.merge_from(0);
    }

    fn pop_paths(&self, frame_id: FrameId, remaining: usize) -> Vec<(FrameId, Vec<Tree>, bool)> {
        if remaining == 0 {
            return vec![(frame_id, Vec::new(), false)];
        }
        let frame = &self.frames[frame_id];
        if frame.state == StateId::ERROR {
            return vec![(frame_id, Vec::new(), true)];
        }
        if frame.in_edges.is_empty() {
            return Vec::new();
        }
        let mut out = Vec::new();
        for edge in &frame.in_edges {
            let pred = edge.predecessor.expect("non-root frame must have a predecessor");
            for (end, mut trees, hit_err) in self.pop_paths(pred, remaining - 1) {
                if let Some(t) = &edge.tree {
                    trees.push(t.clone());
                }
                out.push((end, trees, hit_err));
            }
        }
        out
    }

    /// Detaches the top `n` non-error frames along `v`, returning one slice per distinct path
    /// through the GSS. `STOPPED_AT_ERROR` short-circuits the whole call: only the first path
    /// that ran into an error frame is reported, since at that point the driver hands off to
    /// `repair_error` rather than continuing a normal reduce (see DESIGN.md).
    pub fn pop_count(&mut self, v: VersionId, n: usize) -> PopOutcome {
        let start = self.frame_of(v);
        let paths = self.pop_paths(start, n);
        if let Some((end, trees, true)) = paths.iter().find(|(_, _, hit)| *hit) {
            let end = *end;
            self.retarget(v, end);
            return PopOutcome::StoppedAtError(Slice {
                version: v,
                trees: trees.clone()
            });
        }
        if paths.is_empty() {
            return PopOutcome::Failed;
        }
        let mut slices = Vec::with_capacity(paths.len());
        for (i, (end, trees, _)) in paths.into_iter().enumerate() {
            let ver = if i == 0 {
                self.retarget(v, end);
                v
            } else {
                self.new_version_at(end)
            };
            slices.push(Slice { version: ver, trees });
        }
        PopOutcome::Ok(slices)
    }

    fn pop_pending_paths(&self, frame_id: FrameId) -> Vec<(FrameId, Vec<Tree>)> {
        let frame = &self.frames[frame_id];
        if frame.in_edges.is_empty() || frame.in_edges.iter().all(|e| !e.pending) {
            return vec![(frame_id, Vec::new())];
        }
        let mut out = Vec::new();
        for edge in &frame.in_edges {
            if !edge.pending {
                out.push((frame_id, Vec::new()));
                continue;
            }
            let pred = edge.predecessor.expect("pending edge must have a predecessor");
            for (end, mut trees) in self.pop_pending_paths(pred) {
                if let Some(t) = &edge.tree {
                    trees.push(t.clone());
                }
                out.push((end, trees));
            }
        }
        out
    }

    /// Pops while the top edge is pending (i.e. is a composite tree that `breakdown_top_of_stack`
    /// may want to descend into).
    pub fn pop_pending(&mut self, v: VersionId) -> Vec<Slice> {
        let start = self.frame_of(v);
        let paths = self.pop_pending_paths(start);
        paths
            .into_iter()
            .enumerate()
            .map(|(i, (end, trees))| {
                let ver = if i == 0 {
                    self.retarget(v, end);
                    v
                } else {
                    self.new_version_at(end)
                };
                Slice { version: ver, trees }
            })
            .collect()
    }

    fn pop_all_paths(&self, frame_id: FrameId) -> Vec<(FrameId, Vec<Tree>)> {
        let frame = &self.frames[frame_id];
        if frame.in_edges.is_empty() {
            return vec![(frame_id, Vec::new())];
        }
        let mut out = Vec::new();
        for edge in &frame.in_edges {
            let pred = edge.predecessor.expect("non-root frame must have a predecessor");
            for (end, mut trees) in self.pop_all_paths(pred) {
                if let Some(t) = &edge.tree {
                    trees.push(t.clone());
                }
                out.push((end, trees));
            }
        }
        out
    }

    /// Pops until `v`'s root, returning one slice per path (normally just one, unless `v`'s
    /// history still straddles an un-condensed merge).
    pub fn pop_all(&mut self, v: VersionId) -> Vec<Slice> {
        let start = self.frame_of(v);
        let paths = self.pop_all_paths(start);
        paths
            .into_iter()
            .enumerate()
            .map(|(i, (end, trees))| {
                let ver = if i == 0 {
                    self.retarget(v, end);
                    v
                } else {
                    self.new_version_at(end)
                };
                Slice { version: ver, trees }
            })
            .collect()
    }

    /// General path walker used by `repair_error`: visits `v`'s frontier and every ancestor frame
    /// in turn, invoking `callback(state, trees_below, tree_count, is_done, is_pending)` at each
    /// one. `trees_below` is left-to-right, oldest first. The callback's bitmask return controls
    /// what happens next: `ITER_POP` materializes the current path as a `Slice` (retargeting a
    /// version onto it), `ITER_STOP` halts this path; a plain `ITER_CONTINUE` descends one more
    /// frame.
    pub fn iterate<F>(&mut self, v: VersionId, mut callback: F) -> Vec<Slice>
    where
        F: FnMut(StateId, &[Tree], usize, bool, bool) -> u8
    {
        let mut results = Vec::new();
        let start = self.frame_of(v);
        self.iterate_rec(start, Vec::new(), &mut callback, &mut results, v, true);
        results
    }

    fn iterate_rec<F>(
        &mut self,
        frame_id: FrameId,
        trees_so_far: Vec<Tree>,
        callback: &mut F,
        results: &mut Vec<Slice>,
        owner_version: VersionId,
        reuse_owner: bool
    ) where
        F: FnMut(StateId, &[Tree], usize, bool, bool) -> u8
    {
        let state = self.frames[frame_id].state;
        let is_done = self.frames[frame_id].in_edges.is_empty();
        let is_pending = !is_done && self.frames[frame_id].in_edges.iter().all(|e| e.pending);

        let mask = callback(state, &trees_so_far, trees_so_far.len(), is_done, is_pending);

        if mask & ITER_POP != 0 {
            let ver = if reuse_owner {
                self.retarget(owner_version, frame_id);
                owner_version
            } else {
                self.new_version_at(frame_id)
            };
            results.push(Slice {
                version: ver,
                trees: trees_so_far.clone()
            });
        }
        if mask & ITER_STOP != 0 || is_done {
            return;
        }

        let edges = self.frames[frame_id].in_edges.clone();
        for (i, edge) in edges.iter().enumerate() {
            let pred = edge.predecessor.expect("non-root frame must have a predecessor");
            let mut next_trees = Vec::with_capacity(trees_so_far.len() + 1);
            if let Some(t) = &edge.tree {
                next_trees.push(t.clone());
            }
            next_trees.extend(trees_so_far.iter().cloned());
            // Only the first branch explored reuses `owner_version`'s slot; any further branch
            // (from a merge point) needs a fresh version id of its own.
            self.iterate_rec(
                pred,
                next_trees,
                callback,
                results,
                owner_version,
                reuse_owner && i == 0
            );
        }
    }
}
