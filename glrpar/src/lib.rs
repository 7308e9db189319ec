// Copyright (c) 2018 King's College London
// created by the Software Development Team <http://soft-dev.org/>
//
// The Universal Permissive License (UPL), Version 1.0. See glrtable's idx.rs for the full text.

//! An incremental GLR parser driver.
//!
//! Given a read-only [`glrtable::ParseTable`] and a [`Lexer`], [`Parser::parse`] drives a
//! graph-structured parse stack through shift/reduce/accept/recover actions to build a concrete
//! [`Tree`], reusing unchanged subtrees from a previous parse when one is supplied. The table
//! itself — and the grammar it was compiled from — are out of scope here; see the `glrtable`
//! crate for the vocabulary a table is expressed in.

mod actions;
mod cursor;
mod debug;
mod driver;
mod error;
mod length;
mod lexer;
mod parser;
mod stack;
mod tree;

pub use cursor::overlaps_edit;
pub use debug::{DebugEventKind, NullDebugger, ParseDebugger, RecordingDebugger};
pub use error::ParseFailure;
pub use length::Length;
pub use lexer::{Lexeme, Lexer};
pub use parser::Parser;
pub use tree::{compare, link_parent_pointers, make_copy, make_error_leaf, make_error_node, make_leaf, make_node,
               mark_extra, pp, select, set_children, LexState, ParseState, Tree, TreeData};
