// Copyright (c) 2018 King's College London
// created by the Software Development Team <http://soft-dev.org/>
//
// The Universal Permissive License (UPL), Version 1.0. See glrtable's idx.rs for the full text.

//! Errors the core can raise. Grammar errors are *never* represented here: per the distilled
//! spec's propagation policy, those are materialized as error nodes in the returned tree. The
//! only thing that ever turns into a `ParseFailure` is a stack operation with nowhere left to go
//! (an internal invariant violation, not a property of the input).

use std::fmt;

/// Why `Parser::parse` returned `None` instead of a tree.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ParseFailure {
    /// A stack operation needed to make progress (typically a reduce's `pop_count`) ran off the
    /// bottom of every live version's history.
    StackExhausted,
    /// Error recovery could not find any repair and every candidate version was removed.
    RecoveryExhausted
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ParseFailure::StackExhausted => {
                write!(f, "parse stack exhausted before a reduction could complete")
            }
            ParseFailure::RecoveryExhausted => {
                write!(f, "error recovery found no viable repair")
            }
        }
    }
}

impl std::error::Error for ParseFailure {}
