//! Compact self-describing FITS header properties.
//!
//! A [`Property`] is the in-memory form of a single header card: a named,
//! typed scalar or string value plus an optional comment. Header collections
//! routinely hold millions of these at once, so the three string members
//! (name, value, comment) are packed into one fixed-capacity buffer inside
//! the record and only spill to individual heap allocations when they have
//! to. Once spilled they stay spilled.
//!
//! [`property::dicb`] provides the DICB keyword classification used to order
//! a collection of properties for FITS-compatible output without re-parsing
//! keyword names during the sort.

#![deny(unsafe_op_in_unsafe_fn)]

#[macro_use]
extern crate static_assertions;

pub mod fitsprop_error;
pub mod property;

pub use fitsprop_error::PropertyError;
pub use property::{
    dicb::{classify, compare, DicbClass},
    value_type::ValueType,
    Property,
};
