//! Structural pattern matching over [`crate::message::Msg`] values.
//!
//! Mailbox receives are pattern-filtered: a receive names the shape of the
//! message it wants and gets back the captured sub-values in encounter
//! order. The grammar is small:
//!
//! - a literal matches iff equal to the subject
//! - a tuple pattern matches a tuple of exactly the same arity, element-wise
//! - [`any()`] matches and captures anything
//! - [`kind()`] matches on the value's [`crate::message::MsgKind`] and captures it
//! - [`pred()`] matches when a predicate holds and captures the subject
//! - [`not()`] inverts a pattern and captures nothing
//! - [`guard()`] gates a pattern on an external condition
//! - [`ignore()`] suppresses the capture of a wrapped matcher
//!
//! # Example
//!
//! ```rust
//! use axon_rt::message::Msg;
//! use axon_rt::pattern::{any, lit, matches, tup};
//!
//! let pattern = tup([lit("chunk"), any(), any()]);
//! let msg = Msg::tuple([Msg::from("chunk"), Msg::from(1i64), Msg::from(true)]);
//! let captures = matches(&pattern, &msg).unwrap();
//! assert_eq!(captures, vec![Msg::from(1i64), Msg::from(true)]);
//! ```

mod matcher;

pub use matcher::{any, guard, ignore, kind, lit, matches, not, pred, tup, Pattern};
