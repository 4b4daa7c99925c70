//! The dynamic message value.

// Layer 1: Standard library imports
use std::fmt;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
use super::Fault;
use crate::actor::ActorRef;

/// A message as it travels through mailboxes and across nodes.
///
/// `Msg` is a closed value tree: scalars, byte strings, tuples, actor
/// references, and the two reserved payloads used by supervision
/// ([`Msg::Stopped`] for the stop token, [`Msg::Fault`] for failures).
/// Mailbox receives select messages structurally with
/// [`crate::pattern::Pattern`]s.
///
/// # Examples
///
/// ```rust
/// use axon_rt::message::Msg;
///
/// let msg = Msg::tuple([Msg::from("chunk"), Msg::from(42i64)]);
/// assert_eq!(msg.kind(), axon_rt::message::MsgKind::Tuple);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Msg {
    /// The empty value; also the exit reason of a body that returns nothing.
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    /// An actor reference; the only thing usable as a cross-node destination.
    Ref(ActorRef),
    Tuple(Vec<Msg>),
    /// A failure reason, e.g. the third element of an exit message.
    Fault(Fault),
    /// Reserved token marking an actor that was stopped from the outside.
    Stopped,
}

/// Discriminant of a [`Msg`], used by kind patterns (the type-test matcher).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MsgKind {
    Nil,
    Bool,
    Int,
    Float,
    Str,
    Bytes,
    Ref,
    Tuple,
    Fault,
    Stopped,
}

impl Msg {
    /// Build a tuple message from any iterable of values.
    pub fn tuple(items: impl IntoIterator<Item = Msg>) -> Self {
        Msg::Tuple(items.into_iter().collect())
    }

    pub fn kind(&self) -> MsgKind {
        match self {
            Msg::Nil => MsgKind::Nil,
            Msg::Bool(_) => MsgKind::Bool,
            Msg::Int(_) => MsgKind::Int,
            Msg::Float(_) => MsgKind::Float,
            Msg::Str(_) => MsgKind::Str,
            Msg::Bytes(_) => MsgKind::Bytes,
            Msg::Ref(_) => MsgKind::Ref,
            Msg::Tuple(_) => MsgKind::Tuple,
            Msg::Fault(_) => MsgKind::Fault,
            Msg::Stopped => MsgKind::Stopped,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Msg::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Msg::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_ref_value(&self) -> Option<&ActorRef> {
        match self {
            Msg::Ref(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[Msg]> {
        match self {
            Msg::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_fault(&self) -> Option<&Fault> {
        match self {
            Msg::Fault(f) => Some(f),
            _ => None,
        }
    }
}

impl fmt::Display for Msg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Msg::Nil => f.write_str("nil"),
            Msg::Bool(b) => write!(f, "{b}"),
            Msg::Int(i) => write!(f, "{i}"),
            Msg::Float(x) => write!(f, "{x}"),
            Msg::Str(s) => write!(f, "{s:?}"),
            Msg::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Msg::Ref(r) => write!(f, "{r}"),
            Msg::Tuple(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
            Msg::Fault(fault) => write!(f, "fault({})", fault.message()),
            Msg::Stopped => f.write_str("stopped"),
        }
    }
}

impl From<&str> for Msg {
    fn from(s: &str) -> Self {
        Msg::Str(s.to_owned())
    }
}

impl From<String> for Msg {
    fn from(s: String) -> Self {
        Msg::Str(s)
    }
}

impl From<i64> for Msg {
    fn from(i: i64) -> Self {
        Msg::Int(i)
    }
}

impl From<bool> for Msg {
    fn from(b: bool) -> Self {
        Msg::Bool(b)
    }
}

impl From<f64> for Msg {
    fn from(x: f64) -> Self {
        Msg::Float(x)
    }
}

impl From<ActorRef> for Msg {
    fn from(r: ActorRef) -> Self {
        Msg::Ref(r)
    }
}

impl From<Fault> for Msg {
    fn from(fault: Fault) -> Self {
        Msg::Fault(fault)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Tests are allowed to use unwrap for simplicity
mod tests {
    use super::*;

    #[test]
    fn test_kind_discriminants() {
        assert_eq!(Msg::Nil.kind(), MsgKind::Nil);
        assert_eq!(Msg::from(1i64).kind(), MsgKind::Int);
        assert_eq!(Msg::from("x").kind(), MsgKind::Str);
        assert_eq!(Msg::tuple([]).kind(), MsgKind::Tuple);
        assert_eq!(Msg::Fault(Fault::new("boom")).kind(), MsgKind::Fault);
        assert_eq!(Msg::Stopped.kind(), MsgKind::Stopped);
    }

    #[test]
    fn test_scalar_roundtrip() {
        let msg = Msg::tuple([
            Msg::from("request"),
            Msg::from(7i64),
            Msg::Bytes(vec![1, 2, 3]),
            Msg::tuple([Msg::Nil, Msg::from(true)]),
        ]);
        let encoded = serde_json::to_vec(&msg).unwrap();
        let decoded: Msg = serde_json::from_slice(&encoded).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Msg::from("hi").as_str(), Some("hi"));
        assert_eq!(Msg::from(3i64).as_int(), Some(3));
        assert_eq!(Msg::Nil.as_str(), None);
        let t = Msg::tuple([Msg::from(1i64)]);
        assert_eq!(t.as_tuple().map(<[Msg]>::len), Some(1));
    }
}
