//! Pattern variants and the recursive matcher.

// Layer 1: Standard library imports
use std::fmt;
use std::sync::Arc;

// Layer 3: Internal module imports
use crate::message::{Msg, MsgKind};

/// A structural pattern over [`Msg`] values.
///
/// Built with the free constructors in this module ([`any`], [`lit`],
/// [`tup`], ...); evaluated with [`matches`].
#[derive(Clone)]
pub enum Pattern {
    /// Matches any subject and captures it.
    Any,
    /// Matches iff equal to the subject; captures nothing.
    Literal(Msg),
    /// Matches a tuple of exactly this arity, element-wise.
    Tuple(Vec<Pattern>),
    /// Matches any subject of the given kind and captures it.
    Kind(MsgKind),
    /// Matches when the predicate holds and captures the subject.
    Pred(Arc<dyn Fn(&Msg) -> bool + Send + Sync>),
    /// Matches when the inner pattern does not; captures nothing.
    Not(Box<Pattern>),
    /// Matches when the condition holds and the inner pattern matches;
    /// forwards the inner captures.
    Guard(Arc<dyn Fn() -> bool + Send + Sync>, Box<Pattern>),
    /// Matches like the inner pattern but suppresses its captures.
    Ignore(Box<Pattern>),
}

/// Matches any subject, capturing it.
pub fn any() -> Pattern {
    Pattern::Any
}

/// Matches a subject equal to `value`, capturing nothing.
pub fn lit(value: impl Into<Msg>) -> Pattern {
    Pattern::Literal(value.into())
}

/// Matches a tuple of exactly the given sub-patterns.
pub fn tup(patterns: impl IntoIterator<Item = Pattern>) -> Pattern {
    Pattern::Tuple(patterns.into_iter().collect())
}

/// Matches any subject of the given kind, capturing it.
pub fn kind(kind: MsgKind) -> Pattern {
    Pattern::Kind(kind)
}

/// Matches when `f(subject)` holds, capturing the subject.
pub fn pred(f: impl Fn(&Msg) -> bool + Send + Sync + 'static) -> Pattern {
    Pattern::Pred(Arc::new(f))
}

/// Matches when `pattern` does not match; captures nothing.
pub fn not(pattern: Pattern) -> Pattern {
    Pattern::Not(Box::new(pattern))
}

/// Matches when `cond()` holds and `pattern` matches; forwards its captures.
pub fn guard(cond: impl Fn() -> bool + Send + Sync + 'static, pattern: Pattern) -> Pattern {
    Pattern::Guard(Arc::new(cond), Box::new(pattern))
}

/// Matches like `pattern` but drops whatever it would have captured.
pub fn ignore(pattern: Pattern) -> Pattern {
    Pattern::Ignore(Box::new(pattern))
}

/// Match `pattern` against `subject`.
///
/// Returns `None` on failure, or the captured values in encounter order on
/// success (possibly empty). Matching is free of side effects, so for
/// deterministic predicates repeated calls agree.
pub fn matches(pattern: &Pattern, subject: &Msg) -> Option<Vec<Msg>> {
    let mut captures = Vec::new();
    if matches_into(pattern, subject, &mut captures) {
        Some(captures)
    } else {
        None
    }
}

fn matches_into(pattern: &Pattern, subject: &Msg, captures: &mut Vec<Msg>) -> bool {
    match pattern {
        Pattern::Any => {
            captures.push(subject.clone());
            true
        }
        Pattern::Literal(value) => value == subject,
        Pattern::Tuple(patterns) => {
            let Msg::Tuple(items) = subject else {
                return false;
            };
            if items.len() != patterns.len() {
                return false;
            }
            // All-or-nothing: roll back captures from a partial element match.
            let mark = captures.len();
            for (sub, item) in patterns.iter().zip(items) {
                if !matches_into(sub, item, captures) {
                    captures.truncate(mark);
                    return false;
                }
            }
            true
        }
        Pattern::Kind(k) => {
            if subject.kind() == *k {
                captures.push(subject.clone());
                true
            } else {
                false
            }
        }
        Pattern::Pred(f) => {
            if f(subject) {
                captures.push(subject.clone());
                true
            } else {
                false
            }
        }
        Pattern::Not(inner) => {
            let mut scratch = Vec::new();
            !matches_into(inner, subject, &mut scratch)
        }
        Pattern::Guard(cond, inner) => cond() && matches_into(inner, subject, captures),
        Pattern::Ignore(inner) => {
            let mut scratch = Vec::new();
            matches_into(inner, subject, &mut scratch)
        }
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Any => f.write_str("ANY"),
            Pattern::Literal(value) => write!(f, "{value}"),
            Pattern::Tuple(patterns) => f.debug_list().entries(patterns).finish(),
            Pattern::Kind(k) => write!(f, "KIND({k:?})"),
            Pattern::Pred(_) => f.write_str("PRED(<fn>)"),
            Pattern::Not(inner) => write!(f, "NOT({inner:?})"),
            Pattern::Guard(_, inner) => write!(f, "GUARD(<fn>, {inner:?})"),
            Pattern::Ignore(inner) => write!(f, "IGNORE({inner:?})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(parts: impl IntoIterator<Item = Msg>) -> Msg {
        Msg::tuple(parts)
    }

    #[test]
    fn test_literal_match() {
        assert_eq!(matches(&lit("hello"), &Msg::from("hello")), Some(vec![]));
        assert_eq!(matches(&lit("hello"), &Msg::from("bye")), None);
        assert_eq!(matches(&lit(1i64), &Msg::from(1i64)), Some(vec![]));
    }

    #[test]
    fn test_any_captures_subject() {
        let subject = Msg::from("anything");
        assert_eq!(matches(&any(), &subject), Some(vec![subject]));
    }

    #[test]
    fn test_tuple_exact_arity() {
        let pattern = tup([lit("a"), any()]);
        assert!(matches(&pattern, &msg([Msg::from("a"), Msg::from(1i64)])).is_some());
        assert!(matches(&pattern, &msg([Msg::from("a")])).is_none());
        assert!(matches(
            &pattern,
            &msg([Msg::from("a"), Msg::from(1i64), Msg::from(2i64)])
        )
        .is_none());
        // non-tuple subject fails a tuple pattern
        assert!(matches(&pattern, &Msg::from("a")).is_none());
    }

    #[test]
    fn test_nested_captures_in_encounter_order() {
        let pattern = tup([lit("exit"), any(), tup([any(), kind(MsgKind::Int)])]);
        let subject = msg([
            Msg::from("exit"),
            Msg::from("who"),
            msg([Msg::from("why"), Msg::from(9i64)]),
        ]);
        assert_eq!(
            matches(&pattern, &subject),
            Some(vec![Msg::from("who"), Msg::from("why"), Msg::from(9i64)])
        );
    }

    #[test]
    fn test_failed_branch_leaves_no_captures() {
        let pattern = tup([any(), lit("nope")]);
        assert_eq!(
            matches(&pattern, &msg([Msg::from(1i64), Msg::from("other")])),
            None
        );
    }

    #[test]
    fn test_kind_matcher() {
        assert_eq!(
            matches(&kind(MsgKind::Fault), &Msg::Fault("boom".into())),
            Some(vec![Msg::Fault("boom".into())])
        );
        assert!(matches(&kind(MsgKind::Fault), &Msg::from("boom")).is_none());
    }

    #[test]
    fn test_predicate_matcher() {
        let big = pred(|m| matches!(m, Msg::Int(i) if *i > 10));
        assert_eq!(matches(&big, &Msg::from(11i64)), Some(vec![Msg::from(11i64)]));
        assert!(matches(&big, &Msg::from(10i64)).is_none());
    }

    #[test]
    fn test_not_captures_nothing() {
        let pattern = not(lit("skip"));
        assert_eq!(matches(&pattern, &Msg::from("take")), Some(vec![]));
        assert!(matches(&pattern, &Msg::from("skip")).is_none());
    }

    #[test]
    fn test_guard_forwards_inner_captures() {
        let open = guard(|| true, any());
        assert_eq!(matches(&open, &Msg::from(5i64)), Some(vec![Msg::from(5i64)]));
        let closed = guard(|| false, any());
        assert!(matches(&closed, &Msg::from(5i64)).is_none());
    }

    #[test]
    fn test_ignore_suppresses_capture() {
        let pattern = tup([ignore(any()), any()]);
        assert_eq!(
            matches(&pattern, &msg([Msg::from("skip"), Msg::from("take")])),
            Some(vec![Msg::from("take")])
        );
    }

    #[test]
    fn test_match_is_repeatable() {
        let pattern = tup([lit("a"), kind(MsgKind::Int), any()]);
        let subject = msg([Msg::from("a"), Msg::from(2i64), Msg::Nil]);
        assert_eq!(matches(&pattern, &subject), matches(&pattern, &subject));
    }
}
