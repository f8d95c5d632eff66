//! Filter clause operators.
//!
//! Each operator accepts a subset of operand families; a clause arriving over
//! the wire is rejected when its value family is not one its operator accepts.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of operand a clause compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandFamily {
    Text,
    Numeric,
    Enum,
    Bool,
}

/// Comparison operator of a filter clause, named on the wire in lowercase
/// (`"icontains"`, `"gte"`, ...).
///
/// `Before`/`After` read better on timestamps and `Is` on flags
/// (`mvp is true`); they evaluate as `Lt`, `Gt` and `Eq`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Op {
    Eq,
    Ne,
    StartsWith,
    EndsWith,
    Contains,
    /// `Contains` ignoring case, what the search forms use for names.
    IContains,
    Regex,
    Gt,
    Gte,
    Lt,
    Lte,
    Before,
    After,
    /// Enum discriminant is one of a set.
    In,
    Is,
}

impl Op {
    pub const ALL: [Op; 15] = [
        Op::Eq,
        Op::Ne,
        Op::StartsWith,
        Op::EndsWith,
        Op::Contains,
        Op::IContains,
        Op::Regex,
        Op::Gt,
        Op::Gte,
        Op::Lt,
        Op::Lte,
        Op::Before,
        Op::After,
        Op::In,
        Op::Is,
    ];

    /// Whether a clause with this operator may carry an operand of `family`.
    pub fn accepts(self, family: OperandFamily) -> bool {
        use OperandFamily::*;

        match self {
            Op::Eq | Op::Ne => true,
            Op::StartsWith | Op::EndsWith | Op::Contains | Op::IContains | Op::Regex => {
                family == Text
            }
            Op::Gt | Op::Gte | Op::Lt | Op::Lte | Op::Before | Op::After => family == Numeric,
            Op::In => family == Enum,
            Op::Is => family == Bool,
        }
    }

    pub fn is_string_op(self) -> bool {
        self.accepts(OperandFamily::Text)
    }

    /// Numbers also stand in for timestamps, so the timestamp aliases count.
    pub fn is_number_op(self) -> bool {
        self.accepts(OperandFamily::Numeric)
    }

    pub fn is_enum_op(self) -> bool {
        self.accepts(OperandFamily::Enum)
    }

    pub fn is_bool_op(self) -> bool {
        self.accepts(OperandFamily::Bool)
    }

    /// Maps the aliases onto the operator they evaluate as.
    pub fn normalize(self) -> Op {
        match self {
            Op::Before => Op::Lt,
            Op::After => Op::Gt,
            Op::Is => Op::Eq,
            op => op,
        }
    }

    /// Evaluates an ordering operator against `field.cmp(operand)`.
    ///
    /// Operators that do not order (`Contains`, `In`, ...) never hold.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        let wanted: &[Ordering] = match self.normalize() {
            Op::Eq => &[Ordering::Equal],
            Op::Ne => &[Ordering::Less, Ordering::Greater],
            Op::Gt => &[Ordering::Greater],
            Op::Gte => &[Ordering::Greater, Ordering::Equal],
            Op::Lt => &[Ordering::Less],
            Op::Lte => &[Ordering::Less, Ordering::Equal],
            _ => &[],
        };
        wanted.contains(&ordering)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "eq",
            Op::Ne => "ne",
            Op::StartsWith => "startswith",
            Op::EndsWith => "endswith",
            Op::Contains => "contains",
            Op::IContains => "icontains",
            Op::Regex => "regex",
            Op::Gt => "gt",
            Op::Gte => "gte",
            Op::Lt => "lt",
            Op::Lte => "lte",
            Op::Before => "before",
            Op::After => "after",
            Op::In => "in",
            Op::Is => "is",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized operator name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown operator '{0}'")]
pub struct UnknownOp(pub String);

impl FromStr for Op {
    type Err = UnknownOp;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Op::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| UnknownOp(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operand_families() {
        assert!(Op::IContains.is_string_op());
        assert!(Op::Ne.is_string_op());
        assert!(!Op::Gte.is_string_op());

        assert!(Op::Before.is_number_op());
        assert!(!Op::Regex.is_number_op());

        assert!(Op::In.is_enum_op());
        assert!(Op::Eq.is_enum_op());
        assert!(!Op::Lt.is_enum_op());

        assert!(Op::Is.is_bool_op());
        assert!(!Op::Contains.is_bool_op());
    }

    #[test]
    fn aliases_evaluate_as_their_targets() {
        for op in Op::ALL {
            for ordering in [Ordering::Less, Ordering::Equal, Ordering::Greater] {
                assert_eq!(
                    op.eval_ordering(ordering),
                    op.normalize().eval_ordering(ordering),
                    "{op}"
                );
            }
        }
        assert_eq!(Op::After.normalize(), Op::Gt);
    }

    #[test]
    fn ordering_operators() {
        assert!(Op::Gte.eval_ordering(Ordering::Equal));
        assert!(!Op::Gte.eval_ordering(Ordering::Less));
        assert!(Op::Ne.eval_ordering(Ordering::Greater));
        assert!(!Op::Lte.eval_ordering(Ordering::Greater));
        assert!(!Op::StartsWith.eval_ordering(Ordering::Equal));
    }

    #[test]
    fn names_parse_and_serialize_alike() {
        for op in Op::ALL {
            assert_eq!(op.as_str().parse::<Op>(), Ok(op));
            assert_eq!(serde_json::to_string(&op).unwrap(), format!("\"{op}\""));
        }
        assert_eq!("IContains".parse::<Op>(), Ok(Op::IContains));
        assert!("like".parse::<Op>().is_err());
    }
}
