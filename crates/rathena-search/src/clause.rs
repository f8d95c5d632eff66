//! Clause types for filter predicates.
//!
//! A [`Clause`] is a single predicate: a field path, an operator, and a
//! comparison value. Clauses serialize as `{"field", "op", "value"}` and are
//! checked for operator/value compatibility when deserialized.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::SeekerError;
use crate::op::Op;
use crate::value::{Number, Timestamp, Value};

/// A single filter predicate.
///
/// ```
/// use rathena_search::{Clause, Op, Value};
///
/// let clause = Clause::new("name", Op::IContains, "potion");
/// assert!(clause.matches(&Value::String("Red Potion")));
/// assert!(!clause.matches(&Value::String("Sword")));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawClause", into = "RawClause")]
pub struct Clause {
    /// The field path to compare.
    pub field: String,
    /// The comparison operator.
    pub op: Op,
    /// The value to compare against.
    pub value: ClauseValue,
}

impl Clause {
    /// Creates a new clause.
    pub fn new(field: impl Into<String>, op: Op, value: impl Into<ClauseValue>) -> Self {
        Clause {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Evaluates this clause against a field value.
    ///
    /// A missing field (`Value::None`) or a type mismatch never matches,
    /// not even for `Ne`.
    pub fn matches(&self, field_value: &Value<'_>) -> bool {
        match (&self.value, field_value) {
            (ClauseValue::String(pattern), Value::String(s)) => self.match_string(s, pattern),
            (ClauseValue::Regex(regex), Value::String(s)) => regex.is_match(s),

            (ClauseValue::Number(clause_num), Value::Number(field_num)) => {
                self.match_number(*field_num, *clause_num)
            }
            (ClauseValue::Number(clause_num), Value::Timestamp(ts)) => {
                self.match_number(Number::I64(ts.0), *clause_num)
            }
            (ClauseValue::Number(clause_num), Value::Enum(disc)) => {
                self.match_number(Number::from(*disc), *clause_num)
            }

            (ClauseValue::Timestamp(clause_ts), Value::Timestamp(field_ts)) => {
                self.op.eval_ordering(field_ts.cmp(clause_ts))
            }

            (ClauseValue::Enum(clause_disc), Value::Enum(field_disc)) => {
                self.op.eval_ordering(field_disc.cmp(clause_disc)) && self.op.is_enum_op()
            }
            (ClauseValue::EnumSet(set), Value::Enum(field_disc)) => {
                self.op == Op::In && set.contains(field_disc)
            }

            (ClauseValue::Bool(clause_bool), Value::Bool(field_bool)) => {
                match self.op.normalize() {
                    Op::Eq => field_bool == clause_bool,
                    Op::Ne => field_bool != clause_bool,
                    _ => false,
                }
            }

            _ => false,
        }
    }

    fn match_string(&self, field: &str, pattern: &str) -> bool {
        match self.op.normalize() {
            Op::Eq => field == pattern,
            Op::Ne => field != pattern,
            Op::StartsWith => field.starts_with(pattern),
            Op::EndsWith => field.ends_with(pattern),
            Op::Contains => field.contains(pattern),
            Op::IContains => field.to_lowercase().contains(&pattern.to_lowercase()),
            _ => false,
        }
    }

    fn match_number(&self, field: Number, clause: Number) -> bool {
        match field.compare(clause) {
            Some(ordering) => self.op.eval_ordering(ordering),
            None => false,
        }
    }
}

/// Owned value stored in a clause.
///
/// Unlike [`Value`], which borrows from the entity, `ClauseValue` owns its
/// data so it can live in a filter definition.
#[derive(Debug, Clone)]
pub enum ClauseValue {
    /// String value.
    String(String),
    /// Numeric value.
    Number(Number),
    /// Timestamp value.
    Timestamp(Timestamp),
    /// Single enum discriminant.
    Enum(u32),
    /// Set of enum discriminants (for `In`).
    EnumSet(Vec<u32>),
    /// Boolean value.
    Bool(bool),
    /// Compiled regular expression.
    Regex(Regex),
}

impl ClauseValue {
    fn type_name(&self) -> &'static str {
        match self {
            ClauseValue::String(_) => "string",
            ClauseValue::Number(_) => "number",
            ClauseValue::Timestamp(_) => "timestamp",
            ClauseValue::Enum(_) => "enum",
            ClauseValue::EnumSet(_) => "enum set",
            ClauseValue::Bool(_) => "bool",
            ClauseValue::Regex(_) => "regex",
        }
    }

    /// Builds a clause value from JSON for the given operator.
    ///
    /// `regex` compiles its string, `in` requires an array of discriminants,
    /// every other operator must suit the JSON type it is paired with.
    pub fn from_json(op: Op, json: &serde_json::Value) -> Result<Self, SeekerError> {
        use serde_json::Value as Json;

        let value = match (op, json) {
            (Op::Regex, Json::String(pattern)) => {
                return Ok(ClauseValue::Regex(Regex::new(pattern)?))
            }
            (Op::Regex, other) => {
                return Err(SeekerError::TypeMismatch {
                    expected: "string",
                    actual: json_type_name(other),
                })
            }
            (Op::In, Json::Array(items)) => {
                let set = items
                    .iter()
                    .map(|item| {
                        item.as_u64()
                            .and_then(|n| u32::try_from(n).ok())
                            .ok_or(SeekerError::TypeMismatch {
                                expected: "enum discriminant",
                                actual: json_type_name(item),
                            })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                return Ok(ClauseValue::EnumSet(set));
            }
            (Op::In, other) => {
                return Err(SeekerError::TypeMismatch {
                    expected: "array",
                    actual: json_type_name(other),
                })
            }
            (_, Json::String(s)) => ClauseValue::String(s.clone()),
            (_, Json::Number(n)) => match Number::from_json(n) {
                Some(n) => ClauseValue::Number(n),
                None => {
                    return Err(SeekerError::TypeMismatch {
                        expected: "finite number",
                        actual: "number",
                    })
                }
            },
            (_, Json::Bool(b)) => ClauseValue::Bool(*b),
            (_, other) => {
                return Err(SeekerError::TypeMismatch {
                    expected: "string, number or bool",
                    actual: json_type_name(other),
                })
            }
        };

        let valid = match &value {
            ClauseValue::String(_) => op.is_string_op(),
            ClauseValue::Number(_) => op.is_number_op(),
            ClauseValue::Bool(_) => op.is_bool_op(),
            _ => true,
        };
        if !valid {
            return Err(SeekerError::InvalidOperatorForType {
                op: op.as_str(),
                value_type: value.type_name(),
            });
        }
        Ok(value)
    }

    /// JSON rendering of the value.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            ClauseValue::String(s) => Json::String(s.clone()),
            ClauseValue::Number(Number::I64(n)) => Json::from(*n),
            ClauseValue::Number(Number::U64(n)) => Json::from(*n),
            ClauseValue::Number(Number::F64(n)) => {
                serde_json::Number::from_f64(*n).map_or(Json::Null, Json::Number)
            }
            ClauseValue::Timestamp(ts) => Json::from(ts.0),
            ClauseValue::Enum(d) => Json::from(*d),
            ClauseValue::EnumSet(set) => Json::from(set.clone()),
            ClauseValue::Bool(b) => Json::Bool(*b),
            ClauseValue::Regex(regex) => Json::String(regex.as_str().to_string()),
        }
    }
}

fn json_type_name(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Wire form of a [`Clause`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawClause {
    field: String,
    op: Op,
    value: serde_json::Value,
}

impl TryFrom<RawClause> for Clause {
    type Error = SeekerError;

    fn try_from(raw: RawClause) -> Result<Self, Self::Error> {
        let value = ClauseValue::from_json(raw.op, &raw.value)?;
        Ok(Clause {
            field: raw.field,
            op: raw.op,
            value,
        })
    }
}

impl From<Clause> for RawClause {
    fn from(clause: Clause) -> Self {
        RawClause {
            value: clause.value.to_json(),
            field: clause.field,
            op: clause.op,
        }
    }
}

impl From<String> for ClauseValue {
    fn from(s: String) -> Self {
        ClauseValue::String(s)
    }
}

impl From<&str> for ClauseValue {
    fn from(s: &str) -> Self {
        ClauseValue::String(s.to_string())
    }
}

impl From<Number> for ClauseValue {
    fn from(n: Number) -> Self {
        ClauseValue::Number(n)
    }
}

impl From<Timestamp> for ClauseValue {
    fn from(t: Timestamp) -> Self {
        ClauseValue::Timestamp(t)
    }
}

impl From<bool> for ClauseValue {
    fn from(b: bool) -> Self {
        ClauseValue::Bool(b)
    }
}

impl From<Regex> for ClauseValue {
    fn from(r: Regex) -> Self {
        ClauseValue::Regex(r)
    }
}

impl From<Vec<u32>> for ClauseValue {
    fn from(v: Vec<u32>) -> Self {
        ClauseValue::EnumSet(v)
    }
}

macro_rules! clause_value_from_number {
    ($($source:ty),*) => {
        $(
            impl From<$source> for ClauseValue {
                fn from(n: $source) -> Self {
                    ClauseValue::Number(Number::from(n))
                }
            }
        )*
    };
}

clause_value_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);
