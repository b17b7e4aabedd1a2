//! Declarative parameter schemas and their validator.
//!
//! A schema names the keys an operation accepts, which of them are required,
//! the JSON shape each value must have, and any cross-field constraints.
//! `validate` accumulates every violation it finds so a caller can aggregate
//! findings across a whole pipeline spec into one report.

use serde::Serialize;
use serde_json::{Map, Value};

/// One finding against a candidate parameter mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub key: String,
    pub reason: String,
}

impl Violation {
    pub fn new(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.key, self.reason)
    }
}

/// JSON shape a parameter value must conform to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Bool,
    Integer,
    Number,
    String,
    /// bool, number, or string
    Scalar,
    StringList,
    ScalarList,
    /// list of scalar lists (e.g. remap rows)
    ScalarListList,
    /// object with string values
    StringMap,
    /// any object; the operation's own decoder checks the interior shape
    Object,
}

impl ParamKind {
    fn describe(self) -> &'static str {
        match self {
            ParamKind::Bool => "a boolean",
            ParamKind::Integer => "an integer",
            ParamKind::Number => "a number",
            ParamKind::String => "a string",
            ParamKind::Scalar => "a boolean, number, or string",
            ParamKind::StringList => "a list of strings",
            ParamKind::ScalarList => "a list of scalars",
            ParamKind::ScalarListList => "a list of scalar lists",
            ParamKind::StringMap => "an object with string values",
            ParamKind::Object => "an object",
        }
    }

    fn conforms(self, value: &Value) -> bool {
        fn is_scalar(v: &Value) -> bool {
            matches!(v, Value::Bool(_) | Value::Number(_) | Value::String(_))
        }
        match self {
            ParamKind::Bool => value.is_boolean(),
            ParamKind::Integer => value.is_i64() || value.is_u64(),
            ParamKind::Number => value.is_number(),
            ParamKind::String => value.is_string(),
            ParamKind::Scalar => is_scalar(value),
            ParamKind::StringList => value
                .as_array()
                .is_some_and(|a| a.iter().all(Value::is_string)),
            ParamKind::ScalarList => value.as_array().is_some_and(|a| a.iter().all(is_scalar)),
            ParamKind::ScalarListList => value.as_array().is_some_and(|a| {
                a.iter()
                    .all(|e| e.as_array().is_some_and(|inner| inner.iter().all(is_scalar)))
            }),
            ParamKind::StringMap => value
                .as_object()
                .is_some_and(|m| m.values().all(Value::is_string)),
            ParamKind::Object => value.is_object(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub key: &'static str,
    pub required: bool,
    pub kind: ParamKind,
}

impl FieldSpec {
    pub const fn required(key: &'static str, kind: ParamKind) -> Self {
        Self {
            key,
            required: true,
            kind,
        }
    }

    pub const fn optional(key: &'static str, kind: ParamKind) -> Self {
        Self {
            key,
            required: false,
            kind,
        }
    }
}

/// Cross-field constraints checked after per-key conformance.
#[derive(Debug, Clone, Copy)]
pub enum CrossCheck {
    /// `key` may only appear when `needs` is also present.
    Requires {
        key: &'static str,
        needs: &'static str,
    },
    /// When both are present, the two lists must have the same length.
    SameLength {
        left: &'static str,
        right: &'static str,
    },
    /// Exactly one of the listed keys must be present.
    ExactlyOneOf { keys: &'static [&'static str] },
    /// Operation-specific constraint over the whole mapping.
    Custom(fn(&Map<String, Value>) -> Vec<Violation>),
}

/// Immutable parameter schema, one per operation kind.
#[derive(Debug, Clone, Copy)]
pub struct ParamSchema {
    pub operation: &'static str,
    pub fields: &'static [FieldSpec],
    pub checks: &'static [CrossCheck],
}

impl ParamSchema {
    /// Check `params` against the schema, returning every violation found.
    ///
    /// Order of findings: missing required keys, then unrecognized keys, then
    /// per-key shape conformance, then cross-field constraints.
    pub fn validate(&self, params: &Map<String, Value>) -> Vec<Violation> {
        let mut violations = Vec::new();

        for field in self.fields {
            if field.required && !params.contains_key(field.key) {
                violations.push(Violation::new(field.key, "required parameter is missing"));
            }
        }

        for key in params.keys() {
            if !self.fields.iter().any(|f| f.key == key) {
                violations.push(Violation::new(
                    key.clone(),
                    format!("unrecognized parameter for operation '{}'", self.operation),
                ));
            }
        }

        for field in self.fields {
            if let Some(value) = params.get(field.key) {
                if !field.kind.conforms(value) {
                    violations.push(Violation::new(
                        field.key,
                        format!("must be {}", field.kind.describe()),
                    ));
                }
            }
        }

        for check in self.checks {
            match check {
                CrossCheck::Requires { key, needs } => {
                    if params.contains_key(*key) && !params.contains_key(*needs) {
                        violations.push(Violation::new(
                            *key,
                            format!("requires parameter '{}'", needs),
                        ));
                    }
                }
                CrossCheck::SameLength { left, right } => {
                    if let (Some(Value::Array(a)), Some(Value::Array(b))) =
                        (params.get(*left), params.get(*right))
                    {
                        if a.len() != b.len() {
                            violations.push(Violation::new(
                                *left,
                                format!(
                                    "must have the same length as '{}' ({} vs {})",
                                    right,
                                    a.len(),
                                    b.len()
                                ),
                            ));
                        }
                    }
                }
                CrossCheck::ExactlyOneOf { keys } => {
                    let present = keys.iter().filter(|k| params.contains_key(**k)).count();
                    if present != 1 {
                        violations.push(Violation::new(
                            keys.join("|"),
                            format!("exactly one of {} must be present", keys.join(", ")),
                        ));
                    }
                }
                CrossCheck::Custom(check) => violations.extend(check(params)),
            }
        }

        violations
    }
}
