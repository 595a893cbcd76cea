//! Adapter over the jq query language.
//!
//! The rest of the crate only sees [`Query::compile`] and the evaluation
//! methods; the engine (jaq) stays behind this module. Truthiness and display
//! coercion are spelled out here as explicit tables instead of borrowing the
//! engine's conventions, so filters and transforms behave the same whatever
//! engine sits underneath.

use crate::model::QueryError;
use jaq_interpret::{Ctx, Filter, FilterT, ParseCtx, RcIter, Val};
use serde_json::Value;
use std::fmt;

/// A compiled jq expression together with its source text.
pub struct Query {
    source: String,
    filter: Filter,
}

impl fmt::Debug for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl Query {
    /// Parse and compile `source` with the jq standard library in scope.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::Parse` for syntax errors (including blank input)
    /// and `QueryError::Compile` for references to undefined filters or
    /// variables.
    ///
    /// # Examples
    ///
    /// ```
    /// use sift::query::Query;
    ///
    /// let query = Query::compile(".level == \"error\"").unwrap();
    /// assert!(query.matches(&serde_json::json!({"level": "error"})));
    /// assert!(Query::compile(".level ==").is_err());
    /// ```
    pub fn compile(source: &str) -> Result<Self, QueryError> {
        if source.trim().is_empty() {
            return Err(QueryError::Parse {
                reason: "empty expression".to_string(),
            });
        }

        let (main, errs) = jaq_parse::parse(source, jaq_parse::main());
        if !errs.is_empty() {
            let reason = errs
                .iter()
                .map(|e| format!("{e:?}"))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(QueryError::Parse { reason });
        }
        let main = main.ok_or_else(|| QueryError::Parse {
            reason: "no expression found".to_string(),
        })?;

        let mut defs = ParseCtx::new(Vec::new());
        defs.insert_natives(jaq_core::core());
        defs.insert_defs(jaq_std::std());
        let filter = defs.compile(main);
        if !defs.errs.is_empty() {
            return Err(QueryError::Compile {
                reason: format!(
                    "{} undefined filter(s) or variable(s)",
                    defs.errs.len()
                ),
            });
        }

        Ok(Self {
            source: source.to_string(),
            filter,
        })
    }

    /// The expression text as typed.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Run against `input` and collect every result.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::Eval` on the first runtime error.
    pub fn evaluate(&self, input: &Value) -> Result<Vec<Value>, QueryError> {
        let inputs = RcIter::new(core::iter::empty());
        let results = self
            .filter
            .run((Ctx::new([], &inputs), Val::from(input.clone())))
            .map(|result| {
                result
                    .map(Value::from)
                    .map_err(|e| QueryError::Eval(e.to_string()))
            })
            .collect();
        results
    }

    /// Run against `input` and return only the first result.
    ///
    /// Returns `None` if the expression produced no results. Later results
    /// are never computed.
    pub fn first(&self, input: &Value) -> Option<Result<Value, QueryError>> {
        let inputs = RcIter::new(core::iter::empty());
        let mut results = self
            .filter
            .run((Ctx::new([], &inputs), Val::from(input.clone())));
        let first = results.next().map(|result| {
            result
                .map(Value::from)
                .map_err(|e| QueryError::Eval(e.to_string()))
        });
        first
    }

    /// Predicate semantics: the first result exists, is not an error and is
    /// truthy.
    pub fn matches(&self, input: &Value) -> bool {
        matches!(self.first(input), Some(Ok(ref value)) if is_truthy(value))
    }
}

/// Truthiness of a query result.
///
/// | Value | Truthy |
/// |---|---|
/// | `null` | no |
/// | `false` / `true` | no / yes |
/// | number | yes unless zero |
/// | string | yes unless empty |
/// | array | yes unless empty |
/// | object | yes unless empty |
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// Display text for a transform result.
///
/// Strings are shown verbatim (no quotes), `null` and booleans as their
/// literal names, numbers in their shortest form (integral floats without a
/// fractional part) and containers as compact JSON.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (None, Some(u), _) => u.to_string(),
            (None, None, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{f:.0}"),
            _ => n.to_string(),
        },
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn compile(source: &str) -> Query {
        Query::compile(source).expect("query should compile")
    }

    // ===== compile =====

    #[test]
    fn compile_keeps_source_text() {
        assert_eq!(compile(".level").source(), ".level");
    }

    #[test]
    fn compile_rejects_syntax_error() {
        let err = Query::compile(".level ==").unwrap_err();
        assert!(matches!(err, QueryError::Parse { .. }), "got {err:?}");
    }

    #[test]
    fn compile_rejects_blank_input() {
        assert!(matches!(
            Query::compile("   "),
            Err(QueryError::Parse { .. })
        ));
    }

    #[test]
    fn compile_rejects_undefined_filter() {
        let err = Query::compile("no_such_filter_anywhere").unwrap_err();
        assert!(matches!(err, QueryError::Compile { .. }), "got {err:?}");
    }

    #[test]
    fn compile_accepts_std_library_filters() {
        assert!(Query::compile(".msg | test(\"timeout\")").is_ok());
        assert!(Query::compile("select(.n > 1) | length").is_ok());
    }

    // ===== evaluate / first =====

    #[test]
    fn evaluate_collects_all_results() {
        let results = compile(".items[]").evaluate(&json!({"items": [1, 2, 3]})).unwrap();
        assert_eq!(results, vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn evaluate_reports_runtime_error() {
        let result = compile(".a + 1").evaluate(&json!({"a": "text"}));
        assert!(matches!(result, Err(QueryError::Eval(_))));
    }

    #[test]
    fn first_returns_none_for_empty_stream() {
        assert!(compile("empty").first(&json!({})).is_none());
    }

    #[test]
    fn first_returns_only_first_result() {
        let first = compile(".[]").first(&json!([false, true])).unwrap().unwrap();
        assert_eq!(first, json!(false));
    }

    #[test]
    fn field_access_on_missing_key_is_null() {
        assert_eq!(compile(".missing").first(&json!({})).unwrap().unwrap(), Value::Null);
    }

    // ===== matches =====

    #[test]
    fn matches_comparison() {
        let q = compile(".level == \"error\"");
        assert!(q.matches(&json!({"level": "error"})));
        assert!(!q.matches(&json!({"level": "info"})));
    }

    #[test]
    fn matches_uses_first_result_only() {
        // First result is false, so the later true does not count.
        assert!(!compile(".[]").matches(&json!([false, true])));
    }

    #[test]
    fn matches_is_false_on_error_and_on_empty() {
        assert!(!compile(".a + 1").matches(&json!({"a": "x"})));
        assert!(!compile("empty").matches(&json!({})));
    }

    #[test]
    fn matches_uses_truthiness_table_not_jq_truthiness() {
        // jq itself treats 0 and "" as true; the viewer does not.
        assert!(!compile(".n").matches(&json!({"n": 0})));
        assert!(!compile(".s").matches(&json!({"s": ""})));
        assert!(compile(".n").matches(&json!({"n": 2})));
    }

    // ===== truthiness table =====

    #[test]
    fn falsy_values() {
        for value in [
            Value::Null,
            json!(false),
            json!(0),
            json!(0.0),
            json!(""),
            json!([]),
            json!({}),
        ] {
            assert!(!is_truthy(&value), "{value} should be falsy");
        }
    }

    #[test]
    fn truthy_values() {
        for value in [
            json!(true),
            json!(-1),
            json!(0.5),
            json!("0"),
            json!([null]),
            json!({"a": null}),
        ] {
            assert!(is_truthy(&value), "{value} should be truthy");
        }
    }

    // ===== display coercion =====

    #[test]
    fn display_text_table() {
        assert_eq!(display_text(&json!("plain")), "plain");
        assert_eq!(display_text(&Value::Null), "null");
        assert_eq!(display_text(&json!(true)), "true");
        assert_eq!(display_text(&json!(false)), "false");
        assert_eq!(display_text(&json!(42)), "42");
        assert_eq!(display_text(&json!(-7)), "-7");
        assert_eq!(display_text(&json!(1.5)), "1.5");
        assert_eq!(display_text(&json!(3.0)), "3");
        assert_eq!(display_text(&json!({"a": [1, 2]})), r#"{"a":[1,2]}"#);
        assert_eq!(display_text(&json!(["x", null])), r#"["x",null]"#);
    }

    #[test]
    fn display_text_of_empty_string_is_empty() {
        assert_eq!(display_text(&json!("")), "");
    }
}
