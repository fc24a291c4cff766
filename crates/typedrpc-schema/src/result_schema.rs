use serde_json::Value;

use crate::validator::{Diagnostic, Diagnostics, Schema};

/// Schema of a result envelope: `{"ok":true,"val":…}` or `{"ok":false,"err":…}`.
///
/// The `ok` discriminant selects which inner schema validates the payload.
/// Diagnostics from the inner schema are re-anchored under `val` or `err`.
#[derive(Debug, Clone, Copy)]
pub struct ResultSchema<V, E> {
    val: V,
    err: E,
}

impl<V, E> ResultSchema<V, E> {
    pub const fn new(val: V, err: E) -> Self {
        Self { val, err }
    }
}

impl<V: Schema, E: Schema> Schema for ResultSchema<V, E> {
    type Output = Result<V::Output, E::Output>;

    fn validate(&self, value: &Value) -> Result<Self::Output, Diagnostics> {
        let Value::Object(map) = value else {
            return Err(Diagnostic::root(format!(
                "expected a result envelope object, got {}",
                kind_of(value)
            ))
            .into());
        };

        match map.get("ok") {
            Some(Value::Bool(true)) => {
                let val = map.get("val").ok_or_else(|| missing("val"))?;
                self.val
                    .validate(val)
                    .map(Ok)
                    .map_err(|diagnostics| diagnostics.nested("val"))
            }
            Some(Value::Bool(false)) => {
                let err = map.get("err").ok_or_else(|| missing("err"))?;
                self.err
                    .validate(err)
                    .map(Err)
                    .map_err(|diagnostics| diagnostics.nested("err"))
            }
            Some(other) => Err(Diagnostic::new(
                "ok",
                format!("expected a boolean, got {}", kind_of(other)),
            )
            .into()),
            None => Err(missing("ok")),
        }
    }
}

fn missing(field: &str) -> Diagnostics {
    Diagnostic::new(field, "missing required field").into()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
