use std::fmt;

use serde_json::Value;

/// Most diagnostics kept per failed validation.
const MAX_DIAGNOSTICS: usize = 4;

/// A validation capability: untyped JSON in, typed value or diagnostics out.
///
/// Implementations must be pure; a schema handle is shared by every
/// concurrent call of a contract.
pub trait Schema {
    /// The typed value produced on success.
    type Output;

    /// Validate `value`, producing the typed output or the reasons it does
    /// not conform.
    fn validate(&self, value: &Value) -> Result<Self::Output, Diagnostics>;
}

impl<S: Schema + ?Sized> Schema for &S {
    type Output = S::Output;

    fn validate(&self, value: &Value) -> Result<Self::Output, Diagnostics> {
        (**self).validate(value)
    }
}

impl<S: Schema + ?Sized> Schema for std::sync::Arc<S> {
    type Output = S::Output;

    fn validate(&self, value: &Value) -> Result<Self::Output, Diagnostics> {
        (**self).validate(value)
    }
}

/// One structural problem found by a validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Dotted path to the offending value; empty for the root.
    pub path: String,
    /// What was expected and what was found.
    pub message: String,
}

impl Diagnostic {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn root(message: impl Into<String>) -> Self {
        Self::new(String::new(), message)
    }

    /// Re-anchor this diagnostic under `segment`.
    pub fn nested(mut self, segment: &str) -> Self {
        self.path = if self.path.is_empty() {
            segment.to_string()
        } else if self.path.starts_with('[') {
            format!("{segment}{}", self.path)
        } else {
            format!("{segment}.{}", self.path)
        };
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "at `{}`: {}", self.path, self.message)
        }
    }
}

/// Non-empty list of diagnostics from one validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn single(diagnostic: Diagnostic) -> Self {
        Self(vec![diagnostic])
    }

    /// Collect diagnostics, keeping at most the first few. Returns `None`
    /// when the iterator is empty.
    pub fn collect(diagnostics: impl IntoIterator<Item = Diagnostic>) -> Option<Self> {
        let items: Vec<Diagnostic> = diagnostics.into_iter().take(MAX_DIAGNOSTICS).collect();
        if items.is_empty() {
            None
        } else {
            Some(Self(items))
        }
    }

    pub fn nested(self, segment: &str) -> Self {
        Self(self.0.into_iter().map(|d| d.nested(segment)).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, diagnostic) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}

impl From<Diagnostic> for Diagnostics {
    fn from(diagnostic: Diagnostic) -> Self {
        Self::single(diagnostic)
    }
}
