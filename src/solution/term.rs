//! Opaque value terms bound to variables

use std::fmt;

use serde::{Deserialize, Serialize};

/// A value bound to a variable in a solution
///
/// The engine never interprets terms; it only compares and hashes them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Term {
    /// Resource identifier
    Iri { value: String },
    /// Literal with optional datatype or language tag
    Literal {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        datatype: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
    /// Source-local blank node label
    Blank { value: String },
}

impl Term {
    pub fn iri(value: impl Into<String>) -> Self {
        Term::Iri {
            value: value.into(),
        }
    }

    /// Plain literal without datatype or language
    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Term::Literal {
            value: value.into(),
            datatype: Some(datatype.into()),
            language: None,
        }
    }

    pub fn blank(value: impl Into<String>) -> Self {
        Term::Blank {
            value: value.into(),
        }
    }

    /// Lexical form, shared by all term kinds
    pub fn lexical(&self) -> &str {
        match self {
            Term::Iri { value } | Term::Literal { value, .. } | Term::Blank { value } => value,
        }
    }
}

impl From<i64> for Term {
    fn from(n: i64) -> Self {
        Term::typed(n.to_string(), "xsd:integer")
    }
}

impl From<&str> for Term {
    fn from(s: &str) -> Self {
        Term::literal(s)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri { value } => write!(f, "<{}>", value),
            Term::Blank { value } => write!(f, "_:{}", value),
            Term::Literal {
                value,
                datatype: Some(dt),
                ..
            } => write!(f, "\"{}\"^^{}", value, dt),
            Term::Literal {
                value,
                language: Some(lang),
                ..
            } => write!(f, "\"{}\"@{}", value, lang),
            Term::Literal { value, .. } => write!(f, "\"{}\"", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Term::iri("http://x").to_string(), "<http://x>");
        assert_eq!(Term::from(7).to_string(), "\"7\"^^xsd:integer");
        assert_eq!(Term::blank("b0").to_string(), "_:b0");
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(Term::literal("a")).unwrap();
        assert_eq!(json, serde_json::json!({"type": "literal", "value": "a"}));

        let back: Term = serde_json::from_value(json).unwrap();
        assert_eq!(back, Term::literal("a"));
    }

    #[test]
    fn test_kinds_are_distinct() {
        assert_ne!(Term::iri("a"), Term::literal("a"));
        assert_eq!(Term::iri("a").lexical(), Term::literal("a").lexical());
    }
}
