//! Immutable variable bindings

use std::fmt;
use std::sync::Arc;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::errors::{SolutionError, SolutionResult};
use super::term::Term;
use super::vars::VarNames;

/// One row of variable bindings
///
/// Equality and hashing cover the variable names and the ordered values,
/// so two solutions over the same names in the same order compare by value.
/// A value of `None` means the variable is present but unbound.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Solution {
    vars: VarNames,
    values: Arc<[Option<Term>]>,
}

impl Solution {
    /// Build a solution; `values` must match `vars` in length
    pub fn new(vars: VarNames, values: Vec<Option<Term>>) -> SolutionResult<Self> {
        if vars.len() != values.len() {
            return Err(SolutionError::ArityMismatch {
                expected: vars.len(),
                actual: values.len(),
            });
        }
        Ok(Self {
            vars,
            values: values.into(),
        })
    }

    /// Build from already-validated parts. Callers guarantee equal lengths.
    pub(crate) fn from_parts(vars: VarNames, values: Vec<Option<Term>>) -> Self {
        debug_assert_eq!(vars.len(), values.len());
        Self {
            vars,
            values: values.into(),
        }
    }

    /// The solution with no variables (an "ask" answer)
    pub fn empty() -> Self {
        Self::from_parts(VarNames::empty(), Vec::new())
    }

    /// Every variable present and unbound
    pub fn unbound(vars: VarNames) -> Self {
        let values = vec![None; vars.len()];
        Self::from_parts(vars, values)
    }

    pub fn var_names(&self) -> &VarNames {
        &self.vars
    }

    pub fn values(&self) -> &[Option<Term>] {
        &self.values
    }

    /// Value at a position of `var_names()`; `None` if unbound or out of range
    pub fn value_at(&self, index: usize) -> Option<&Term> {
        self.values.get(index).and_then(Option::as_ref)
    }

    /// Value bound to `name`; `None` if unbound or not present
    pub fn get(&self, name: &str) -> Option<&Term> {
        self.vars.index_of(name).and_then(|i| self.value_at(i))
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.vars.iter().zip(self.values.iter()).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match value {
                Some(term) => write!(f, "{}={}", name, term)?,
                None => write!(f, "{}=UNDEF", name)?,
            }
        }
        write!(f, "}}")
    }
}

/// Serializes as an object of the bound variables only
impl Serialize for Solution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let bound = self.values.iter().filter(|v| v.is_some()).count();
        let mut map = serializer.serialize_map(Some(bound))?;
        for (name, value) in self.vars.iter().zip(self.values.iter()) {
            if let Some(term) = value {
                map.serialize_entry(name, term)?;
            }
        }
        map.end()
    }
}
