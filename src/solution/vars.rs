//! Ordered variable-name lists

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::errors::{SolutionError, SolutionResult};

/// Immutable, ordered list of distinct variable names
///
/// Clones share one allocation, so every solution of a stream can carry
/// the stream's names at the cost of a reference count.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct VarNames(Arc<[String]>);

impl VarNames {
    /// Build a list, rejecting duplicate names
    pub fn new<I, S>(names: I) -> SolutionResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(SolutionError::DuplicateVariable(name.clone()));
            }
        }
        Ok(Self(names.into()))
    }

    /// The list with no variables
    pub fn empty() -> Self {
        Self(Arc::from(Vec::<String>::new()))
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|n| n == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// True if no name appears in both lists
    pub fn is_disjoint(&self, other: &VarNames) -> bool {
        self.0.iter().all(|n| !other.contains(n))
    }

    /// Names shared with `other`, in this list's order
    pub fn intersection(&self, other: &VarNames) -> Vec<String> {
        self.0.iter().filter(|n| other.contains(n)).cloned().collect()
    }

    /// This list followed by the names of `other` not already present
    pub fn union(&self, other: &VarNames) -> VarNames {
        let mut names: Vec<String> = self.0.to_vec();
        for name in other.iter() {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        Self(names.into())
    }

    /// True if both lists hold the same names, ignoring order
    pub fn same_set(&self, other: &VarNames) -> bool {
        self.len() == other.len() && self.0.iter().all(|n| other.contains(n))
    }

    /// True if both handles share the same allocation
    pub fn ptr_eq(&self, other: &VarNames) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for VarNames {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Debug for VarNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl fmt::Display for VarNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

impl Serialize for VarNames {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for VarNames {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        VarNames::new(names).map_err(serde::de::Error::custom)
    }
}
