//! Station identity value

use std::fmt;
use std::hash::{Hash, Hasher};

use metro_common::eq_ignore_case;

/// A vertex of the transit network.
///
/// Identity is the `id` alone: two stations with the same id are equal even if
/// their display names differ.
#[derive(Debug, Clone)]
pub struct Station {
    id: String,
    name: String,
}

impl Station {
    pub(crate) fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Case-insensitive match against either the name or the id
    pub fn matches(&self, query: &str) -> bool {
        eq_ignore_case(&self.name, query) || eq_ignore_case(&self.id, query)
    }
}

impl PartialEq for Station {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Station {}

impl Hash for Station {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
