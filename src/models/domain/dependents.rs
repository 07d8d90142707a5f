use std::fmt;

use serde::{Deserialize, Serialize};

/// Child records that keep an entity from being deleted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DependentCounts {
    #[serde(default)]
    pub users: u64,
    #[serde(default)]
    pub terms: u64,
    #[serde(default)]
    pub subjects: u64,
    #[serde(default)]
    pub resources: u64,
    #[serde(default)]
    pub attempts: u64,
}

impl DependentCounts {
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn total(&self) -> u64 {
        self.users + self.terms + self.subjects + self.resources + self.attempts
    }
}

impl fmt::Display for DependentCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = [
            ("user", self.users),
            ("term", self.terms),
            ("subject", self.subjects),
            ("resource", self.resources),
            ("attempt", self.attempts),
        ]
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|(label, count)| {
            let plural = if *count == 1 { "" } else { "s" };
            format!("{} {}{}", count, label, plural)
        })
        .collect();

        if parts.is_empty() {
            write!(f, "no dependents")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}
