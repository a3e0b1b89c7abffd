//! Unit status reported to the host after each reconciliation pass

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum UnitStatus {
    Active,
    Blocked(String),
    Maintenance(String),
    Waiting(String),
}

impl UnitStatus {
    pub fn name(&self) -> &'static str {
        match self {
            UnitStatus::Active => "active",
            UnitStatus::Blocked(_) => "blocked",
            UnitStatus::Maintenance(_) => "maintenance",
            UnitStatus::Waiting(_) => "waiting",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            UnitStatus::Active => "",
            UnitStatus::Blocked(m) | UnitStatus::Maintenance(m) | UnitStatus::Waiting(m) => m,
        }
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            "" => f.write_str(self.name()),
            message => write!(f, "{}: {}", self.name(), message),
        }
    }
}
