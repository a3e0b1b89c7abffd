//! Database relation store
//!
//! Holds at most one credential set received over the `database` relation.
//! Only the leader unit mutates it, and only with complete, validly typed data.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::error::Result;

/// Fields a remote database unit must publish, in sorted order.
pub const REQUIRED_DATABASE_FIELDS: [&str; 5] = ["host", "name", "password", "type", "user"];

/// Raw per-unit relation data as published by the remote side
pub type RelationData = BTreeMap<String, String>;

/// Parse relation data from YAML. Keys with a `null` value are dropped so
/// they count as unpublished rather than as the string "null".
pub fn parse_relation_data(raw: &str) -> Result<RelationData> {
    if raw.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    let fields: BTreeMap<String, Option<String>> = serde_yaml::from_str(raw)?;
    Ok(fields
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key, value)))
        .collect())
}

/// Database engines the workload can talk to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    Mysql,
    #[serde(alias = "postgresql")]
    Postgres,
}

impl DatabaseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseType::Mysql => "mysql",
            DatabaseType::Postgres => "postgres",
        }
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses the relation's `type` field. Only the exact names published by
/// database charms are accepted.
impl FromStr for DatabaseType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "mysql" => Ok(DatabaseType::Mysql),
            "postgres" => Ok(DatabaseType::Postgres),
            other => Err(format!(
                "unsupported database type '{other}', expected one of: mysql, postgres"
            )),
        }
    }
}

/// A complete set of connection details for the related database
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseCredentials {
    #[serde(rename = "type")]
    pub kind: DatabaseType,
    /// `<url_or_ip>:<port>`, e.g. `127.0.0.1:3306`
    pub host: String,
    pub name: String,
    pub user: String,
    pub password: String,
}

impl fmt::Debug for DatabaseCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseCredentials")
            .field("kind", &self.kind)
            .field("host", &self.host)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl DatabaseCredentials {
    /// Render back into the relation's wire shape
    pub fn to_relation_data(&self) -> RelationData {
        BTreeMap::from([
            ("type".to_string(), self.kind.to_string()),
            ("host".to_string(), self.host.clone()),
            ("name".to_string(), self.name.clone()),
            ("user".to_string(), self.user.clone()),
            ("password".to_string(), self.password.clone()),
        ])
    }
}

/// Outcome of a `database-relation-changed` event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelationChange {
    /// This unit is not the leader; nothing was read.
    NotLeader,
    /// The event did not name the remote unit that wrote the data.
    NoRemoteUnit,
    /// The remote unit has not published every required field yet.
    MissingFields(Vec<&'static str>),
    /// The remote unit published an engine this workload cannot use.
    InvalidType(String),
    /// The credentials were stored; a reconciliation pass should follow.
    Stored,
}

/// Stored credentials for the `database` relation. Empty until the leader
/// receives a complete, valid update.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatabaseRelationStore {
    credentials: Option<DatabaseCredentials>,
}

impl DatabaseRelationStore {
    pub fn with_credentials(credentials: DatabaseCredentials) -> Self {
        Self {
            credentials: Some(credentials),
        }
    }

    pub fn credentials(&self) -> Option<&DatabaseCredentials> {
        self.credentials.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_none()
    }

    /// The database host, if one has been stored and it is non-empty
    pub fn host(&self) -> Option<&str> {
        self.credentials
            .as_ref()
            .map(|c| c.host.as_str())
            .filter(|h| !h.is_empty())
    }

    /// Stored credentials in the relation's wire shape; empty when absent
    pub fn as_relation_data(&self) -> RelationData {
        self.credentials
            .as_ref()
            .map(DatabaseCredentials::to_relation_data)
            .unwrap_or_default()
    }

    /// Validate relation data from `event_unit` and store it when complete.
    ///
    /// Non-leaders and malformed updates leave the store untouched.
    pub fn on_relation_changed(
        &mut self,
        is_leader: bool,
        event_unit: Option<&str>,
        data: &RelationData,
    ) -> RelationChange {
        if !is_leader {
            debug!("Not the leader, ignoring database relation data");
            return RelationChange::NotLeader;
        }

        let Some(unit) = event_unit else {
            warn!("Event unit can't be empty when setting database config");
            return RelationChange::NoRemoteUnit;
        };

        let missing: Vec<&'static str> = REQUIRED_DATABASE_FIELDS
            .iter()
            .copied()
            .filter(|field| !data.contains_key(*field))
            .collect();
        if !missing.is_empty() {
            error!(
                unit,
                "Missing required data fields for related database relation: {:?}", missing
            );
            return RelationChange::MissingFields(missing);
        }

        let field = |name: &str| data.get(name).cloned().unwrap_or_default();

        let kind = match field("type").parse::<DatabaseType>() {
            Ok(kind) => kind,
            Err(e) => {
                error!(unit, "Rejecting database relation data: {}", e);
                return RelationChange::InvalidType(field("type"));
            }
        };

        let credentials = DatabaseCredentials {
            kind,
            host: field("host"),
            name: field("name"),
            user: field("user"),
            password: field("password"),
        };

        info!(
            unit,
            host = %credentials.host,
            database = %credentials.name,
            "Stored {} credentials from database relation", kind
        );
        self.credentials = Some(credentials);
        RelationChange::Stored
    }

    /// Forget the stored credentials. Returns whether anything changed.
    pub fn on_relation_broken(&mut self, is_leader: bool) -> bool {
        if !is_leader {
            debug!("Not the leader, keeping database relation data");
            return false;
        }
        info!("Database relation broken, clearing stored credentials");
        self.credentials.take().is_some()
    }
}
