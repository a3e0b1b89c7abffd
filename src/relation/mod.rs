//! Relations with other applications
//!
//! Only the `database` relation is consumed: the remote database unit
//! publishes its connection details and the leader keeps the latest valid set.

mod database;

pub use database::{
    parse_relation_data, DatabaseCredentials, DatabaseRelationStore, DatabaseType,
    RelationChange, RelationData, REQUIRED_DATABASE_FIELDS,
};
