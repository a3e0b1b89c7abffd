//! Container environment derived from the database relation

use std::collections::BTreeMap;

use crate::relation::{DatabaseRelationStore, DatabaseType};

/// Map stored database credentials to the environment variables the
/// Nextcloud image reads on startup. An empty store yields no variables.
pub fn build_env(store: &DatabaseRelationStore) -> BTreeMap<String, String> {
    let Some(db) = store.credentials() else {
        return BTreeMap::new();
    };

    let (database_key, prefix) = match db.kind {
        DatabaseType::Mysql => ("MYSQL_DATABASE", "MYSQL"),
        DatabaseType::Postgres => ("POSTGRES_DB", "POSTGRES"),
    };

    BTreeMap::from([
        (database_key.to_string(), db.name.clone()),
        (format!("{prefix}_USER"), db.user.clone()),
        (format!("{prefix}_PASSWORD"), db.password.clone()),
        (format!("{prefix}_HOST"), db.host.clone()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::DatabaseCredentials;

    fn env(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_mysql_env() {
        let store = DatabaseRelationStore::with_credentials(DatabaseCredentials {
            kind: DatabaseType::Mysql,
            host: "0.1.2.3:3306".to_string(),
            name: "mysql-test-db".to_string(),
            user: "test-user".to_string(),
            password: "super!secret!password".to_string(),
        });

        assert_eq!(
            build_env(&store),
            env(&[
                ("MYSQL_DATABASE", "mysql-test-db"),
                ("MYSQL_USER", "test-user"),
                ("MYSQL_PASSWORD", "super!secret!password"),
                ("MYSQL_HOST", "0.1.2.3:3306"),
            ])
        );
    }

    #[test]
    fn test_postgres_env() {
        let store = DatabaseRelationStore::with_credentials(DatabaseCredentials {
            kind: DatabaseType::Postgres,
            host: "0.1.2.3:5432".to_string(),
            name: "pg-test-db".to_string(),
            user: "test-user".to_string(),
            password: "super!secret!password".to_string(),
        });

        assert_eq!(
            build_env(&store),
            env(&[
                ("POSTGRES_DB", "pg-test-db"),
                ("POSTGRES_USER", "test-user"),
                ("POSTGRES_PASSWORD", "super!secret!password"),
                ("POSTGRES_HOST", "0.1.2.3:5432"),
            ])
        );
    }

    #[test]
    fn test_empty_store_yields_no_env() {
        assert!(build_env(&DatabaseRelationStore::default()).is_empty());
    }
}
