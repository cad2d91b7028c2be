use rusqlite::{Connection, params_from_iter};
use tracing::{debug, warn};

use crate::schema::TableSchema;
use crate::{Error, Record, Result, Value};

/// Extra condition appended to a `select` with AND.
///
/// Replaces free-form clause strings: the column is checked against the
/// schema and every value is bound.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Eq(String, Value),
    In(String, Vec<Value>),
    IsNull(String),
    NotNull(String),
}

impl Predicate {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Eq(column.into(), value.into())
    }

    pub fn is_in<I, V>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Predicate::In(column.into(), values.into_iter().map(Into::into).collect())
    }

    fn column(&self) -> &str {
        match self {
            Predicate::Eq(c, _)
            | Predicate::In(c, _)
            | Predicate::IsNull(c)
            | Predicate::NotNull(c) => c,
        }
    }
}

/// Accessor for one table on a borrowed connection.
///
/// Identifiers are allow-listed against the schema before they are
/// formatted into SQL; values only ever travel as bound parameters.
pub struct Table<'c> {
    conn: &'c Connection,
    schema: &'c TableSchema,
}

impl<'c> Table<'c> {
    /// CREATE TABLE IF NOT EXISTS. An existing table keeps its shape even
    /// when `schema` differs from it.
    pub fn define(conn: &'c Connection, schema: &'c TableSchema) -> Result<Self> {
        let sql = schema.create_sql();
        debug!(table = schema.name(), %sql, "define");
        conn.execute(&sql, [])?;
        Ok(Self::attach(conn, schema))
    }

    /// Wrap a table that is known to exist.
    pub fn attach(conn: &'c Connection, schema: &'c TableSchema) -> Self {
        Self { conn, schema }
    }

    pub fn name(&self) -> &str {
        self.schema.name()
    }

    pub fn schema(&self) -> &TableSchema {
        self.schema
    }

    /// SELECT `columns` (all schema columns when empty) where every
    /// `filters` entry matches by equality and every `extra` predicate holds.
    pub fn select(
        &self,
        columns: &[&str],
        filters: &Record,
        extra: &[Predicate],
    ) -> Result<Vec<Record>> {
        let columns: Vec<&str> = if columns.is_empty() {
            self.schema.column_names()
        } else {
            columns
                .iter()
                .map(|c| self.schema.check_column(c))
                .collect::<Result<_>>()?
        };

        let mut conditions = Conditions::default();
        for (column, value) in filters.iter() {
            conditions.push_eq(self.schema.check_column(column)?, value.clone());
        }
        for predicate in extra {
            self.schema.check_column(predicate.column())?;
            conditions.push_predicate(predicate);
        }

        let sql = format!(
            "SELECT {} FROM {}{}",
            columns.join(", "),
            self.name(),
            conditions.where_clause()
        );
        debug!(table = self.name(), %sql, params = conditions.params.len(), "select");

        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map(params_from_iter(conditions.params.iter()), |row| {
                let mut record = Record::new();
                for (i, column) in columns.iter().enumerate() {
                    record.set(*column, row.get::<_, Value>(i)?);
                }
                Ok(record)
            })?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

        Ok(records)
    }

    /// INSERT one row and return its generated id.
    ///
    /// Engine failures are logged and returned so the caller can decide
    /// whether to abort or skip.
    pub fn insert(&self, record: &Record) -> Result<i64> {
        let sql = if record.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", self.name())
        } else {
            let columns = record
                .columns()
                .map(|c| self.schema.check_column(c))
                .collect::<Result<Vec<_>>>()?;
            let placeholders = vec!["?"; columns.len()].join(", ");
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                self.name(),
                columns.join(", "),
                placeholders
            )
        };
        debug!(table = self.name(), %sql, "insert");

        match self.conn.execute(&sql, params_from_iter(record.values())) {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(err) => {
                warn!(table = self.name(), error = %err, "insert failed");
                Err(Error::Database(err))
            }
        }
    }

    /// UPDATE rows matching `filters` (every row when empty) and return the
    /// number of rows changed.
    pub fn update(&self, values: &Record, filters: &Record) -> Result<usize> {
        if values.is_empty() {
            return Err(Error::Query(format!(
                "update on '{}' has no values to set",
                self.name()
            )));
        }

        let mut assignments = Vec::with_capacity(values.len());
        let mut params: Vec<Value> = Vec::with_capacity(values.len() + filters.len());
        for (column, value) in values.iter() {
            assignments.push(format!("{} = ?", self.schema.check_column(column)?));
            params.push(value.clone());
        }

        let mut conditions = Conditions::default();
        for (column, value) in filters.iter() {
            conditions.push_eq(self.schema.check_column(column)?, value.clone());
        }
        params.extend(conditions.params.iter().cloned());

        let sql = format!(
            "UPDATE {} SET {}{}",
            self.name(),
            assignments.join(", "),
            conditions.where_clause()
        );
        debug!(table = self.name(), %sql, "update");

        let changed = self.conn.execute(&sql, params_from_iter(params.iter()))?;
        Ok(changed)
    }

    pub fn count(&self) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.name());
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[derive(Default)]
struct Conditions {
    clauses: Vec<String>,
    params: Vec<Value>,
}

impl Conditions {
    fn push_eq(&mut self, column: &str, value: Value) {
        // `= NULL` never matches in SQL
        if value.is_null() {
            self.clauses.push(format!("{} IS NULL", column));
        } else {
            self.clauses.push(format!("{} = ?", column));
            self.params.push(value);
        }
    }

    fn push_predicate(&mut self, predicate: &Predicate) {
        match predicate {
            Predicate::Eq(column, value) => self.push_eq(column, value.clone()),
            // IN () matches nothing
            Predicate::In(_, values) if values.is_empty() => self.clauses.push("0".to_string()),
            Predicate::In(column, values) => {
                let placeholders = vec!["?"; values.len()].join(", ");
                self.clauses.push(format!("{} IN ({})", column, placeholders));
                self.params.extend(values.iter().cloned());
            }
            Predicate::IsNull(column) => self.clauses.push(format!("{} IS NULL", column)),
            Predicate::NotNull(column) => self.clauses.push(format!("{} IS NOT NULL", column)),
        }
    }

    fn where_clause(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TableSchema;

    fn users_schema() -> TableSchema {
        TableSchema::new(
            "users",
            [
                ("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
                ("name", "TEXT"),
                ("team", "TEXT"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_insert_then_select_by_id() {
        let conn = Connection::open_in_memory().unwrap();
        let schema = users_schema();
        let users = Table::define(&conn, &schema).unwrap();

        let row = Record::new().with("name", "John").with("team", "core");
        let id = users.insert(&row).unwrap();

        let found = users
            .select(&[], &Record::new().with("id", id), &[])
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].get("id"), Some(&Value::Integer(id)));
        for (column, value) in row.iter() {
            assert_eq!(found[0].get(column), Some(value));
        }
    }

    #[test]
    fn test_select_projects_requested_columns() {
        let conn = Connection::open_in_memory().unwrap();
        let schema = users_schema();
        let users = Table::define(&conn, &schema).unwrap();
        users.insert(&Record::new().with("name", "Ann")).unwrap();

        let found = users.select(&["name"], &Record::new(), &[]).unwrap();
        assert_eq!(found[0].columns().collect::<Vec<_>>(), vec!["name"]);
    }

    #[test]
    fn test_filters_are_bound_not_interpolated() {
        let conn = Connection::open_in_memory().unwrap();
        let schema = users_schema();
        let users = Table::define(&conn, &schema).unwrap();
        users.insert(&Record::new().with("name", "Ann")).unwrap();

        let hostile = Record::new().with("name", "x' OR '1'='1");
        assert!(users.select(&[], &hostile, &[]).unwrap().is_empty());
        assert_eq!(users.update(&Record::new().with("team", "t"), &hostile).unwrap(), 0);
        assert_eq!(users.count().unwrap(), 1);
    }

    #[test]
    fn test_unknown_columns_are_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        let schema = users_schema();
        let users = Table::define(&conn, &schema).unwrap();

        let bad = Record::new().with("name; DROP TABLE users", "x");
        assert!(matches!(users.insert(&bad), Err(Error::UnknownColumn { .. })));
        assert!(matches!(
            users.select(&["password"], &Record::new(), &[]),
            Err(Error::UnknownColumn { .. })
        ));
        assert!(matches!(
            users.update(&Record::new().with("team", "t"), &bad),
            Err(Error::UnknownColumn { .. })
        ));
        assert!(matches!(
            users.select(&[], &Record::new(), &[Predicate::IsNull("nope".into())]),
            Err(Error::UnknownColumn { .. })
        ));
    }

    #[test]
    fn test_update_returns_changed_rows() {
        let conn = Connection::open_in_memory().unwrap();
        let schema = users_schema();
        let users = Table::define(&conn, &schema).unwrap();
        users.insert(&Record::new().with("name", "Ann").with("team", "a")).unwrap();
        users.insert(&Record::new().with("name", "Bob").with("team", "a")).unwrap();
        users.insert(&Record::new().with("name", "Cid").with("team", "b")).unwrap();

        let changed = users
            .update(
                &Record::new().with("team", "c"),
                &Record::new().with("team", "a"),
            )
            .unwrap();
        assert_eq!(changed, 2);

        let moved = users
            .select(&["name"], &Record::new().with("team", "c"), &[])
            .unwrap();
        assert_eq!(moved.len(), 2);
    }

    #[test]
    fn test_update_requires_values() {
        let conn = Connection::open_in_memory().unwrap();
        let schema = users_schema();
        let users = Table::define(&conn, &schema).unwrap();

        assert!(matches!(
            users.update(&Record::new(), &Record::new()),
            Err(Error::Query(_))
        ));
    }

    #[test]
    fn test_extra_predicates() {
        let conn = Connection::open_in_memory().unwrap();
        let schema = users_schema();
        let users = Table::define(&conn, &schema).unwrap();
        let a = users.insert(&Record::new().with("name", "Ann")).unwrap();
        let b = users.insert(&Record::new().with("name", "Bob").with("team", "x")).unwrap();
        users.insert(&Record::new().with("name", "Cid").with("team", "x")).unwrap();

        let picked = users
            .select(&["id"], &Record::new(), &[Predicate::is_in("id", [a, b])])
            .unwrap();
        assert_eq!(picked.len(), 2);

        let none = users
            .select(&["id"], &Record::new(), &[Predicate::is_in("id", Vec::<i64>::new())])
            .unwrap();
        assert!(none.is_empty());

        let no_team = users
            .select(&["name"], &Record::new(), &[Predicate::IsNull("team".into())])
            .unwrap();
        assert_eq!(no_team.len(), 1);
        assert_eq!(no_team[0].get("name"), Some(&Value::from("Ann")));

        let team_x = users
            .select(
                &["name"],
                &Record::new().with("team", "x"),
                &[Predicate::NotNull("team".into()), Predicate::eq("name", "Bob")],
            )
            .unwrap();
        assert_eq!(team_x.len(), 1);
    }

    #[test]
    fn test_define_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        let schema = users_schema();
        let users = Table::define(&conn, &schema).unwrap();
        users.insert(&Record::new().with("name", "Ann")).unwrap();

        let again = Table::define(&conn, &schema).unwrap();
        assert_eq!(again.count().unwrap(), 1);
    }
}
