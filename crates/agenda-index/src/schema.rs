use regex::Regex;
use std::sync::LazyLock;

use crate::{Error, Result};

// NOTE: Schema handling
//
// Tables are created with CREATE TABLE IF NOT EXISTS and never migrated.
// Changing a mapping below has no effect on an existing database file;
// delete the file to recreate the tables.
//
// Table and column names cannot be bound as SQL parameters, so every
// identifier is checked against IDENTIFIER here and every column used in a
// query must be declared in the schema. Values are always bound.

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

static FOREIGN_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i:FOREIGN\s+KEY)\s*\(\s*([A-Za-z_][A-Za-z0-9_]*)\s*\)$").unwrap()
});

pub(crate) fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// A declared column: name plus its SQL type and constraint text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub decl: String,
}

/// Validated table definition.
///
/// Built from a name → declaration mapping. Keys of the form
/// `FOREIGN KEY(col)` are table constraints rather than columns and are
/// emitted after all column definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    name: String,
    columns: Vec<ColumnDef>,
    constraints: Vec<String>,
}

impl TableSchema {
    pub fn new<I, K, V>(name: &str, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        if name.is_empty() {
            return Err(Error::Schema("invalid table name: empty".to_string()));
        }
        if !is_identifier(name) {
            return Err(Error::Schema(format!("invalid table name '{}'", name)));
        }

        let mut columns: Vec<ColumnDef> = Vec::new();
        let mut foreign_keys: Vec<(String, String)> = Vec::new();

        for (key, decl) in entries {
            let key = key.as_ref().trim();
            let decl = decl.as_ref().trim();

            if decl.contains(';') {
                return Err(Error::Schema(format!(
                    "declaration for '{}' in table '{}' contains ';'",
                    key, name
                )));
            }

            if let Some(caps) = FOREIGN_KEY.captures(key) {
                foreign_keys.push((caps[1].to_string(), decl.to_string()));
                continue;
            }

            if !is_identifier(key) {
                return Err(Error::Schema(format!(
                    "invalid column name '{}' in table '{}'",
                    key, name
                )));
            }
            if columns.iter().any(|c| c.name == key) {
                return Err(Error::Schema(format!(
                    "column '{}' declared twice in table '{}'",
                    key, name
                )));
            }

            columns.push(ColumnDef {
                name: key.to_string(),
                decl: decl.to_string(),
            });
        }

        if columns.is_empty() {
            return Err(Error::Schema(format!("table '{}' declares no columns", name)));
        }

        let mut constraints = Vec::with_capacity(foreign_keys.len());
        for (column, reference) in foreign_keys {
            if !columns.iter().any(|c| c.name == column) {
                return Err(Error::Schema(format!(
                    "foreign key on undeclared column '{}' in table '{}'",
                    column, name
                )));
            }
            constraints.push(format!("FOREIGN KEY({}) {}", column, reference));
        }

        Ok(Self {
            name: name.to_string(),
            columns,
            constraints,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c.name == column)
    }

    /// Ensure `column` is declared, returning the allow-listed name.
    pub(crate) fn check_column<'a>(&self, column: &'a str) -> Result<&'a str> {
        if self.has_column(column) {
            Ok(column)
        } else {
            Err(Error::UnknownColumn {
                table: self.name.clone(),
                column: column.to_string(),
            })
        }
    }

    pub fn create_sql(&self) -> String {
        let definitions = self
            .columns
            .iter()
            .map(|c| {
                if c.decl.is_empty() {
                    c.name.clone()
                } else {
                    format!("{} {}", c.name, c.decl)
                }
            })
            .chain(self.constraints.iter().cloned())
            .collect::<Vec<_>>()
            .join(", ");

        format!("CREATE TABLE IF NOT EXISTS {} ({})", self.name, definitions)
    }
}

pub fn session_schema() -> Result<TableSchema> {
    TableSchema::new(
        "session",
        [
            ("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
            ("date", "TEXT"),
            ("time_start", "TEXT"),
            ("time_end", "TEXT"),
            ("session_title", "TEXT"),
            ("location", "TEXT"),
            ("description", "TEXT"),
            ("speakers", "TEXT"),
        ],
    )
}

pub fn subsession_schema() -> Result<TableSchema> {
    TableSchema::new(
        "subsession",
        [
            ("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
            ("date", "TEXT"),
            ("time_start", "TEXT"),
            ("time_end", "TEXT"),
            ("session_title", "TEXT"),
            ("location", "TEXT"),
            ("description", "TEXT"),
            ("speakers", "TEXT"),
            ("session_parent_id", "INTEGER NOT NULL"),
            ("FOREIGN KEY(session_parent_id)", "REFERENCES session(id)"),
        ],
    )
}

pub fn speaker_schema() -> Result<TableSchema> {
    TableSchema::new(
        "speaker",
        [
            ("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
            ("name", "TEXT NOT NULL"),
            ("session_id", "INTEGER"),
            ("subsession_id", "INTEGER"),
            ("FOREIGN KEY(session_id)", "REFERENCES session(id)"),
            ("FOREIGN KEY(subsession_id)", "REFERENCES subsession(id)"),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_sql_places_constraints_last() {
        let schema = subsession_schema().unwrap();
        let sql = schema.create_sql();

        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS subsession ("));
        assert!(sql.ends_with(
            "session_parent_id INTEGER NOT NULL, FOREIGN KEY(session_parent_id) REFERENCES session(id))"
        ));
        assert!(!schema.has_column("FOREIGN KEY(session_parent_id)"));
    }

    #[test]
    fn test_rejects_bad_table_names() {
        let columns = [("id", "INTEGER")];
        assert!(matches!(
            TableSchema::new("", columns),
            Err(Error::Schema(_))
        ));
        assert!(matches!(
            TableSchema::new("users; DROP TABLE x", columns),
            Err(Error::Schema(_))
        ));
        assert!(matches!(
            TableSchema::new("1st", columns),
            Err(Error::Schema(_))
        ));
    }

    #[test]
    fn test_rejects_empty_schema() {
        let err = TableSchema::new("t", Vec::<(&str, &str)>::new()).unwrap_err();
        assert!(err.to_string().contains("declares no columns"));
    }

    #[test]
    fn test_rejects_bad_columns() {
        assert!(TableSchema::new("t", [("na me", "TEXT")]).is_err());
        assert!(TableSchema::new("t", [("a", "TEXT"), ("a", "INTEGER")]).is_err());
        assert!(TableSchema::new("t", [("a", "TEXT); DROP TABLE t;")]).is_err());
    }

    #[test]
    fn test_foreign_key_must_name_declared_column() {
        let err = TableSchema::new(
            "t",
            [("a", "INTEGER"), ("FOREIGN KEY(b)", "REFERENCES other(id)")],
        )
        .unwrap_err();
        assert!(err.to_string().contains("undeclared column 'b'"));
    }

    #[test]
    fn test_check_column() {
        let schema = session_schema().unwrap();
        assert_eq!(schema.check_column("location").unwrap(), "location");
        assert!(matches!(
            schema.check_column("speaker"),
            Err(Error::UnknownColumn { .. })
        ));
    }
}
