//! Renders the schema catalog as PostgreSQL DDL.
//!
//! Output order: extension, enum types, tables (columns, unique and check
//! constraints), foreign keys, indexes. Foreign keys go last so tables can
//! reference each other regardless of declaration order.

use std::fmt::Write;

use super::{
    ColumnDef, ColumnDefault, ColumnType, ENUMS, EnumDef, IndexMethod, OnDelete, TABLES, TableDef,
};

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn quote_list(idents: &[&str]) -> String {
    idents
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ")
}

fn column_type(ty: ColumnType) -> String {
    match ty {
        ColumnType::Uuid => "uuid".into(),
        ColumnType::Varchar(len) => format!("varchar({len})"),
        ColumnType::Text => "text".into(),
        ColumnType::TextArray => "text[]".into(),
        ColumnType::Boolean => "boolean".into(),
        ColumnType::Integer => "integer".into(),
        ColumnType::Date => "date".into(),
        ColumnType::Timestamp => "timestamp(3)".into(),
        ColumnType::Numeric { precision, scale } => format!("numeric({precision}, {scale})"),
        ColumnType::Jsonb => "jsonb".into(),
        ColumnType::Enum(name) => quote_ident(name),
    }
}

fn column_default(default: ColumnDefault) -> String {
    match default {
        ColumnDefault::GenerateUuid => "uuid_generate_v4()".into(),
        ColumnDefault::CurrentTimestamp => "CURRENT_TIMESTAMP".into(),
        ColumnDefault::Bool(b) => b.to_string(),
        ColumnDefault::Int(i) => i.to_string(),
        ColumnDefault::Text(s) => quote_literal(s),
    }
}

fn column(col: &ColumnDef) -> String {
    let mut out = format!("{} {}", quote_ident(col.name), column_type(col.ty));
    if col.primary_key {
        out.push_str(" PRIMARY KEY");
    }
    if let Some(default) = col.default {
        let _ = write!(out, " DEFAULT {}", column_default(default));
    }
    if col.not_null {
        out.push_str(" NOT NULL");
    }
    out
}

pub fn create_type(def: &EnumDef) -> String {
    let values = def
        .values
        .iter()
        .map(|v| quote_literal(v))
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TYPE {} AS ENUM({values})", quote_ident(def.name))
}

pub fn create_table(table: &TableDef) -> String {
    let mut lines: Vec<String> = table.columns.iter().map(column).collect();
    for u in table.uniques {
        lines.push(format!(
            "CONSTRAINT {} UNIQUE({})",
            quote_ident(u.name),
            quote_list(u.columns)
        ));
    }
    for c in table.checks {
        lines.push(format!("CONSTRAINT {} CHECK ({})", quote_ident(c.name), c.expr));
    }
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n\t{}\n)",
        quote_ident(table.name),
        lines.join(",\n\t")
    )
}

pub fn add_foreign_keys(table: &TableDef) -> Vec<String> {
    table
        .foreign_keys
        .iter()
        .map(|fk| {
            let on_delete = match fk.on_delete {
                OnDelete::Cascade => "cascade",
                OnDelete::NoAction => "no action",
            };
            format!(
                "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {}(\"id\") ON DELETE {on_delete} ON UPDATE no action",
                quote_ident(table.name),
                quote_ident(fk.name),
                quote_ident(fk.column),
                quote_ident(fk.references),
            )
        })
        .collect()
}

pub fn create_indexes(table: &TableDef) -> Vec<String> {
    table
        .indexes
        .iter()
        .map(|idx| {
            let method = match idx.method {
                IndexMethod::Btree => "btree",
                IndexMethod::Gin => "gin",
            };
            format!(
                "CREATE INDEX IF NOT EXISTS {} ON {} USING {method} ({})",
                quote_ident(idx.name),
                quote_ident(table.name),
                quote_list(idx.columns)
            )
        })
        .collect()
}

/// Every statement needed to build the schema on an empty database.
pub fn create_statements() -> Vec<String> {
    let mut stmts = vec!["CREATE EXTENSION IF NOT EXISTS \"uuid-ossp\"".to_string()];
    stmts.extend(ENUMS.iter().map(create_type));
    stmts.extend(TABLES.iter().map(|t| create_table(t)));
    stmts.extend(TABLES.iter().flat_map(|t| add_foreign_keys(t)));
    stmts.extend(TABLES.iter().flat_map(|t| create_indexes(t)));
    stmts
}

/// Tears the schema down again. The extension is left in place.
pub fn drop_statements() -> Vec<String> {
    let tables = TABLES
        .iter()
        .rev()
        .map(|t| format!("DROP TABLE IF EXISTS {} CASCADE", quote_ident(t.name)));
    let types = ENUMS
        .iter()
        .rev()
        .map(|e| format!("DROP TYPE IF EXISTS {}", quote_ident(e.name)));
    tables.chain(types).collect()
}

/// The full create script, one statement per line group, for printing.
pub fn render_script(stmts: &[String]) -> String {
    let mut out = String::new();
    for stmt in stmts {
        out.push_str(stmt);
        out.push_str(";\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::table;

    fn script() -> String {
        render_script(&create_statements())
    }

    #[test]
    fn users_table_renders_columns_and_unique_email() {
        let ddl = create_table(table("users").unwrap());
        assert!(ddl.starts_with("CREATE TABLE IF NOT EXISTS \"users\" ("));
        assert!(ddl.contains("\"id\" uuid PRIMARY KEY DEFAULT uuid_generate_v4() NOT NULL"));
        assert!(ddl.contains("\"email\" varchar(255) NOT NULL"));
        assert!(ddl.contains("\"role\" \"user_role_enum\" DEFAULT 'USER',"));
        assert!(ddl.contains("\"created_at\" timestamp(3) DEFAULT CURRENT_TIMESTAMP"));
        assert!(ddl.contains("CONSTRAINT \"users_email_key\" UNIQUE(\"email\")"));
    }

    #[test]
    fn self_follow_check_is_named() {
        let ddl = create_table(table("user_follows").unwrap());
        assert!(ddl.contains("CONSTRAINT \"user_follows_check\" CHECK (follower_id <> following_id)"));
    }

    #[test]
    fn feedback_ratings_are_bounded() {
        let ddl = create_table(table("event_feedback").unwrap());
        for col in ["overall", "content", "organization", "venue"] {
            let expected = format!(
                "CONSTRAINT \"event_feedback_{col}_rating_check\" CHECK (({col}_rating >= 1) AND ({col}_rating <= 5))"
            );
            assert!(ddl.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn weak_references_do_not_cascade() {
        let fks = add_foreign_keys(table("event_collaborators").unwrap());
        let invited_by = fks
            .iter()
            .find(|s| s.contains("event_collaborators_invited_by_fkey"))
            .unwrap();
        assert!(invited_by.contains("ON DELETE no action"));

        let user = fks
            .iter()
            .find(|s| s.contains("event_collaborators_user_id_fkey"))
            .unwrap();
        assert_eq!(
            user,
            "ALTER TABLE \"event_collaborators\" ADD CONSTRAINT \"event_collaborators_user_id_fkey\" FOREIGN KEY (\"user_id\") REFERENCES \"users\"(\"id\") ON DELETE cascade ON UPDATE no action"
        );
    }

    #[test]
    fn lookup_indexes_are_present() {
        let ddl = script();
        for expected in [
            "CREATE INDEX IF NOT EXISTS \"idx_events_city_category\" ON \"events\" USING btree (\"city\", \"category\")",
            "CREATE INDEX IF NOT EXISTS \"idx_events_status_start_date\" ON \"events\" USING btree (\"status\", \"start_date\")",
            "CREATE INDEX IF NOT EXISTS \"idx_notifications_user_unread\" ON \"notifications\" USING btree (\"user_id\", \"is_read\")",
            "CREATE INDEX IF NOT EXISTS \"idx_events_tags\" ON \"events\" USING gin (\"tags\")",
        ] {
            assert!(ddl.contains(expected), "missing {expected}");
        }
    }

    #[test]
    fn enum_types_are_created_before_tables() {
        let stmts = create_statements();
        assert_eq!(stmts[0], "CREATE EXTENSION IF NOT EXISTS \"uuid-ossp\"");
        let last_type = stmts
            .iter()
            .rposition(|s| s.starts_with("CREATE TYPE"))
            .unwrap();
        let first_table = stmts
            .iter()
            .position(|s| s.starts_with("CREATE TABLE"))
            .unwrap();
        let first_fk = stmts.iter().position(|s| s.starts_with("ALTER TABLE")).unwrap();
        let last_table = stmts
            .iter()
            .rposition(|s| s.starts_with("CREATE TABLE"))
            .unwrap();
        assert!(last_type < first_table);
        assert!(last_table < first_fk);
        assert!(stmts.contains(&"CREATE TYPE \"user_role_enum\" AS ENUM('USER', 'ORGANIZER', 'ADMIN', 'MODERATOR')".to_string()));
    }

    #[test]
    fn every_named_constraint_is_rendered() {
        let ddl = script();
        for t in TABLES {
            let names = t
                .foreign_keys
                .iter()
                .map(|f| f.name)
                .chain(t.uniques.iter().map(|u| u.name))
                .chain(t.checks.iter().map(|c| c.name))
                .chain(t.indexes.iter().map(|i| i.name));
            for name in names {
                assert!(ddl.contains(&quote_ident(name)), "{name} not rendered");
            }
        }
    }

    #[test]
    fn drop_reverses_creation() {
        let stmts = drop_statements();
        assert_eq!(stmts[0], "DROP TABLE IF EXISTS \"event_analytics\" CASCADE");
        assert_eq!(stmts.last().unwrap(), "DROP TYPE IF EXISTS \"badge_type_enum\"");
        assert_eq!(stmts.len(), TABLES.len() + ENUMS.len());
    }

    #[test]
    fn literals_are_escaped() {
        assert_eq!(quote_literal("O'Brien"), "'O''Brien'");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }
}
