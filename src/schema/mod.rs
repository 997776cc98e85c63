//! Declarative description of the relational schema.
//!
//! Everything here is plain `'static` data. The DDL generator in [`ddl`]
//! renders it for Postgres; the row types in `models` mirror the same
//! column names.

pub mod ddl;
mod tables;

use crate::enums::{
    BadgeType, City, CollaborationRole, EventCategory, EventStatus, EventType, MediaType,
    NotificationType, OrganizerType, PgEnum, RegistrationStatus, UserRole,
};

pub use tables::TABLES;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumDef {
    pub name: &'static str,
    pub values: &'static [&'static str],
}

impl EnumDef {
    pub const fn of<E: PgEnum>() -> Self {
        Self {
            name: E::TYPE_NAME,
            values: E::VALUES,
        }
    }
}

pub static ENUMS: &[EnumDef] = &[
    EnumDef::of::<BadgeType>(),
    EnumDef::of::<City>(),
    EnumDef::of::<CollaborationRole>(),
    EnumDef::of::<EventCategory>(),
    EnumDef::of::<EventStatus>(),
    EnumDef::of::<EventType>(),
    EnumDef::of::<MediaType>(),
    EnumDef::of::<NotificationType>(),
    EnumDef::of::<OrganizerType>(),
    EnumDef::of::<RegistrationStatus>(),
    EnumDef::of::<UserRole>(),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Uuid,
    Varchar(u32),
    Text,
    TextArray,
    Boolean,
    Integer,
    Date,
    /// `timestamp(3)` without time zone.
    Timestamp,
    Numeric { precision: u8, scale: u8 },
    Jsonb,
    Enum(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnDefault {
    GenerateUuid,
    CurrentTimestamp,
    Bool(bool),
    Int(i32),
    Text(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub ty: ColumnType,
    pub not_null: bool,
    pub primary_key: bool,
    pub default: Option<ColumnDefault>,
}

impl ColumnDef {
    pub const fn new(name: &'static str, ty: ColumnType) -> Self {
        Self {
            name,
            ty,
            not_null: false,
            primary_key: false,
            default: None,
        }
    }

    /// `uuid PRIMARY KEY DEFAULT uuid_generate_v4() NOT NULL`
    pub const fn id() -> Self {
        Self::new("id", ColumnType::Uuid)
            .primary_key()
            .default(ColumnDefault::GenerateUuid)
    }

    pub const fn not_null(self) -> Self {
        Self {
            not_null: true,
            ..self
        }
    }

    pub const fn primary_key(self) -> Self {
        Self {
            primary_key: true,
            not_null: true,
            ..self
        }
    }

    pub const fn default(self, default: ColumnDefault) -> Self {
        Self {
            default: Some(default),
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    NoAction,
    Cascade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKeyDef {
    pub name: &'static str,
    pub column: &'static str,
    pub references: &'static str,
    pub on_delete: OnDelete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniqueDef {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckDef {
    pub name: &'static str,
    pub expr: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexMethod {
    Btree,
    Gin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexDef {
    pub name: &'static str,
    pub method: IndexMethod,
    pub columns: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
    pub foreign_keys: &'static [ForeignKeyDef],
    pub uniques: &'static [UniqueDef],
    pub checks: &'static [CheckDef],
    pub indexes: &'static [IndexDef],
}

impl TableDef {
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }
}

pub fn table(name: &str) -> Option<&'static TableDef> {
    TABLES.iter().find(|t| t.name == name).copied()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn foreign_keys_point_at_primary_keys() {
        for t in TABLES {
            for fk in t.foreign_keys {
                assert!(
                    t.column(fk.column).is_some(),
                    "{}.{} missing",
                    t.name,
                    fk.column
                );
                let target = table(fk.references)
                    .unwrap_or_else(|| panic!("{} references unknown {}", fk.name, fk.references));
                assert!(target.column("id").is_some_and(|c| c.primary_key));
            }
        }
    }

    #[test]
    fn constraint_and_index_columns_exist() {
        for t in TABLES {
            let names = t
                .uniques
                .iter()
                .flat_map(|u| u.columns.iter())
                .chain(t.indexes.iter().flat_map(|i| i.columns.iter()));
            for col in names {
                assert!(t.column(col).is_some(), "{}.{} missing", t.name, col);
            }
        }
    }

    #[test]
    fn enum_columns_use_declared_types() {
        let declared: HashSet<&str> = ENUMS.iter().map(|e| e.name).collect();
        for t in TABLES {
            for c in t.columns {
                if let ColumnType::Enum(name) = c.ty {
                    assert!(declared.contains(name), "{}.{} uses {}", t.name, c.name, name);
                }
            }
        }
    }

    #[test]
    fn object_names_are_unique() {
        let mut seen = HashSet::new();
        for t in TABLES {
            assert!(seen.insert(t.name), "duplicate table {}", t.name);
            let constraint_names = t
                .foreign_keys
                .iter()
                .map(|f| f.name)
                .chain(t.uniques.iter().map(|u| u.name))
                .chain(t.checks.iter().map(|c| c.name))
                .chain(t.indexes.iter().map(|i| i.name));
            for name in constraint_names {
                assert!(seen.insert(name), "duplicate name {}", name);
            }
        }
    }

    #[test]
    fn every_table_has_a_uuid_primary_key() {
        for t in TABLES {
            let pk: Vec<_> = t.columns.iter().filter(|c| c.primary_key).collect();
            assert_eq!(pk.len(), 1, "{}", t.name);
            assert_eq!(pk[0].ty, ColumnType::Uuid);
            assert_eq!(pk[0].default, Some(ColumnDefault::GenerateUuid));
        }
    }
}
