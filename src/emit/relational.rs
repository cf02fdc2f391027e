//! Relational backend
//!
//! Emits one `CREATE TABLE` per entity, named through the shared naming
//! engine. Columns follow property declaration order; relationship-derived
//! columns are appended afterward. To-one relationships add a foreign-key
//! column, to-many relationships add a synthetic join table with two
//! foreign keys.

use crate::model::{Cardinality, DomainModel, Entity, Relationship};

use super::names::{foreign_key, join_table, table_name};
use super::{Backend, TypeMap};

pub fn backend() -> Backend {
    Backend {
        name: "relational",
        file_name: "schema.sql",
        types: TypeMap {
            string: "VARCHAR(255)",
            integer: "NUMERIC",
            number: "NUMERIC",
            boolean: "BOOLEAN",
            date: "DATE",
            datetime: "TIMESTAMP",
            uuid: Some("UUID"),
            email: None,
            untyped: "TEXT",
            // no portable array column; store as a document
            array_of: |_| "JSONB".to_string(),
            reference: |entity| format!("VARCHAR(255) REFERENCES {}(id)", table_name(entity)),
            enumeration: |_| "VARCHAR(255)".to_string(),
        },
        header,
        entity,
    }
}

fn header(_model: &DomainModel) -> String {
    "-- Generated by domainforge - DO NOT EDIT\n\n".to_string()
}

fn entity(entity: &Entity, _model: &DomainModel, types: &TypeMap) -> String {
    let mut columns = Vec::new();
    for property in &entity.properties {
        let mut column = format!("  {} {}", property.name, types.resolve(property));
        if property.is_key {
            column.push_str(" PRIMARY KEY");
        } else if property.required {
            column.push_str(" NOT NULL");
        }
        columns.push(column);
    }
    for relationship in entity.relationships_of(Cardinality::ToOne) {
        columns.push(format!(
            "  {} VARCHAR(255) REFERENCES {}(id)",
            foreign_key(&relationship.name),
            table_name(&relationship.target_entity)
        ));
    }

    let mut out = format!(
        "CREATE TABLE {} (\n{}\n);\n\n",
        table_name(&entity.name),
        columns.join(",\n")
    );
    for relationship in entity.relationships_of(Cardinality::ToMany) {
        out.push_str(&join_table_ddl(entity, relationship));
    }
    out
}

/// Join representation of a to-many relationship: two foreign-key columns
/// named after the joined entities.
fn join_table_ddl(entity: &Entity, relationship: &Relationship) -> String {
    format!(
        "CREATE TABLE {} (\n  {} VARCHAR(255) REFERENCES {}(id),\n  {} VARCHAR(255) REFERENCES {}(id)\n);\n\n",
        join_table(&entity.name, &relationship.name),
        foreign_key(&entity.name),
        table_name(&entity.name),
        foreign_key(&relationship.target_entity),
        table_name(&relationship.target_entity)
    )
}
