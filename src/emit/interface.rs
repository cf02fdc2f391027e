//! Interface backend
//!
//! Emits one structural TypeScript declaration per entity: a field per
//! property with a `?` marker for optional ones, an array-typed field per
//! to-many relationship, and a scalar reference field per to-one
//! relationship.

use crate::model::{Cardinality, DomainModel, Entity};

use super::{Backend, TypeMap};

pub fn backend() -> Backend {
    Backend {
        name: "interface",
        file_name: "types.ts",
        types: TypeMap {
            string: "string",
            integer: "number",
            number: "number",
            boolean: "boolean",
            date: "Date",
            datetime: "Date",
            uuid: None,
            email: None,
            untyped: "unknown",
            array_of: |item| format!("{}[]", item),
            reference: |entity| entity.to_string(),
            enumeration: |values| {
                let quoted: Vec<String> = values.iter().map(|v| format!("\"{}\"", v)).collect();
                quoted.join(" | ")
            },
        },
        header,
        entity,
    }
}

fn header(_model: &DomainModel) -> String {
    "// Generated by domainforge - DO NOT EDIT\n\n".to_string()
}

fn entity(entity: &Entity, _model: &DomainModel, types: &TypeMap) -> String {
    let mut out = String::new();
    if !entity.description.is_empty() {
        out.push_str(&format!("/** {} */\n", entity.description));
    }
    out.push_str(&format!("export interface {} {{\n", entity.name));
    for property in &entity.properties {
        let marker = if property.required { "" } else { "?" };
        out.push_str(&format!(
            "  {}{}: {};\n",
            property.name,
            marker,
            types.resolve(property)
        ));
    }
    for relationship in &entity.relationships {
        match relationship.cardinality {
            Cardinality::ToMany => out.push_str(&format!(
                "  {}: {}[];\n",
                relationship.name, relationship.target_entity
            )),
            Cardinality::ToOne => out.push_str(&format!(
                "  {}: {};\n",
                relationship.name, relationship.target_entity
            )),
        }
    }
    out.push_str("}\n\n");
    out
}
