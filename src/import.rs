//! Source import
//!
//! Converts one of two textual input shapes into a [`DomainModel`]:
//!
//! - a schema document carrying `components.schemas` (OpenAPI-like type
//!   descriptors), or
//! - a domain description carrying explicit `entities` and `operations`.
//!
//! Import is tolerant: malformed entries are skipped with a recorded
//! warning and the rest of the document is still compiled. Only a missing
//! top-level container is fatal. Unknown type strings resolve to the
//! untyped marker so emission can still produce a best-effort artifact.

use std::collections::HashSet;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{CompileError, Result};
use crate::model::{
    Cardinality, DomainModel, Entity, Operation, OperationKind, OperationOutput, Property,
    PropertyType, Relationship,
};
use crate::report::Warning;

/// Outcome of a successful import: the model plus recoverable findings
#[derive(Debug)]
pub struct Imported {
    pub model: DomainModel,
    pub warnings: Vec<Warning>,
}

/// Read and parse a source document from disk.
pub fn load_document(path: &Path) -> anyhow::Result<Value> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
    let doc = serde_json::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("Failed to parse JSON in {}: {}", path.display(), e))?;
    Ok(doc)
}

/// Import a source document, auto-detecting its variant.
///
/// A top-level `entities` key selects the domain-description shape;
/// anything else is treated as a schema document and must carry
/// `components.schemas`.
pub fn import(doc: &Value) -> Result<Imported> {
    if doc.get("entities").is_some() {
        import_domain_description(doc)
    } else {
        import_schema_document(doc)
    }
}

// =============================================================================
// Variant A: schema document
// =============================================================================

/// Import an OpenAPI-like schema document.
///
/// Only descriptors with `type == "object"` and a non-empty `properties`
/// mapping become entities; every other descriptor is skipped with a
/// warning. Schema documents carry no operations.
pub fn import_schema_document(doc: &Value) -> Result<Imported> {
    let schemas = doc
        .get("components")
        .and_then(|c| c.get("schemas"))
        .and_then(Value::as_object)
        .ok_or(CompileError::MissingContainer {
            container: "components.schemas",
        })?;

    let mut warnings = Vec::new();
    let mut entities = Vec::new();
    let mut seen = HashSet::new();

    for (name, descriptor) in schemas {
        if !seen.insert(name.clone()) {
            record(
                &mut warnings,
                Warning::skipped(name, "duplicate entity name"),
            );
            continue;
        }
        if let Some(entity) = entity_from_descriptor(name, descriptor, &mut warnings) {
            debug!(entity = %entity.name, properties = entity.properties.len(), "imported entity");
            entities.push(entity);
        }
    }

    Ok(Imported {
        model: DomainModel {
            entities,
            operations: Vec::new(),
        },
        warnings,
    })
}

fn entity_from_descriptor(
    name: &str,
    descriptor: &Value,
    warnings: &mut Vec<Warning>,
) -> Option<Entity> {
    let is_object = descriptor.get("type").and_then(Value::as_str) == Some("object");
    let properties = descriptor.get("properties").and_then(Value::as_object);
    let properties = match (is_object, properties) {
        (true, Some(props)) if !props.is_empty() => props,
        _ => {
            record(
                warnings,
                Warning::skipped(name, "descriptor is not an object schema with properties"),
            );
            return None;
        }
    };

    let required: HashSet<&str> = descriptor
        .get("required")
        .and_then(Value::as_array)
        .map(|list| list.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let mut parsed = Vec::new();
    let mut seen = HashSet::new();
    for (prop_name, prop_descriptor) in properties {
        let context = format!("{}.{}", name, prop_name);
        if !seen.insert(prop_name.clone()) {
            record(warnings, Warning::skipped(&context, "duplicate property name"));
            continue;
        }
        let Some((ty, format)) = property_type_from_descriptor(&context, prop_descriptor, warnings)
        else {
            continue;
        };
        parsed.push(Property {
            name: prop_name.clone(),
            ty,
            required: required.contains(prop_name.as_str()),
            is_key: false,
            format,
        });
    }
    ensure_key(&mut parsed);

    Some(Entity {
        name: name.to_string(),
        description: descriptor
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        properties: parsed,
        relationships: Vec::new(),
        rules: Vec::new(),
    })
}

/// Resolve one property descriptor to a model type plus format hint.
///
/// Returns `None` only for descriptors with no usable type at all; those
/// are skipped. Unknown type strings resolve to `Untyped` with a warning.
fn property_type_from_descriptor(
    context: &str,
    descriptor: &Value,
    warnings: &mut Vec<Warning>,
) -> Option<(PropertyType, Option<String>)> {
    if let Some(target) = descriptor.get("$ref").and_then(Value::as_str) {
        let entity = target.rsplit('/').next().unwrap_or(target).to_string();
        return Some((PropertyType::Reference { entity }, None));
    }

    let Some(type_name) = descriptor.get("type").and_then(Value::as_str) else {
        record(warnings, Warning::skipped(context, "property has no type"));
        return None;
    };
    let format = descriptor.get("format").and_then(Value::as_str);

    let ty = match (type_name, format) {
        ("string", Some("date")) => PropertyType::Date,
        ("string", Some("date-time")) => PropertyType::DateTime,
        ("string", _) => {
            if let Some(values) = descriptor.get("enum").and_then(Value::as_array) {
                PropertyType::Enum {
                    values: values
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect(),
                }
            } else {
                return Some((
                    PropertyType::String,
                    format.map(str::to_string),
                ));
            }
        }
        ("integer", _) => PropertyType::Integer,
        ("number", _) => PropertyType::Number,
        ("boolean", _) => PropertyType::Boolean,
        ("array", _) => {
            let item = match descriptor.get("items") {
                Some(items) => match property_type_from_descriptor(context, items, warnings) {
                    Some((ty, _)) => ty,
                    None => PropertyType::Untyped,
                },
                None => {
                    record(
                        warnings,
                        Warning::unknown_type(context, "array items carry no type"),
                    );
                    PropertyType::Untyped
                }
            };
            PropertyType::ArrayOf {
                item: Box::new(item),
            }
        }
        (other, _) => {
            record(
                warnings,
                Warning::unknown_type(context, format!("unsupported type \"{}\"", other)),
            );
            PropertyType::Untyped
        }
    };
    Some((ty, None))
}

// =============================================================================
// Variant B: domain description
// =============================================================================

/// Import an explicit domain description (`entities` + `operations`).
pub fn import_domain_description(doc: &Value) -> Result<Imported> {
    let entity_docs = doc
        .get("entities")
        .ok_or(CompileError::MissingContainer {
            container: "entities",
        })?
        .as_array()
        .ok_or_else(|| CompileError::InvalidDocument("entities is not an array".to_string()))?;

    let mut warnings = Vec::new();
    let mut entities = Vec::new();
    let mut seen = HashSet::new();

    for entity_doc in entity_docs {
        let Some(entity) = entity_from_doc(entity_doc, &mut warnings) else {
            continue;
        };
        if !seen.insert(entity.name.clone()) {
            record(
                &mut warnings,
                Warning::skipped(&entity.name, "duplicate entity name"),
            );
            continue;
        }
        debug!(entity = %entity.name, properties = entity.properties.len(), "imported entity");
        entities.push(entity);
    }

    let mut operations = Vec::new();
    if let Some(operation_docs) = doc.get("operations").and_then(Value::as_array) {
        for operation_doc in operation_docs {
            if let Some(operation) = operation_from_doc(operation_doc, &entities, &mut warnings) {
                operations.push(operation);
            }
        }
    }

    Ok(Imported {
        model: DomainModel {
            entities,
            operations,
        },
        warnings,
    })
}

fn entity_from_doc(doc: &Value, warnings: &mut Vec<Warning>) -> Option<Entity> {
    let Some(name) = doc.get("name").and_then(Value::as_str) else {
        record(warnings, Warning::skipped("<entity>", "entity has no name"));
        return None;
    };

    let mut properties = Vec::new();
    let mut seen = HashSet::new();
    if let Some(property_docs) = doc.get("properties").and_then(Value::as_array) {
        for property_doc in property_docs {
            let Some(prop_name) = property_doc.get("name").and_then(Value::as_str) else {
                record(
                    warnings,
                    Warning::skipped(name, "property entry has no name"),
                );
                continue;
            };
            let context = format!("{}.{}", name, prop_name);
            if !seen.insert(prop_name.to_string()) {
                record(warnings, Warning::skipped(&context, "duplicate property name"));
                continue;
            }
            let Some(type_name) = property_doc.get("type").and_then(Value::as_str) else {
                record(warnings, Warning::skipped(&context, "property has no type"));
                continue;
            };
            let ty = property_type_from_name(&context, type_name, property_doc, warnings);
            properties.push(Property {
                name: prop_name.to_string(),
                ty,
                required: property_doc
                    .get("required")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
                is_key: property_doc
                    .get("isKey")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
                format: property_doc
                    .get("format")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            });
        }
    }
    ensure_key(&mut properties);

    let mut relationships = Vec::new();
    if let Some(relationship_docs) = doc.get("relationships").and_then(Value::as_array) {
        for relationship_doc in relationship_docs {
            if let Some(relationship) = relationship_from_doc(name, relationship_doc, warnings) {
                relationships.push(relationship);
            }
        }
    }

    Some(Entity {
        name: name.to_string(),
        description: doc
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        properties,
        relationships,
        rules: doc
            .get("rules")
            .and_then(Value::as_array)
            .map(|rules| {
                rules
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
    })
}

fn property_type_from_name(
    context: &str,
    type_name: &str,
    property_doc: &Value,
    warnings: &mut Vec<Warning>,
) -> PropertyType {
    match type_name.to_ascii_lowercase().as_str() {
        "string" => PropertyType::String,
        "integer" => PropertyType::Integer,
        "number" | "decimal" => PropertyType::Number,
        "boolean" => PropertyType::Boolean,
        "date" | "plaindate" => PropertyType::Date,
        "datetime" | "date-time" | "utcdatetime" => PropertyType::DateTime,
        "enum" => match property_doc.get("enumValues").and_then(Value::as_array) {
            Some(values) if !values.is_empty() => PropertyType::Enum {
                values: values
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
            },
            _ => {
                record(
                    warnings,
                    Warning::unknown_type(context, "enum declares no values"),
                );
                PropertyType::Untyped
            }
        },
        "array" => {
            record(
                warnings,
                Warning::unknown_type(context, "array items carry no type"),
            );
            PropertyType::ArrayOf {
                item: Box::new(PropertyType::Untyped),
            }
        }
        other => {
            record(
                warnings,
                Warning::unknown_type(context, format!("unsupported type \"{}\"", other)),
            );
            PropertyType::Untyped
        }
    }
}

fn relationship_from_doc(
    entity: &str,
    doc: &Value,
    warnings: &mut Vec<Warning>,
) -> Option<Relationship> {
    let name = doc.get("name").and_then(Value::as_str);
    let target = doc.get("targetEntity").and_then(Value::as_str);
    let (Some(name), Some(target)) = (name, target) else {
        record(
            warnings,
            Warning::skipped(entity, "relationship entry has no name or target"),
        );
        return None;
    };
    let context = format!("{}.{}", entity, name);
    let cardinality = match doc
        .get("type")
        .and_then(Value::as_str)
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("toone" | "to_one" | "one") => Cardinality::ToOne,
        Some("tomany" | "to_many" | "many") => Cardinality::ToMany,
        other => {
            record(
                warnings,
                Warning::skipped(
                    &context,
                    format!("unknown relationship cardinality {:?}", other.unwrap_or("")),
                ),
            );
            return None;
        }
    };
    Some(Relationship {
        name: name.to_string(),
        target_entity: target.to_string(),
        cardinality,
    })
}

fn operation_from_doc(
    doc: &Value,
    entities: &[Entity],
    warnings: &mut Vec<Warning>,
) -> Option<Operation> {
    let Some(name) = doc.get("name").and_then(Value::as_str) else {
        record(
            warnings,
            Warning::skipped("<operation>", "operation has no name"),
        );
        return None;
    };
    let Some(kind) = doc
        .get("type")
        .and_then(Value::as_str)
        .and_then(OperationKind::parse)
    else {
        record(warnings, Warning::skipped(name, "unknown operation kind"));
        return None;
    };
    let Some(entity) = doc.get("entity").and_then(Value::as_str) else {
        record(warnings, Warning::skipped(name, "operation has no entity"));
        return None;
    };
    if !entities.iter().any(|e| e.name == entity) {
        record(
            warnings,
            Warning::skipped(
                name,
                format!("operation references undeclared entity {}", entity),
            ),
        );
        return None;
    }

    Some(Operation {
        name: name.to_string(),
        description: doc
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        kind,
        entity: entity.to_string(),
        inputs: doc
            .get("inputs")
            .and_then(Value::as_array)
            .map(|inputs| {
                inputs
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        output: doc
            .get("output")
            .and_then(Value::as_str)
            .map(OperationOutput::parse)
            .unwrap_or(OperationOutput::Void),
        rule: doc
            .get("rule")
            .and_then(Value::as_str)
            .filter(|r| !r.is_empty())
            .map(str::to_string),
    })
}

// =============================================================================
// Shared
// =============================================================================

/// Every entity carries exactly one key. A declared `id` is promoted; if
/// none exists and no property is flagged as key, the implicit `id` is
/// prepended.
fn ensure_key(properties: &mut Vec<Property>) {
    if properties.iter().any(|p| p.is_key) {
        return;
    }
    if let Some(id) = properties.iter_mut().find(|p| p.name == "id") {
        id.is_key = true;
        return;
    }
    properties.insert(0, Property::implicit_key());
}

fn record(warnings: &mut Vec<Warning>, warning: Warning) {
    warn!(code = warning.kind.code(), context = %warning.context, "{}", warning.message);
    warnings.push(warning);
}
