//! API-contract backend
//!
//! Emits a TypeSpec-style contract: a service preamble, a shared error
//! shape, and per entity a model declaration plus one route group at its
//! collection segment. Every operation owned by the entity becomes a
//! route handler signature with the status codes of its kind; non-list
//! successes are paired with the shared error shape on the 404 branch.
//! Rule annotations become trailing comments, never anything executable.

use crate::model::{DomainModel, Entity, Operation, OperationKind};

use super::names::{lower_camel, route_segment};
use super::{Backend, TypeMap};

pub fn backend() -> Backend {
    Backend {
        name: "contract",
        file_name: "api.tsp",
        types: TypeMap {
            string: "string",
            integer: "int32",
            number: "float64",
            boolean: "boolean",
            date: "plainDate",
            datetime: "utcDateTime",
            uuid: None,
            email: None,
            untyped: "unknown",
            array_of: |item| format!("{}[]", item),
            reference: |_| "string".to_string(),
            enumeration: |_| "string".to_string(),
        },
        header,
        entity,
    }
}

fn header(_model: &DomainModel) -> String {
    let mut out = String::new();
    out.push_str("// Generated by domainforge - DO NOT EDIT\n");
    out.push_str("namespace Domain;\n\n");
    out.push_str("@doc(\"Generated API contract\")\n");
    out.push_str("service DomainService {\n");
    out.push_str("  host: \"api.example.com\";\n");
    out.push_str("  version: \"1.0.0\";\n");
    out.push_str("}\n\n");
    out.push_str("model ErrorResponse {\n");
    out.push_str("  message: string;\n");
    out.push_str("  code?: string;\n");
    out.push_str("}\n\n");
    out
}

fn entity(entity: &Entity, model: &DomainModel, types: &TypeMap) -> String {
    let mut out = String::new();
    out.push_str(&format!("model {} {{\n", entity.name));
    for property in &entity.properties {
        let marker = if property.required { "" } else { "?" };
        out.push_str(&format!(
            "  {}{}: {};\n",
            property.name,
            marker,
            types.resolve(property)
        ));
    }
    out.push_str("}\n\n");

    out.push_str(&format!("@route(\"{}\")\n", route_segment(&entity.name)));
    out.push_str(&format!("interface {}Operations {{\n", entity.name));
    let mut first = true;
    for operation in model.operations_for(&entity.name) {
        if !first {
            out.push('\n');
        }
        first = false;
        out.push_str(&operation_block(operation, entity, types));
    }
    out.push_str("}\n\n");
    out
}

fn operation_block(operation: &Operation, entity: &Entity, types: &TypeMap) -> String {
    let mut out = String::new();
    if !operation.description.is_empty() {
        out.push_str(&format!("  @doc(\"{}\")\n", operation.description));
    }
    let body_param = lower_camel(&entity.name);
    match operation.kind {
        OperationKind::Create => {
            out.push_str("  @post\n");
            out.push_str(&format!(
                "  create(@body {}: {}): {{\n",
                body_param,
                create_body(entity, types)
            ));
            out.push_str("    @statusCode statusCode: 201;\n");
            out.push_str(&format!("    @body created: {};\n", entity.name));
            out.push_str("  } | ");
            out.push_str(ERROR_BRANCH);
        }
        OperationKind::List => {
            out.push_str("  @get\n");
            out.push_str(&format!("  list(): {}[];\n", entity.name));
        }
        OperationKind::Get => {
            out.push_str("  @get\n");
            out.push_str("  @route(\"/{id}\")\n");
            out.push_str("  get(@path id: string): {\n");
            out.push_str("    @statusCode statusCode: 200;\n");
            out.push_str(&format!("    @body {}: {};\n", body_param, entity.name));
            out.push_str("  } | ");
            out.push_str(ERROR_BRANCH);
        }
        OperationKind::Update => {
            out.push_str("  @put\n");
            out.push_str("  @route(\"/{id}\")\n");
            out.push_str(&format!(
                "  update(@path id: string, @body {}: {}): {{\n",
                body_param, entity.name
            ));
            out.push_str("    @statusCode statusCode: 200;\n");
            out.push_str(&format!("    @body updated: {};\n", entity.name));
            out.push_str("  } | ");
            out.push_str(ERROR_BRANCH);
        }
        OperationKind::Delete => {
            out.push_str("  @delete\n");
            out.push_str("  @route(\"/{id}\")\n");
            out.push_str("  delete(@path id: string): {\n");
            out.push_str("    @statusCode statusCode: 204;\n");
            out.push_str("  } | ");
            out.push_str(ERROR_BRANCH);
        }
    }
    if let Some(rule) = &operation.rule {
        out.push_str(&format!("  // rule: {}\n", rule));
    }
    out
}

const ERROR_BRANCH: &str =
    "{\n    @statusCode statusCode: 404;\n    @body error: ErrorResponse;\n  };\n";

/// Inline body model for create: the required non-key properties. Falls
/// back to the entity model when nothing qualifies.
fn create_body(entity: &Entity, types: &TypeMap) -> String {
    let fields: Vec<String> = entity
        .properties
        .iter()
        .filter(|p| p.required && !p.is_key)
        .map(|p| format!("    {}: {};", p.name, types.resolve(p)))
        .collect();
    if fields.is_empty() {
        return entity.name.clone();
    }
    format!("{{\n{}\n  }}", fields.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::render;
    use crate::model::{DomainModel, OperationOutput, Property, PropertyType};

    fn bookshop() -> DomainModel {
        DomainModel {
            entities: vec![Entity {
                name: "Book".to_string(),
                description: String::new(),
                properties: vec![
                    Property::implicit_key(),
                    Property {
                        name: "title".to_string(),
                        ty: PropertyType::String,
                        required: true,
                        is_key: false,
                        format: None,
                    },
                    Property {
                        name: "quantity".to_string(),
                        ty: PropertyType::Integer,
                        required: true,
                        is_key: false,
                        format: None,
                    },
                ],
                relationships: Vec::new(),
                rules: Vec::new(),
            }],
            operations: vec![
                Operation {
                    name: "Add a book".to_string(),
                    description: "Adds a new book".to_string(),
                    kind: OperationKind::Create,
                    entity: "Book".to_string(),
                    inputs: vec!["title".to_string(), "quantity".to_string()],
                    output: OperationOutput::One {
                        entity: "Book".to_string(),
                    },
                    rule: Some("only admins".to_string()),
                },
                Operation {
                    name: "View inventory".to_string(),
                    description: String::new(),
                    kind: OperationKind::List,
                    entity: "Book".to_string(),
                    inputs: Vec::new(),
                    output: OperationOutput::Many {
                        entity: "Book".to_string(),
                    },
                    rule: None,
                },
                Operation {
                    name: "Remove a book".to_string(),
                    description: String::new(),
                    kind: OperationKind::Delete,
                    entity: "Book".to_string(),
                    inputs: vec!["id".to_string()],
                    output: OperationOutput::Void,
                    rule: None,
                },
            ],
        }
    }

    #[test]
    fn test_entity_model_declared() {
        let artifact = render(&bookshop(), &backend());
        assert!(artifact.contents.contains("model Book {\n"));
        assert!(artifact.contents.contains("  id: string;\n"));
        assert!(artifact.contents.contains("  quantity: int32;\n"));
        // the model precedes its route group
        let model_at = artifact.contents.find("model Book {").unwrap();
        let route_at = artifact.contents.find("@route(\"/books\")").unwrap();
        assert!(model_at < route_at);
    }

    #[test]
    fn test_route_group_and_verbs() {
        let artifact = render(&bookshop(), &backend());
        assert!(artifact.contents.contains("@route(\"/books\")\n"));
        assert!(artifact.contents.contains("interface BookOperations {\n"));
        assert!(artifact.contents.contains("  @post\n"));
        assert!(artifact.contents.contains("  list(): Book[];\n"));
        assert!(artifact.contents.contains("  @delete\n"));
    }

    #[test]
    fn test_create_body_lists_required_fields() {
        let artifact = render(&bookshop(), &backend());
        assert!(artifact.contents.contains("create(@body book: {\n"));
        assert!(artifact.contents.contains("    title: string;\n"));
        assert!(artifact.contents.contains("    quantity: int32;\n"));
        assert!(artifact.contents.contains("@statusCode statusCode: 201;\n"));
    }

    #[test]
    fn test_delete_statuses() {
        let artifact = render(&bookshop(), &backend());
        assert!(artifact.contents.contains("@statusCode statusCode: 204;\n"));
        assert!(artifact.contents.contains("@statusCode statusCode: 404;\n"));
        assert!(artifact.contents.contains("@body error: ErrorResponse;\n"));
    }

    #[test]
    fn test_rule_is_comment_only() {
        let artifact = render(&bookshop(), &backend());
        assert!(artifact.contents.contains("  // rule: only admins\n"));
    }

    #[test]
    fn test_error_shape_declared_once() {
        let artifact = render(&bookshop(), &backend());
        assert_eq!(artifact.contents.matches("model ErrorResponse {").count(), 1);
    }

    #[test]
    fn test_entity_without_operations_still_gets_group() {
        let mut model = bookshop();
        model.operations.clear();
        let artifact = render(&model, &backend());
        assert!(artifact
            .contents
            .contains("@route(\"/books\")\ninterface BookOperations {\n}\n"));
    }
}
