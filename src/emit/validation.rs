//! Validation backend
//!
//! Emits one Zod object validator per entity. Optional properties are
//! wrapped with `.optional()`, enums become enumerated-membership
//! validators, and recognized format hints refine the string validator.

use crate::model::{DomainModel, Entity};

use super::{Backend, TypeMap};

pub fn backend() -> Backend {
    Backend {
        name: "validation",
        file_name: "validators.ts",
        types: TypeMap {
            string: "z.string()",
            integer: "z.number().int()",
            number: "z.number()",
            boolean: "z.boolean()",
            date: "z.coerce.date()",
            datetime: "z.coerce.date()",
            uuid: Some("z.string().uuid()"),
            email: Some("z.string().email()"),
            untyped: "z.unknown()",
            array_of: |item| format!("z.array({})", item),
            reference: |_| "z.string()".to_string(),
            enumeration: |values| {
                let quoted: Vec<String> = values.iter().map(|v| format!("\"{}\"", v)).collect();
                format!("z.enum([{}])", quoted.join(", "))
            },
        },
        header,
        entity,
    }
}

fn header(_model: &DomainModel) -> String {
    let mut out = String::new();
    out.push_str("// Generated by domainforge - DO NOT EDIT\n");
    out.push_str("import { z } from \"zod\";\n\n");
    out
}

fn entity(entity: &Entity, _model: &DomainModel, types: &TypeMap) -> String {
    let mut out = String::new();
    for rule in &entity.rules {
        out.push_str(&format!("// rule: {}\n", rule));
    }
    out.push_str(&format!("export const {}Schema = z.object({{\n", entity.name));
    for property in &entity.properties {
        let mut validator = types.resolve(property);
        if !property.required {
            validator.push_str(".optional()");
        }
        out.push_str(&format!("  {}: {},\n", property.name, validator));
    }
    out.push_str("});\n\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::render;
    use crate::model::{DomainModel, Property, PropertyType};

    fn entity_with(properties: Vec<Property>) -> DomainModel {
        DomainModel {
            entities: vec![Entity {
                name: "Book".to_string(),
                description: String::new(),
                properties,
                relationships: Vec::new(),
                rules: Vec::new(),
            }],
            operations: Vec::new(),
        }
    }

    #[test]
    fn test_object_validator() {
        let model = entity_with(vec![
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
        ]);
        let artifact = render(&model, &backend());
        assert!(artifact.contents.contains("export const BookSchema = z.object({"));
        assert!(artifact.contents.contains("  title: z.string(),\n"));
        assert!(artifact.contents.contains("  quantity: z.number().int(),\n"));
    }

    #[test]
    fn test_optional_wrapping() {
        let model = entity_with(vec![Property {
            name: "subtitle".to_string(),
            ty: PropertyType::String,
            required: false,
            is_key: false,
            format: None,
        }]);
        let artifact = render(&model, &backend());
        assert!(artifact.contents.contains("subtitle: z.string().optional()"));
    }

    #[test]
    fn test_enum_membership() {
        let model = entity_with(vec![Property {
            name: "status".to_string(),
            ty: PropertyType::Enum {
                values: vec!["draft".to_string(), "published".to_string()],
            },
            required: true,
            is_key: false,
            format: None,
        }]);
        let artifact = render(&model, &backend());
        assert!(artifact
            .contents
            .contains("status: z.enum([\"draft\", \"published\"])"));
    }

    #[test]
    fn test_format_refinements() {
        let model = entity_with(vec![
            Property {
                name: "email".to_string(),
                ty: PropertyType::String,
                required: true,
                is_key: false,
                format: Some("email".to_string()),
            },
            Property {
                name: "phone".to_string(),
                ty: PropertyType::String,
                required: true,
                is_key: false,
                format: Some("phone".to_string()),
            },
        ]);
        let artifact = render(&model, &backend());
        assert!(artifact.contents.contains("email: z.string().email()"));
        // unrecognized hint falls back to the plain string validator
        assert!(artifact.contents.contains("phone: z.string(),"));
    }

    #[test]
    fn test_untyped_array_fallback() {
        let model = entity_with(vec![Property {
            name: "attachments".to_string(),
            ty: PropertyType::ArrayOf {
                item: Box::new(PropertyType::Untyped),
            },
            required: false,
            is_key: false,
            format: None,
        }]);
        let artifact = render(&model, &backend());
        assert!(artifact
            .contents
            .contains("attachments: z.array(z.unknown()).optional()"));
    }
}
