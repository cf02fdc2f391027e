//! Domain model types
//!
//! The canonical in-memory schema: entities, typed properties,
//! relationships, and operations. Built once per run by the importer,
//! immutable afterwards, consumed read-only by every emitter.

use serde::{Deserialize, Serialize};

/// Abstract type of a property, resolved once at import time.
///
/// Raw document shapes are validated into this tagged variant by the
/// importer; downstream code never re-inspects raw JSON. Source types the
/// importer cannot recognize collapse into [`PropertyType::Untyped`], which
/// every backend maps to its fallback token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PropertyType {
    String,
    Integer,
    Number,
    Boolean,
    Date,
    DateTime,
    Enum { values: Vec<String> },
    ArrayOf { item: Box<PropertyType> },
    Reference { entity: String },
    /// Fallback marker for unknown or unrepresentable source types
    Untyped,
}

impl PropertyType {
    /// The entity this type refers to, looking through arrays.
    pub fn referenced_entity(&self) -> Option<&str> {
        match self {
            PropertyType::Reference { entity } => Some(entity),
            PropertyType::ArrayOf { item } => item.referenced_entity(),
            _ => None,
        }
    }
}

/// A typed, optionally-required field of an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: PropertyType,
    pub required: bool,
    #[serde(default)]
    pub is_key: bool,
    /// Refinement hint for string properties (e.g. "uuid", "email")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Property {
    /// The implicit key property every entity carries: `id: string`.
    pub fn implicit_key() -> Self {
        Self {
            name: "id".to_string(),
            ty: PropertyType::String,
            required: true,
            is_key: true,
            format: None,
        }
    }
}

/// How many target instances a relationship links to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Cardinality {
    ToOne,
    ToMany,
}

/// A typed link between two entities.
///
/// The target must resolve to a declared entity; the orchestrator checks
/// this before any emitter runs. A `ToMany` relationship is realized in
/// relational output as a synthetic join table with two foreign keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub name: String,
    pub target_entity: String,
    pub cardinality: Cardinality,
}

/// A named record type with properties, relationships, and free-text rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique PascalCase identifier
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Declaration order is emission order in every backend
    pub properties: Vec<Property>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    /// Free-text rules, emitted as comments only
    #[serde(default)]
    pub rules: Vec<String>,
}

impl Entity {
    /// Look up a property by name
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// The key property. Always present: the importer prepends the
    /// implicit `id` when the source declares none.
    pub fn key_property(&self) -> Option<&Property> {
        self.properties.iter().find(|p| p.is_key)
    }

    /// Relationships of the given cardinality, in declaration order
    pub fn relationships_of(&self, cardinality: Cardinality) -> impl Iterator<Item = &Relationship> {
        self.relationships
            .iter()
            .filter(move |r| r.cardinality == cardinality)
    }
}

/// Kind of operation an entity exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Create,
    Get,
    List,
    Update,
    Delete,
}

impl OperationKind {
    /// Parse a source-document kind string. Unknown kinds return `None`
    /// and the entry is skipped with a warning.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "create" => Some(OperationKind::Create),
            "get" => Some(OperationKind::Get),
            "list" => Some(OperationKind::List),
            "update" => Some(OperationKind::Update),
            "delete" => Some(OperationKind::Delete),
            _ => None,
        }
    }
}

/// What an operation returns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum OperationOutput {
    Void,
    One { entity: String },
    Many { entity: String },
}

impl OperationOutput {
    /// Parse the source grammar: `"void"`, `"Entity"`, or `"Entity[]"`.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("void") {
            OperationOutput::Void
        } else if let Some(entity) = s.strip_suffix("[]") {
            OperationOutput::Many {
                entity: entity.to_string(),
            }
        } else {
            OperationOutput::One {
                entity: s.to_string(),
            }
        }
    }
}

/// An operation an entity exposes through the API contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub kind: OperationKind,
    /// Owning entity name
    pub entity: String,
    /// Ordered parameter descriptors
    #[serde(default)]
    pub inputs: Vec<String>,
    pub output: OperationOutput,
    /// Free-text rule annotation, emitted as a trailing comment only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
}

/// The compiled domain model.
///
/// Entity and operation order follow the source document; every emitter
/// declares in this order, never sorted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DomainModel {
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub operations: Vec<Operation>,
}

impl DomainModel {
    /// Look up an entity by name
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Whether an entity with this name is declared
    pub fn contains_entity(&self, name: &str) -> bool {
        self.entity(name).is_some()
    }

    /// Operations owned by the given entity, in declaration order
    pub fn operations_for<'a>(&'a self, entity: &'a str) -> impl Iterator<Item = &'a Operation> + 'a {
        self.operations.iter().filter(move |o| o.entity == entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> Entity {
        Entity {
            name: "Book".to_string(),
            description: "A book in stock".to_string(),
            properties: vec![
                Property::implicit_key(),
                Property {
                    name: "title".to_string(),
                    ty: PropertyType::String,
                    required: true,
                    is_key: false,
                    format: None,
                },
            ],
            relationships: Vec::new(),
            rules: Vec::new(),
        }
    }

    #[test]
    fn test_key_property() {
        let entity = book();
        let key = entity.key_property().unwrap();
        assert_eq!(key.name, "id");
        assert_eq!(key.ty, PropertyType::String);
        assert!(key.required);
    }

    #[test]
    fn test_entity_lookup() {
        let model = DomainModel {
            entities: vec![book()],
            operations: Vec::new(),
        };
        assert!(model.contains_entity("Book"));
        assert!(!model.contains_entity("Ghost"));
    }

    #[test]
    fn test_operation_output_parse() {
        assert_eq!(OperationOutput::parse("void"), OperationOutput::Void);
        assert_eq!(
            OperationOutput::parse("Book"),
            OperationOutput::One {
                entity: "Book".to_string()
            }
        );
        assert_eq!(
            OperationOutput::parse("Book[]"),
            OperationOutput::Many {
                entity: "Book".to_string()
            }
        );
        assert_eq!(OperationOutput::parse(""), OperationOutput::Void);
    }

    #[test]
    fn test_operation_kind_parse() {
        assert_eq!(OperationKind::parse("Create"), Some(OperationKind::Create));
        assert_eq!(OperationKind::parse("LIST"), Some(OperationKind::List));
        assert_eq!(OperationKind::parse("upsert"), None);
    }

    #[test]
    fn test_referenced_entity_through_arrays() {
        let ty = PropertyType::ArrayOf {
            item: Box::new(PropertyType::Reference {
                entity: "Album".to_string(),
            }),
        };
        assert_eq!(ty.referenced_entity(), Some("Album"));
        assert_eq!(PropertyType::String.referenced_entity(), None);
    }
}
