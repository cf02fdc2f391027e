//! Artifact emission
//!
//! Four independent backends consume the finished domain model and produce
//! one textual artifact each. A backend is a plain descriptor record (its
//! type map plus emit functions) fed through one generic [`render`] loop,
//! so declaration order is enforced in exactly one place: entity order in
//! the model, never sorted.
//!
//! Emitters are pure. They see only the validated model; every type they
//! can encounter resolves through a total [`TypeMap`], and anything the
//! importer could not recognize arrives as the untyped marker.

pub mod contract;
pub mod interface;
pub mod names;
pub mod relational;
pub mod validation;

use crate::checksum::Checksum;
use crate::model::{DomainModel, Entity, Property, PropertyType};

// =============================================================================
// Type map
// =============================================================================

/// Scalar vocabulary of one backend.
///
/// Total by construction: every [`PropertyType`] variant resolves to a
/// token, and unknown types land on the explicit fallback. Composite types
/// recurse through the backend's array/reference/enum constructs.
pub struct TypeMap {
    pub string: &'static str,
    pub integer: &'static str,
    pub number: &'static str,
    pub boolean: &'static str,
    pub date: &'static str,
    pub datetime: &'static str,
    /// Format refinements for string properties; `None` falls back to `string`
    pub uuid: Option<&'static str>,
    pub email: Option<&'static str>,
    /// Fallback token for unknown or unrepresentable types
    pub untyped: &'static str,
    pub array_of: fn(&str) -> String,
    pub reference: fn(&str) -> String,
    pub enumeration: fn(&[String]) -> String,
}

impl TypeMap {
    /// Map a property to this backend's type token. Never fails.
    pub fn resolve(&self, property: &Property) -> String {
        if let PropertyType::String = property.ty {
            match property.format.as_deref() {
                Some("uuid") => return self.uuid.unwrap_or(self.string).to_string(),
                Some("email") => return self.email.unwrap_or(self.string).to_string(),
                // unrecognized hints refine nothing
                _ => return self.string.to_string(),
            }
        }
        self.resolve_type(&property.ty)
    }

    /// Map a bare type (no format hint); array items recurse through here.
    pub fn resolve_type(&self, ty: &PropertyType) -> String {
        match ty {
            PropertyType::String => self.string.to_string(),
            PropertyType::Integer => self.integer.to_string(),
            PropertyType::Number => self.number.to_string(),
            PropertyType::Boolean => self.boolean.to_string(),
            PropertyType::Date => self.date.to_string(),
            PropertyType::DateTime => self.datetime.to_string(),
            PropertyType::Enum { values } => (self.enumeration)(values),
            PropertyType::ArrayOf { item } => (self.array_of)(&self.resolve_type(item)),
            PropertyType::Reference { entity } => (self.reference)(entity),
            PropertyType::Untyped => self.untyped.to_string(),
        }
    }
}

// =============================================================================
// Backend descriptor
// =============================================================================

/// One output backend: identity, target file, type map, and the emit
/// functions the generic driver composes.
pub struct Backend {
    pub name: &'static str,
    pub file_name: &'static str,
    pub types: TypeMap,
    /// Emitted once before any entity declaration
    pub header: fn(&DomainModel) -> String,
    /// One declaration per entity, invoked in model order
    pub entity: fn(&Entity, &DomainModel, &TypeMap) -> String,
}

/// All four backends, in emission order
pub fn backends() -> [Backend; 4] {
    [
        validation::backend(),
        relational::backend(),
        interface::backend(),
        contract::backend(),
    ]
}

// =============================================================================
// Artifact
// =============================================================================

/// A finished artifact: one self-contained text file plus its digest
#[derive(Debug, Clone)]
pub struct Artifact {
    pub backend: &'static str,
    pub file_name: &'static str,
    pub contents: String,
    pub checksum: Checksum,
}

/// Render one backend over the model. Declarations follow entity order.
pub fn render(model: &DomainModel, backend: &Backend) -> Artifact {
    let mut contents = (backend.header)(model);
    for entity in &model.entities {
        contents.push_str(&(backend.entity)(entity, model, &backend.types));
    }
    let checksum = Checksum::from_str(&contents);
    Artifact {
        backend: backend.name,
        file_name: backend.file_name,
        contents,
        checksum,
    }
}
