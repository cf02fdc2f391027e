//! Naming engine
//!
//! Deterministic name transforms shared by every backend. Collection,
//! table, and route names all derive from the single [`pluralize`]
//! function, so the emitters cannot disagree about what an entity's
//! collection is called.
//!
//! Pluralization is deliberately naive: lowercase plus a trailing "s".
//! Irregular plurals would need a richer rule set applied identically in
//! every backend; until then the simplification stays.

/// Collection name of an entity: `Book` -> `books`
pub fn pluralize(entity: &str) -> String {
    format!("{}s", entity.to_lowercase())
}

/// Route segment of an entity's collection: `Book` -> `/books`
pub fn route_segment(entity: &str) -> String {
    format!("/{}", pluralize(entity))
}

/// Relational table name of an entity: `Book` -> `books`
pub fn table_name(entity: &str) -> String {
    pluralize(entity)
}

/// Lower the first character: `OrderItem` -> `orderItem`
pub fn lower_camel(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}

/// Foreign-key column for a name: `Order` -> `orderId`, `owner` -> `ownerId`
pub fn foreign_key(name: &str) -> String {
    format!("{}Id", lower_camel(name))
}

/// Join table realizing a to-many relationship:
/// (`Order`, `items`) -> `order_items`
pub fn join_table(owner: &str, relationship: &str) -> String {
    format!("{}_{}", owner.to_lowercase(), relationship)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("Book"), "books");
        assert_eq!(pluralize("Address"), "addresss"); // known simplification
    }

    #[test]
    fn test_derived_names_agree() {
        for entity in ["Book", "User", "OrderItem"] {
            let collection = pluralize(entity);
            assert_eq!(route_segment(entity), format!("/{}", collection));
            assert_eq!(table_name(entity), collection);
        }
    }

    #[test]
    fn test_foreign_key() {
        assert_eq!(foreign_key("Order"), "orderId");
        assert_eq!(foreign_key("Album"), "albumId");
        assert_eq!(foreign_key("owner"), "ownerId");
    }

    #[test]
    fn test_join_table() {
        assert_eq!(join_table("Order", "items"), "order_items");
    }
}
