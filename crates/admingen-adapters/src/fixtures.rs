//! Built-in demo schemas.
//!
//! A small relational shape exercising every cardinality the generator
//! handles: a self-referential hierarchy (Category), a many-to-one
//! (Order → Customer), and a many-to-many (Post ↔ Tag via PostTag).
//! The CLI demo mode generates from these; tests lean on them too.

use admingen_core::domain::{ColumnInfo, ColumnType, NavigationProperty, TableSchema};

/// All demo schemas, in a stable order.
pub fn demo_schemas() -> Vec<TableSchema> {
    vec![category(), customer(), order(), post(), tag()]
}

fn category() -> TableSchema {
    TableSchema::builder("Category")
        .comment("Product categories")
        .column(ColumnInfo::new("Id", ColumnType::Integer).identity().primary())
        .column(ColumnInfo::new("Name", ColumnType::Text).comment("Category name"))
        .column(ColumnInfo::new("ParentId", ColumnType::Integer).nullable())
        .navigation(NavigationProperty::reference(
            "Parent",
            "Category",
            vec!["ParentId".into()],
            vec!["Id".into()],
        ))
        .navigation(NavigationProperty::collection("Children", "Category"))
        .build()
        .expect("demo schema Category must be valid")
}

fn customer() -> TableSchema {
    TableSchema::builder("Customer")
        .comment("Customers")
        .column(ColumnInfo::new("Id", ColumnType::Integer).identity().primary())
        .column(ColumnInfo::new("Name", ColumnType::Text).comment("Display name"))
        .column(ColumnInfo::new("Email", ColumnType::Text))
        .column(ColumnInfo::new("Active", ColumnType::Bool))
        .column(ColumnInfo::new("create_time", ColumnType::DateTime))
        .navigation(NavigationProperty::collection("Orders", "Order"))
        .build()
        .expect("demo schema Customer must be valid")
}

fn order() -> TableSchema {
    TableSchema::builder("Order")
        .comment("Customer orders")
        .column(ColumnInfo::new("Id", ColumnType::Integer).identity().primary())
        .column(ColumnInfo::new("No", ColumnType::Text).comment("Order number"))
        .column(ColumnInfo::new("Amount", ColumnType::Decimal))
        .column(ColumnInfo::new("CustomerId", ColumnType::Integer).nullable())
        .column(ColumnInfo::new("create_time", ColumnType::DateTime))
        .navigation(NavigationProperty::reference(
            "Customer",
            "Customer",
            vec!["CustomerId".into()],
            vec!["Id".into()],
        ))
        .build()
        .expect("demo schema Order must be valid")
}

fn post() -> TableSchema {
    TableSchema::builder("Post")
        .comment("Blog posts")
        .column(ColumnInfo::new("Id", ColumnType::Integer).identity().primary())
        .column(ColumnInfo::new("Title", ColumnType::Text))
        .column(ColumnInfo::new("Content", ColumnType::Text))
        .navigation(NavigationProperty::many_to_many(
            "Tags",
            "Tag",
            "PostTag",
            vec!["Id".into()],
        ))
        .build()
        .expect("demo schema Post must be valid")
}

fn tag() -> TableSchema {
    TableSchema::builder("Tag")
        .comment("Post tags")
        .column(ColumnInfo::new("Id", ColumnType::Integer).identity().primary())
        .column(ColumnInfo::new("Name", ColumnType::Text))
        .navigation(NavigationProperty::many_to_many(
            "Posts",
            "Post",
            "PostTag",
            vec!["Id".into()],
        ))
        .build()
        .expect("demo schema Tag must be valid")
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_demo_schemas_validate() {
        for schema in demo_schemas() {
            schema.validate().unwrap();
        }
    }

    #[test]
    fn demo_set_covers_every_cardinality() {
        let schemas = demo_schemas();
        let category = schemas.iter().find(|s| s.name == "Category").unwrap();
        assert_eq!(category.navigations[0].target, "Category"); // self-ref
        let order = schemas.iter().find(|s| s.name == "Order").unwrap();
        assert!(!order.navigations[0].local_columns.is_empty()); // many-to-one
        let post = schemas.iter().find(|s| s.name == "Post").unwrap();
        assert!(post.navigations[0].join_entity.is_some()); // many-to-many
    }
}
