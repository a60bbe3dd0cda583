//! Neo4j schema initialization (constraints).

/// A uniqueness constraint on a label property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraint {
    pub label: &'static str,
    pub property: &'static str,
}

impl Constraint {
    /// Constraint name, e.g. `content_uuid`.
    pub fn name(&self) -> String {
        format!("{}_{}", self.label.to_lowercase(), self.property.to_lowercase())
    }

    /// Idempotent Cypher creating this constraint.
    pub fn cypher(&self) -> String {
        format!(
            "CREATE CONSTRAINT {} IF NOT EXISTS FOR (n:{}) REQUIRE n.{} IS UNIQUE",
            self.name(),
            self.label,
            self.property
        )
    }
}

/// Constraints the content writer relies on.
pub const CONTENT_CONSTRAINTS: &[Constraint] = &[Constraint {
    label: "Content",
    property: "uuid",
}];
