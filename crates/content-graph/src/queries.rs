//! Cypher statements for content nodes.
//!
//! Relationship model:
//! - (:Thing)-[:IS_CURATED_FOR]->(:Content)   story package curates content
//! - (:Content)-[:CONTAINS]->(:Thing)         content sits in a content package

use content_core::content::PropertyMap;

use crate::store::{Param, Statement, NODES_DELETED_COLUMN};

/// Drop the relationships this writer owns so a write replaces them.
pub fn delete_content_relationships(uuid: &str) -> Statement {
    Statement::new(
        "MATCH (t:Thing {uuid: $uuid})
         OPTIONAL MATCH (:Thing)-[rel1:IS_CURATED_FOR]->(t)
         OPTIONAL MATCH (t)-[rel2:CONTAINS]->(:Thing)
         DELETE rel1, rel2",
    )
    .param("uuid", uuid)
}

/// Link a story package to the content it curates.
pub fn add_story_package_relation(content_uuid: &str, package_uuid: &str) -> Statement {
    Statement::new(
        "MERGE (sp:Thing {uuid: $packageUuid})
         MERGE (c:Thing {uuid: $contentUuid})
         MERGE (c)<-[:IS_CURATED_FOR]-(sp)",
    )
    .param("packageUuid", package_uuid)
    .param("contentUuid", content_uuid)
}

/// Link content to the content package containing it.
pub fn add_content_package_relation(content_uuid: &str, package_uuid: &str) -> Statement {
    Statement::new(
        "MERGE (cp:Thing {uuid: $packageUuid})
         MERGE (c:Thing {uuid: $contentUuid})
         MERGE (c)-[:CONTAINS]->(cp)",
    )
    .param("packageUuid", package_uuid)
    .param("contentUuid", content_uuid)
}

/// Merge the content node, replace all of its properties and set its labels.
///
/// `stale` labels are removed before `labels` are added.
pub fn write_content_node(uuid: &str, props: PropertyMap, labels: &[String], stale: &[String]) -> Statement {
    let all_props = props.into_iter().map(|(k, v)| (k, Param::from(v))).collect();

    let remove = if stale.is_empty() {
        String::new()
    } else {
        format!("\n         REMOVE n{}", label_clause(stale))
    };

    Statement::new(format!(
        "MERGE (n:Thing {{uuid: $uuid}})
         SET n = $allprops{}
         SET n{}",
        remove,
        label_clause(labels)
    ))
    .param("uuid", uuid)
    .param("allprops", Param::Map(all_props))
}

/// Content node plus its story and content package uuids.
pub fn read_content(uuid: &str) -> Statement {
    Statement::new(
        "OPTIONAL MATCH (n:Content {uuid: $uuid})
         OPTIONAL MATCH (sp:Thing)-[:IS_CURATED_FOR]->(n)
         OPTIONAL MATCH (n)-[:CONTAINS]->(cp:Thing)
         WITH n, sp, cp
         RETURN n.uuid AS uuid,
                n.title AS title,
                n.publishedDate AS publishedDate,
                n.publication AS publication,
                sp.uuid AS storyPackage,
                cp.uuid AS contentPackage",
    )
    .param("uuid", uuid)
}

/// Remove nodes left under a content package after their collection label
/// was dropped elsewhere. Must run before the package itself is deleted.
pub fn clear_collection_nodes(uuid: &str) -> Statement {
    Statement::new(
        "MATCH (p:ContentPackage {uuid: $uuid})-[:CONTAINS]->(cc:Thing)
         WHERE NOT cc:ContentCollection
         OPTIONAL MATCH (cc)-[r]-()
         WITH cc, count(r) AS relCount
         WHERE relCount = 1
         DETACH DELETE cc",
    )
    .param("uuid", uuid)
}

/// Delete the node and every relationship touching it.
pub fn remove_content_node(uuid: &str) -> Statement {
    Statement::new(format!(
        "MATCH (p:Thing {{uuid: $uuid}})
         DETACH DELETE p
         RETURN count(p) AS {}",
        NODES_DELETED_COLUMN
    ))
    .param("uuid", uuid)
}

/// Number of content nodes.
pub fn count_content() -> Statement {
    Statement::new("MATCH (n:Content) RETURN count(n) AS c")
}

/// `:`-joined label list with each label backtick-quoted.
pub fn label_clause(labels: &[String]) -> String {
    labels
        .iter()
        .map(|label| format!(":`{}`", label.replace('`', "``")))
        .collect()
}
