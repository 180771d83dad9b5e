//! Database schema SQL for the citation graph.

/// Graph tables: source documents, linked resources, citation edges.
///
/// Citation identity is the (document, resource, page) triple, so
/// re-ingesting the same link never duplicates an edge.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS source_documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS linked_resources (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL UNIQUE,
    domain TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'unknown',
    local_path TEXT,
    error_message TEXT,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_linked_resources_status ON linked_resources(status);
CREATE INDEX IF NOT EXISTS idx_linked_resources_domain ON linked_resources(domain);

CREATE TABLE IF NOT EXISTS citations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_id INTEGER NOT NULL REFERENCES source_documents(id) ON DELETE CASCADE,
    resource_id INTEGER NOT NULL REFERENCES linked_resources(id) ON DELETE CASCADE,
    page INTEGER NOT NULL,
    UNIQUE(source_id, resource_id, page)
);

CREATE INDEX IF NOT EXISTS idx_citations_resource ON citations(resource_id);
"#;
