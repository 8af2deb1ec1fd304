// model.rs — Manifest: the RO-Crate linked-data graph as an indexed arena.
//
// The manifest's `@graph` is a flat list of entities that reference each
// other by `@id`. Lookups by id happen repeatedly during extraction, so the
// graph is parsed once into an entity arena with an id→index table instead
// of re-scanning the list per lookup.

use std::collections::HashMap;

use serde_json::Value;

/// One node in the manifest graph: a unique `@id`, zero or more `@type`
/// tags, and arbitrary attributes.
#[derive(Debug, Clone)]
pub struct Entity {
    /// The entity's unique key within the manifest.
    pub id: String,

    /// Type tags. RO-Crate allows `@type` to be a string or an array.
    pub types: Vec<String>,

    attrs: serde_json::Map<String, Value>,
}

impl Entity {
    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let id = obj.get("@id")?.as_str()?.to_string();
        let types = match obj.get("@type") {
            Some(Value::String(t)) => vec![t.clone()],
            Some(Value::Array(ts)) => ts
                .iter()
                .filter_map(|t| t.as_str())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };
        Some(Self {
            id,
            types,
            attrs: obj.clone(),
        })
    }

    /// Whether this entity carries the given `@type` tag.
    pub fn has_type(&self, tag: &str) -> bool {
        self.types.iter().any(|t| t == tag)
    }

    /// Raw attribute value.
    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attrs.get(key)
    }

    /// Attribute value as a string, if it is one.
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attr(key).and_then(Value::as_str)
    }

    /// The target id of a reference-shaped attribute (`{"@id": "..."}`).
    pub fn reference(&self, key: &str) -> Option<&str> {
        self.attr(key)?.get("@id")?.as_str()
    }
}

/// A parsed provenance manifest: entity arena plus id index.
#[derive(Debug, Default)]
pub struct Manifest {
    entities: Vec<Entity>,
    index: HashMap<String, usize>,
}

impl Manifest {
    /// Parse a manifest document.
    ///
    /// A document without a `@graph` array parses to an empty manifest —
    /// the extractor treats that the same as a manifest with no matching
    /// entities. Only malformed JSON is an error.
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        let doc: Value = serde_json::from_str(raw)?;
        let mut manifest = Self::default();
        let graph = match doc.get("@graph").and_then(Value::as_array) {
            Some(graph) => graph,
            None => return Ok(manifest),
        };
        for value in graph {
            if let Some(entity) = Entity::from_value(value) {
                // Ids are unique by manifest invariant; on violation the
                // first occurrence wins.
                if manifest.index.contains_key(&entity.id) {
                    continue;
                }
                manifest
                    .index
                    .insert(entity.id.clone(), manifest.entities.len());
                manifest.entities.push(entity);
            }
        }
        Ok(manifest)
    }

    /// Look up an entity by id. A dangling reference resolves to `None`.
    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.index.get(id).map(|&idx| &self.entities[idx])
    }

    /// Iterate entities in manifest order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_graph_into_indexed_entities() {
        let raw = r##"{
            "@context": "https://w3id.org/ro/crate/1.1/context",
            "@graph": [
                {"@id": "./", "@type": "Dataset", "name": "Run 1"},
                {"@id": "#run", "@type": ["CreateAction", "Thing"], "name": "x"}
            ]
        }"##;
        let manifest = Manifest::parse(raw).unwrap();
        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.get("./").unwrap().attr_str("name"), Some("Run 1"));
        assert!(manifest.get("#run").unwrap().has_type("CreateAction"));
        assert!(manifest.get("#run").unwrap().has_type("Thing"));
        assert!(manifest.get("#missing").is_none());
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let raw = r##"{"@graph": [
            {"@id": "./", "name": "first"},
            {"@id": "./", "name": "second"}
        ]}"##;
        let manifest = Manifest::parse(raw).unwrap();
        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.get("./").unwrap().attr_str("name"), Some("first"));
    }

    #[test]
    fn document_without_graph_is_empty() {
        let manifest = Manifest::parse("{\"hello\": 1}").unwrap();
        assert!(manifest.is_empty());
    }

    #[test]
    fn entries_without_id_are_skipped() {
        let raw = r#"{"@graph": [{"name": "anonymous"}, {"@id": "a"}]}"#;
        let manifest = Manifest::parse(raw).unwrap();
        assert_eq!(manifest.len(), 1);
    }

    #[test]
    fn reference_resolution_reads_nested_id() {
        let raw = r#"{"@graph": [
            {"@id": "./", "author": {"@id": "https://orcid.org/0000-0001"}}
        ]}"#;
        let manifest = Manifest::parse(raw).unwrap();
        assert_eq!(
            manifest.get("./").unwrap().reference("author"),
            Some("https://orcid.org/0000-0001")
        );
        // A plain-string attribute is not a reference.
        assert_eq!(manifest.get("./").unwrap().reference("name"), None);
    }
}
