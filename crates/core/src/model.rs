use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// One result row as returned by the backend. Key order is preserved.
pub type ResultRow = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

impl QueryRequest {
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub cypher_query: String,
    #[serde(default)]
    pub results: Vec<ResultRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    /// Any other top-level members of the response body, such as `error`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QueryResult {
    #[must_use]
    pub fn new(cypher_query: impl Into<String>, results: Vec<ResultRow>) -> Self {
        Self {
            cypher_query: cypher_query.into(),
            results,
            explanation: None,
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeTypeSummary {
    pub count: u64,
    #[serde(default)]
    pub properties: Vec<String>,
}

impl NodeTypeSummary {
    #[must_use]
    pub fn new(count: u64, properties: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            count,
            properties: properties.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SchemaInfo {
    #[serde(default)]
    pub nodes: NamedEntries<NodeTypeSummary>,
    #[serde(default)]
    pub relationships: NamedEntries<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub message: String,
}

/// A JSON object decoded into name/value pairs in the order the backend sent them.
///
/// A repeated name keeps its first position and takes the later value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedEntries<T> {
    entries: Vec<(String, T)>,
}

impl<T> Default for NamedEntries<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> NamedEntries<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: T) {
        let name = name.into();
        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|(existing, _)| *existing == name)
        {
            existing.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, T> FromIterator<(N, T)> for NamedEntries<T> {
    fn from_iter<I: IntoIterator<Item = (N, T)>>(iter: I) -> Self {
        let mut entries = Self::new();
        for (name, value) in iter {
            entries.insert(name, value);
        }
        entries
    }
}

impl<T: Serialize> Serialize for NamedEntries<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for NamedEntries<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for EntriesVisitor<T> {
            type Value = NamedEntries<T>;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = NamedEntries::new();
                while let Some((name, value)) = access.next_entry::<String, T>()? {
                    entries.insert(name, value);
                }
                Ok(entries)
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{NamedEntries, NodeTypeSummary, QueryResult, SchemaInfo};

    #[test]
    fn query_result_keeps_row_key_order_as_received() {
        let raw = r#"{
            "cypher_query": "MATCH (m:Movie) RETURN m.year, m.title",
            "results": [{"m.year": 2000, "m.title": "Gladiator"}, {"m.year": 1999, "m.title": "Fight Club"}]
        }"#;

        let result: QueryResult = serde_json::from_str(raw).expect("body should decode");
        let keys: Vec<&str> = result.results[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["m.year", "m.title"]);
        assert_eq!(result.results[1]["m.title"], json!("Fight Club"));
        assert!(result.explanation.is_none());
    }

    #[test]
    fn query_result_keeps_unknown_members_and_reserializes_them() {
        let raw = json!({
            "cypher_query": "",
            "results": [],
            "explanation": "",
            "error": "Translation error: model unavailable",
            "elapsed_ms": 12
        });

        let result: QueryResult = serde_json::from_value(raw.clone()).expect("body should decode");
        assert_eq!(result.extra["error"], json!("Translation error: model unavailable"));
        assert_eq!(result.extra["elapsed_ms"], json!(12));
        assert!(!result.extra.contains_key("cypher_query"));
        assert_eq!(
            serde_json::to_value(&result).expect("result should serialize"),
            raw
        );
    }

    #[test]
    fn query_result_tolerates_missing_results_and_null_explanation() {
        let result: QueryResult =
            serde_json::from_value(json!({"cypher_query": "RETURN 1", "explanation": null}))
                .expect("body should decode");
        assert!(result.results.is_empty());
        assert!(result.explanation.is_none());
    }

    #[test]
    fn schema_entries_preserve_backend_order() {
        let raw = r#"{
            "nodes": {
                "Person": {"count": 434118, "properties": ["name", "birthYear"]},
                "Movie": {"count": 681857, "properties": ["title", "year"]}
            },
            "relationships": {"DIRECTOR": "Person -> Movie", "ACTOR": "Person -> Movie"}
        }"#;

        let schema: SchemaInfo = serde_json::from_str(raw).expect("schema should decode");
        let node_names: Vec<&str> = schema.nodes.iter().map(|(name, _)| name).collect();
        assert_eq!(node_names, vec!["Person", "Movie"]);
        assert_eq!(
            schema.nodes.get("Movie"),
            Some(&NodeTypeSummary::new(681_857, ["title", "year"]))
        );
        let relationship_names: Vec<&str> =
            schema.relationships.iter().map(|(name, _)| name).collect();
        assert_eq!(relationship_names, vec!["DIRECTOR", "ACTOR"]);
    }

    #[test]
    fn repeated_names_keep_first_position_and_last_value() {
        let entries: NamedEntries<u8> = [("a", 1), ("b", 2), ("a", 3)].into_iter().collect();
        let flattened: Vec<(&str, u8)> = entries.iter().map(|(name, v)| (name, *v)).collect();
        assert_eq!(flattened, vec![("a", 3), ("b", 2)]);
    }

    #[test]
    fn schema_serializes_back_in_the_same_order() {
        let mut schema = SchemaInfo::default();
        schema
            .nodes
            .insert("Movie", NodeTypeSummary::new(500, ["title", "year"]));
        schema
            .relationships
            .insert("ACTED_IN", "Actor played a role in a Movie".to_string());

        let value = serde_json::to_value(&schema).expect("schema should serialize");
        assert_eq!(
            value,
            json!({
                "nodes": {"Movie": {"count": 500, "properties": ["title", "year"]}},
                "relationships": {"ACTED_IN": "Actor played a role in a Movie"}
            })
        );
    }
}
