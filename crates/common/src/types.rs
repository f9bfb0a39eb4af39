use serde::{Deserialize, Serialize};

fn default_confidence() -> f64 {
    3.0
}

/// One entry of the mock address dataset.
///
/// `address` is the only identifier and is matched case-insensitively;
/// uniqueness is not guaranteed, first match wins. Optional fields always
/// serialize (as `null` in JSON, empty cells in CSV) so the same struct
/// feeds both export formats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressRecord {
    pub address: String,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub last_seen: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
}

/// An address record with best-effort enrichment attached.
///
/// Base fields pass through untouched; enrichment keys are present only when
/// the corresponding provider returned something (success payload or an
/// embedded error object).
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedAddress {
    #[serde(flatten)]
    pub record: AddressRecord,
    #[serde(rename = "addressIntelEnrichment", skip_serializing_if = "Option::is_none")]
    pub address_intel: Option<serde_json::Value>,
    #[serde(rename = "classificationEnrichment", skip_serializing_if = "Option::is_none")]
    pub classification: Option<serde_json::Value>,
}

/// A node in the star graph around a queried address. Derived, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub address: String,
    pub label: String,
    pub category: String,
    pub confidence: f64,
    pub last_seen: Option<String>,
    pub source: String,
}

/// A directed edge from the graph center to a related address.
#[derive(Debug, Clone, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub edge_type: String,
}

/// Response shape of the graph endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct AddressGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}
