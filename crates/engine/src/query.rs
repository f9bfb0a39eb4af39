//! Query service — lookup, export, and graph composition over the dataset
//! store.
//!
//! Address detail resolution tries an exact match first and falls back to
//! substring matching. Enrichment is merged additively: the base record's
//! own fields are never altered, and a provider failure never fails the
//! request.

use explorer_common::error::AppError;
use explorer_common::types::{AddressGraph, AddressRecord, EnrichedAddress, GraphEdge, GraphNode};

use crate::enrich::Enricher;
use crate::store::AddressStore;

/// Maximum number of related nodes in the star graph.
const GRAPH_FANOUT: usize = 6;

/// Service layer for read queries over the address dataset.
pub struct QueryService;

impl QueryService {
    /// Resolve one address (exact, then fuzzy) and attach best-effort
    /// enrichment from both providers.
    ///
    /// Enrichment inputs are the matched record's stored address and stored
    /// context, not the raw query string.
    pub async fn get_address_detail(
        store: &AddressStore,
        enricher: &Enricher,
        query: &str,
    ) -> Result<EnrichedAddress, AppError> {
        let record = store
            .find_exact(query)
            .or_else(|| store.find_fuzzy(query))
            .cloned()
            .ok_or_else(|| AppError::NotFound("Address not found in mock DB".to_string()))?;

        let (address_intel, classification) = enricher.enrich(&record).await;

        Ok(EnrichedAddress {
            record,
            address_intel,
            classification,
        })
    }

    /// Flatten the full dataset to CSV with a header row.
    ///
    /// An empty dataset is an explicit error; there is no field set to head
    /// the file with.
    pub fn export_csv(store: &AddressStore) -> Result<String, AppError> {
        if store.is_empty() {
            return Err(AppError::Export(
                "dataset is empty, nothing to export".to_string(),
            ));
        }

        let mut writer = csv::Writer::from_writer(Vec::new());
        for record in store.records() {
            writer
                .serialize(record)
                .map_err(|e| AppError::Export(e.to_string()))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::Export(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| AppError::Export(e.to_string()))
    }

    /// Build a star graph around the queried address.
    ///
    /// If the address is unknown, a placeholder center is synthesized with
    /// the literal query (never persisted). Related records sharing the
    /// center's category are preferred; otherwise all non-center records are
    /// eligible. The first [`GRAPH_FANOUT`] in dataset order are taken —
    /// no shuffling, no scoring.
    pub fn build_graph(store: &AddressStore, addr: &str) -> AddressGraph {
        let center = store.find_exact(addr).cloned().unwrap_or_else(|| AddressRecord {
            address: addr.to_string(),
            tag: Some("Queried Address".to_string()),
            category: Some("Wallet".to_string()),
            confidence: 3.0,
            last_seen: None,
            source: Some("Local".to_string()),
            context: None,
        });

        let related: Vec<&AddressRecord> = store
            .records()
            .iter()
            .filter(|r| !r.address.eq_ignore_ascii_case(&center.address))
            .collect();

        // Raw Option equality: two records both lacking a category count as
        // the same category, and the comparison is case-sensitive.
        let same_category: Vec<&AddressRecord> = related
            .iter()
            .copied()
            .filter(|r| r.category == center.category)
            .collect();

        let picked = if same_category.is_empty() {
            related
        } else {
            same_category
        };
        let picked = &picked[..picked.len().min(GRAPH_FANOUT)];

        let mut nodes = Vec::with_capacity(picked.len() + 1);
        nodes.push(Self::to_node(&center));
        nodes.extend(picked.iter().map(|r| Self::to_node(r)));

        let edges = picked
            .iter()
            .map(|r| GraphEdge {
                source: center.address.clone(),
                target: r.address.clone(),
                edge_type: "transfer".to_string(),
            })
            .collect();

        AddressGraph { nodes, edges }
    }

    fn to_node(record: &AddressRecord) -> GraphNode {
        GraphNode {
            id: record.address.clone(),
            address: record.address.clone(),
            label: record
                .tag
                .clone()
                .unwrap_or_else(|| short_label(&record.address)),
            category: record
                .category
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            confidence: record.confidence,
            last_seen: record.last_seen.clone(),
            source: record
                .source
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

/// Truncated display form of an address: first 6 chars, ellipsis, last 4.
/// Addresses too short to truncate are shown whole.
fn short_label(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}
