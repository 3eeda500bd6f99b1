//! Link derivation: flow table -> deduplicated links -> namespace aggregates.
//!
//! Output order is a pure function of the inputs (everything is keyed
//! through `BTreeMap`), so identical inputs yield identical link lists.

use std::collections::{BTreeMap, BTreeSet};

use super::types::{FilterMode, FlowMapping, ResolvedNode};

/// Unordered pair key: the two ids in sorted order.
pub fn pair_key(a: &str, b: &str) -> (String, String) {
	if a <= b {
		(a.to_string(), b.to_string())
	} else {
		(b.to_string(), a.to_string())
	}
}

/// One connection between two nodes, one per unordered pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
	/// Direction of the first flow observed for the pair.
	pub source: String,
	pub target: String,
	pub source_namespace: String,
	pub target_namespace: String,
	pub is_active: bool,
	pub is_allowed: bool,
	/// The reverse flow is present as well.
	pub bidirectional: bool,
}

impl Link {
	pub fn is_cross_namespace(&self) -> bool {
		self.source_namespace != self.target_namespace
	}

	pub fn touches(&self, id: &str) -> bool {
		self.source == id || self.target == id
	}

	/// The other endpoint, if `id` is one of the endpoints.
	pub fn peer(&self, id: &str) -> Option<&str> {
		if self.source == id {
			Some(&self.target)
		} else if self.target == id {
			Some(&self.source)
		} else {
			None
		}
	}
}

/// Turns the flow table into one link per unordered node pair.
///
/// Flows whose endpoints are unknown (for instance nodes dropped as
/// malformed), self-flows, and flows the filter does not admit are skipped.
pub fn derive_links(nodes: &[ResolvedNode], flows: &FlowMapping, filter: FilterMode) -> Vec<Link> {
	let namespaces: BTreeMap<&str, &str> = nodes
		.iter()
		.map(|n| (n.id.as_str(), n.namespace.as_str()))
		.collect();
	let mut links: BTreeMap<(String, String), Link> = BTreeMap::new();

	for (source, targets) in flows {
		let Some(&source_ns) = namespaces.get(source.as_str()) else {
			continue;
		};
		for (target, flow) in targets {
			if source == target || !filter.admits(flow) {
				continue;
			}
			let Some(&target_ns) = namespaces.get(target.as_str()) else {
				continue;
			};
			let is_active = filter.shows_activity() && flow.active;
			links
				.entry(pair_key(source, target))
				.and_modify(|link| {
					if link.source == *target {
						link.bidirectional = true;
					}
					link.is_active |= is_active;
					link.is_allowed |= flow.allowed;
				})
				.or_insert_with(|| Link {
					source: source.clone(),
					target: target.clone(),
					source_namespace: source_ns.to_string(),
					target_namespace: target_ns.to_string(),
					is_active,
					is_allowed: flow.allowed,
					bidirectional: false,
				});
		}
	}

	links.into_values().collect()
}

/// Ids of nodes that take part in at least one active link.
pub fn active_node_ids(links: &[Link]) -> BTreeSet<&str> {
	links
		.iter()
		.filter(|l| l.is_active)
		.flat_map(|l| [l.source.as_str(), l.target.as_str()])
		.collect()
}

/// A single edge summarizing every link between two namespaces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamespaceEdge {
	/// Lexicographically smaller namespace of the pair.
	pub source: String,
	pub target: String,
	/// Number of underlying links.
	pub count: usize,
	pub bidirectional: usize,
	pub unidirectional: usize,
	pub active_count: usize,
	pub is_active: bool,
}

impl NamespaceEdge {
	pub fn touches(&self, namespace: &str) -> bool {
		self.source == namespace || self.target == namespace
	}
}

/// One aggregate edge per unordered pair of distinct namespaces that has
/// at least one link between their members.
pub fn aggregate_namespace_edges(links: &[Link]) -> Vec<NamespaceEdge> {
	let mut edges: BTreeMap<(String, String), NamespaceEdge> = BTreeMap::new();
	for link in links.iter().filter(|l| l.is_cross_namespace()) {
		let key = pair_key(&link.source_namespace, &link.target_namespace);
		let edge = edges.entry(key.clone()).or_insert_with(|| NamespaceEdge {
			source: key.0,
			target: key.1,
			count: 0,
			bidirectional: 0,
			unidirectional: 0,
			active_count: 0,
			is_active: false,
		});
		edge.count += 1;
		if link.bidirectional {
			edge.bidirectional += 1;
		} else {
			edge.unidirectional += 1;
		}
		if link.is_active {
			edge.active_count += 1;
			edge.is_active = true;
		}
	}
	edges.into_values().collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network_graph::types::{FlowRecord, GraphInput, GraphNode};

	const ACTIVE: FlowRecord = FlowRecord {
		active: true,
		allowed: true,
	};
	const ALLOWED: FlowRecord = FlowRecord {
		active: false,
		allowed: true,
	};

	fn input() -> GraphInput {
		let mut input = GraphInput {
			nodes: vec![
				GraphNode::deployment("a1", "api", "ns-a"),
				GraphNode::deployment("a2", "db", "ns-a"),
				GraphNode::deployment("b1", "web", "ns-b"),
			],
			..Default::default()
		};
		input.add_flow("a1", "b1", ACTIVE);
		input.add_flow("b1", "a1", ALLOWED);
		input.add_flow("a1", "a2", ALLOWED);
		input.add_flow("a2", "ghost", ACTIVE);
		input.add_flow("a2", "a2", ACTIVE);
		input
	}

	fn resolved(input: &GraphInput) -> Vec<ResolvedNode> {
		input.nodes.iter().map(|n| n.resolve().unwrap()).collect()
	}

	#[test]
	fn pairs_are_deduplicated_and_direction_tracked() {
		let input = input();
		let links = derive_links(&resolved(&input), &input.network_flow_mapping, FilterMode::All);
		assert_eq!(links.len(), 2);

		let cross = links.iter().find(|l| l.is_cross_namespace()).unwrap();
		assert_eq!((cross.source.as_str(), cross.target.as_str()), ("a1", "b1"));
		assert!(cross.bidirectional);
		assert!(cross.is_active);

		let inner = links.iter().find(|l| !l.is_cross_namespace()).unwrap();
		assert!(!inner.is_active && !inner.bidirectional);
	}

	#[test]
	fn derivation_is_deterministic() {
		let input = input();
		let nodes = resolved(&input);
		let first = derive_links(&nodes, &input.network_flow_mapping, FilterMode::All);
		let second = derive_links(&nodes, &input.network_flow_mapping, FilterMode::All);
		assert_eq!(format!("{first:?}"), format!("{second:?}"));
	}

	#[test]
	fn filters_select_and_flag_links() {
		let input = input();
		let nodes = resolved(&input);
		let active = derive_links(&nodes, &input.network_flow_mapping, FilterMode::Active);
		assert_eq!(active.len(), 1);
		assert!(!active[0].bidirectional);

		let allowed = derive_links(&nodes, &input.network_flow_mapping, FilterMode::Allowed);
		assert_eq!(allowed.len(), 2);
		assert!(allowed.iter().all(|l| !l.is_active));
	}

	#[test]
	fn aggregates_count_links_per_namespace_pair() {
		let input = input();
		let links = derive_links(&resolved(&input), &input.network_flow_mapping, FilterMode::All);
		let edges = aggregate_namespace_edges(&links);
		assert_eq!(edges.len(), 1);
		let edge = &edges[0];
		assert_eq!((edge.source.as_str(), edge.target.as_str()), ("ns-a", "ns-b"));
		assert_eq!(edge.count, 1);
		assert_eq!(edge.bidirectional, 1);
		assert_eq!(edge.active_count, 1);
		assert!(edge.is_active);
	}

	#[test]
	fn active_nodes_follow_active_links() {
		let input = input();
		let links = derive_links(&resolved(&input), &input.network_flow_mapping, FilterMode::All);
		let ids = active_node_ids(&links);
		assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec!["a1", "b1"]);
	}
}
