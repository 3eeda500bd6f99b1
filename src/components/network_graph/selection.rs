//! Hover and selection state machine.
//!
//! At most one of hovered node, selected node or selected namespace is
//! active. Dimming is never stored: [`Selection::focus`] derives it from the
//! current state each render pass.

use std::collections::BTreeSet;

use super::links::{Link, NamespaceEdge};
use super::types::ResolvedNode;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Interaction {
	#[default]
	Idle,
	HoveredNode(String),
	SelectedNode(String),
	SelectedNamespace(String),
}

/// What a click changed, for forwarding to the host callbacks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionChange {
	Node(String),
	Namespace(String),
	Cleared,
}

#[derive(Clone, Debug, Default)]
pub struct Selection {
	state: Interaction,
}

impl Selection {
	#[cfg(test)]
	pub fn state(&self) -> &Interaction {
		&self.state
	}

	pub fn has_selection(&self) -> bool {
		matches!(
			self.state,
			Interaction::SelectedNode(_) | Interaction::SelectedNamespace(_)
		)
	}

	pub fn hovered(&self) -> Option<&str> {
		match &self.state {
			Interaction::HoveredNode(id) => Some(id),
			_ => None,
		}
	}

	pub fn selected_node(&self) -> Option<&str> {
		match &self.state {
			Interaction::SelectedNode(id) => Some(id),
			_ => None,
		}
	}

	pub fn selected_namespace(&self) -> Option<&str> {
		match &self.state {
			Interaction::SelectedNamespace(ns) => Some(ns),
			_ => None,
		}
	}

	/// Hover is ignored while something is selected.
	pub fn pointer_enter_node(&mut self, id: &str) {
		if !self.has_selection() {
			self.state = Interaction::HoveredNode(id.to_string());
		}
	}

	pub fn pointer_leave_node(&mut self) {
		if matches!(self.state, Interaction::HoveredNode(_)) {
			self.state = Interaction::Idle;
		}
	}

	pub fn click_node(&mut self, id: &str) -> SelectionChange {
		if self.selected_node() == Some(id) {
			self.state = Interaction::Idle;
			return SelectionChange::Cleared;
		}
		self.state = Interaction::SelectedNode(id.to_string());
		SelectionChange::Node(id.to_string())
	}

	pub fn click_namespace(&mut self, namespace: &str) -> SelectionChange {
		if self.selected_namespace() == Some(namespace) {
			self.state = Interaction::Idle;
			return SelectionChange::Cleared;
		}
		self.state = Interaction::SelectedNamespace(namespace.to_string());
		SelectionChange::Namespace(namespace.to_string())
	}

	pub fn click_background(&mut self) -> SelectionChange {
		self.state = Interaction::Idle;
		SelectionChange::Cleared
	}

	/// Imperative selection from the host. Emits nothing.
	pub fn set_selected_node(&mut self, id: Option<&str>) {
		self.state = match id {
			Some(id) => Interaction::SelectedNode(id.to_string()),
			None => Interaction::Idle,
		};
	}

	/// Elements related to the current selection, or `None` when nothing is
	/// selected (and therefore nothing is dimmed).
	pub fn focus(&self, nodes: &[ResolvedNode], links: &[Link]) -> Option<Focus> {
		let core: BTreeSet<String> = match &self.state {
			Interaction::SelectedNode(id) => [id.clone()].into(),
			Interaction::SelectedNamespace(ns) => nodes
				.iter()
				.filter(|n| &n.namespace == ns)
				.map(|n| n.id.clone())
				.collect(),
			Interaction::Idle | Interaction::HoveredNode(_) => return None,
		};

		let mut related = core.clone();
		for link in links {
			if core.contains(&link.source) {
				related.insert(link.target.clone());
			}
			if core.contains(&link.target) {
				related.insert(link.source.clone());
			}
		}

		let namespace_of = |id: &str| {
			nodes
				.iter()
				.find(|n| n.id == id)
				.map(|n| n.namespace.clone())
		};
		let mut core_namespaces: BTreeSet<String> =
			core.iter().filter_map(|id| namespace_of(id)).collect();
		if let Interaction::SelectedNamespace(ns) = &self.state {
			core_namespaces.insert(ns.clone());
		}
		let mut namespaces: BTreeSet<String> =
			related.iter().filter_map(|id| namespace_of(id)).collect();
		namespaces.extend(core_namespaces.iter().cloned());

		Some(Focus {
			core,
			related,
			core_namespaces,
			namespaces,
		})
	}
}

/// Derived highlight set for one selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Focus {
	core: BTreeSet<String>,
	related: BTreeSet<String>,
	core_namespaces: BTreeSet<String>,
	namespaces: BTreeSet<String>,
}

impl Focus {
	pub fn highlights_node(&self, id: &str) -> bool {
		self.related.contains(id)
	}

	pub fn highlights_namespace(&self, namespace: &str) -> bool {
		self.namespaces.contains(namespace)
	}

	pub fn highlights_link(&self, link: &Link) -> bool {
		self.core.contains(&link.source) || self.core.contains(&link.target)
	}

	pub fn highlights_namespace_edge(&self, edge: &NamespaceEdge) -> bool {
		let (s, t) = (&edge.source, &edge.target);
		(self.core_namespaces.contains(s) && self.namespaces.contains(t))
			|| (self.core_namespaces.contains(t) && self.namespaces.contains(s))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network_graph::links::derive_links;
	use crate::components::network_graph::types::{FilterMode, FlowRecord, GraphInput, GraphNode};

	fn graph() -> (Vec<ResolvedNode>, Vec<Link>) {
		let mut input = GraphInput {
			nodes: vec![
				GraphNode::deployment("a1", "api", "ns-a"),
				GraphNode::deployment("a2", "db", "ns-a"),
				GraphNode::deployment("b1", "web", "ns-b"),
				GraphNode::deployment("c1", "cache", "ns-c"),
			],
			..Default::default()
		};
		input.add_flow(
			"a1",
			"b1",
			FlowRecord {
				active: true,
				allowed: true,
			},
		);
		let nodes: Vec<ResolvedNode> = input.nodes.iter().map(|n| n.resolve().unwrap()).collect();
		let links = derive_links(&nodes, &input.network_flow_mapping, FilterMode::All);
		(nodes, links)
	}

	#[test]
	fn hover_reverts_unless_selected() {
		let mut sel = Selection::default();
		sel.pointer_enter_node("a1");
		assert_eq!(sel.state(), &Interaction::HoveredNode("a1".into()));
		sel.pointer_leave_node();
		assert_eq!(sel.state(), &Interaction::Idle);

		sel.click_node("a1");
		sel.pointer_enter_node("b1");
		sel.pointer_leave_node();
		assert_eq!(sel.selected_node(), Some("a1"));
	}

	#[test]
	fn clicking_twice_or_background_clears() {
		let mut sel = Selection::default();
		assert_eq!(sel.click_node("a1"), SelectionChange::Node("a1".into()));
		assert_eq!(sel.click_node("a1"), SelectionChange::Cleared);
		assert_eq!(sel.state(), &Interaction::Idle);

		assert_eq!(
			sel.click_namespace("ns-a"),
			SelectionChange::Namespace("ns-a".into())
		);
		assert_eq!(sel.click_node("b1"), SelectionChange::Node("b1".into()));
		assert_eq!(sel.click_background(), SelectionChange::Cleared);
		assert!(!sel.has_selection());
	}

	#[test]
	fn hover_alone_dims_nothing() {
		let (nodes, links) = graph();
		let mut sel = Selection::default();
		sel.pointer_enter_node("a1");
		assert!(sel.focus(&nodes, &links).is_none());
	}

	#[test]
	fn node_focus_covers_peers() {
		let (nodes, links) = graph();
		let mut sel = Selection::default();
		sel.click_node("a1");
		let focus = sel.focus(&nodes, &links).unwrap();
		assert!(focus.highlights_node("a1") && focus.highlights_node("b1"));
		assert!(!focus.highlights_node("a2") && !focus.highlights_node("c1"));
		assert!(focus.highlights_namespace("ns-b"));
		assert!(!focus.highlights_namespace("ns-c"));
		assert!(focus.highlights_link(&links[0]));
	}

	#[test]
	fn namespace_focus_covers_members() {
		let (nodes, links) = graph();
		let mut sel = Selection::default();
		sel.click_namespace("ns-a");
		let focus = sel.focus(&nodes, &links).unwrap();
		for id in ["a1", "a2", "b1"] {
			assert!(focus.highlights_node(id), "{id}");
		}
		assert!(!focus.highlights_node("c1"));
	}
}
