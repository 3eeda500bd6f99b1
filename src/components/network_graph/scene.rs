//! Pure scene description computed from the layout and selection.
//!
//! The renderer only draws what [`build_scene`] returns, so the whole
//! geometry pipeline can be checked without a canvas. Building twice from
//! unchanged positions yields equal scenes.

use std::collections::BTreeMap;

use super::geometry::{Point, Rect};
use super::layout::LayoutDriver;
use super::router::AnchorSet;
use super::selection::Selection;
use super::types::EntityType;

/// Labels longer than this many characters are cut and suffixed with `...`.
pub const MAX_LABEL_CHARS: usize = 15;

pub fn truncate_label(label: &str) -> String {
	if label.chars().count() > MAX_LABEL_CHARS {
		let head: String = label.chars().take(MAX_LABEL_CHARS).collect();
		format!("{}...", head)
	} else {
		label.to_string()
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct ContainerShape {
	pub namespace: String,
	pub label: String,
	pub bounds: Rect,
	pub anchors: AnchorSet,
	pub internet_access: bool,
	pub is_active: bool,
	pub selected: bool,
	pub background: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeShape {
	pub id: String,
	pub label: String,
	pub namespace: String,
	pub kind: EntityType,
	pub position: Point,
	pub radius: f64,
	pub internet_access: bool,
	pub is_active: bool,
	pub hovered: bool,
	pub selected: bool,
	pub background: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeKind {
	/// Between two nodes of the same namespace.
	Direct,
	/// From a node to its container's anchor, or back.
	Inner,
	/// Aggregate between two containers.
	Namespace,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeShape {
	pub kind: EdgeKind,
	/// Node, anchor or namespace id, depending on `kind`.
	pub source: String,
	pub target: String,
	pub from: Point,
	pub to: Point,
	/// Endpoints sitting on a node circle rather than a container border.
	pub source_is_node: bool,
	pub target_is_node: bool,
	pub is_active: bool,
	pub bidirectional: bool,
	/// Underlying link count; 1 for direct and inner edges.
	pub count: usize,
	pub background: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
	pub containers: Vec<ContainerShape>,
	pub nodes: Vec<NodeShape>,
	pub edges: Vec<EdgeShape>,
}

impl Scene {
	pub fn edges_of(&self, kind: EdgeKind) -> impl Iterator<Item = &EdgeShape> {
		self.edges.iter().filter(move |e| e.kind == kind)
	}
}

pub fn build_scene(driver: &LayoutDriver, selection: &Selection) -> Scene {
	let focus = selection.focus(driver.nodes(), driver.links());
	let dimmed = |highlighted: bool| focus.is_some() && !highlighted;
	let radius = driver.config().node_radius;

	let containers = driver
		.containers()
		.values()
		.map(|c| ContainerShape {
			namespace: c.namespace.clone(),
			label: truncate_label(&c.label),
			bounds: c.bounds,
			anchors: c.anchors.clone(),
			internet_access: c.internet_access,
			is_active: c.is_active,
			selected: selection.selected_namespace() == Some(c.namespace.as_str()),
			background: dimmed(focus.as_ref().is_some_and(|f| f.highlights_namespace(&c.namespace))),
		})
		.collect();

	let positions = driver.positions();
	let nodes = driver
		.nodes()
		.iter()
		.filter_map(|n| {
			let position = *positions.get(&n.id)?;
			Some(NodeShape {
				id: n.id.clone(),
				label: truncate_label(&n.name),
				namespace: n.namespace.clone(),
				kind: n.kind,
				position,
				radius,
				internet_access: n.internet_access,
				is_active: driver.is_node_active(&n.id),
				hovered: selection.hovered() == Some(n.id.as_str()),
				selected: selection.selected_node() == Some(n.id.as_str()),
				background: dimmed(focus.as_ref().is_some_and(|f| f.highlights_node(&n.id))),
			})
		})
		.collect();

	let mut edges = Vec::new();
	let mut inner: BTreeMap<(String, String), EdgeShape> = BTreeMap::new();
	let mut merge_inner = |edge: EdgeShape| {
		inner
			.entry((edge.source.clone(), edge.target.clone()))
			.and_modify(|e| {
				e.is_active |= edge.is_active;
				e.background &= edge.background;
				e.count += 1;
			})
			.or_insert(edge);
	};

	for link in driver.links() {
		let (Some(&from), Some(&to)) = (positions.get(&link.source), positions.get(&link.target)) else {
			continue;
		};
		let background = dimmed(focus.as_ref().is_some_and(|f| f.highlights_link(link)));
		let shape = |source: &str, target: &str, from: Point, to: Point, kind: EdgeKind| EdgeShape {
			kind,
			source: source.to_string(),
			target: target.to_string(),
			from,
			to,
			source_is_node: kind != EdgeKind::Inner || source == link.source,
			target_is_node: kind != EdgeKind::Inner || target == link.target,
			is_active: link.is_active,
			bidirectional: link.bidirectional,
			count: 1,
			background,
		};
		if !link.is_cross_namespace() {
			edges.push(shape(&link.source, &link.target, from, to, EdgeKind::Direct));
			continue;
		}
		// Without a cached pairing the aggregate falls back to center-to-center.
		let Some(pairing) = driver
			.router()
			.pairing(&link.source_namespace, &link.target_namespace)
		else {
			continue;
		};
		let (Some(source_point), Some(target_point)) = (
			driver.anchor_position(&link.source_namespace, pairing.source_side),
			driver.anchor_position(&link.target_namespace, pairing.target_side),
		) else {
			continue;
		};
		merge_inner(shape(
			&link.source,
			&pairing.source_anchor,
			from,
			source_point,
			EdgeKind::Inner,
		));
		merge_inner(shape(
			&pairing.target_anchor,
			&link.target,
			target_point,
			to,
			EdgeKind::Inner,
		));
	}
	edges.extend(inner.into_values());

	for aggregate in driver.namespace_edges() {
		let background = dimmed(
			focus
				.as_ref()
				.is_some_and(|f| f.highlights_namespace_edge(aggregate)),
		);
		// Endpoints follow the containers' current anchors, not the positions
		// cached when the pairing was chosen.
		let routed = driver
			.router()
			.pairing(&aggregate.source, &aggregate.target)
			.and_then(|p| {
				Some((
					driver.anchor_position(&aggregate.source, p.source_side)?,
					driver.anchor_position(&aggregate.target, p.target_side)?,
					p,
				))
			})
			.map(|(from, to, p)| (p.source_anchor, p.target_anchor, from, to));
		let fallback = || {
			let source = driver.containers().get(&aggregate.source)?;
			let target = driver.containers().get(&aggregate.target)?;
			Some((
				aggregate.source.clone(),
				aggregate.target.clone(),
				source.bounds.center(),
				target.bounds.center(),
			))
		};
		let Some((source, target, from, to)) = routed.or_else(fallback) else {
			continue;
		};
		edges.push(EdgeShape {
			kind: EdgeKind::Namespace,
			source,
			target,
			from,
			to,
			source_is_node: false,
			target_is_node: false,
			is_active: aggregate.is_active,
			bidirectional: aggregate.bidirectional > 0,
			count: aggregate.count,
			background,
		});
	}

	Scene {
		containers,
		nodes,
		edges,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network_graph::config::LayoutConfig;
	use crate::components::network_graph::types::{FlowRecord, GraphInput, GraphNode};

	fn loaded() -> LayoutDriver {
		let mut input = GraphInput {
			nodes: vec![
				GraphNode::deployment("a1", "api", "ns-a"),
				GraphNode::deployment("a2", "a-very-long-deployment-name", "ns-a"),
				GraphNode::deployment("b1", "web", "ns-b"),
			],
			..Default::default()
		};
		let flow = FlowRecord {
			active: true,
			allowed: true,
		};
		input.add_flow("a1", "b1", flow);
		input.add_flow("a2", "b1", flow);
		input.add_flow("a1", "a2", flow);
		let mut driver = LayoutDriver::new(LayoutConfig::default(), 800.0, 600.0);
		driver.load(&input);
		driver
	}

	#[test]
	fn labels_are_truncated() {
		assert_eq!(truncate_label("short"), "short");
		assert_eq!(truncate_label("a-very-long-deployment-name"), "a-very-long-dep...");
		assert_eq!(truncate_label("exactly-15-char"), "exactly-15-char");
	}

	#[test]
	fn unrouted_aggregates_fall_back_to_container_centers() {
		let driver = loaded();
		let scene = build_scene(&driver, &Selection::default());
		assert_eq!(scene.edges_of(EdgeKind::Inner).count(), 0);
		let aggregate: Vec<_> = scene.edges_of(EdgeKind::Namespace).collect();
		assert_eq!(aggregate.len(), 1);
		assert_eq!(aggregate[0].source, "ns-a");
		assert_eq!(aggregate[0].count, 2);
		assert_eq!(aggregate[0].from, driver.containers()["ns-a"].bounds.center());
	}

	#[test]
	fn routed_edges_go_through_anchors() {
		let mut driver = loaded();
		driver.converge();
		let scene = build_scene(&driver, &Selection::default());
		let pairing = driver.router().pairing("ns-a", "ns-b").unwrap();

		assert_eq!(scene.edges_of(EdgeKind::Direct).count(), 1);
		let inner: Vec<_> = scene.edges_of(EdgeKind::Inner).collect();
		// a1 -> anchor, a2 -> anchor, and one shared anchor -> b1.
		assert_eq!(inner.len(), 3);
		let shared = inner
			.iter()
			.find(|e| e.source == pairing.target_anchor)
			.unwrap();
		assert_eq!(shared.count, 2);

		let aggregate = scene.edges_of(EdgeKind::Namespace).next().unwrap();
		assert_eq!(aggregate.source, pairing.source_anchor);
		assert_eq!(aggregate.from, pairing.source_point);
	}

	#[test]
	fn namespace_edges_sit_on_current_anchors_after_settling() {
		let mut driver = loaded();
		driver.converge();
		for _ in 0..400 {
			driver.tick();
		}
		assert_eq!(driver.alpha(), driver.config().alpha_min);
		assert!(driver.drag_namespace("ns-b", 35.0, -20.0));
		driver.tick();

		let scene = build_scene(&driver, &Selection::default());
		let anchor = |id: &str| {
			driver
				.containers()
				.values()
				.flat_map(|c| c.anchors.iter())
				.find(|a| a.id == id)
				.map(|a| a.position)
		};
		let aggregates: Vec<_> = scene.edges_of(EdgeKind::Namespace).collect();
		assert_eq!(aggregates.len(), 1);
		for edge in aggregates {
			assert_eq!(Some(edge.from), anchor(&edge.source));
			assert_eq!(Some(edge.to), anchor(&edge.target));
		}
		for edge in scene.edges_of(EdgeKind::Inner) {
			let anchor_end = if edge.source_is_node {
				(edge.to, &edge.target)
			} else {
				(edge.from, &edge.source)
			};
			assert_eq!(Some(anchor_end.0), anchor(anchor_end.1));
		}
	}

	#[test]
	fn external_groups_are_labelled_by_name() {
		let mut input = GraphInput {
			nodes: vec![GraphNode::deployment("d1", "web", "ext")],
			..Default::default()
		};
		let mut external = GraphNode::deployment("ext", "", "");
		external.entity.kind = EntityType::ExternalEntities;
		external.entity.deployment = None;
		input.nodes.push(external);
		let mut driver = LayoutDriver::new(LayoutConfig::default(), 800.0, 600.0);
		driver.load(&input);

		let scene = build_scene(&driver, &Selection::default());
		let labels: Vec<(&str, &str)> = scene
			.containers
			.iter()
			.map(|c| (c.namespace.as_str(), c.label.as_str()))
			.collect();
		assert_eq!(labels, vec![("ext", "ext"), ("external:ext", "External Entiti...")]);
	}

	#[test]
	fn building_twice_is_identical() {
		let mut driver = loaded();
		driver.converge();
		let selection = Selection::default();
		let first = build_scene(&driver, &selection);
		driver.sync();
		assert_eq!(first, build_scene(&driver, &selection));
	}

	#[test]
	fn selection_dims_unrelated_elements() {
		let mut driver = loaded();
		driver.converge();
		let mut selection = Selection::default();
		assert!(build_scene(&driver, &selection).nodes.iter().all(|n| !n.background));

		selection.click_node("b1");
		let scene = build_scene(&driver, &selection);
		let node = |id: &str| scene.nodes.iter().find(|n| n.id == id).unwrap();
		assert!(node("b1").selected && !node("b1").background);
		assert!(!node("a1").background);
		let direct = scene.edges_of(EdgeKind::Direct).next().unwrap();
		assert!(direct.background);
	}
}
