//! End-to-end topology scenarios against the headless layout core.

use super::config::LayoutConfig;
use super::geometry::Point;
use super::layout::{LayoutDriver, Phase};
use super::scene::{EdgeKind, build_scene};
use super::selection::Selection;
use super::state::{GraphSession, Hit, HostEvent};
use super::types::{EntityType, FilterMode, FlowRecord, GraphInput, GraphNode};
use super::zoom::ZoomController;

const ACTIVE: FlowRecord = FlowRecord {
	active: true,
	allowed: true,
};
const ALLOWED: FlowRecord = FlowRecord {
	active: false,
	allowed: true,
};

fn placed(id: &str, name: &str, namespace: &str, x: f64, y: f64) -> GraphNode {
	let mut node = GraphNode::deployment(id, name, namespace);
	node.position = Some(Point::new(x, y));
	node
}

/// ns-a holds two deployments, ns-b and ns-c one each. a/d1 talks to b/d1,
/// a/d2 is merely allowed to reach c/d1.
fn three_namespaces(filter: FilterMode) -> GraphInput {
	let mut input = GraphInput {
		nodes: vec![
			placed("a/d1", "frontend", "ns-a", 200.0, 200.0),
			placed("a/d2", "worker", "ns-a", 260.0, 220.0),
			placed("b/d1", "api", "ns-b", 800.0, 200.0),
			placed("c/d1", "db", "ns-c", 500.0, 650.0),
		],
		filter_state: filter,
		..Default::default()
	};
	input.add_flow("a/d1", "b/d1", ACTIVE);
	input.add_flow("a/d2", "c/d1", ALLOWED);
	input
}

fn loaded(filter: FilterMode) -> LayoutDriver {
	let mut driver = LayoutDriver::new(LayoutConfig::default(), 1000.0, 800.0);
	driver.load(&three_namespaces(filter));
	driver
}

#[test]
fn three_namespaces_yield_three_containers_and_two_aggregates() {
	let mut driver = loaded(FilterMode::All);
	assert_eq!(driver.phase(), Phase::Seeded);
	assert_eq!(driver.containers().len(), 3);
	assert_eq!(driver.nodes().len(), 4);
	assert_eq!(driver.containers()["ns-a"].members, vec!["a/d1", "a/d2"]);

	let edges = driver.namespace_edges();
	assert_eq!(edges.len(), 2);
	assert!(edges.iter().all(|e| e.count == 1));
	let ab = edges.iter().find(|e| e.touches("ns-b")).unwrap();
	let ac = edges.iter().find(|e| e.touches("ns-c")).unwrap();
	assert!(ab.is_active);
	assert!(!ac.is_active);

	driver.converge();
	assert_eq!(driver.phase(), Phase::Running);
	for (a, b) in [("ns-a", "ns-b"), ("ns-a", "ns-c")] {
		let pairing = driver.router().pairing(a, b).unwrap();
		assert_eq!(pairing.source_side.opposite(), pairing.target_side);
		assert!(pairing.source_anchor.starts_with(a));
		assert!(pairing.target_anchor.starts_with(b));
	}
}

#[test]
fn active_filter_drops_the_allowed_only_aggregate() {
	let driver = loaded(FilterMode::Active);
	assert_eq!(driver.containers().len(), 3);
	let edges = driver.namespace_edges();
	assert_eq!(edges.len(), 1);
	assert_eq!((edges[0].source.as_str(), edges[0].target.as_str()), ("ns-a", "ns-b"));
	assert!(!driver.is_node_active("c/d1"));
	assert!(driver.is_node_active("a/d1"));
}

#[test]
fn pairings_read_the_same_from_both_ends() {
	let mut driver = loaded(FilterMode::All);
	driver.converge();
	for _ in 0..20 {
		assert!(driver.tick());
	}
	let forward = driver.router().pairing("ns-a", "ns-c").unwrap();
	let backward = driver.router().pairing("ns-c", "ns-a").unwrap();
	assert_eq!(forward.swapped(), backward);
	assert_eq!(forward.source_point, backward.target_point);
	assert!((forward.distance - forward.source_point.distance(forward.target_point)).abs() < 1e-9);
}

#[test]
fn reload_keeps_positions_of_surviving_nodes() {
	let mut driver = loaded(FilterMode::All);
	driver.converge();
	for _ in 0..10 {
		driver.tick();
	}
	let before = driver.positions();

	let mut next = three_namespaces(FilterMode::All);
	next.nodes.push(GraphNode::deployment("b/d2", "cache", "ns-b"));
	driver.load(&next);

	assert_eq!(driver.phase(), Phase::Seeded);
	for (id, p) in &before {
		assert_eq!(driver.position(id), Some(*p), "{id} moved on reload");
	}
	assert!(driver.position("b/d2").is_some());
	assert_eq!(driver.containers()["ns-b"].members.len(), 2);
}

#[test]
fn external_group_never_merges_with_a_namespace_of_the_same_name() {
	let mut input = three_namespaces(FilterMode::All);
	let mut external = GraphNode::deployment("ns-b", "", "");
	external.entity.kind = EntityType::ExternalEntities;
	external.entity.deployment = None;
	input.nodes.push(external);
	input.add_flow("b/d1", "ns-b", ACTIVE);

	let mut driver = LayoutDriver::new(LayoutConfig::default(), 1000.0, 800.0);
	driver.load(&input);
	assert_eq!(driver.containers().len(), 4);
	assert_eq!(driver.containers()["ns-b"].members, vec!["b/d1"]);
	assert_eq!(driver.containers()["external:ns-b"].members, vec!["ns-b"]);
	assert_eq!(driver.containers()["external:ns-b"].label, "External Entities");

	let edge = driver
		.namespace_edges()
		.iter()
		.find(|e| e.touches("external:ns-b"))
		.unwrap();
	assert!(edge.touches("ns-b"));
	let details = driver.namespace_details("ns-b").unwrap();
	assert_eq!(details.deployments.len(), 1);
}

#[test]
fn scene_rebuild_is_idempotent() {
	let mut driver = loaded(FilterMode::All);
	driver.converge();
	let selection = Selection::default();
	let first = build_scene(&driver, &selection);
	driver.sync();
	let second = build_scene(&driver, &selection);
	assert_eq!(first, second);

	// Two cross links, each split into a node->anchor and an anchor->node leg.
	assert_eq!(first.edges_of(EdgeKind::Inner).count(), 4);
	assert_eq!(first.edges_of(EdgeKind::Namespace).count(), 2);
	assert_eq!(first.edges_of(EdgeKind::Direct).count(), 0);
}

#[test]
fn zoom_stays_within_limits() {
	let config = LayoutConfig::default();
	let mut zoom = ZoomController::new(&config, 1000.0, 800.0);
	for _ in 0..100 {
		zoom.wheel(10.0, 10.0, -1.0);
	}
	assert_eq!(zoom.transform().k, config.max_zoom);
	for _ in 0..200 {
		zoom.zoom_out();
	}
	assert_eq!(zoom.transform().k, config.min_zoom);
}

#[test]
fn session_click_flow_reports_to_the_host() {
	let mut session = GraphSession::new(
		LayoutConfig::default(),
		&three_namespaces(FilterMode::All),
		1000.0,
		800.0,
	);
	assert!(session.frame(0.0));
	assert_eq!(session.driver.phase(), Phase::Running);

	let node = session.driver.position("b/d1").unwrap();
	let t = session.transform();
	let (sx, sy) = t.graph_to_screen(node);
	assert_eq!(session.hit(sx, sy), Hit::Node("b/d1".into()));

	session.pointer_down(sx, sy);
	match session.pointer_up() {
		Some(HostEvent::NodeClick(details)) => {
			assert_eq!(details.id, "b/d1");
			assert_eq!(details.ingress, vec!["a/d1".to_string()]);
			assert!(details.is_active);
		}
		other => panic!("expected node click, got {other:?}"),
	}

	// Far outside every container.
	let far = t.graph_to_screen(Point::new(-10_000.0, -10_000.0));
	session.pointer_down(far.0, far.1);
	assert_eq!(session.pointer_up(), Some(HostEvent::ClickOutside));
	assert!(!session.selection.has_selection());

	session.teardown();
	assert!(!session.frame(16.0));
}
