//! Layout driver: owns the simulation and every position in the graph.
//!
//! Lifecycle per loaded input:
//! 1. **Seed** ([`LayoutDriver::load`]): nodes that existed before keep their
//!    last position; new nodes go to their hint or near the viewport center
//!    with seeded jitter.
//! 2. **Pre-converge** ([`LayoutDriver::converge`]): a bounded number of
//!    synchronous steps without link springs, so namespaces cluster before
//!    links pull on them. Links are attached and the pairing cache is built.
//! 3. **Run** ([`LayoutDriver::tick`]): one step plus container/anchor sync
//!    per animation frame.
//!
//! The driver is explicitly stepped; after [`LayoutDriver::teardown`] every
//! tick is discarded.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::{debug, info, warn};

use super::config::LayoutConfig;
use super::forces::{Body, CenterForce, ClusterForce, CollisionForce};
use super::geometry::{Point, Rect, Side};
use super::links::{Link, NamespaceEdge, active_node_ids, aggregate_namespace_edges, derive_links};
use super::rng::SeededRng;
use super::router::{Anchor, AnchorSet, SideAnchorRouter, anchor_id};
use super::types::{FilterMode, GraphInput, NamespaceDetails, NodeDetails, ResolvedNode};

/// Where the driver is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	/// Nothing to lay out; no simulation runs.
	Empty,
	/// Positions seeded, pre-convergence pending.
	Seeded,
	/// Links attached, ticking continuously.
	Running,
	/// Torn down; ticks are discarded.
	TornDown,
}

/// Bounding box and boundary anchors of one namespace.
#[derive(Clone, Debug, PartialEq)]
pub struct Container {
	pub namespace: String,
	/// Display name; differs from `namespace` for external groups.
	pub label: String,
	pub bounds: Rect,
	pub anchors: AnchorSet,
	/// Member node ids in input order.
	pub members: Vec<String>,
	pub internet_access: bool,
	pub is_active: bool,
}

fn container_anchors(namespace: &str, bounds: Rect) -> AnchorSet {
	Side::ALL.map(|side| Anchor {
		id: anchor_id(namespace, side),
		namespace: namespace.to_string(),
		side,
		position: bounds.anchor(side),
	})
}

/// Rounds through `f32`, the precision the physics engine stores.
fn snap(p: Point) -> Point {
	Point::new(p.x as f32 as f64, p.y as f32 as f64)
}

pub struct LayoutDriver {
	config: LayoutConfig,
	width: f64,
	height: f64,
	graph: ForceGraph<usize, ()>,
	/// Engine index per slot; slots follow input order.
	engine: Vec<DefaultNodeIdx>,
	nodes: Vec<ResolvedNode>,
	positions: Vec<Point>,
	pinned: Vec<bool>,
	index: BTreeMap<String, usize>,
	links: Vec<Link>,
	namespace_edges: Vec<NamespaceEdge>,
	filter: FilterMode,
	containers: BTreeMap<String, Container>,
	router: SideAnchorRouter,
	phase: Phase,
	alpha: f64,
	/// Namespaces with a member that moved since the router last looked.
	moved: BTreeSet<String>,
}

impl LayoutDriver {
	pub fn new(config: LayoutConfig, width: f64, height: f64) -> Self {
		let graph = ForceGraph::new(Self::parameters(&config));
		Self {
			config,
			width,
			height,
			graph,
			engine: Vec::new(),
			nodes: Vec::new(),
			positions: Vec::new(),
			pinned: Vec::new(),
			index: BTreeMap::new(),
			links: Vec::new(),
			namespace_edges: Vec::new(),
			filter: FilterMode::All,
			containers: BTreeMap::new(),
			router: SideAnchorRouter::default(),
			phase: Phase::Empty,
			alpha: 1.0,
			moved: BTreeSet::new(),
		}
	}

	fn parameters(config: &LayoutConfig) -> SimulationParameters {
		SimulationParameters {
			force_charge: config.charge as f32,
			force_spring: config.spring as f32,
			force_max: config.max_force as f32,
			node_speed: config.node_speed as f32,
			damping_factor: config.damping as f32,
		}
	}

	/// Replaces the whole input and restarts the lifecycle at the seed phase.
	///
	/// Positions of nodes whose id survives are carried over verbatim.
	pub fn load(&mut self, input: &GraphInput) {
		if self.phase == Phase::TornDown {
			debug!("netgraph: load after teardown ignored");
			return;
		}
		let previous: HashMap<String, Point> = self
			.nodes
			.iter()
			.map(|n| n.id.clone())
			.zip(self.positions.iter().copied())
			.collect();

		let mut nodes = Vec::with_capacity(input.nodes.len());
		let mut seen = BTreeSet::new();
		for raw in &input.nodes {
			match raw.resolve() {
				Ok(node) if seen.insert(node.id.clone()) => nodes.push(node),
				Ok(node) => warn!("netgraph: skipping duplicate node {}", node.id),
				Err(e) => warn!("netgraph: skipping node: {}", e),
			}
		}

		self.filter = input.filter_state;
		self.links = derive_links(&nodes, &input.network_flow_mapping, self.filter);
		self.namespace_edges = aggregate_namespace_edges(&self.links);
		self.graph = ForceGraph::new(Self::parameters(&self.config));
		self.router.clear();
		self.containers.clear();
		self.index.clear();
		self.engine.clear();
		self.positions.clear();
		self.pinned.clear();

		let mut rng = SeededRng::new(self.config.random_seed);
		let center = self.center();
		for (slot, node) in nodes.iter().enumerate() {
			let position = match previous.get(&node.id) {
				Some(&p) => p,
				None => node.hint.filter(|p| p.is_finite()).unwrap_or_else(|| {
					let jitter = self.config.seed_jitter;
					center.offset(rng.next_signed() * jitter, rng.next_signed() * jitter)
				}),
			};
			let position = snap(position);
			let idx = self.graph.add_node(NodeData {
				x: position.x as f32,
				y: position.y as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: slot,
			});
			self.engine.push(idx);
			self.index.insert(node.id.clone(), slot);
			self.positions.push(position);
			self.pinned.push(false);
		}
		self.nodes = nodes;
		self.alpha = 1.0;
		self.moved.clear();
		self.phase = if self.nodes.is_empty() {
			Phase::Empty
		} else {
			Phase::Seeded
		};
		self.sync();

		info!(
			"netgraph: loaded {} nodes in {} namespaces, {} links ({} excluded)",
			self.nodes.len(),
			self.containers.len(),
			self.links.len(),
			input.nodes.len() - self.nodes.len()
		);
	}

	/// Runs the synchronous pre-convergence steps, attaches link springs and
	/// builds the full pairing cache. No-op outside the seed phase.
	pub fn converge(&mut self) {
		if self.phase != Phase::Seeded {
			return;
		}
		let ticks = self.config.pre_ticks(self.nodes.len());
		for _ in 0..ticks {
			self.step();
		}
		for link in &self.links {
			if let (Some(&s), Some(&t)) = (self.index.get(&link.source), self.index.get(&link.target)) {
				self.graph.add_edge(self.engine[s], self.engine[t], EdgeData::default());
			}
		}
		self.sync();
		let anchors = self.anchor_sets();
		self.router.recompute_all(&anchors);
		self.moved.clear();
		self.phase = Phase::Running;
		debug!("netgraph: pre-converged in {} steps", ticks);
	}

	/// Advances the layout by one frame. Returns `false` when nothing was
	/// applied (empty graph or torn down).
	pub fn tick(&mut self) -> bool {
		match self.phase {
			Phase::TornDown => {
				debug!("netgraph: stale tick discarded");
				return false;
			}
			Phase::Empty => return false,
			Phase::Seeded => self.converge(),
			Phase::Running => {}
		}
		self.step();
		self.sync();

		let anchors = self.anchor_sets();
		let moved = std::mem::take(&mut self.moved);
		self.router.recompute_touching(&anchors, &moved);
		self.router.fill_missing(&anchors);
		true
	}

	/// Stops the driver for good. Later ticks and loads are discarded.
	pub fn teardown(&mut self) {
		if self.phase != Phase::TornDown {
			info!("netgraph: layout torn down");
		}
		self.phase = Phase::TornDown;
	}

	pub fn is_alive(&self) -> bool {
		self.phase != Phase::TornDown
	}

	pub fn phase(&self) -> Phase {
		self.phase
	}

	#[cfg(test)]
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn config(&self) -> &LayoutConfig {
		&self.config
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	pub fn viewport(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	fn center(&self) -> Point {
		Point::new(self.width / 2.0, self.height / 2.0)
	}

	fn read_positions(&self) -> Vec<Point> {
		let mut out = self.positions.clone();
		self.graph.visit_nodes(|node| {
			if let Some(p) = out.get_mut(node.data.user_data) {
				*p = Point::new(node.x() as f64, node.y() as f64);
			}
		});
		out
	}

	fn write_positions(&mut self) {
		let (positions, pinned) = (&self.positions, &self.pinned);
		self.graph.visit_nodes_mut(|node| {
			let slot = node.data.user_data;
			if let Some(p) = positions.get(slot) {
				node.data.x = p.x as f32;
				node.data.y = p.y as f32;
				node.data.is_anchor = pinned.get(slot).copied().unwrap_or(false);
			}
		});
	}

	fn bodies(&self, positions: &[Point]) -> Vec<Body> {
		self.nodes
			.iter()
			.zip(positions)
			.zip(&self.pinned)
			.map(|((node, &position), &pinned)| Body {
				namespace: node.namespace.clone(),
				position,
				radius: self.config.node_radius,
				exposed: node.internet_access,
				pinned,
			})
			.collect()
	}

	/// One physics step: engine charge and springs, then cluster, collision
	/// and centering. Non-finite results fall back to the previous position.
	fn step(&mut self) {
		let previous = self.positions.clone();
		self.graph.update(self.config.tick_dt as f32);
		let mut current = self.read_positions();
		for (p, prev) in current.iter_mut().zip(&previous) {
			if !p.is_finite() {
				*p = *prev;
			}
		}

		let bodies = self.bodies(&current);
		let mut deltas = vec![(0.0, 0.0); bodies.len()];
		ClusterForce::new(self.config.cluster_strength()).apply(&bodies, self.alpha, &mut deltas);
		CollisionForce {
			padding: self.config.collision_padding,
		}
		.apply(&bodies, &mut deltas);
		CenterForce {
			center: self.center(),
			strength: self.config.center_strength,
		}
		.apply(&bodies, &mut deltas);

		for ((p, &(dx, dy)), prev) in current.iter_mut().zip(&deltas).zip(&previous) {
			let next = p.offset(dx, dy);
			*p = snap(if next.is_finite() { next } else { *prev });
		}
		for ((p, prev), node) in current.iter().zip(&previous).zip(&self.nodes) {
			if p != prev {
				self.moved.insert(node.namespace.clone());
			}
		}
		self.positions = current;
		self.write_positions();
		self.alpha = (self.alpha - self.alpha * self.config.alpha_decay).max(self.config.alpha_min);
	}

	/// Recomputes every container's bounding box and anchors from the current
	/// positions. Idempotent for unchanged positions.
	pub fn sync(&mut self) {
		let active = active_node_ids(&self.links);
		let pad = self.config.node_radius + self.config.container_padding;
		let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
		for (slot, node) in self.nodes.iter().enumerate() {
			groups.entry(node.namespace.as_str()).or_default().push(slot);
		}

		let mut containers = BTreeMap::new();
		for (namespace, slots) in groups {
			let Some(bounds) = Rect::from_points(slots.iter().map(|&s| self.positions[s])) else {
				continue;
			};
			let bounds = bounds.padded(pad);
			let members: Vec<String> = slots.iter().map(|&s| self.nodes[s].id.clone()).collect();
			containers.insert(
				namespace.to_string(),
				Container {
					namespace: namespace.to_string(),
					label: self.nodes[slots[0]].group_label().to_string(),
					anchors: container_anchors(namespace, bounds),
					bounds,
					internet_access: slots.iter().any(|&s| self.nodes[s].internet_access),
					is_active: members.iter().any(|m| active.contains(m.as_str())),
					members,
				},
			);
		}
		self.containers = containers;
		let anchors = self.anchor_sets();
		self.router.retain_namespaces(&anchors);
	}

	pub fn anchor_sets(&self) -> BTreeMap<String, AnchorSet> {
		self.containers
			.iter()
			.map(|(ns, c)| (ns.clone(), c.anchors.clone()))
			.collect()
	}

	/// Current position of the anchor on `side` of `namespace`'s container.
	pub fn anchor_position(&self, namespace: &str, side: Side) -> Option<Point> {
		self.containers
			.get(namespace)?
			.anchors
			.iter()
			.find(|a| a.side == side)
			.map(|a| a.position)
	}

	fn set_position(&mut self, slot: usize, to: Point, pin: bool) {
		let to = snap(to);
		if self.positions[slot] != to {
			self.moved.insert(self.nodes[slot].namespace.clone());
		}
		self.positions[slot] = to;
		self.pinned[slot] |= pin;
		let pinned = self.pinned[slot];
		self.graph.visit_nodes_mut(|node| {
			if node.data.user_data == slot {
				node.data.x = to.x as f32;
				node.data.y = to.y as f32;
				node.data.is_anchor = pinned;
			}
		});
	}

	fn reheat(&mut self) {
		self.alpha = self.alpha.max(self.config.reheat_alpha);
	}

	/// Moves a node to `to` and pins it there. Returns the node's namespace.
	pub fn drag_node(&mut self, id: &str, to: Point) -> Option<String> {
		let slot = *self.index.get(id)?;
		if !to.is_finite() || !self.is_alive() {
			return None;
		}
		self.set_position(slot, to, true);
		self.reheat();
		Some(self.nodes[slot].namespace.clone())
	}

	/// Translates every member of `namespace` by `(dx, dy)`.
	pub fn drag_namespace(&mut self, namespace: &str, dx: f64, dy: f64) -> bool {
		if !(dx.is_finite() && dy.is_finite()) || !self.is_alive() {
			return false;
		}
		let slots: Vec<usize> = self
			.nodes
			.iter()
			.enumerate()
			.filter(|(_, n)| n.namespace == namespace)
			.map(|(slot, _)| slot)
			.collect();
		if slots.is_empty() {
			return false;
		}
		for slot in slots {
			let to = self.positions[slot].offset(dx, dy);
			self.set_position(slot, to, false);
		}
		self.reheat();
		true
	}

	/// Re-syncs containers and recomputes only the pairings involving
	/// `namespace`. Called (throttled) after drags.
	pub fn refresh_after_drag(&mut self, namespace: &str) {
		if !self.is_alive() {
			return;
		}
		self.sync();
		let anchors = self.anchor_sets();
		self.router.recompute_for(&anchors, namespace);
	}

	pub fn nodes(&self) -> &[ResolvedNode] {
		&self.nodes
	}

	pub fn node(&self, id: &str) -> Option<&ResolvedNode> {
		self.index.get(id).map(|&slot| &self.nodes[slot])
	}

	pub fn position(&self, id: &str) -> Option<Point> {
		self.index.get(id).map(|&slot| self.positions[slot])
	}

	pub fn positions(&self) -> BTreeMap<String, Point> {
		self.nodes
			.iter()
			.map(|n| n.id.clone())
			.zip(self.positions.iter().copied())
			.collect()
	}

	#[cfg(test)]
	pub fn is_pinned(&self, id: &str) -> bool {
		self.index.get(id).is_some_and(|&slot| self.pinned[slot])
	}

	pub fn links(&self) -> &[Link] {
		&self.links
	}

	pub fn namespace_edges(&self) -> &[NamespaceEdge] {
		&self.namespace_edges
	}

	pub fn containers(&self) -> &BTreeMap<String, Container> {
		&self.containers
	}

	pub fn router(&self) -> &SideAnchorRouter {
		&self.router
	}

	/// Union of every container's bounds.
	pub fn bounds(&self) -> Option<Rect> {
		self.containers
			.values()
			.map(|c| c.bounds)
			.reduce(|a, b| a.union(b))
	}

	/// Topmost node whose circle (grown to `hit_radius`) contains `p`.
	pub fn node_at(&self, p: Point, hit_radius: f64) -> Option<&str> {
		self.nodes
			.iter()
			.zip(&self.positions)
			.rev()
			.find(|(_, pos)| pos.distance(p) <= hit_radius)
			.map(|(n, _)| n.id.as_str())
	}

	/// Smallest container containing `p`.
	pub fn namespace_at(&self, p: Point) -> Option<&str> {
		self.containers
			.values()
			.filter(|c| c.bounds.contains(p))
			.min_by(|a, b| {
				let (aa, ab) = (
					a.bounds.width() * a.bounds.height(),
					b.bounds.width() * b.bounds.height(),
				);
				aa.total_cmp(&ab)
			})
			.map(|c| c.namespace.as_str())
	}

	/// Whether a node takes part in an active connection under the current
	/// filter. Internet-exposed nodes count as active in `All` mode.
	pub fn is_node_active(&self, id: &str) -> bool {
		let Some(node) = self.node(id) else {
			return false;
		};
		if !self.filter.shows_activity() {
			return false;
		}
		(self.filter == FilterMode::All && node.internet_access)
			|| self.links.iter().any(|l| l.is_active && l.touches(id))
	}

	pub fn node_details(&self, id: &str) -> Option<NodeDetails> {
		let node = self.node(id)?;
		let mut ingress = BTreeSet::new();
		let mut egress = BTreeSet::new();
		for link in self.links.iter().filter(|l| l.touches(id)) {
			let Some(peer) = link.peer(id) else {
				continue;
			};
			if link.source == id || link.bidirectional {
				egress.insert(peer.to_string());
			}
			if link.target == id || link.bidirectional {
				ingress.insert(peer.to_string());
			}
		}
		Some(NodeDetails {
			id: node.id.clone(),
			name: node.name.clone(),
			namespace: node.namespace.clone(),
			kind: node.kind,
			internet_access: node.internet_access,
			is_active: self.is_node_active(id),
			ingress: ingress.into_iter().collect(),
			egress: egress.into_iter().collect(),
		})
	}

	pub fn namespace_details(&self, namespace: &str) -> Option<NamespaceDetails> {
		let container = self.containers.get(namespace)?;
		Some(NamespaceDetails {
			id: namespace.to_string(),
			deployments: container
				.members
				.iter()
				.filter_map(|id| self.node_details(id))
				.collect(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network_graph::types::{FlowRecord, GraphNode};

	fn input() -> GraphInput {
		let mut input = GraphInput {
			nodes: vec![
				GraphNode::deployment("a1", "api", "ns-a"),
				GraphNode::deployment("a2", "db", "ns-a"),
				GraphNode::deployment("b1", "web", "ns-b"),
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
		input
	}

	fn driver() -> LayoutDriver {
		LayoutDriver::new(LayoutConfig::default(), 800.0, 600.0)
	}

	#[test]
	fn empty_input_never_starts() {
		let mut d = driver();
		d.load(&GraphInput::default());
		assert_eq!(d.phase(), Phase::Empty);
		assert!(!d.tick());
		assert!(d.containers().is_empty());
		assert!(d.bounds().is_none());
	}

	#[test]
	fn seeding_is_reproducible_and_near_center() {
		let (mut a, mut b) = (driver(), driver());
		a.load(&input());
		b.load(&input());
		assert_eq!(a.positions(), b.positions());
		let jitter = LayoutConfig::default().seed_jitter;
		for p in a.positions().values() {
			assert!((p.x - 400.0).abs() <= jitter && (p.y - 300.0).abs() <= jitter);
		}
	}

	#[test]
	fn persisted_nodes_keep_their_position() {
		let mut d = driver();
		d.load(&input());
		for _ in 0..5 {
			d.tick();
		}
		let before = d.positions();

		let mut next = input();
		next.nodes.insert(0, GraphNode::deployment("c1", "cache", "ns-c"));
		d.load(&next);
		assert_eq!(d.phase(), Phase::Seeded);
		for (id, p) in &before {
			assert_eq!(d.position(id), Some(*p), "{id} moved on reload");
		}
		assert!(d.position("c1").is_some());
	}

	#[test]
	fn position_hint_is_used_for_new_nodes() {
		let mut input = input();
		input.nodes[0].position = Some(Point::new(12.5, 40.0));
		let mut d = driver();
		d.load(&input);
		assert_eq!(d.position("a1"), Some(Point::new(12.5, 40.0)));
	}

	#[test]
	fn malformed_nodes_are_excluded() {
		let mut input = input();
		input.nodes.push(GraphNode::deployment("bad", "x", ""));
		input.nodes.push(GraphNode::deployment("a1", "dup", "ns-z"));
		input.add_flow(
			"bad",
			"a1",
			FlowRecord {
				active: true,
				allowed: true,
			},
		);
		let mut d = driver();
		d.load(&input);
		assert_eq!(d.nodes().len(), 3);
		assert!(d.node("bad").is_none());
		assert_eq!(d.node("a1").map(|n| n.namespace.as_str()), Some("ns-a"));
		assert_eq!(d.links().len(), 1);
	}

	#[test]
	fn convergence_builds_router_and_containers() {
		let mut d = driver();
		d.load(&input());
		assert!(d.router().is_empty());
		assert_eq!(d.containers().len(), 2);

		d.converge();
		assert_eq!(d.phase(), Phase::Running);
		assert_eq!(d.router().len(), 1);
		let pairing = d.router().pairing("ns-a", "ns-b").unwrap();
		assert_eq!(pairing.target_side, pairing.source_side.opposite());
		for p in d.positions().values() {
			assert!(p.is_finite());
		}
	}

	/// Four namespaces of five deployments, each namespace talking to the next.
	fn ring_of_namespaces() -> GraphInput {
		let mut input = GraphInput::default();
		for ns in 0..4 {
			for d in 0..5 {
				input.nodes.push(GraphNode::deployment(
					&format!("n{ns}/d{d}"),
					&format!("svc-{d}"),
					&format!("ns-{ns}"),
				));
			}
		}
		for ns in 0..4 {
			for d in 0..2 {
				input.add_flow(
					&format!("n{ns}/d{d}"),
					&format!("n{}/d{}", (ns + 1) % 4, d + 2),
					FlowRecord {
						active: d == 0,
						allowed: true,
					},
				);
			}
		}
		input
	}

	#[test]
	fn cached_pairings_stay_fresh_while_ticking() {
		let mut d = driver();
		d.load(&ring_of_namespaces());
		d.converge();
		assert_eq!(d.router().len(), 6);
		for _ in 0..120 {
			assert!(d.tick());
			let mut fresh = SideAnchorRouter::default();
			fresh.recompute_all(&d.anchor_sets());
			assert_eq!(fresh.len(), d.router().len());
			for ((a, b), pairing) in fresh.pairings() {
				assert_eq!(d.router().pairing(a, b).as_ref(), Some(pairing), "{a} -> {b}");
			}
		}
	}

	#[test]
	fn pairings_follow_a_settled_layout() {
		let mut d = driver();
		d.load(&ring_of_namespaces());
		d.converge();
		for _ in 0..400 {
			d.tick();
		}
		assert_eq!(d.alpha(), d.config().alpha_min);

		assert!(d.drag_namespace("ns-0", -600.0, 0.0));
		d.tick();
		let mut fresh = SideAnchorRouter::default();
		fresh.recompute_all(&d.anchor_sets());
		for ((a, b), pairing) in fresh.pairings() {
			assert_eq!(d.router().pairing(a, b).as_ref(), Some(pairing), "{a} -> {b}");
		}
		let pairing = d.router().pairing("ns-0", "ns-1").unwrap();
		assert_eq!(
			d.anchor_position("ns-0", pairing.source_side),
			Some(pairing.source_point)
		);
	}

	#[test]
	fn containers_wrap_their_members() {
		let mut d = driver();
		d.load(&input());
		d.converge();
		for container in d.containers().values() {
			for id in &container.members {
				assert!(container.bounds.contains(d.position(id).unwrap()));
			}
		}
		assert!(d.containers()["ns-a"].is_active);
	}

	#[test]
	fn teardown_discards_ticks() {
		let mut d = driver();
		d.load(&input());
		d.converge();
		let before = d.positions();
		d.teardown();
		assert!(!d.tick());
		assert_eq!(d.positions(), before);
		d.load(&GraphInput::default());
		assert_eq!(d.nodes().len(), 3);
	}

	#[test]
	fn dragging_pins_and_refreshes_routes() {
		let mut d = driver();
		d.load(&input());
		d.converge();
		let ns = d.drag_node("b1", Point::new(2000.0, 300.0)).unwrap();
		assert_eq!(ns, "ns-b");
		assert!(d.is_pinned("b1"));
		d.refresh_after_drag(&ns);
		let pairing = d.router().pairing("ns-a", "ns-b").unwrap();
		assert_eq!(pairing.source_side, Side::Right);
		assert_eq!(pairing.target_side, Side::Left);

		d.tick();
		assert_eq!(d.position("b1"), Some(Point::new(2000.0, 300.0)));
	}

	#[test]
	fn namespace_drag_moves_all_members() {
		let mut d = driver();
		d.load(&input());
		let before = d.positions();
		assert!(d.drag_namespace("ns-a", 10.0, -5.0));
		for id in ["a1", "a2"] {
			let (old, new) = (before[id], d.position(id).unwrap());
			assert!((new.x - old.x - 10.0).abs() < 1e-3);
			assert!((new.y - old.y + 5.0).abs() < 1e-3);
		}
		assert_eq!(d.position("b1"), Some(before["b1"]));
		assert!(!d.drag_namespace("missing", 1.0, 1.0));
	}

	#[test]
	fn details_report_direction_and_members() {
		let mut d = driver();
		d.load(&input());
		let a1 = d.node_details("a1").unwrap();
		assert_eq!(a1.egress, vec!["b1".to_string()]);
		assert!(a1.ingress.is_empty());
		assert!(a1.is_active);
		assert!(!d.node_details("a2").unwrap().is_active);

		let ns = d.namespace_details("ns-a").unwrap();
		let ids: Vec<&str> = ns.deployments.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, vec!["a1", "a2"]);
	}
}
