//! Per-instance graph session: layout, selection, view and pointer tracking.
//!
//! Created once when the component mounts and mutated by the animation loop
//! and pointer handlers. Nothing here touches the DOM, so the full
//! interaction flow can be driven from tests.

use log::debug;

use super::config::LayoutConfig;
use super::geometry::Point;
use super::layout::{LayoutDriver, Phase};
use super::scale::{ScaleConfig, ScaledValues};
use super::scene::{Scene, build_scene};
use super::selection::{Selection, SelectionChange};
use super::theme::Theme;
use super::throttle::Throttle;
use super::types::{GraphInput, NamespaceDetails, NodeDetails};
use super::zoom::{ViewTransform, ZoomController};

/// Pointer travel (screen pixels) below which a press counts as a click.
const CLICK_SLOP: f64 = 3.0;

/// Notification for the host callbacks.
#[derive(Clone, Debug, PartialEq)]
pub enum HostEvent {
	NodeClick(NodeDetails),
	NamespaceClick(NamespaceDetails),
	ClickOutside,
}

/// What lies under a screen point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Hit {
	Node(String),
	Namespace(String),
	Empty,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DragTarget {
	#[default]
	None,
	Node(String),
	Namespace(String),
}

/// Tracks an in-progress node or namespace drag.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub target: DragTarget,
	pub start_x: f64,
	pub start_y: f64,
	/// Graph-space pointer position at the previous move.
	pub last: Point,
	pub moved: bool,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
	pub moved: bool,
}

pub struct GraphSession {
	pub driver: LayoutDriver,
	pub selection: Selection,
	pub zoom: ZoomController,
	pub drag: DragState,
	pub pan: PanState,
	pub scale: ScaleConfig,
	pub theme: Theme,
	drag_refresh: Throttle,
	resize_refresh: Throttle,
	dragged_namespace: Option<String>,
	fitted: bool,
	scene: Scene,
}

impl GraphSession {
	pub fn new(config: LayoutConfig, input: &GraphInput, width: f64, height: f64) -> Self {
		let zoom = ZoomController::new(&config, width, height);
		let (drag_refresh, resize_refresh) = (
			Throttle::new(config.throttle_ms),
			Throttle::new(config.throttle_ms),
		);
		let mut session = Self {
			driver: LayoutDriver::new(config, width, height),
			selection: Selection::default(),
			zoom,
			drag: DragState::default(),
			pan: PanState::default(),
			scale: ScaleConfig::default(),
			theme: Theme::default(),
			drag_refresh,
			resize_refresh,
			dragged_namespace: None,
			fitted: false,
			scene: Scene::default(),
		};
		session.load(input);
		session
	}

	/// Replaces the input. The layout restarts from its seed phase.
	pub fn load(&mut self, input: &GraphInput) {
		self.driver.load(input);
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.dragged_namespace = None;
		self.fitted = false;
		let stale = self
			.selection
			.selected_node()
			.is_some_and(|id| self.driver.node(id).is_none())
			|| self
				.selection
				.selected_namespace()
				.is_some_and(|ns| !self.driver.containers().contains_key(ns));
		if stale {
			self.selection.click_background();
		}
		self.refresh_scene();
	}

	pub fn scene(&self) -> &Scene {
		&self.scene
	}

	pub fn transform(&self) -> ViewTransform {
		self.zoom.transform()
	}

	pub fn scaled(&self) -> ScaledValues {
		ScaledValues::new(&self.scale, self.zoom.transform().k, self.driver.config().node_radius)
	}

	fn refresh_scene(&mut self) {
		self.scene = build_scene(&self.driver, &self.selection);
	}

	/// One animation frame. Returns `false` once the session is torn down.
	pub fn frame(&mut self, now_ms: f64) -> bool {
		if !self.driver.is_alive() {
			debug!("netgraph: frame after teardown ignored");
			return false;
		}
		if self.drag_refresh.flush(now_ms) {
			if let Some(ns) = self.dragged_namespace.clone() {
				self.driver.refresh_after_drag(&ns);
			}
		}
		if self.resize_refresh.flush(now_ms) {
			self.zoom_to_fit();
		}
		self.driver.tick();
		if !self.fitted && self.driver.phase() == Phase::Running {
			self.fitted = true;
			self.zoom_to_fit();
		}
		self.refresh_scene();
		true
	}

	pub fn teardown(&mut self) {
		self.driver.teardown();
	}

	pub fn is_alive(&self) -> bool {
		self.driver.is_alive()
	}

	pub fn hit(&self, sx: f64, sy: f64) -> Hit {
		let p = self.zoom.transform().screen_to_graph(sx, sy);
		let scaled = self.scaled();
		let radius = scaled.hit_radius.max(scaled.node_radius);
		if let Some(id) = self.driver.node_at(p, radius) {
			return Hit::Node(id.to_string());
		}
		match self.driver.namespace_at(p) {
			Some(ns) => Hit::Namespace(ns.to_string()),
			None => Hit::Empty,
		}
	}

	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		let target = match self.hit(sx, sy) {
			Hit::Node(id) => DragTarget::Node(id),
			Hit::Namespace(ns) => DragTarget::Namespace(ns),
			Hit::Empty => {
				let t = self.zoom.transform();
				self.pan = PanState {
					active: true,
					start_x: sx,
					start_y: sy,
					transform_start_x: t.x,
					transform_start_y: t.y,
					moved: false,
				};
				return;
			}
		};
		self.drag = DragState {
			target,
			start_x: sx,
			start_y: sy,
			last: self.zoom.transform().screen_to_graph(sx, sy),
			moved: false,
		};
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64, now_ms: f64) {
		let travelled = |x0: f64, y0: f64| (sx - x0).hypot(sy - y0) >= CLICK_SLOP;

		if self.drag.target != DragTarget::None {
			if !self.drag.moved && !travelled(self.drag.start_x, self.drag.start_y) {
				return;
			}
			self.drag.moved = true;
			let p = self.zoom.transform().screen_to_graph(sx, sy);
			let namespace = match &self.drag.target {
				DragTarget::Node(id) => self.driver.drag_node(id, p),
				DragTarget::Namespace(ns) => {
					let (dx, dy) = (p.x - self.drag.last.x, p.y - self.drag.last.y);
					self.driver.drag_namespace(ns, dx, dy).then(|| ns.clone())
				}
				DragTarget::None => None,
			};
			self.drag.last = p;
			if let Some(ns) = namespace {
				if self.drag_refresh.poll(now_ms) {
					self.driver.refresh_after_drag(&ns);
				}
				self.dragged_namespace = Some(ns);
			}
			self.refresh_scene();
		} else if self.pan.active {
			self.pan.moved |= travelled(self.pan.start_x, self.pan.start_y);
			self.zoom.pan_to(
				self.pan.transform_start_x + (sx - self.pan.start_x),
				self.pan.transform_start_y + (sy - self.pan.start_y),
			);
		} else {
			match self.hit(sx, sy) {
				Hit::Node(id) => self.selection.pointer_enter_node(&id),
				_ => self.selection.pointer_leave_node(),
			}
			self.refresh_scene();
		}
	}

	/// Ends a drag or pan. A press that never moved is a click.
	pub fn pointer_up(&mut self) -> Option<HostEvent> {
		let drag = std::mem::take(&mut self.drag);
		let pan = std::mem::take(&mut self.pan);

		let change = match drag.target {
			DragTarget::Node(id) if !drag.moved => Some(self.selection.click_node(&id)),
			DragTarget::Namespace(ns) if !drag.moved => Some(self.selection.click_namespace(&ns)),
			DragTarget::Node(_) | DragTarget::Namespace(_) => {
				if let Some(ns) = self.dragged_namespace.take() {
					self.driver.refresh_after_drag(&ns);
				}
				None
			}
			DragTarget::None if pan.active && !pan.moved => Some(self.selection.click_background()),
			DragTarget::None => None,
		};
		let event = change.and_then(|change| self.host_event(change));
		self.refresh_scene();
		event
	}

	pub fn pointer_leave(&mut self) {
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.selection.pointer_leave_node();
		self.refresh_scene();
	}

	fn host_event(&self, change: SelectionChange) -> Option<HostEvent> {
		match change {
			SelectionChange::Node(id) => self.driver.node_details(&id).map(HostEvent::NodeClick),
			SelectionChange::Namespace(ns) => self
				.driver
				.namespace_details(&ns)
				.map(HostEvent::NamespaceClick),
			SelectionChange::Cleared => Some(HostEvent::ClickOutside),
		}
	}

	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) -> ViewTransform {
		self.zoom.wheel(sx, sy, delta_y)
	}

	pub fn zoom_in(&mut self) -> ViewTransform {
		self.zoom.zoom_in()
	}

	pub fn zoom_out(&mut self) -> ViewTransform {
		self.zoom.zoom_out()
	}

	pub fn zoom_to_fit(&mut self) -> ViewTransform {
		self.zoom.zoom_to_fit(self.driver.bounds())
	}

	/// Resizes the viewport; the throttled part re-fits the view.
	pub fn resize(&mut self, width: f64, height: f64, now_ms: f64) {
		self.driver.resize(width, height);
		self.zoom.resize(width, height);
		if self.resize_refresh.poll(now_ms) {
			self.zoom_to_fit();
		}
	}

	pub fn set_selected_node(&mut self, id: Option<&str>) {
		let id = id.filter(|id| self.driver.node(id).is_some());
		self.selection.set_selected_node(id);
		self.refresh_scene();
	}

	pub fn node_data(&self, id: &str) -> Option<NodeDetails> {
		self.driver.node_details(id)
	}
}
