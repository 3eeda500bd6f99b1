//! Layout, routing and interaction tunables.

use serde::Deserialize;

/// Every tunable of the layout driver, zoom controller and interaction layer.
///
/// Deserializable so the host can override any subset from JSON; missing
/// fields keep their defaults.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
	/// Seed for the jitter applied to newly placed nodes.
	pub random_seed: u64,
	/// Radius of a deployment node in world units.
	pub node_radius: f64,
	/// Half-width of the square jitter window around the viewport center.
	pub seed_jitter: f64,

	/// Many-body charge passed to the physics engine.
	pub charge: f64,
	/// Link spring strength once links are attached.
	pub spring: f64,
	/// Cap on the engine force applied to a single node.
	pub max_force: f64,
	/// Engine velocity scale.
	pub node_speed: f64,
	/// Velocity kept per engine step.
	pub damping: f64,

	/// Pull of each node towards its namespace centroid, in `[0, 1]`.
	pub cluster_strength: f64,
	/// Extra separation added to twice the node radius.
	pub collision_padding: f64,
	/// Fraction of the offset to the viewport center removed per tick.
	pub center_strength: f64,

	/// Upper bound on synchronous pre-convergence steps.
	pub max_pre_ticks: usize,
	/// Fraction of alpha lost per step.
	pub alpha_decay: f64,
	/// Floor alpha settles at; the custom forces keep this strength.
	pub alpha_min: f64,
	/// Alpha restored when a drag disturbs the layout.
	pub reheat_alpha: f64,
	/// Simulated seconds per tick.
	pub tick_dt: f64,

	/// Space between member nodes and their container border.
	pub container_padding: f64,

	/// Smallest zoom factor reachable by zooming out.
	pub min_zoom: f64,
	/// Largest zoom factor.
	pub max_zoom: f64,
	/// Multiplicative factor applied by one zoom-in step.
	pub zoom_step: f64,
	/// Screen-space margin kept around the graph by zoom-to-fit.
	pub fit_padding: f64,

	/// Minimum interval between expensive refreshes triggered by drag and resize.
	pub throttle_ms: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			random_seed: 1,
			node_radius: 8.0,
			seed_jitter: 50.0,
			charge: 150.0,
			spring: 0.05,
			max_force: 100.0,
			node_speed: 3000.0,
			damping: 0.9,
			cluster_strength: 0.5,
			collision_padding: 6.0,
			center_strength: 0.05,
			max_pre_ticks: 300,
			alpha_decay: 0.0228,
			alpha_min: 0.001,
			reheat_alpha: 0.3,
			tick_dt: 0.016,
			container_padding: 20.0,
			min_zoom: 0.1,
			max_zoom: 4.0,
			zoom_step: 1.25,
			fit_padding: 50.0,
			throttle_ms: 100.0,
		}
	}
}

impl LayoutConfig {
	/// Cluster strength clamped to its valid range.
	pub fn cluster_strength(&self) -> f64 {
		if self.cluster_strength.is_finite() {
			self.cluster_strength.clamp(0.0, 1.0)
		} else {
			0.0
		}
	}

	/// Number of synchronous steps run before links are attached:
	/// node count squared, capped.
	pub fn pre_ticks(&self, node_count: usize) -> usize {
		node_count.saturating_mul(node_count).min(self.max_pre_ticks)
	}
}
