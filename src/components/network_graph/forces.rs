//! Custom forces layered on top of the physics engine's charge and springs.
//!
//! Each force reads a snapshot of body positions and accumulates a
//! displacement per body; the driver writes the summed displacements back
//! into the simulation. Pinned bodies never move.

use std::collections::BTreeMap;

use super::geometry::{Point, attraction, collision_push};

/// Snapshot of one simulated node.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
	pub namespace: String,
	pub position: Point,
	pub radius: f64,
	pub exposed: bool,
	pub pinned: bool,
}

/// Pulls members of a namespace towards a shared centroid.
#[derive(Clone, Copy, Debug)]
pub struct ClusterForce {
	strength: f64,
}

impl ClusterForce {
	/// `strength` is clamped to `[0, 1]`; 0 disables clustering.
	pub fn new(strength: f64) -> Self {
		let strength = if strength.is_finite() {
			strength.clamp(0.0, 1.0)
		} else {
			0.0
		};
		Self { strength }
	}

	pub fn strength(&self) -> f64 {
		self.strength
	}

	/// Per-namespace centroid: the first internet-exposed member when one
	/// exists, otherwise the mean member position.
	pub fn centroids(bodies: &[Body]) -> BTreeMap<&str, Point> {
		let mut groups: BTreeMap<&str, Vec<&Body>> = BTreeMap::new();
		for body in bodies {
			groups.entry(body.namespace.as_str()).or_default().push(body);
		}
		groups
			.into_iter()
			.filter_map(|(ns, members)| {
				let centroid = match members.iter().find(|b| b.exposed) {
					Some(exposed) => Some(exposed.position),
					None => Point::mean(members.iter().map(|b| b.position)),
				};
				centroid.map(|c| (ns, c))
			})
			.collect()
	}

	pub fn apply(&self, bodies: &[Body], alpha: f64, out: &mut [(f64, f64)]) {
		if self.strength == 0.0 {
			return;
		}
		let centroids = Self::centroids(bodies);
		for (body, delta) in bodies.iter().zip(out.iter_mut()) {
			if body.pinned {
				continue;
			}
			if let Some(&c) = centroids.get(body.namespace.as_str()) {
				let (dx, dy) = attraction(body.position, c, self.strength, alpha);
				delta.0 += dx;
				delta.1 += dy;
			}
		}
	}
}

/// Keeps node circles from overlapping.
#[derive(Clone, Copy, Debug)]
pub struct CollisionForce {
	pub padding: f64,
}

impl CollisionForce {
	pub fn apply(&self, bodies: &[Body], out: &mut [(f64, f64)]) {
		for i in 0..bodies.len() {
			for j in (i + 1)..bodies.len() {
				let (a, b) = (&bodies[i], &bodies[j]);
				let min_distance = a.radius + b.radius + self.padding;
				let Some((dx, dy)) = collision_push(a.position, b.position, min_distance, i * 31 + j)
				else {
					continue;
				};
				// A pinned partner leaves the whole push to the free body.
				let (share_a, share_b) = match (a.pinned, b.pinned) {
					(true, true) => (0.0, 0.0),
					(true, false) => (0.0, 2.0),
					(false, true) => (2.0, 0.0),
					(false, false) => (1.0, 1.0),
				};
				out[i].0 += dx * share_a;
				out[i].1 += dy * share_a;
				out[j].0 -= dx * share_b;
				out[j].1 -= dy * share_b;
			}
		}
	}
}

/// Drifts the free bodies' mean position towards the viewport center.
#[derive(Clone, Copy, Debug)]
pub struct CenterForce {
	pub center: Point,
	pub strength: f64,
}

impl CenterForce {
	pub fn apply(&self, bodies: &[Body], out: &mut [(f64, f64)]) {
		let Some(mean) = Point::mean(bodies.iter().filter(|b| !b.pinned).map(|b| b.position))
		else {
			return;
		};
		let (dx, dy) = attraction(mean, self.center, self.strength, 1.0);
		for (body, delta) in bodies.iter().zip(out.iter_mut()) {
			if !body.pinned {
				delta.0 += dx;
				delta.1 += dy;
			}
		}
	}
}
