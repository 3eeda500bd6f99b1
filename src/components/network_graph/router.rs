//! Side-anchor routing between namespace containers.
//!
//! Every container exposes four anchors, one per side. For each pair of
//! namespaces the router picks the closest pair of anchors on geometrically
//! opposite sides (top/bottom, left/right) and caches it. Cross-namespace
//! edges are drawn between the cached anchors instead of through unrelated
//! containers.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::debug;

use super::geometry::{Point, Side};
use super::links::pair_key;

/// Stable id of the anchor on `side` of `namespace`.
pub fn anchor_id(namespace: &str, side: Side) -> String {
	format!("{}_{}", namespace, side.as_str())
}

/// Absolute position of one boundary anchor.
#[derive(Clone, Debug, PartialEq)]
pub struct Anchor {
	pub id: String,
	pub namespace: String,
	pub side: Side,
	pub position: Point,
}

/// The four anchors of one namespace container, in `Side::ALL` order.
pub type AnchorSet = [Anchor; 4];

/// Winning anchor pair for an ordered namespace pair.
#[derive(Clone, Debug, PartialEq)]
pub struct SidePairing {
	pub source_anchor: String,
	pub target_anchor: String,
	pub source_side: Side,
	pub target_side: Side,
	pub source_point: Point,
	pub target_point: Point,
	pub distance: f64,
}

impl SidePairing {
	pub fn swapped(&self) -> SidePairing {
		SidePairing {
			source_anchor: self.target_anchor.clone(),
			target_anchor: self.source_anchor.clone(),
			source_side: self.target_side,
			target_side: self.source_side,
			source_point: self.target_point,
			target_point: self.source_point,
			distance: self.distance,
		}
	}
}

/// Pairing cache keyed by the unordered namespace pair.
///
/// Entries are stored oriented from the lexicographically smaller namespace
/// to the larger one; [`SideAnchorRouter::pairing`] re-orients on lookup.
#[derive(Clone, Debug, Default)]
pub struct SideAnchorRouter {
	cache: BTreeMap<(String, String), SidePairing>,
}

impl SideAnchorRouter {
	pub fn clear(&mut self) {
		self.cache.clear();
	}

	pub fn len(&self) -> usize {
		self.cache.len()
	}

	#[cfg(test)]
	pub fn is_empty(&self) -> bool {
		self.cache.is_empty()
	}

	/// Cached pairing oriented from `source` to `target`.
	pub fn pairing(&self, source: &str, target: &str) -> Option<SidePairing> {
		let pairing = self.cache.get(&pair_key(source, target))?;
		if source <= target {
			Some(pairing.clone())
		} else {
			Some(pairing.swapped())
		}
	}

	#[cfg(test)]
	pub fn pairings(&self) -> impl Iterator<Item = (&(String, String), &SidePairing)> {
		self.cache.iter()
	}

	/// Recomputes every namespace pair.
	pub fn recompute_all(&mut self, anchors: &BTreeMap<String, AnchorSet>) {
		self.recompute(anchors, |_, _| true);
		debug!(
			"router: full recompute over {} namespaces, {} pairs",
			anchors.len(),
			self.len()
		);
	}

	/// Recomputes only the pairs that involve `namespace`.
	pub fn recompute_for(&mut self, anchors: &BTreeMap<String, AnchorSet>, namespace: &str) {
		debug!("router: partial recompute for {}", namespace);
		self.recompute(anchors, |a, b| a == namespace || b == namespace);
	}

	/// Recomputes the pairs that involve any of `namespaces`.
	pub fn recompute_touching(
		&mut self,
		anchors: &BTreeMap<String, AnchorSet>,
		namespaces: &BTreeSet<String>,
	) {
		if namespaces.is_empty() {
			return;
		}
		self.recompute(anchors, |a, b| namespaces.contains(a) || namespaces.contains(b));
	}

	/// Computes pairs that have no cached entry yet.
	pub fn fill_missing(&mut self, anchors: &BTreeMap<String, AnchorSet>) {
		let cached: Vec<(String, String)> = self.cache.keys().cloned().collect();
		self.recompute(anchors, |a, b| {
			cached
				.binary_search_by(|(x, y)| (x.as_str(), y.as_str()).cmp(&(a, b)))
				.is_err()
		});
	}

	/// Drops pairs whose namespaces no longer exist.
	pub fn retain_namespaces(&mut self, anchors: &BTreeMap<String, AnchorSet>) {
		self.cache
			.retain(|(a, b), _| anchors.contains_key(a) && anchors.contains_key(b));
	}

	fn recompute<F>(&mut self, anchors: &BTreeMap<String, AnchorSet>, wanted: F)
	where
		F: Fn(&str, &str) -> bool,
	{
		let mut distances: HashMap<(String, String), f64> = HashMap::new();
		let names: Vec<&String> = anchors.keys().collect();
		for (i, source) in names.iter().enumerate() {
			for target in &names[i + 1..] {
				if !wanted(source, target) {
					continue;
				}
				let shortest = closest_sides(&anchors[*source], &anchors[*target], &mut distances);
				let key = ((*source).clone(), (*target).clone());
				match shortest {
					Some(pairing) => {
						self.cache.insert(key, pairing);
					}
					None => debug!(
						"router: degenerate pairing for {}/{}, keeping previous",
						source, target
					),
				}
			}
		}
	}
}

/// Closest opposite-side anchor pair, or `None` when no finite distance exists.
///
/// `distances` memoizes anchor-to-anchor distances for one recomputation
/// pass; the key is the sorted anchor id pair since distance is symmetric.
fn closest_sides(
	source: &AnchorSet,
	target: &AnchorSet,
	distances: &mut HashMap<(String, String), f64>,
) -> Option<SidePairing> {
	let mut shortest: Option<SidePairing> = None;
	for from in source {
		let Some(to) = target.iter().find(|a| a.side == from.side.opposite()) else {
			continue;
		};
		let distance = *distances
			.entry(pair_key(&from.id, &to.id))
			.or_insert_with(|| from.position.distance(to.position));
		if !distance.is_finite() {
			continue;
		}
		if shortest.as_ref().is_none_or(|s| s.distance > distance) {
			shortest = Some(SidePairing {
				source_anchor: from.id.clone(),
				target_anchor: to.id.clone(),
				source_side: from.side,
				target_side: to.side,
				source_point: from.position,
				target_point: to.position,
				distance,
			});
		}
	}
	shortest
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network_graph::geometry::Rect;

	fn anchors_for(ns: &str, rect: Rect) -> AnchorSet {
		Side::ALL.map(|side| Anchor {
			id: anchor_id(ns, side),
			namespace: ns.to_string(),
			side,
			position: rect.anchor(side),
		})
	}

	fn rect(x: f64, y: f64) -> Rect {
		Rect {
			min_x: x,
			min_y: y,
			max_x: x + 20.0,
			max_y: y + 10.0,
		}
	}

	fn layout() -> BTreeMap<String, AnchorSet> {
		[
			("a", rect(0.0, 0.0)),
			("b", rect(100.0, 0.0)),
			("c", rect(0.0, 100.0)),
		]
		.into_iter()
		.map(|(ns, r)| (ns.to_string(), anchors_for(ns, r)))
		.collect()
	}

	#[test]
	fn picks_facing_sides() {
		let mut router = SideAnchorRouter::default();
		router.recompute_all(&layout());
		assert_eq!(router.len(), 3);

		let ab = router.pairing("a", "b").unwrap();
		assert_eq!((ab.source_side, ab.target_side), (Side::Right, Side::Left));
		assert_eq!(ab.source_anchor, "a_right");
		assert!((ab.distance - 80.0).abs() < 1e-9);

		let ac = router.pairing("a", "c").unwrap();
		assert_eq!((ac.source_side, ac.target_side), (Side::Bottom, Side::Top));
	}

	#[test]
	fn pairings_are_symmetric_and_opposite() {
		let mut router = SideAnchorRouter::default();
		router.recompute_all(&layout());
		for ((a, b), _) in router.pairings() {
			let forward = router.pairing(a, b).unwrap();
			let backward = router.pairing(b, a).unwrap();
			assert_eq!(forward, backward.swapped());
			assert_eq!(forward.target_side, forward.source_side.opposite());
			let d = forward.source_point.distance(forward.target_point);
			assert!((forward.distance - d).abs() < 1e-9);
		}
	}

	#[test]
	fn partial_recompute_only_touches_moved_namespace() {
		let mut anchors = layout();
		let mut router = SideAnchorRouter::default();
		router.recompute_all(&anchors);
		let before_bc = router.pairing("b", "c").unwrap();

		// Move b below a and c, but also nudge c without telling the router.
		anchors.insert("b".into(), anchors_for("b", rect(0.0, 300.0)));
		anchors.insert("c".into(), anchors_for("c", rect(500.0, 100.0)));
		router.recompute_for(&anchors, "b");

		let ab = router.pairing("a", "b").unwrap();
		assert_eq!((ab.source_side, ab.target_side), (Side::Bottom, Side::Top));
		let bc = router.pairing("b", "c").unwrap();
		assert_ne!(bc, before_bc);
		// a/c is not keyed by b, so it keeps the stale geometry.
		let ac = router.pairing("a", "c").unwrap();
		assert_eq!((ac.source_side, ac.target_side), (Side::Bottom, Side::Top));
	}

	#[test]
	fn touching_recompute_follows_every_moved_namespace() {
		let mut anchors = layout();
		let mut router = SideAnchorRouter::default();
		router.recompute_all(&anchors);

		anchors.insert("b".into(), anchors_for("b", rect(0.0, 300.0)));
		anchors.insert("c".into(), anchors_for("c", rect(500.0, 100.0)));
		router.recompute_touching(&anchors, &["b".to_string(), "c".to_string()].into());

		let mut fresh = SideAnchorRouter::default();
		fresh.recompute_all(&anchors);
		for ((a, b), pairing) in fresh.pairings() {
			assert_eq!(router.pairing(a, b).as_ref(), Some(pairing));
		}

		let untouched = router.pairing("a", "b").unwrap();
		router.recompute_touching(&anchors, &BTreeSet::new());
		assert_eq!(router.pairing("a", "b").unwrap(), untouched);
	}

	#[test]
	fn non_finite_geometry_keeps_previous_pairing() {
		let mut anchors = layout();
		let mut router = SideAnchorRouter::default();
		router.recompute_all(&anchors);
		let before = router.pairing("a", "b").unwrap();

		let mut broken = anchors_for("b", rect(100.0, 0.0));
		for anchor in &mut broken {
			anchor.position = Point::new(f64::NAN, 0.0);
		}
		anchors.insert("b".into(), broken);
		router.recompute_for(&anchors, "b");
		assert_eq!(router.pairing("a", "b").unwrap(), before);
	}

	#[test]
	fn fill_missing_leaves_existing_entries() {
		let mut anchors = layout();
		let mut router = SideAnchorRouter::default();
		router.recompute_all(&anchors);
		let before = router.pairing("a", "b").unwrap();

		anchors.insert("b".into(), anchors_for("b", rect(0.0, 300.0)));
		anchors.insert("d".into(), anchors_for("d", rect(300.0, 300.0)));
		router.fill_missing(&anchors);
		assert_eq!(router.len(), 6);
		assert_eq!(router.pairing("a", "b").unwrap(), before);
	}

	#[test]
	fn single_namespace_has_empty_cache() {
		let anchors: BTreeMap<String, AnchorSet> =
			[("solo".to_string(), anchors_for("solo", rect(0.0, 0.0)))].into();
		let mut router = SideAnchorRouter::default();
		router.recompute_all(&anchors);
		assert!(router.is_empty());
	}
}
