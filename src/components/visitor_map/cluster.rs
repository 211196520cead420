//! Greedy screen-space clustering of visitors.
//!
//! The grouping is single-pass and seed-first: visitors are taken in slice
//! order, each unassigned one seeds a cluster and absorbs every other
//! unassigned visitor within the pixel threshold *of the seed*. The result is
//! not optimal and depends on input order; a point within range of two seeds
//! joins whichever seed comes first. Clusters are rebuilt from scratch every
//! update and carry no identity between updates.

use super::projection::Projection;
use super::visitors::Visitor;

#[derive(Clone, Debug, PartialEq)]
pub struct Cluster {
	/// Per-update key, `cluster-0`, `cluster-1`, ...
	pub id: String,
	/// Mean of the members' geographic coordinates.
	pub longitude: f64,
	pub latitude: f64,
	pub members: Vec<u64>,
}

impl Cluster {
	pub fn count(&self) -> usize {
		self.members.len()
	}
}

/// Marker sizing for clusters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadiusScale {
	pub min: f64,
	pub max: f64,
	/// Pixels added per unit of `ln(count)`.
	pub factor: f64,
}

impl Default for RadiusScale {
	fn default() -> Self {
		Self {
			min: 4.0,
			max: 50.0,
			factor: 8.0,
		}
	}
}

impl RadiusScale {
	/// `min + ln(count) * factor`, capped at `max`. A single visitor gets `min`.
	pub fn radius(&self, count: usize) -> f64 {
		if count <= 1 {
			return self.min.min(self.max);
		}
		(self.min + (count as f64).ln() * self.factor).min(self.max)
	}
}

/// Group visitors whose projections lie within `threshold_px` of a seed.
/// Visitors without a finite projection are left out.
pub fn cluster_visitors<P: Projection + ?Sized>(
	visitors: &[Visitor],
	projection: &P,
	threshold_px: f64,
) -> Vec<Cluster> {
	let projected: Vec<(&Visitor, (f64, f64))> = visitors
		.iter()
		.filter_map(|v| {
			projection
				.project(v.longitude, v.latitude)
				.filter(|(x, y)| x.is_finite() && y.is_finite())
				.map(|px| (v, px))
		})
		.collect();

	let mut assigned = vec![false; projected.len()];
	let mut clusters = Vec::new();
	for seed in 0..projected.len() {
		if assigned[seed] {
			continue;
		}
		assigned[seed] = true;
		let (seed_visitor, (sx, sy)) = projected[seed];
		let mut members = vec![seed_visitor];

		for other in 0..projected.len() {
			if assigned[other] {
				continue;
			}
			let (visitor, (ox, oy)) = projected[other];
			if ((sx - ox).powi(2) + (sy - oy).powi(2)).sqrt() < threshold_px {
				assigned[other] = true;
				members.push(visitor);
			}
		}

		let n = members.len() as f64;
		let (lon_sum, lat_sum) = members
			.iter()
			.fold((0.0, 0.0), |(lon, lat), v| (lon + v.longitude, lat + v.latitude));
		clusters.push(Cluster {
			id: format!("cluster-{}", clusters.len()),
			longitude: lon_sum / n,
			latitude: lat_sum / n,
			members: members.iter().map(|v| v.id).collect(),
		});
	}
	clusters
}
