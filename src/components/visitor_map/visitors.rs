use rand::Rng;

/// A synthetic visitor, alive until it ages out.
#[derive(Clone, Debug, PartialEq)]
pub struct Visitor {
	pub id: u64,
	pub longitude: f64,
	pub latitude: f64,
	pub arrival_ms: f64,
}

/// Longitude/latitude box visitors are drawn from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LandArea {
	pub lon: (f64, f64),
	pub lat: (f64, f64),
}

/// Rough boxes over populated land.
pub const LAND_AREAS: &[LandArea] = &[
	LandArea {
		lon: (-80.0, -20.0),
		lat: (20.0, 50.0),
	},
	LandArea {
		lon: (-30.0, 60.0),
		lat: (-20.0, 50.0),
	},
	LandArea {
		lon: (-10.0, 80.0),
		lat: (20.0, 50.0),
	},
	LandArea {
		lon: (80.0, 180.0),
		lat: (20.0, 60.0),
	},
	LandArea {
		lon: (-180.0, -80.0),
		lat: (17.0, 71.0),
	},
	LandArea {
		lon: (110.0, 180.0),
		lat: (-55.0, -10.0),
	},
];

/// Pick a box uniformly, then a point uniformly inside it.
pub fn random_point<R: Rng>(rng: &mut R, areas: &[LandArea]) -> Option<(f64, f64)> {
	if areas.is_empty() {
		return None;
	}
	let area = areas[rng.gen_range(0..areas.len())];
	Some((
		rng.gen_range(area.lon.0..=area.lon.1),
		rng.gen_range(area.lat.0..=area.lat.1),
	))
}

/// The live visitor set. Only `add` and `remove_old` change it.
#[derive(Clone, Debug, Default)]
pub struct VisitorPool {
	visitors: Vec<Visitor>,
	next_id: u64,
}

impl VisitorPool {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add(&mut self, longitude: f64, latitude: f64, now_ms: f64) -> u64 {
		let id = self.next_id;
		self.next_id += 1;
		self.visitors.push(Visitor {
			id,
			longitude,
			latitude,
			arrival_ms: now_ms,
		});
		id
	}

	pub fn spawn<R: Rng>(&mut self, rng: &mut R, now_ms: f64) -> Option<u64> {
		let (lon, lat) = random_point(rng, LAND_AREAS)?;
		Some(self.add(lon, lat, now_ms))
	}

	/// Drop every visitor whose age has reached `max_age_ms`. Returns how many
	/// left.
	pub fn remove_old(&mut self, now_ms: f64, max_age_ms: f64) -> usize {
		let before = self.visitors.len();
		self.visitors.retain(|v| now_ms - v.arrival_ms < max_age_ms);
		before - self.visitors.len()
	}

	pub fn visitors(&self) -> &[Visitor] {
		&self.visitors
	}

	pub fn len(&self) -> usize {
		self.visitors.len()
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;

	#[test]
	fn ids_are_monotonic() {
		let mut pool = VisitorPool::new();
		let a = pool.add(0.0, 0.0, 0.0);
		let b = pool.add(1.0, 1.0, 0.0);
		pool.remove_old(10_000.0, 1.0);
		let c = pool.add(2.0, 2.0, 10_000.0);
		assert!(a < b && b < c);
	}

	#[test]
	fn expiry_splits_exactly_at_max_age() {
		let mut pool = VisitorPool::new();
		for arrival in [0.0, 500.0, 999.0, 1000.0, 1500.0] {
			pool.add(0.0, 0.0, arrival);
		}
		// at t=2000 with max age 1000: ages 2000, 1500, 1001, 1000, 500
		let removed = pool.remove_old(2000.0, 1000.0);
		assert_eq!(removed, 4);
		assert_eq!(pool.len(), 1);
		assert_eq!(pool.visitors()[0].arrival_ms, 1500.0);
		for v in pool.visitors() {
			assert!(2000.0 - v.arrival_ms < 1000.0);
		}
	}

	#[test]
	fn expiry_keeps_everyone_younger_than_max_age() {
		let mut pool = VisitorPool::new();
		for i in 0..50 {
			pool.add(0.0, 0.0, i as f64 * 100.0);
		}
		let now = 5000.0;
		let young = pool
			.visitors()
			.iter()
			.filter(|v| now - v.arrival_ms < 3000.0)
			.count();
		pool.remove_old(now, 3000.0);
		assert_eq!(pool.len(), young);
	}

	#[test]
	fn spawned_points_fall_inside_a_land_area() {
		let mut rng = StdRng::seed_from_u64(7);
		let mut pool = VisitorPool::new();
		for i in 0..200 {
			pool.spawn(&mut rng, i as f64);
		}
		assert_eq!(pool.len(), 200);
		for v in pool.visitors() {
			assert!(LAND_AREAS.iter().any(|a| {
				(a.lon.0..=a.lon.1).contains(&v.longitude) && (a.lat.0..=a.lat.1).contains(&v.latitude)
			}));
		}
	}

	#[test]
	fn no_areas_means_no_point() {
		let mut rng = StdRng::seed_from_u64(1);
		assert_eq!(random_point(&mut rng, &[]), None);
	}
}
