use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::boundaries::{Country, WORLD_ATLAS_URL, World};
use super::cluster::{Cluster, RadiusScale, cluster_visitors};
use super::markers::{MarkerLayer, MarkerStyle, MarkerTarget};
use super::projection::{Mercator, Projection};
use super::visitors::VisitorPool;
use crate::components::ticker::{Interval, Tick};

const MAX_FRAME_MS: f64 = 100.0;

#[derive(Clone, Debug)]
pub struct VisitorMapConfig {
	pub max_age_ms: f64,
	pub add_interval_ms: f64,
	pub update_interval_ms: f64,
	/// Screen distance below which visitors share a marker.
	pub cluster_distance_px: f64,
	pub radius: RadiusScale,
	pub marker_opacity: f64,
	pub boundary_url: String,
	/// Fixed seed for reproducible visitors; entropy when `None`.
	pub seed: Option<u64>,
}

impl Default for VisitorMapConfig {
	fn default() -> Self {
		Self {
			max_age_ms: 30_000.0,
			add_interval_ms: 250.0,
			update_interval_ms: 250.0,
			cluster_distance_px: 60.0,
			radius: RadiusScale::default(),
			marker_opacity: 0.4,
			boundary_url: WORLD_ATLAS_URL.to_string(),
			seed: None,
		}
	}
}

/// A country outline in screen space, split wherever it wraps the antimeridian.
#[derive(Clone, Debug, PartialEq)]
pub struct CountryPath {
	pub name: String,
	pub segments: Vec<Vec<(f64, f64)>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CountryTooltip<'a> {
	pub x: f64,
	pub y: f64,
	pub name: &'a str,
}

/// Everything the renderer needs for one frame.
#[derive(Clone, Debug)]
pub struct MapFrame<'a> {
	pub width: f64,
	pub height: f64,
	pub countries: &'a [CountryPath],
	pub markers: Vec<MarkerStyle>,
	pub tooltip: Option<CountryTooltip<'a>>,
}

pub struct VisitorMapState {
	config: VisitorMapConfig,
	pool: VisitorPool,
	rng: StdRng,
	add_timer: Interval,
	update_timer: Interval,
	projection: Mercator,
	width: f64,
	height: f64,
	clusters: Vec<Cluster>,
	markers: MarkerLayer,
	world: Option<World>,
	country_paths: Vec<CountryPath>,
	hovered_country: Option<(String, f64, f64)>,
	/// Live visitors as of the last update, after expiry.
	online: usize,
	last_tick_ms: Option<f64>,
}

impl VisitorMapState {
	pub fn new(config: VisitorMapConfig, width: f64, height: f64) -> Self {
		let rng = match config.seed {
			Some(seed) => StdRng::seed_from_u64(seed),
			None => StdRng::from_entropy(),
		};
		Self {
			add_timer: Interval::new(config.add_interval_ms),
			update_timer: Interval::new(config.update_interval_ms),
			config,
			pool: VisitorPool::new(),
			rng,
			projection: Mercator::fit_width(width, height),
			width,
			height,
			clusters: Vec::new(),
			markers: MarkerLayer::new(),
			world: None,
			country_paths: Vec::new(),
			hovered_country: None,
			online: 0,
			last_tick_ms: None,
		}
	}

	/// Live visitors, not clusters, as counted by the last update.
	pub fn visitor_count(&self) -> usize {
		self.online
	}

	/// Expire, then cluster what is left, then hand the clusters to the
	/// marker layer. Nothing is added between the two steps.
	pub fn update(&mut self, now_ms: f64) {
		let expired = self.pool.remove_old(now_ms, self.config.max_age_ms);
		if expired > 0 {
			debug!("Expired {expired} visitors, {} live", self.pool.len());
		}
		self.online = self.pool.len();
		self.clusters = cluster_visitors(
			self.pool.visitors(),
			&self.projection,
			self.config.cluster_distance_px,
		);
		let targets: Vec<MarkerTarget> = self
			.clusters
			.iter()
			.filter_map(|cluster| {
				let (x, y) = self
					.projection
					.project(cluster.longitude, cluster.latitude)?;
				Some(MarkerTarget {
					key: cluster.id.clone(),
					x,
					y,
					radius: self.config.radius.radius(cluster.count()),
				})
			})
			.collect();
		self.markers.reconcile(
			&targets,
			self.config.marker_opacity,
			self.update_timer.period_ms() / 2.0,
		);
	}

	pub fn set_world(&mut self, world: World) {
		info!("World boundaries loaded: {} countries", world.countries.len());
		self.world = Some(world);
		self.project_countries();
	}

	/// New viewport: fresh projection and markers. Visitors and boundaries
	/// are kept; markers come back on the next update.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.projection = Mercator::fit_width(width, height);
		self.markers.clear();
		self.clusters.clear();
		self.hovered_country = None;
		self.project_countries();
		info!("Visitor map rebuilt at {width}x{height}");
	}

	fn project_countries(&mut self) {
		let Some(world) = &self.world else {
			self.country_paths.clear();
			return;
		};
		let projection = self.projection;
		let wrap = self.width / 2.0;
		self.country_paths = world
			.countries
			.iter()
			.map(|country| CountryPath {
				name: country.name.clone(),
				segments: project_outline(country, &projection, wrap),
			})
			.collect();
	}

	/// Record the country under the pointer, if boundaries are loaded.
	pub fn hover(&mut self, x: f64, y: f64) {
		self.hovered_country = self
			.projection
			.invert(x, y)
			.and_then(|(lon, lat)| self.world.as_ref()?.country_at(lon, lat))
			.map(|country| (country.name.clone(), x, y));
	}

	pub fn clear_hover(&mut self) {
		self.hovered_country = None;
	}

	pub fn frame(&self) -> MapFrame<'_> {
		let tooltip = self
			.hovered_country
			.as_ref()
			.map(|(name, x, y)| CountryTooltip { x: *x, y: *y, name });
		MapFrame {
			width: self.width,
			height: self.height,
			countries: &self.country_paths,
			markers: self.markers.styles().map(|(_, style)| style).collect(),
			tooltip,
		}
	}
}

/// Project every ring, starting a new segment whenever consecutive points
/// jump more than `wrap_px` horizontally.
fn project_outline<P: Projection>(
	country: &Country,
	projection: &P,
	wrap_px: f64,
) -> Vec<Vec<(f64, f64)>> {
	let mut segments = Vec::new();
	for ring in country.polygons.iter().flatten() {
		let mut current: Vec<(f64, f64)> = Vec::new();
		for &[lon, lat] in ring {
			let Some(point) = projection.project(lon, lat) else {
				continue;
			};
			if let Some(&(px, _)) = current.last() {
				if (point.0 - px).abs() > wrap_px {
					segments.push(std::mem::take(&mut current));
				}
			}
			current.push(point);
		}
		segments.push(current);
	}
	segments.retain(|s| s.len() > 1);
	segments
}

impl Tick for VisitorMapState {
	fn tick(&mut self, now_ms: f64) {
		let dt = self
			.last_tick_ms
			.map_or(0.0, |last| (now_ms - last).clamp(0.0, MAX_FRAME_MS));
		self.last_tick_ms = Some(now_ms);

		if self.add_timer.poll(now_ms) {
			self.pool.spawn(&mut self.rng, now_ms);
		}
		if self.update_timer.poll(now_ms) {
			self.update(now_ms);
		}
		self.markers.advance(dt);
	}
}
