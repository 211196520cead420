//! Country outlines decoded from a world-atlas TopoJSON topology.

use std::collections::HashMap;

use gloo_net::http::Request;
use serde::Deserialize;
use thiserror::Error;

pub const WORLD_ATLAS_URL: &str = "https://unpkg.com/world-atlas@2.0.2/countries-110m.json";

#[derive(Debug, Error)]
pub enum BoundaryError {
	#[error("request failed: {0}")]
	Request(#[from] gloo_net::Error),
	#[error("server answered with HTTP {0}")]
	Status(u16),
	#[error("malformed topology: {0}")]
	Decode(#[from] serde_json::Error),
	#[error("topology has no object named `{0}`")]
	MissingObject(String),
	#[error("arc index {0} out of range")]
	BadArc(i64),
}

#[derive(Deserialize)]
struct Topology {
	#[serde(default)]
	transform: Option<Transform>,
	arcs: Vec<Vec<Vec<f64>>>,
	objects: HashMap<String, Geometry>,
}

#[derive(Deserialize, Clone, Copy)]
struct Transform {
	scale: [f64; 2],
	translate: [f64; 2],
}

#[derive(Deserialize, Default)]
struct Properties {
	#[serde(default)]
	name: Option<String>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum Geometry {
	GeometryCollection {
		geometries: Vec<Geometry>,
	},
	Polygon {
		arcs: Vec<Vec<i64>>,
		#[serde(default)]
		properties: Properties,
	},
	MultiPolygon {
		arcs: Vec<Vec<Vec<i64>>>,
		#[serde(default)]
		properties: Properties,
	},
	#[serde(other)]
	Other,
}

/// Closed ring of `[lon, lat]` points.
pub type Ring = Vec<[f64; 2]>;

#[derive(Clone, Debug, PartialEq)]
pub struct Country {
	pub name: String,
	/// Each polygon is an exterior ring followed by its holes.
	pub polygons: Vec<Vec<Ring>>,
}

impl Country {
	pub fn contains(&self, lon: f64, lat: f64) -> bool {
		self.polygons.iter().any(|rings| {
			let mut rings = rings.iter();
			rings
				.next()
				.is_some_and(|outer| ring_contains(outer, lon, lat))
				&& !rings.any(|hole| ring_contains(hole, lon, lat))
		})
	}
}

fn ring_contains(ring: &[[f64; 2]], x: f64, y: f64) -> bool {
	let mut inside = false;
	let mut j = ring.len().wrapping_sub(1);
	for i in 0..ring.len() {
		let ([xi, yi], [xj, yj]) = (ring[i], ring[j]);
		if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
			inside = !inside;
		}
		j = i;
	}
	inside
}

/// Country outlines, loaded once and kept for the lifetime of the map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct World {
	pub countries: Vec<Country>,
}

impl World {
	pub fn from_topojson(text: &str, object: &str) -> Result<Self, BoundaryError> {
		let topology: Topology = serde_json::from_str(text)?;
		let arcs = decode_arcs(&topology.arcs, topology.transform);
		let root = topology
			.objects
			.get(object)
			.ok_or_else(|| BoundaryError::MissingObject(object.to_string()))?;
		let mut countries = Vec::new();
		collect_countries(root, &arcs, &mut countries)?;
		Ok(Self { countries })
	}

	pub fn country_at(&self, lon: f64, lat: f64) -> Option<&Country> {
		self.countries.iter().find(|c| c.contains(lon, lat))
	}
}

/// Undo quantization and delta encoding when the topology is transformed.
fn decode_arcs(arcs: &[Vec<Vec<f64>>], transform: Option<Transform>) -> Vec<Ring> {
	arcs.iter()
		.map(|arc| {
			let (mut x, mut y) = (0.0, 0.0);
			arc.iter()
				.filter(|p| p.len() >= 2)
				.map(|p| match transform {
					Some(t) => {
						x += p[0];
						y += p[1];
						[x * t.scale[0] + t.translate[0], y * t.scale[1] + t.translate[1]]
					}
					None => [p[0], p[1]],
				})
				.collect()
		})
		.collect()
}

/// Stitch arcs into a ring. Negative indices `!i` walk arc `i` backwards;
/// the shared endpoint between consecutive arcs is kept once.
fn stitch_ring(indices: &[i64], arcs: &[Ring]) -> Result<Ring, BoundaryError> {
	let mut ring: Ring = Vec::new();
	for &index in indices {
		let (arc_idx, reversed) = if index < 0 { (!index, true) } else { (index, false) };
		let arc = usize::try_from(arc_idx)
			.ok()
			.and_then(|i| arcs.get(i))
			.ok_or(BoundaryError::BadArc(index))?;
		ring.pop();
		if reversed {
			ring.extend(arc.iter().rev());
		} else {
			ring.extend(arc.iter());
		}
	}
	Ok(ring)
}

fn collect_countries(
	geometry: &Geometry,
	arcs: &[Ring],
	out: &mut Vec<Country>,
) -> Result<(), BoundaryError> {
	let polygon = |rings: &[Vec<i64>]| -> Result<Vec<Ring>, BoundaryError> {
		rings.iter().map(|ring| stitch_ring(ring, arcs)).collect()
	};
	match geometry {
		Geometry::GeometryCollection { geometries } => {
			for child in geometries {
				collect_countries(child, arcs, out)?;
			}
		}
		Geometry::Polygon { arcs: rings, properties } => out.push(Country {
			name: properties.name.clone().unwrap_or_default(),
			polygons: vec![polygon(rings)?],
		}),
		Geometry::MultiPolygon { arcs: polygons, properties } => out.push(Country {
			name: properties.name.clone().unwrap_or_default(),
			polygons: polygons
				.iter()
				.map(|rings| polygon(rings))
				.collect::<Result<_, _>>()?,
		}),
		Geometry::Other => {}
	}
	Ok(())
}

/// Fetch and decode the `countries` object of a world-atlas topology. One
/// attempt; the caller decides what to show on failure.
pub async fn fetch_world(url: &str) -> Result<World, BoundaryError> {
	let resp = Request::get(url).send().await?;
	if !resp.ok() {
		return Err(BoundaryError::Status(resp.status()));
	}
	let text = resp.text().await?;
	World::from_topojson(&text, "countries")
}

#[cfg(test)]
mod tests {
	use super::*;

	const SQUARES: &str = r#"{
		"type": "Topology",
		"transform": {"scale": [1, 1], "translate": [0, 0]},
		"objects": {
			"countries": {
				"type": "GeometryCollection",
				"geometries": [
					{"type": "Polygon", "arcs": [[0, 1]], "properties": {"name": "Left"}},
					{"type": "Polygon", "arcs": [[2, -2]], "properties": {"name": "Right"}},
					{"type": "Point", "coordinates": [0, 0]},
					{"type": "MultiPolygon", "arcs": [[[3]], [[4]]], "properties": {"name": "Islands"}}
				]
			}
		},
		"arcs": [
			[[10, 0], [-10, 0], [0, 10], [10, 0]],
			[[10, 10], [0, -10]],
			[[10, 10], [10, 0], [0, -10], [-10, 0]],
			[[30, 30], [2, 0], [0, 2], [-2, 0], [0, -2]],
			[[40, 40], [2, 0], [0, 2], [-2, 0], [0, -2]]
		]
	}"#;

	#[test]
	fn decodes_delta_encoded_arcs() {
		let world = World::from_topojson(SQUARES, "countries").unwrap();
		assert_eq!(world.countries.len(), 3);
		let left = &world.countries[0];
		assert_eq!(left.name, "Left");
		assert_eq!(
			left.polygons[0][0],
			vec![[10.0, 0.0], [0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0]]
		);
	}

	#[test]
	fn negative_arc_index_walks_backwards() {
		let world = World::from_topojson(SQUARES, "countries").unwrap();
		let right = &world.countries[1];
		assert_eq!(
			right.polygons[0][0],
			vec![
				[10.0, 10.0],
				[20.0, 10.0],
				[20.0, 0.0],
				[10.0, 0.0],
				[10.0, 10.0]
			]
		);
	}

	#[test]
	fn finds_country_under_a_point() {
		let world = World::from_topojson(SQUARES, "countries").unwrap();
		assert_eq!(world.country_at(5.0, 5.0).map(|c| c.name.as_str()), Some("Left"));
		assert_eq!(world.country_at(15.0, 5.0).map(|c| c.name.as_str()), Some("Right"));
		assert_eq!(world.country_at(41.0, 41.0).map(|c| c.name.as_str()), Some("Islands"));
		assert_eq!(world.country_at(-5.0, 5.0), None);
	}

	#[test]
	fn holes_are_excluded() {
		let country = Country {
			name: "Ring".into(),
			polygons: vec![vec![
				vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]],
				vec![[4.0, 4.0], [6.0, 4.0], [6.0, 6.0], [4.0, 6.0], [4.0, 4.0]],
			]],
		};
		assert!(country.contains(2.0, 2.0));
		assert!(!country.contains(5.0, 5.0));
	}

	#[test]
	fn missing_object_is_reported() {
		let err = World::from_topojson(SQUARES, "land").unwrap_err();
		assert!(matches!(err, BoundaryError::MissingObject(name) if name == "land"));
	}

	#[test]
	fn out_of_range_arc_is_reported() {
		let text = r#"{"type": "Topology", "arcs": [],
			"objects": {"countries": {"type": "Polygon", "arcs": [[0]]}}}"#;
		let err = World::from_topojson(text, "countries").unwrap_err();
		assert!(matches!(err, BoundaryError::BadArc(0)));
	}

	#[test]
	fn malformed_json_is_a_decode_error() {
		let err = World::from_topojson("{not json", "countries").unwrap_err();
		assert!(matches!(err, BoundaryError::Decode(_)));
	}
}
