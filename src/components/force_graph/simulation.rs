//! Velocity-based force simulation.
//!
//! Each tick moves `alpha` toward `alpha_target`, accumulates velocity from
//! the link, many-body, center and axis forces, then integrates. Once alpha
//! falls below `alpha_min` the layout counts as cooled and ticks only keep
//! positions inside the viewport.

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::types::Graph;

const INITIAL_RADIUS: f64 = 10.0;
const DISTANCE_MIN_SQ: f64 = 1.0;

#[derive(Clone, Debug)]
pub struct SimulationConfig {
	/// Rest length of every link.
	pub link_distance: f64,
	/// Many-body strength; negative repels.
	pub charge_strength: f64,
	/// How much of the centroid offset is corrected each tick.
	pub center_strength: f64,
	/// Pull toward the vertical and horizontal center lines.
	pub axis_strength: f64,
	pub alpha_min: f64,
	pub alpha_decay: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
	/// Alpha target held while a node is being dragged.
	pub drag_alpha_target: f64,
	/// Margin kept between node centers and the viewport edge.
	pub node_radius: f64,
	pub seed: u64,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		let alpha_min: f64 = 0.001;
		Self {
			link_distance: 100.0,
			charge_strength: -900.0,
			center_strength: 1.0,
			axis_strength: 0.1,
			alpha_min,
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			velocity_decay: 0.4,
			drag_alpha_target: 0.3,
			node_radius: 20.0,
			seed: 0x5eed,
		}
	}
}

pub struct Simulation {
	graph: Graph,
	config: SimulationConfig,
	width: f64,
	height: f64,
	alpha: f64,
	alpha_target: f64,
	link_strength: Vec<f64>,
	link_bias: Vec<f64>,
	rng: StdRng,
}

impl Simulation {
	/// Lay `graph` out in a `width` x `height` viewport. Each side is at least
	/// one node diameter so clamping always has room.
	pub fn new(mut graph: Graph, config: SimulationConfig, width: f64, height: f64) -> Self {
		let min_side = 2.0 * config.node_radius;
		let (width, height) = (width.max(min_side), height.max(min_side));
		let (cx, cy) = (width / 2.0, height / 2.0);
		let golden_angle = PI * (3.0 - 5.0_f64.sqrt());
		for (i, node) in graph.nodes_mut().iter_mut().enumerate() {
			let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
			let angle = i as f64 * golden_angle;
			node.x = cx + radius * angle.cos();
			node.y = cy + radius * angle.sin();
			node.vx = 0.0;
			node.vy = 0.0;
			node.pin = None;
		}

		let (mut link_strength, mut link_bias) = (Vec::new(), Vec::new());
		for edge in graph.edges() {
			let (s, t) = (
				graph.degree(edge.source) as f64,
				graph.degree(edge.target) as f64,
			);
			link_strength.push(1.0 / s.min(t));
			link_bias.push(s / (s + t));
		}

		let rng = StdRng::seed_from_u64(config.seed);
		let mut sim = Self {
			graph,
			config,
			width,
			height,
			alpha: 1.0,
			alpha_target: 0.0,
			link_strength,
			link_bias,
			rng,
		};
		sim.clamp_positions();
		sim
	}

	pub fn graph(&self) -> &Graph {
		&self.graph
	}

	pub fn config(&self) -> &SimulationConfig {
		&self.config
	}

	#[cfg(test)]
	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	pub fn is_cooled(&self) -> bool {
		self.alpha < self.config.alpha_min
	}

	pub fn size(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	/// Sets the energy level alpha decays toward. A non-zero target keeps the
	/// layout moving until it is cleared again.
	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target.clamp(0.0, 1.0);
	}

	/// Advance one tick. Returns false when the layout is cooled and no forces
	/// were applied.
	pub fn step(&mut self) -> bool {
		if self.is_cooled() && self.alpha_target < self.config.alpha_min {
			self.clamp_positions();
			return false;
		}

		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
		let alpha = self.alpha;

		self.apply_links(alpha);
		self.apply_many_body(alpha);
		self.apply_center();
		self.apply_axes(alpha);

		let keep = 1.0 - self.config.velocity_decay;
		for node in self.graph.nodes_mut() {
			match node.pin {
				Some((fx, fy)) => {
					node.x = fx;
					node.y = fy;
					node.vx = 0.0;
					node.vy = 0.0;
				}
				None => {
					node.vx *= keep;
					node.vy *= keep;
					node.x += node.vx;
					node.y += node.vy;
				}
			}
		}

		self.clamp_positions();
		true
	}

	/// Fix a node at `(x, y)`, kept inside the viewport.
	pub fn pin(&mut self, idx: usize, x: f64, y: f64) {
		let (x, y) = self.clamp_point(x, y);
		if let Some(node) = self.graph.nodes_mut().get_mut(idx) {
			node.pin = Some((x, y));
			node.x = x;
			node.y = y;
		}
	}

	pub fn unpin(&mut self, idx: usize) {
		if let Some(node) = self.graph.nodes_mut().get_mut(idx) {
			node.pin = None;
		}
	}

	pub fn clamp_point(&self, x: f64, y: f64) -> (f64, f64) {
		let r = self.config.node_radius;
		(
			r.max((self.width - r).min(x)),
			r.max((self.height - r).min(y)),
		)
	}

	fn clamp_positions(&mut self) {
		let r = self.config.node_radius;
		let (max_x, max_y) = (self.width - r, self.height - r);
		for node in self.graph.nodes_mut() {
			node.x = r.max(max_x.min(node.x));
			node.y = r.max(max_y.min(node.y));
		}
	}

	fn jiggle(&mut self) -> f64 {
		(self.rng.gen_range(0.0..1.0) - 0.5) * 1e-6
	}

	fn apply_links(&mut self, alpha: f64) {
		for i in 0..self.graph.edges().len() {
			let edge = self.graph.edges()[i];
			if edge.source == edge.target {
				continue;
			}
			let (s, t) = (&self.graph.nodes()[edge.source], &self.graph.nodes()[edge.target]);
			let mut dx = t.x + t.vx - s.x - s.vx;
			let mut dy = t.y + t.vy - s.y - s.vy;
			if dx == 0.0 {
				dx = self.jiggle();
			}
			if dy == 0.0 {
				dy = self.jiggle();
			}
			let len = (dx * dx + dy * dy).sqrt();
			let k = (len - self.config.link_distance) / len * alpha * self.link_strength[i];
			let (dx, dy) = (dx * k, dy * k);
			let bias = self.link_bias[i];

			let nodes = self.graph.nodes_mut();
			nodes[edge.target].vx -= dx * bias;
			nodes[edge.target].vy -= dy * bias;
			nodes[edge.source].vx += dx * (1.0 - bias);
			nodes[edge.source].vy += dy * (1.0 - bias);
		}
	}

	/// Pairwise repulsion, exact rather than Barnes-Hut; the graphs shown here
	/// have a few dozen nodes at most.
	fn apply_many_body(&mut self, alpha: f64) {
		let n = self.graph.len();
		let strength = self.config.charge_strength;
		for i in 0..n {
			for j in 0..n {
				if i == j {
					continue;
				}
				let (node, other) = (&self.graph.nodes()[i], &self.graph.nodes()[j]);
				let mut dx = other.x - node.x;
				let mut dy = other.y - node.y;
				if dx == 0.0 {
					dx = self.jiggle();
				}
				if dy == 0.0 {
					dy = self.jiggle();
				}
				let mut dist_sq = dx * dx + dy * dy;
				if dist_sq < DISTANCE_MIN_SQ {
					dist_sq = (DISTANCE_MIN_SQ * dist_sq).sqrt();
				}
				let k = strength * alpha / dist_sq;
				let node = &mut self.graph.nodes_mut()[i];
				node.vx += dx * k;
				node.vy += dy * k;
			}
		}
	}

	fn apply_center(&mut self) {
		let n = self.graph.len();
		if n == 0 {
			return;
		}
		let (sum_x, sum_y) = self
			.graph
			.nodes()
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		let shift_x = (sum_x / n as f64 - self.width / 2.0) * self.config.center_strength;
		let shift_y = (sum_y / n as f64 - self.height / 2.0) * self.config.center_strength;
		for node in self.graph.nodes_mut() {
			node.x -= shift_x;
			node.y -= shift_y;
		}
	}

	fn apply_axes(&mut self, alpha: f64) {
		let (cx, cy) = (self.width / 2.0, self.height / 2.0);
		let k = self.config.axis_strength * alpha;
		for node in self.graph.nodes_mut() {
			node.vx += (cx - node.x) * k;
			node.vy += (cy - node.y) * k;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::sample;

	fn build(nodes: &[&str], links: &[(&str, &str)], w: f64, h: f64) -> Simulation {
		let graph = Graph::new(&sample(nodes, links)).unwrap();
		Simulation::new(graph, SimulationConfig::default(), w, h)
	}

	fn assert_in_bounds(sim: &Simulation) {
		let (w, h) = sim.size();
		let r = sim.config().node_radius;
		for node in sim.graph().nodes() {
			assert!(node.x.is_finite() && node.y.is_finite());
			assert!(node.x >= r && node.x <= w - r, "x out of bounds: {}", node.x);
			assert!(node.y >= r && node.y <= h - r, "y out of bounds: {}", node.y);
		}
	}

	#[test]
	fn positions_stay_in_viewport_every_tick() {
		let names: Vec<String> = (0..15).map(|i| format!("N{i}")).collect();
		let ids: Vec<&str> = names.iter().map(String::as_str).collect();
		let links: Vec<(&str, &str)> = (1..ids.len()).map(|i| (ids[i], ids[i / 2])).collect();
		// small viewport so repulsion pushes nodes into the walls
		let mut sim = build(&ids, &links, 160.0, 120.0);
		assert_in_bounds(&sim);
		for _ in 0..400 {
			sim.step();
			assert_in_bounds(&sim);
		}
	}

	#[test]
	fn cools_down_and_goes_passive() {
		let mut sim = build(&["A", "B", "C"], &[("A", "B")], 800.0, 600.0);
		let mut ticks = 0;
		while sim.step() {
			ticks += 1;
			assert!(ticks < 1000, "simulation never cooled");
		}
		assert!(sim.is_cooled());
		assert!((290..=310).contains(&ticks), "cooled after {ticks} ticks");

		let before: Vec<(f64, f64)> = sim.graph().nodes().iter().map(|n| (n.x, n.y)).collect();
		assert!(!sim.step());
		let after: Vec<(f64, f64)> = sim.graph().nodes().iter().map(|n| (n.x, n.y)).collect();
		assert_eq!(before, after);
	}

	#[test]
	fn reheating_restarts_a_cooled_layout() {
		let mut sim = build(&["A", "B"], &[("A", "B")], 800.0, 600.0);
		while sim.step() {}
		sim.set_alpha_target(0.3);
		assert!(sim.step());
		for _ in 0..500 {
			sim.step();
		}
		assert!((sim.alpha - 0.3).abs() < 0.01);
		sim.set_alpha_target(0.0);
		for _ in 0..500 {
			sim.step();
		}
		assert!(sim.is_cooled());
	}

	#[test]
	fn pinned_node_holds_its_position() {
		let mut sim = build(&["A", "B", "C"], &[("A", "B"), ("B", "C")], 800.0, 600.0);
		sim.pin(1, 300.0, 200.0);
		for _ in 0..50 {
			sim.step();
		}
		let b = &sim.graph().nodes()[1];
		assert_eq!((b.x, b.y), (300.0, 200.0));
		sim.unpin(1);
		assert!(sim.graph().nodes()[1].pin.is_none());
	}

	#[test]
	fn pin_is_clamped_to_viewport() {
		let mut sim = build(&["A"], &[], 400.0, 300.0);
		sim.pin(0, -50.0, 1000.0);
		assert_eq!(sim.graph().nodes()[0].pin, Some((20.0, 280.0)));
	}

	#[test]
	fn linked_nodes_end_up_closer_than_their_starting_spread_allows() {
		let mut sim = build(&["A", "B"], &[("A", "B")], 800.0, 600.0);
		while sim.step() {}
		let (a, b) = (&sim.graph().nodes()[0], &sim.graph().nodes()[1]);
		let dist = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
		// repulsion pushes past the rest length, the link keeps them in range
		assert!(dist > 50.0 && dist < 400.0, "distance {dist}");
		// centered on the viewport
		assert!(((a.x + b.x) / 2.0 - 400.0).abs() < 1.0);
		assert!(((a.y + b.y) / 2.0 - 300.0).abs() < 1.0);
	}

	#[test]
	fn viewport_smaller_than_a_node_is_widened() {
		let mut sim = build(&["A", "B", "C"], &[("A", "B")], 10.0, 25.0);
		assert_eq!(sim.size(), (40.0, 40.0));
		for _ in 0..50 {
			sim.step();
			assert_in_bounds(&sim);
		}
	}
}
