//! Animated circle markers keyed by cluster id.

use crate::components::transition::{Lerp, Transition, mix};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerStyle {
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	pub opacity: f64,
}

impl MarkerStyle {
	fn hidden_at(x: f64, y: f64) -> Self {
		Self {
			x,
			y,
			radius: 0.0,
			opacity: 0.0,
		}
	}
}

impl Lerp for MarkerStyle {
	fn lerp(&self, to: &Self, t: f64) -> Self {
		Self {
			x: mix(self.x, to.x, t),
			y: mix(self.y, to.y, t),
			radius: mix(self.radius, to.radius, t),
			opacity: mix(self.opacity, to.opacity, t),
		}
	}
}

/// Where a cluster wants its marker this update.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerTarget {
	pub key: String,
	pub x: f64,
	pub y: f64,
	pub radius: f64,
}

#[derive(Clone, Debug)]
struct Marker {
	key: String,
	style: Transition<MarkerStyle>,
	exiting: bool,
}

#[derive(Clone, Debug, Default)]
pub struct MarkerLayer {
	markers: Vec<Marker>,
}

impl MarkerLayer {
	pub fn new() -> Self {
		Self::default()
	}

	/// Join `targets` against the live markers by key. New keys grow in from
	/// nothing, known keys ease to their new place and size, and keys that
	/// vanished shrink out and are dropped once hidden.
	pub fn reconcile(&mut self, targets: &[MarkerTarget], opacity: f64, duration_ms: f64) {
		for marker in &mut self.markers {
			if !marker.exiting && !targets.iter().any(|t| t.key == marker.key) {
				let at = marker.style.current();
				marker.style.retarget(MarkerStyle::hidden_at(at.x, at.y), duration_ms);
				marker.exiting = true;
			}
		}
		for target in targets {
			let style = MarkerStyle {
				x: target.x,
				y: target.y,
				radius: target.radius,
				opacity,
			};
			match self.markers.iter_mut().find(|m| m.key == target.key) {
				Some(marker) => {
					marker.style.retarget(style, duration_ms);
					marker.exiting = false;
				}
				None => self.markers.push(Marker {
					key: target.key.clone(),
					style: Transition::between(
						MarkerStyle::hidden_at(target.x, target.y),
						style,
						duration_ms,
					),
					exiting: false,
				}),
			}
		}
	}

	pub fn advance(&mut self, dt_ms: f64) {
		for marker in &mut self.markers {
			marker.style.advance(dt_ms);
		}
		self.markers.retain(|m| !(m.exiting && m.style.is_settled()));
	}

	pub fn clear(&mut self) {
		self.markers.clear();
	}

	pub fn styles(&self) -> impl Iterator<Item = (&str, MarkerStyle)> {
		self.markers
			.iter()
			.map(|m| (m.key.as_str(), m.style.current()))
	}
}
