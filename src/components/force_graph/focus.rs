//! Focus state machine and the visual emphasis derived from it.

use std::collections::HashSet;

use super::types::Graph;
use crate::components::transition::{Lerp, mix};

/// Which node, if any, the viewer is inspecting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Focus {
	#[default]
	Unfocused,
	FocusedOn(usize),
}

impl Focus {
	/// Clicking the focused node again releases it; any other node takes focus.
	pub fn toggle(&mut self, idx: usize) {
		*self = match *self {
			Focus::FocusedOn(current) if current == idx => Focus::Unfocused,
			_ => Focus::FocusedOn(idx),
		};
	}

	pub fn clear(&mut self) {
		*self = Focus::Unfocused;
	}

	pub fn focused(&self) -> Option<usize> {
		match *self {
			Focus::Unfocused => None,
			Focus::FocusedOn(idx) => Some(idx),
		}
	}
}

/// The focused node plus everything sharing an edge with it.
pub fn neighborhood(graph: &Graph, idx: usize) -> HashSet<usize> {
	let mut set: HashSet<usize> = graph.neighbors(idx).iter().copied().collect();
	set.insert(idx);
	set
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
	Default,
	Focused,
	Neighbor,
	Faded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkEmphasis {
	Default,
	Incident,
	Faded,
}

pub fn node_emphasis(focus: Focus, neighbors: &HashSet<usize>, idx: usize) -> Emphasis {
	match focus {
		Focus::Unfocused => Emphasis::Default,
		Focus::FocusedOn(f) if f == idx => Emphasis::Focused,
		Focus::FocusedOn(_) if neighbors.contains(&idx) => Emphasis::Neighbor,
		Focus::FocusedOn(_) => Emphasis::Faded,
	}
}

pub fn link_emphasis(focus: Focus, source: usize, target: usize) -> LinkEmphasis {
	match focus {
		Focus::Unfocused => LinkEmphasis::Default,
		Focus::FocusedOn(f) if f == source || f == target => LinkEmphasis::Incident,
		Focus::FocusedOn(_) => LinkEmphasis::Faded,
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeStyle {
	pub radius: f64,
	pub opacity: f64,
	pub label_opacity: f64,
	pub bold: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkStyle {
	pub width: f64,
	pub opacity: f64,
}

/// Sizes and opacities for each emphasis level.
#[derive(Clone, Debug)]
pub struct FocusStyle {
	pub duration_ms: f64,
	pub node_radius: f64,
	pub link_width: f64,
	pub link_opacity: f64,
	pub focused_scale: f64,
	pub neighbor_scale: f64,
	pub faded_scale: f64,
	pub faded_opacity: f64,
	pub faded_label_opacity: f64,
	pub incident_link_scale: f64,
	pub faded_link_scale: f64,
	pub faded_link_opacity: f64,
}

impl Default for FocusStyle {
	fn default() -> Self {
		Self {
			duration_ms: 300.0,
			node_radius: 20.0,
			link_width: 2.0,
			link_opacity: 0.6,
			focused_scale: 2.0,
			neighbor_scale: 1.2,
			faded_scale: 0.5,
			faded_opacity: 0.2,
			faded_label_opacity: 0.3,
			incident_link_scale: 1.5,
			faded_link_scale: 0.5,
			faded_link_opacity: 0.2,
		}
	}
}

impl FocusStyle {
	pub fn node(&self, emphasis: Emphasis) -> NodeStyle {
		let r = self.node_radius;
		match emphasis {
			Emphasis::Default => NodeStyle {
				radius: r,
				opacity: 1.0,
				label_opacity: 1.0,
				bold: false,
			},
			Emphasis::Focused => NodeStyle {
				radius: r * self.focused_scale,
				opacity: 1.0,
				label_opacity: 1.0,
				bold: true,
			},
			Emphasis::Neighbor => NodeStyle {
				radius: r * self.neighbor_scale,
				opacity: 1.0,
				label_opacity: 1.0,
				bold: false,
			},
			Emphasis::Faded => NodeStyle {
				radius: r * self.faded_scale,
				opacity: self.faded_opacity,
				label_opacity: self.faded_label_opacity,
				bold: false,
			},
		}
	}

	pub fn link(&self, emphasis: LinkEmphasis) -> LinkStyle {
		match emphasis {
			LinkEmphasis::Default => LinkStyle {
				width: self.link_width,
				opacity: self.link_opacity,
			},
			LinkEmphasis::Incident => LinkStyle {
				width: self.link_width * self.incident_link_scale,
				opacity: 1.0,
			},
			LinkEmphasis::Faded => LinkStyle {
				width: self.link_width * self.faded_link_scale,
				opacity: self.faded_link_opacity,
			},
		}
	}
}

impl Lerp for NodeStyle {
	fn lerp(&self, to: &Self, t: f64) -> Self {
		Self {
			radius: mix(self.radius, to.radius, t),
			opacity: mix(self.opacity, to.opacity, t),
			label_opacity: mix(self.label_opacity, to.label_opacity, t),
			// font weight switches immediately
			bold: to.bold,
		}
	}
}

impl Lerp for LinkStyle {
	fn lerp(&self, to: &Self, t: f64) -> Self {
		Self {
			width: mix(self.width, to.width, t),
			opacity: mix(self.opacity, to.opacity, t),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::sample;
	use crate::components::transition::Transition;

	#[test]
	fn toggling_same_node_alternates() {
		let mut focus = Focus::default();
		for n in 1..=6 {
			focus.toggle(3);
			if n % 2 == 0 {
				assert_eq!(focus, Focus::Unfocused);
			} else {
				assert_eq!(focus, Focus::FocusedOn(3));
			}
		}
	}

	#[test]
	fn toggling_another_node_moves_focus() {
		let mut focus = Focus::FocusedOn(1);
		focus.toggle(2);
		assert_eq!(focus, Focus::FocusedOn(2));
		focus.clear();
		assert_eq!(focus.focused(), None);
		focus.clear();
		assert_eq!(focus, Focus::Unfocused);
	}

	#[test]
	fn emphasis_follows_neighborhood() {
		let graph = Graph::new(&sample(&["A", "B", "C"], &[("A", "B")])).unwrap();
		let focus = Focus::FocusedOn(0);
		let hood = neighborhood(&graph, 0);
		assert_eq!(hood, HashSet::from([0, 1]));
		assert_eq!(node_emphasis(focus, &hood, 0), Emphasis::Focused);
		assert_eq!(node_emphasis(focus, &hood, 1), Emphasis::Neighbor);
		assert_eq!(node_emphasis(focus, &hood, 2), Emphasis::Faded);
		assert_eq!(link_emphasis(focus, 1, 0), LinkEmphasis::Incident);
		assert_eq!(link_emphasis(Focus::FocusedOn(2), 1, 0), LinkEmphasis::Faded);
		assert_eq!(node_emphasis(Focus::Unfocused, &hood, 2), Emphasis::Default);
	}

	#[test]
	fn transition_eases_to_target() {
		let style = FocusStyle::default();
		let mut t = Transition::settled(style.node(Emphasis::Default));
		t.retarget(style.node(Emphasis::Focused), 300.0);
		assert_eq!(t.current().radius, 20.0);
		t.advance(150.0);
		let mid = t.current().radius;
		assert!(mid > 20.0 && mid < 40.0);
		t.advance(1000.0);
		assert!(t.is_settled());
		assert_eq!(t.current(), style.node(Emphasis::Focused));
	}

	#[test]
	fn interrupted_transition_starts_from_current_value() {
		let style = FocusStyle::default();
		let mut t = Transition::settled(style.link(LinkEmphasis::Default));
		t.retarget(style.link(LinkEmphasis::Faded), 300.0);
		t.advance(150.0);
		let mid = t.current();
		t.retarget(style.link(LinkEmphasis::Incident), 300.0);
		assert_eq!(t.current(), mid);
		t.snap();
		assert_eq!(t.current(), style.link(LinkEmphasis::Incident));
	}
}
