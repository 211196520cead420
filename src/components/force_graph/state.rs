use std::collections::HashSet;

use log::{debug, info, warn};

use super::data::DescriptionLookup;
use super::focus::{
	Emphasis, Focus, FocusStyle, LinkEmphasis, LinkStyle, NodeStyle, link_emphasis, neighborhood,
	node_emphasis,
};
use super::simulation::{Simulation, SimulationConfig};
use super::types::{Graph, GraphData, GraphError, NodeKind};
use crate::components::ticker::Tick;
use crate::components::transition::Transition;

const COURSE_COLOR: &str = "#66c2a5";
const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

/// Pointer travel below which a press and release count as a click.
const CLICK_SLOP: f64 = 3.0;
const MIN_HIT_RADIUS: f64 = 8.0;
const MAX_FRAME_MS: f64 = 100.0;

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub node_idx: Option<usize>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f64,
	pub node_start_y: f64,
	pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<usize>,
	pub x: f64,
	pub y: f64,
}

/// Contents of the side panel for the focused node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FocusPanel {
	pub title: String,
	pub description: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeShape<'a> {
	pub x: f64,
	pub y: f64,
	pub style: NodeStyle,
	pub color: &'static str,
	pub label: &'a str,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinkShape {
	pub x1: f64,
	pub y1: f64,
	pub x2: f64,
	pub y2: f64,
	pub style: LinkStyle,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip<'a> {
	pub x: f64,
	pub y: f64,
	pub title: &'a str,
	pub kind: NodeKind,
}

/// Everything the renderer needs for one frame.
#[derive(Clone, Debug)]
pub struct GraphFrame<'a> {
	pub width: f64,
	pub height: f64,
	pub links: Vec<LinkShape>,
	pub nodes: Vec<NodeShape<'a>>,
	pub tooltip: Option<Tooltip<'a>>,
}

pub struct ForceGraphState {
	sim: Simulation,
	focus: Focus,
	neighbors: HashSet<usize>,
	style: FocusStyle,
	node_styles: Vec<Transition<NodeStyle>>,
	link_styles: Vec<Transition<LinkStyle>>,
	colors: Vec<&'static str>,
	last_tick_ms: Option<f64>,
	pub drag: DragState,
	pub hover: HoverState,
	/// Where a press on empty canvas started, until it moves too far.
	background_press: Option<(f64, f64)>,
}

impl ForceGraphState {
	pub fn new(
		data: &GraphData,
		config: SimulationConfig,
		style: FocusStyle,
		width: f64,
		height: f64,
	) -> Result<Self, GraphError> {
		let graph = Graph::new(data)?;
		info!(
			"Graph built: {} nodes, {} links",
			graph.len(),
			graph.edges().len()
		);
		Ok(Self::from_graph(graph, config, style, width, height))
	}

	fn from_graph(
		graph: Graph,
		config: SimulationConfig,
		style: FocusStyle,
		width: f64,
		height: f64,
	) -> Self {
		let mut artworks = 0;
		let colors = graph
			.nodes()
			.iter()
			.map(|node| match node.kind {
				NodeKind::Course => COURSE_COLOR,
				NodeKind::Artwork => {
					artworks += 1;
					COLORS[(artworks - 1) % COLORS.len()]
				}
			})
			.collect();
		let node_styles = vec![Transition::settled(style.node(Emphasis::Default)); graph.len()];
		let link_styles = vec![
			Transition::settled(style.link(LinkEmphasis::Default));
			graph.edges().len()
		];

		Self {
			sim: Simulation::new(graph, config, width, height),
			focus: Focus::Unfocused,
			neighbors: HashSet::new(),
			style,
			node_styles,
			link_styles,
			colors,
			last_tick_ms: None,
			drag: DragState::default(),
			hover: HoverState::default(),
			background_press: None,
		}
	}

	pub fn graph(&self) -> &Graph {
		self.sim.graph()
	}

	pub fn node_style(&self, idx: usize) -> Option<NodeStyle> {
		self.node_styles.get(idx).map(Transition::current)
	}

	/// Focus `id`, or release it if it already has focus. Unknown ids leave
	/// the state untouched and return false.
	pub fn toggle_focus(&mut self, id: &str) -> bool {
		let Some(idx) = self.graph().index_of(id) else {
			warn!("Ignoring focus toggle on unknown node `{id}`");
			return false;
		};
		self.focus.toggle(idx);
		debug!("Focus toggled on `{id}`: {:?}", self.focus);
		self.apply_focus(true);
		true
	}

	pub fn clear_focus(&mut self) {
		if self.focus == Focus::Unfocused {
			return;
		}
		self.focus.clear();
		debug!("Focus cleared");
		self.apply_focus(true);
	}

	fn apply_focus(&mut self, animate: bool) {
		self.neighbors = match self.focus {
			Focus::Unfocused => HashSet::new(),
			Focus::FocusedOn(idx) => neighborhood(self.sim.graph(), idx),
		};
		let duration = self.style.duration_ms;
		for (idx, transition) in self.node_styles.iter_mut().enumerate() {
			let target = self
				.style
				.node(node_emphasis(self.focus, &self.neighbors, idx));
			transition.retarget(target, duration);
			if !animate {
				transition.snap();
			}
		}
		for (edge, transition) in self.sim.graph().edges().iter().zip(&mut self.link_styles) {
			let target = self
				.style
				.link(link_emphasis(self.focus, edge.source, edge.target));
			transition.retarget(target, duration);
			if !animate {
				transition.snap();
			}
		}
	}

	/// Side panel for the focused node, or `None` when nothing is focused.
	pub fn panel(&self, lookup: &impl DescriptionLookup) -> Option<FocusPanel> {
		let node = self.focus.focused().and_then(|idx| self.graph().node(idx))?;
		Some(FocusPanel {
			title: node.name.clone(),
			description: lookup.describe_or_fallback(&node.id).to_string(),
		})
	}

	/// Topmost node under the pointer, using the radius currently drawn.
	pub fn node_at_position(&self, x: f64, y: f64) -> Option<usize> {
		self.graph()
			.nodes()
			.iter()
			.enumerate()
			.rev()
			.find(|(idx, node)| {
				let radius = self
					.node_style(*idx)
					.map_or(self.style.node_radius, |s| s.radius)
					.max(MIN_HIT_RADIUS);
				let (dx, dy) = (node.x - x, node.y - y);
				(dx * dx + dy * dy).sqrt() < radius
			})
			.map(|(idx, _)| idx)
	}

	pub fn set_hover(&mut self, node: Option<usize>, x: f64, y: f64) {
		self.hover = HoverState { node, x, y };
	}

	/// Pin `idx` where it is and reheat the layout. Only one node can be
	/// dragged at a time.
	pub fn drag_start(&mut self, idx: usize, x: f64, y: f64) -> bool {
		if let Some(active) = self.drag.node_idx {
			warn!("Drag already active on node {active}, ignoring drag of {idx}");
			return false;
		}
		let Some(node) = self.graph().node(idx) else {
			return false;
		};
		let (nx, ny) = (node.x, node.y);
		self.drag = DragState {
			node_idx: Some(idx),
			start_x: x,
			start_y: y,
			node_start_x: nx,
			node_start_y: ny,
			moved: false,
		};
		self.sim.pin(idx, nx, ny);
		let target = self.sim.config().drag_alpha_target;
		self.sim.set_alpha_target(target);
		debug!("Drag started on node {idx}");
		true
	}

	pub fn drag_move(&mut self, x: f64, y: f64) {
		let Some(idx) = self.drag.node_idx else {
			return;
		};
		let (dx, dy) = (x - self.drag.start_x, y - self.drag.start_y);
		if (dx * dx + dy * dy).sqrt() > CLICK_SLOP {
			self.drag.moved = true;
		}
		self.sim
			.pin(idx, self.drag.node_start_x + dx, self.drag.node_start_y + dy);
	}

	/// Release the dragged node. Returns its index when the pointer barely
	/// moved, so the caller can treat the gesture as a click.
	pub fn drag_end(&mut self) -> Option<usize> {
		let idx = self.drag.node_idx.take()?;
		self.sim.unpin(idx);
		self.sim.set_alpha_target(0.0);
		debug!("Drag ended on node {idx}");
		let moved = std::mem::take(&mut self.drag.moved);
		(!moved).then_some(idx)
	}

	/// Pointer pressed: grab the node under it, or remember a press on empty
	/// canvas.
	pub fn press(&mut self, x: f64, y: f64) {
		match self.node_at_position(x, y) {
			Some(idx) => {
				self.drag_start(idx, x, y);
			}
			None => self.background_press = Some((x, y)),
		}
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		if self.drag.node_idx.is_some() {
			self.drag_move(x, y);
			self.set_hover(None, x, y);
		} else {
			let hovered = self.node_at_position(x, y);
			self.set_hover(hovered, x, y);
		}
		if let Some((px, py)) = self.background_press {
			if ((x - px).powi(2) + (y - py).powi(2)).sqrt() > CLICK_SLOP {
				self.background_press = None;
			}
		}
	}

	/// Pointer released. A click on a node toggles its focus, a click on empty
	/// canvas clears focus, and anything that moved is just a drag.
	pub fn release(&mut self) {
		if let Some(idx) = self.drag_end() {
			if let Some(id) = self.graph().node(idx).map(|node| node.id.clone()) {
				self.toggle_focus(&id);
			}
		} else if self.background_press.take().is_some() {
			self.clear_focus();
		}
	}

	/// Pointer left the canvas: drop any gesture in progress.
	pub fn leave(&mut self) {
		self.drag_end();
		self.background_press = None;
		self.set_hover(None, 0.0, 0.0);
	}

	/// Rebuild the layout for a new viewport. Focus survives; animations in
	/// flight are dropped.
	pub fn rebuild(&mut self, width: f64, height: f64) {
		let graph = self.sim.graph().clone();
		let config = self.sim.config().clone();
		self.sim = Simulation::new(graph, config, width, height);
		self.drag = DragState::default();
		self.hover = HoverState::default();
		self.background_press = None;
		self.last_tick_ms = None;
		self.apply_focus(false);
		info!("Graph view rebuilt at {width}x{height}");
	}

	/// Advance animations by `dt_ms` and run one simulation step.
	pub fn advance(&mut self, dt_ms: f64) {
		self.sim.step();
		for transition in &mut self.node_styles {
			transition.advance(dt_ms);
		}
		for transition in &mut self.link_styles {
			transition.advance(dt_ms);
		}
	}

	pub fn frame(&self) -> GraphFrame<'_> {
		let (width, height) = self.sim.size();
		let nodes = self.graph().nodes();
		let links = self
			.graph()
			.edges()
			.iter()
			.zip(&self.link_styles)
			.map(|(edge, style)| {
				let (s, t) = (&nodes[edge.source], &nodes[edge.target]);
				LinkShape {
					x1: s.x,
					y1: s.y,
					x2: t.x,
					y2: t.y,
					style: style.current(),
				}
			})
			.collect();
		let shapes = nodes
			.iter()
			.zip(&self.node_styles)
			.zip(&self.colors)
			.map(|((node, style), &color)| NodeShape {
				x: node.x,
				y: node.y,
				style: style.current(),
				color,
				label: &node.name,
			})
			.collect();
		let tooltip = self
			.hover
			.node
			.and_then(|idx| self.graph().node(idx))
			.map(|node| Tooltip {
				x: self.hover.x,
				y: self.hover.y,
				title: &node.name,
				kind: node.kind,
			});
		GraphFrame {
			width,
			height,
			links,
			nodes: shapes,
			tooltip,
		}
	}
}

impl Tick for ForceGraphState {
	fn tick(&mut self, now_ms: f64) {
		let dt = self
			.last_tick_ms
			.map_or(0.0, |last| (now_ms - last).clamp(0.0, MAX_FRAME_MS));
		self.last_tick_ms = Some(now_ms);
		self.advance(dt);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::data::{
		NO_DESCRIPTION, portfolio_descriptions, portfolio_graph,
	};
	use crate::components::force_graph::types::sample;

	fn state(data: &GraphData) -> ForceGraphState {
		ForceGraphState::new(
			data,
			SimulationConfig::default(),
			FocusStyle::default(),
			800.0,
			600.0,
		)
		.unwrap()
	}

	fn focused_id(state: &ForceGraphState) -> Option<&str> {
		state
			.focus
			.focused()
			.and_then(|idx| state.graph().node(idx))
			.map(|node| node.id.as_str())
	}

	fn link_style(state: &ForceGraphState, idx: usize) -> Option<LinkStyle> {
		state.link_styles.get(idx).map(Transition::current)
	}

	fn settle(state: &mut ForceGraphState) {
		for _ in 0..30 {
			state.advance(16.0);
		}
	}

	#[test]
	fn focus_scenario_three_nodes() {
		let style = FocusStyle::default();
		let mut s = state(&sample(&["A", "B", "C"], &[("A", "B")]));

		assert!(s.toggle_focus("A"));
		assert_eq!(&s.neighbors, &HashSet::from([0, 1]));
		assert_eq!(focused_id(&s), Some("A"));
		settle(&mut s);
		assert_eq!(s.node_style(0), Some(style.node(Emphasis::Focused)));
		assert_eq!(s.node_style(1), Some(style.node(Emphasis::Neighbor)));
		assert_eq!(s.node_style(2), Some(style.node(Emphasis::Faded)));
		assert_eq!(link_style(&s, 0), Some(style.link(LinkEmphasis::Incident)));

		assert!(s.toggle_focus("A"));
		assert_eq!(s.focus, Focus::Unfocused);
		settle(&mut s);
		for idx in 0..3 {
			assert_eq!(s.node_style(idx), Some(style.node(Emphasis::Default)));
		}
		assert_eq!(link_style(&s, 0), Some(style.link(LinkEmphasis::Default)));
	}

	#[test]
	fn focus_change_animates_instead_of_snapping() {
		let mut s = state(&sample(&["A", "B", "C"], &[("A", "B")]));
		s.toggle_focus("A");
		let start = s.node_style(2).unwrap();
		s.advance(100.0);
		let mid = s.node_style(2).unwrap();
		assert_eq!(start.radius, 20.0);
		assert!(mid.radius < 20.0 && mid.radius > 10.0);
	}

	#[test]
	fn unknown_focus_id_is_a_no_op() {
		let mut s = state(&sample(&["A", "B"], &[("A", "B")]));
		s.toggle_focus("B");
		assert!(!s.toggle_focus("missing"));
		assert_eq!(focused_id(&s), Some("B"));
	}

	#[test]
	fn panel_shows_name_and_description() {
		let mut s = state(&portfolio_graph());
		let descriptions = portfolio_descriptions();
		assert_eq!(s.panel(&descriptions), None);
		s.toggle_focus("A2");
		let panel = s.panel(&descriptions).unwrap();
		assert_eq!(panel.title, "Personal Website");
		assert!(panel.description.contains("digital portfolio"));

		s.clear_focus();
		assert_eq!(s.panel(&descriptions), None);

		let mut bare = state(&sample(&["X"], &[]));
		bare.toggle_focus("X");
		assert_eq!(bare.panel(&descriptions).unwrap().description, NO_DESCRIPTION);
	}

	#[test]
	fn drag_pins_then_releases() {
		let mut s = state(&sample(&["A", "B"], &[("A", "B")]));
		let (x, y) = (s.graph().nodes()[0].x, s.graph().nodes()[0].y);
		assert!(s.drag_start(0, x, y));
		assert!(!s.drag_start(1, 0.0, 0.0), "second concurrent drag must be refused");
		assert_eq!(s.sim.alpha_target(), 0.3);

		s.drag_move(x + 50.0, y + 10.0);
		s.advance(16.0);
		let node = &s.graph().nodes()[0];
		assert_eq!((node.x, node.y), (x + 50.0, y + 10.0));

		// dragged node may not leave the viewport
		s.drag_move(x + 5000.0, y);
		assert_eq!(s.graph().nodes()[0].pin.map(|p| p.0), Some(780.0));

		assert_eq!(s.drag_end(), None);
		assert!(s.graph().nodes()[0].pin.is_none());
		assert_eq!(s.sim.alpha_target(), 0.0);
		assert!(s.drag_start(1, 0.0, 0.0));
	}

	#[test]
	fn press_and_release_in_place_is_a_click() {
		let mut s = state(&sample(&["A", "B"], &[("A", "B")]));
		s.drag_start(1, 10.0, 10.0);
		s.drag_move(11.0, 10.0);
		assert_eq!(s.drag_end(), Some(1));
		assert_eq!(s.drag_end(), None);
	}

	#[test]
	fn hit_test_finds_node_under_pointer() {
		let s = state(&sample(&["A", "B", "C"], &[]));
		let node = &s.graph().nodes()[2];
		assert_eq!(s.node_at_position(node.x + 1.0, node.y), Some(2));
		assert_eq!(s.node_at_position(-500.0, -500.0), None);
	}

	#[test]
	fn rebuild_keeps_focus_and_snaps_styles() {
		let style = FocusStyle::default();
		let mut s = state(&sample(&["A", "B", "C"], &[("A", "B")]));
		s.toggle_focus("B");
		s.rebuild(400.0, 300.0);
		assert_eq!(focused_id(&s), Some("B"));
		assert_eq!(s.node_style(2), Some(style.node(Emphasis::Faded)));
		assert_eq!(s.sim.size(), (400.0, 300.0));
	}

	#[test]
	fn frame_describes_every_shape() {
		let mut s = state(&portfolio_graph());
		let idx = s.graph().index_of("C1").unwrap();
		s.set_hover(Some(idx), 5.0, 6.0);
		let frame = s.frame();
		assert_eq!(frame.nodes.len(), 19);
		assert_eq!(frame.links.len(), 24);
		assert_eq!(frame.nodes[idx].color, COURSE_COLOR);
		let a1 = s.graph().index_of("A1").unwrap();
		assert_eq!(frame.nodes[a1].color, COLORS[0]);
		let tooltip = frame.tooltip.unwrap();
		assert_eq!(tooltip.title, "Music for Film");
		assert_eq!(tooltip.kind, NodeKind::Course);
	}

	#[test]
	fn tick_uses_elapsed_time() {
		let mut s = state(&sample(&["A", "B"], &[("A", "B")]));
		s.toggle_focus("A");
		for now in [1000.0, 1100.0, 1200.0, 1300.0] {
			s.tick(now);
		}
		assert_eq!(
			s.node_style(0),
			Some(FocusStyle::default().node(Emphasis::Focused))
		);
	}

	#[test]
	fn click_on_empty_canvas_clears_focus() {
		let mut s = state(&sample(&["A", "B"], &[("A", "B")]));
		s.toggle_focus("A");
		s.press(-500.0, -500.0);
		s.pointer_move(-499.0, -500.0);
		s.release();
		assert_eq!(s.focus, Focus::Unfocused);
	}

	#[test]
	fn dragging_across_empty_canvas_keeps_focus() {
		let mut s = state(&sample(&["A", "B"], &[("A", "B")]));
		s.toggle_focus("A");
		s.press(-500.0, -500.0);
		s.pointer_move(-450.0, -500.0);
		s.release();
		assert_eq!(focused_id(&s), Some("A"));
	}

	#[test]
	fn clicking_a_node_toggles_its_focus() {
		let mut s = state(&sample(&["A", "B"], &[("A", "B")]));
		let (x, y) = (s.graph().nodes()[1].x, s.graph().nodes()[1].y);
		s.press(x, y);
		s.release();
		assert_eq!(focused_id(&s), Some("B"));
		s.press(x, y);
		s.release();
		assert_eq!(s.focus, Focus::Unfocused);
	}

	#[test]
	fn leaving_the_canvas_cancels_the_gesture() {
		let mut s = state(&sample(&["A", "B"], &[("A", "B")]));
		s.toggle_focus("A");
		s.press(-500.0, -500.0);
		s.leave();
		s.release();
		assert_eq!(focused_id(&s), Some("A"));
		assert!(s.drag.node_idx.is_none());
	}
}
