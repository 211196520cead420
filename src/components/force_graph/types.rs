use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// What a node in the portfolio graph stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
	Course,
	Artwork,
}

impl fmt::Display for NodeKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			NodeKind::Course => f.write_str("Course"),
			NodeKind::Artwork => f.write_str("Artwork"),
		}
	}
}

/// Input record for one node.
#[derive(Clone, Debug)]
pub struct NodeData {
	pub id: String,
	pub name: String,
	pub kind: NodeKind,
}

/// Input record for one undirected link, by node id.
#[derive(Clone, Debug)]
pub struct LinkData {
	pub source: String,
	pub target: String,
}

#[derive(Clone, Debug, Default)]
pub struct GraphData {
	pub nodes: Vec<NodeData>,
	pub links: Vec<LinkData>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
	#[error("duplicate node id `{0}`")]
	DuplicateNode(String),
	#[error("link {edge} references unknown node `{id}`")]
	UnknownNode { edge: usize, id: String },
}

/// A node as the simulation sees it. Position and velocity change every tick.
#[derive(Clone, Debug)]
pub struct GraphNode {
	pub id: String,
	pub name: String,
	pub kind: NodeKind,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Fixed position overriding the simulation, set while dragging.
	pub pin: Option<(f64, f64)>,
}

/// An undirected edge, resolved to node indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphEdge {
	pub source: usize,
	pub target: usize,
}

/// Validated graph with links resolved once at construction.
#[derive(Clone, Debug)]
pub struct Graph {
	nodes: Vec<GraphNode>,
	edges: Vec<GraphEdge>,
	index: HashMap<String, usize>,
	adjacency: Vec<Vec<usize>>,
}

impl Graph {
	pub fn new(data: &GraphData) -> Result<Self, GraphError> {
		let mut index = HashMap::with_capacity(data.nodes.len());
		let mut nodes = Vec::with_capacity(data.nodes.len());
		for (i, node) in data.nodes.iter().enumerate() {
			if index.insert(node.id.clone(), i).is_some() {
				return Err(GraphError::DuplicateNode(node.id.clone()));
			}
			nodes.push(GraphNode {
				id: node.id.clone(),
				name: node.name.clone(),
				kind: node.kind,
				x: 0.0,
				y: 0.0,
				vx: 0.0,
				vy: 0.0,
				pin: None,
			});
		}

		let mut edges = Vec::with_capacity(data.links.len());
		let mut adjacency = vec![Vec::new(); nodes.len()];
		for (edge, link) in data.links.iter().enumerate() {
			let resolve = |id: &String| {
				index.get(id).copied().ok_or_else(|| GraphError::UnknownNode {
					edge,
					id: id.clone(),
				})
			};
			let (source, target) = (resolve(&link.source)?, resolve(&link.target)?);
			edges.push(GraphEdge { source, target });
			adjacency[source].push(target);
			if source != target {
				adjacency[target].push(source);
			}
		}

		Ok(Self {
			nodes,
			edges,
			index,
			adjacency,
		})
	}

	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	pub fn nodes_mut(&mut self) -> &mut [GraphNode] {
		&mut self.nodes
	}

	pub fn node(&self, idx: usize) -> Option<&GraphNode> {
		self.nodes.get(idx)
	}

	pub fn edges(&self) -> &[GraphEdge] {
		&self.edges
	}

	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	pub fn neighbors(&self, idx: usize) -> &[usize] {
		self.adjacency.get(idx).map(Vec::as_slice).unwrap_or(&[])
	}

	/// Number of link endpoints at `idx`. A self-loop counts twice.
	pub fn degree(&self, idx: usize) -> usize {
		self.edges
			.iter()
			.map(|e| usize::from(e.source == idx) + usize::from(e.target == idx))
			.sum()
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}
}

#[cfg(test)]
pub(crate) fn sample(nodes: &[&str], links: &[(&str, &str)]) -> GraphData {
	GraphData {
		nodes: nodes
			.iter()
			.map(|id| NodeData {
				id: id.to_string(),
				name: format!("Node {id}"),
				kind: NodeKind::Course,
			})
			.collect(),
		links: links
			.iter()
			.map(|(s, t)| LinkData {
				source: s.to_string(),
				target: t.to_string(),
			})
			.collect(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn resolves_links_to_indices() {
		let graph = Graph::new(&sample(&["A", "B", "C"], &[("A", "B"), ("C", "B")])).unwrap();
		assert_eq!(graph.edges()[1], GraphEdge { source: 2, target: 1 });
		assert_eq!(graph.neighbors(1), &[0, 2]);
		assert_eq!(graph.degree(1), 2);
		assert!(graph.neighbors(2).contains(&1));
	}

	#[test]
	fn unknown_link_endpoint_fails_construction() {
		let err = Graph::new(&sample(&["A", "B"], &[("A", "B"), ("B", "Z")])).unwrap_err();
		assert_eq!(
			err,
			GraphError::UnknownNode {
				edge: 1,
				id: "Z".into()
			}
		);
	}

	#[test]
	fn duplicate_ids_are_rejected() {
		let err = Graph::new(&sample(&["A", "A"], &[])).unwrap_err();
		assert_eq!(err, GraphError::DuplicateNode("A".into()));
	}
}
