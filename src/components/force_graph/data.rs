//! Courses and artworks shown in the portfolio graph.

use std::collections::HashMap;

use super::types::{GraphData, LinkData, NodeData, NodeKind};

pub const NO_DESCRIPTION: &str = "No description available.";

/// Looks up the rich-text blurb shown in the side panel for a node.
pub trait DescriptionLookup {
	fn describe(&self, id: &str) -> Option<&str>;

	fn describe_or_fallback(&self, id: &str) -> &str {
		self.describe(id).unwrap_or(NO_DESCRIPTION)
	}
}

impl DescriptionLookup for HashMap<String, String> {
	fn describe(&self, id: &str) -> Option<&str> {
		self.get(id).map(String::as_str)
	}
}

const COURSES: &[(&str, &str)] = &[
	("C1", "Music for Film"),
	("C2", "Sound Objects"),
	("C3", "Sonic Art & History of Noise"),
	("C4", "Fundamentals of Animation"),
	("C5", "Introduction to Photography"),
	("C6", "Digital Photography"),
	("C7", "Spec. Topics in Creative Media"),
	("C8", "Media Computing"),
	("C9", "Creative Coding"),
	("C10", "Creative Media Studio I"),
	("C11", "Creative Media Studio II"),
	("C12", "Narrative Strg & Aesthetics"),
];

const ARTWORKS: &[(&str, &str)] = &[
	("A1", "Stationery Tidying ASMR"),
	("A2", "Personal Website"),
	("A3", "Short Animation: Fluffy weather forecast"),
	("A4", "Short film: Be my Digital Friend"),
	("A5", "Game Concept: Last Dawn"),
	("A6", "Digital Illustrations"),
	("A7", "Processing.org MV: Infinity Heaven"),
];

const LINKS: &[(&str, &str)] = &[
	("A1", "C1"),
	("A1", "C2"),
	("A1", "C3"),
	("A1", "C6"),
	("A1", "C5"),
	("A2", "C7"),
	("A2", "C8"),
	("A2", "C9"),
	("A3", "C4"),
	("A3", "C10"),
	("A3", "C6"),
	("A4", "C6"),
	("A4", "C11"),
	("A4", "C5"),
	("A4", "C12"),
	("A4", "C1"),
	("A5", "C12"),
	("A5", "A6"),
	("A6", "C10"),
	("A6", "C6"),
	("C5", "C6"),
	("A7", "C1"),
	("A7", "C8"),
	("A7", "C9"),
];

const DESCRIPTIONS: &[(&str, &str)] = &[
	(
		"C1",
		"<strong>Music for Film:</strong> Explores how music acts as a strong part of movies, editing sound elements into films.",
	),
	(
		"C2",
		"<strong>Sound Objects:</strong> Explores sonic art in terms of ASMR and sound.",
	),
	(
		"C3",
		"<strong>Sonic Art & History of Noise:</strong> A theoretical course examining the historical development of sound art and the role of noise in contemporary art forms.",
	),
	(
		"C4",
		"<strong>Fundamentals of Animation:</strong> Covers the basic principles and techniques of animation, including traditional, stop-motion, and digital methods.",
	),
	(
		"C5",
		"<strong>Introduction to Photography:</strong> An introductory course to photographic principles, composition, lighting, and basic camera operation.",
	),
	(
		"C6",
		"<strong>Digital Photography:</strong> Builds upon introductory concepts, focusing on digital image capture, editing, and post-processing techniques.",
	),
	(
		"C7",
		"<strong>Spec. Topics in Creative Media:</strong> An advanced course exploring emerging trends and specialized areas within creative media, often project-based.",
	),
	(
		"C8",
		"<strong>Media Computing:</strong> Introduces computational concepts relevant to media creation, including programming for interactive art and data visualization.",
	),
	(
		"C9",
		"<strong>Creative Coding:</strong> Focuses on using programming languages (like Processing or p5.js) to create generative art, interactive installations, and visual effects.",
	),
	(
		"C10",
		"<strong>Creative Media Studio I:</strong> The first part of a capstone studio series, where students develop and execute a significant creative media project.",
	),
	(
		"C11",
		"<strong>Creative Media Studio II:</strong> The second part of the capstone series, involving further development, refinement, and presentation of a major project.",
	),
	(
		"C12",
		"<strong>Narrative Strg & Aesthetics:</strong> Examines storytelling structures and aesthetic principles across various media, from film to interactive experiences.",
	),
	(
		"A1",
		"<strong>Stationery Tidying ASMR:</strong> An artwork exploring auditory sensory experiences through everyday sounds, specifically focused on the meticulous arrangement of stationery items.",
	),
	(
		"A2",
		"<strong>Personal Website:</strong> A digital portfolio showcasing various creative projects, built using web development technologies learned in media computing courses.",
	),
	(
		"A3",
		"<strong>Short Animation: Fluffy weather forecast:</strong> A whimsical animated short film depicting a weather forecast delivered by fluffy, cloud-like characters.",
	),
	(
		"A4",
		"<strong>Short film: Be my Digital Friend:</strong> A narrative short film exploring themes of loneliness and connection in the digital age, utilizing various visual and sound design techniques.",
	),
	(
		"A5",
		"<strong>Game Concept: Last Dawn:</strong> A conceptual design for a video game, outlining its narrative, mechanics, and visual style, drawing inspiration from storytelling and animation principles.",
	),
	(
		"A6",
		"<strong>Digital Illustrations:</strong> A collection of digital artworks created using various software, demonstrating skills in visual composition and digital painting.",
	),
	(
		"A7",
		"<strong>Processing.org MV: Infinity Heaven:</strong> A generative music video created using Processing.org, featuring abstract visual patterns that react to an original music track.",
	),
];

fn node_data(kind: NodeKind, &(id, name): &(&str, &str)) -> NodeData {
	NodeData {
		id: id.to_string(),
		name: name.to_string(),
		kind,
	}
}

pub fn portfolio_graph() -> GraphData {
	let nodes = COURSES
		.iter()
		.map(|entry| node_data(NodeKind::Course, entry))
		.chain(ARTWORKS.iter().map(|entry| node_data(NodeKind::Artwork, entry)))
		.collect();
	let links = LINKS
		.iter()
		.map(|&(source, target)| LinkData {
			source: source.to_string(),
			target: target.to_string(),
		})
		.collect();
	GraphData { nodes, links }
}

pub fn portfolio_descriptions() -> HashMap<String, String> {
	DESCRIPTIONS
		.iter()
		.map(|&(id, text)| (id.to_string(), text.to_string()))
		.collect()
}
