pub mod force_graph;
pub mod ticker;
pub mod transition;
pub mod visitor_map;
