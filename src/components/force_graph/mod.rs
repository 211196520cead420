mod component;
mod data;
mod focus;
mod render;
mod simulation;
mod state;
mod types;

pub use component::ForceGraphCanvas;
pub use data::{portfolio_descriptions, portfolio_graph};
