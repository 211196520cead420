mod boundaries;
mod cluster;
mod component;
mod markers;
mod projection;
mod render;
mod state;
mod visitors;

pub use component::VisitorMapCanvas;
