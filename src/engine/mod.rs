// Layout engine: geometry, triangulation, corridor spanning, the generation
// pipeline, and the viewer-facing camera/input/overlay helpers.

pub mod camera;
pub mod config;
pub mod corridors;
pub mod debug_overlay;
pub mod error;
pub mod geom;
pub mod graph;
pub mod input;
pub mod physics;
pub mod pipeline;
pub mod rapier_space;
pub mod rng;
pub mod rooms;
pub mod triangle;
pub mod triangulation;
