//! Scene state for the orrery backdrop: bodies, ambient field, transient actors and
//! the camera director, advanced by one deterministic `tick` per frame.
//!
//! Nothing in this crate touches the GPU; the binary reads the state after each tick
//! and submits the frame.

pub mod actors;
pub mod ambient;
pub mod bodies;
pub mod catalog;
pub mod director;
pub mod frame_loop;
pub mod navigation;
pub mod scene;
pub mod settings;

pub use actors::*;
pub use ambient::*;
pub use bodies::*;
pub use catalog::*;
pub use director::*;
pub use frame_loop::*;
pub use navigation::*;
pub use scene::*;
pub use settings::*;
