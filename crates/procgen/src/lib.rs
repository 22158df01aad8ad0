//! Procedural generation for the orrery: body surface textures, starfield tiers,
//! nebula panels and the debris belt. Everything is built once at startup.

pub mod color;
pub mod debris;
pub mod starfield;
pub mod textures;

pub use color::*;
pub use debris::*;
pub use starfield::*;
pub use textures::*;
