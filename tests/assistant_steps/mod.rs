//! Step definitions for assistant turn scenarios.

mod given;
mod then;
mod when;
pub mod world;
