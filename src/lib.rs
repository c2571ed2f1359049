//! NPC Dialogue — branching and scripted conversations for 2D games.
//!
//! Dialogue content is authored as an immutable graph (or a flat script)
//! and traversed by a small state machine driven from the game loop. The
//! game stays in charge of rendering, input, audio and scene loading; the
//! library reaches those through the collaborator traits in [`core`].

pub mod core;
pub mod schema;
