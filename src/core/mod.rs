//! Runtime: sessions, collaborator traits and effect step machines.

pub mod config;
pub mod conversation;
pub mod display;
pub mod effects;
pub mod proximity;
pub mod scene;
pub mod score;
pub mod session;
