//! twentyq Engine - core decision-tree types and game logic
//!
//! This crate contains the decision-tree node arena, the in-place learning
//! mutation, and the round state machine for the 20 Questions game.
//!
//! The engine is terminal-agnostic: all prompting goes through the
//! `game::Console` trait, implemented by the CLI over stdin/stdout.

pub mod game;
pub mod node;
