//! CLI infrastructure for the ephemeral tic-tac-toe toolkit
//!
//! This module provides the command-line interface for training agent pairs
//! through self-play and replaying their greedy games.

pub mod commands;
