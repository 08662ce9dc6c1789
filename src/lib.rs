//! Promotion-likelihood inference over pre-trained classifier and encoder artifacts.

pub mod api;
pub mod config;
pub mod error;
pub mod ml;
pub mod models;
