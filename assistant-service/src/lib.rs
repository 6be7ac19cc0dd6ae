//! Conference assistant HTTP service.
//!
//! Serves the precomputed FAQ, the static front end, and a chat proxy that
//! forwards prompts to the language-model provider under a daily request and
//! cost budget.

pub mod config;
pub mod error;
pub mod handlers;
pub mod services;
pub mod startup;

pub use startup::{build_router, build_state, AppState, Application};
