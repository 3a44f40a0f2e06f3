//! Backend for NightHaunts, the "find me a bar that is still open" app.
//! Acquires a location fix, asks one of the venue backends what is around,
//! and serves a normalized list to the frontend.

pub mod backends;
pub mod config;
pub mod controller;
pub mod error;
pub mod helpers;
pub mod location;
pub mod models;
pub mod normalize;
pub mod pipeline;
