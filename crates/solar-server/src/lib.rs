//! Shared library surface for the suitability server and its tests.

pub mod analysis;
pub mod api;
pub mod config;
pub mod overpass;
pub mod proximity;
pub mod seismic;
pub mod state;
