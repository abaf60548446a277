//! Client for the external geophysical-analysis service.

mod client;

pub use client::GeeClient;
