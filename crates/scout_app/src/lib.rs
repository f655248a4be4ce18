//! Command-line front end: argument parsing, the effect runner that drives
//! the search engine, the session controller and plain-text rendering.

pub mod args;
pub mod controller;
pub mod effects;
pub mod render;
