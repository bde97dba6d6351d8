//! # Tennis History
//!
//! Player statistics over a Neo4j graph of tennis events and matches.
//!
//! ## Architecture
//!
//! - **graph**: Graph store access (Neo4j Query API, in-memory fixtures)
//! - **normalize**: Driver-native values into plain JSON
//! - **storage**: Cypher queries and row decoding
//! - **classify**: Level, category and set-pattern classification of matches
//! - **calculate**: Win-loss index, per-level summary, head-to-head, serve/return
//!   stats and champion scores
//! - **schema**: Request validation and response shape checks
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod classify;
pub mod config;
pub mod graph;
pub mod models;
pub mod normalize;
pub mod schema;
pub mod storage;

pub use models::*;
