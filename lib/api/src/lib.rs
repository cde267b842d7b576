//! # skillmatch API
//!
//! REST surface for the skillmatch engine: skill suggestion, vector
//! refresh, health probing and knowledge-base mapping management.

pub mod rest;

pub use rest::RestApi;
