//! Client-side decoder for the Rejseplanen journey planner.
//!
//! Planner responses define every location, product and route geometry once,
//! in a shared "common" block, and refer to them by list position everywhere
//! else. This crate resolves that block into `domain::CommonData`, assembles
//! connection records into typed `domain::Trip`s that index into it, decodes
//! the compact polyline format, and fetches walking-route geometry lazily,
//! once per route context.

pub mod cache;
pub mod domain;
pub mod hafas;
pub mod polyline;
pub mod walking;
