//! Aula: the course authoring and progress engine behind a self-hosted
//! e-learning platform.
//!
//! The engine owns four concerns around a remote course store:
//!
//! - keeping an in-progress authoring draft alive across reloads, tabs
//!   and devices ([`application::draft`]);
//! - reconciling an edited lesson tree against the store without losing
//!   or duplicating rows ([`application::authoring`]);
//! - driving per-lesson quizzes to durable, at-most-once completion and
//!   requesting server-side progress recomputation ([`application::quiz`]);
//! - initializing enrollments with their zeroed progress rows
//!   ([`application::enrollment`]).
//!
//! The remote store is reached through the thin REST client in
//! [`infra::store`]; wire shapes live in the `aula-store-types` crate.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
