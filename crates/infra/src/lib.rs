//! # Studyflow Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite repository implementations
//! - HTTP provider clients (Google Calendar, Microsoft Graph)
//! - Token lifecycle management and sync orchestration
//! - Application services and configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `studyflow-core`
//! - Depends on `studyflow-domain` and `studyflow-core`
//! - Contains all "impure" code (I/O, HTTP)

pub mod config;
pub mod database;
pub mod errors;
pub mod integrations;
pub mod services;

pub use errors::InfraError;
