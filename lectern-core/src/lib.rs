// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Lectern Core
//!
//! Core data types shared across the Lectern crates.
//!
//! The content API owns the payload schema; this crate deliberately keeps
//! payloads opaque and only gives shape to the parts Lectern itself has to
//! understand:
//!
//! - [`DocumentPayload`] / [`SitePayload`] - decoded content payloads
//! - [`ApiErrorBody`] / [`ApiErrorDetail`] - the structured error body the
//!   backend returns alongside non-2xx statuses

pub mod models;

pub use models::{ApiErrorBody, ApiErrorDetail, DocumentPayload, SitePayload};
