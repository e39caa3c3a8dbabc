//! Serverless trip distance lookup.
//!
//! The handler owns request validation, CORS and API Gateway response shaping.
//! The distance backend is injected through [`fare_core::distance::DistanceLookup`]
//! so the handler is testable without network access.

pub mod handler;
