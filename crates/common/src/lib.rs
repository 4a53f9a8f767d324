//! Shared support types for the auth platform services.

#![warn(clippy::pedantic)]

/// Module for secret types that prevent accidental logging
pub mod secret;
