//! Authentication service library.
//!
//! Core of the platform's authentication microservice: turns a
//! username/password pair into a signed, time-bounded session token and
//! turns a bearer token back into an authenticated principal. User records
//! and configuration parameters live in sibling services reached through
//! the collaborator clients in [`clients`].
//!
//! # Modules
//!
//! - `config` - Service configuration
//! - `crypto` - Cryptographic operations (JWT signing, password hashing)
//! - `errors` - Error types
//! - `keystore` - Signing-key bootstrap and in-process key cache
//! - `clients` - Collaborator contracts and HTTP implementations
//! - `models` - Data models
//! - `services` - Business logic layer
//! - `handlers` - HTTP request handlers
//! - `routes` - Router assembly
//! - `observability` - Metrics
//! - `testutil` - In-memory collaborators for tests

pub mod clients;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod handlers;
pub mod keystore;
pub mod models;
pub mod observability;
pub mod routes;
pub mod services;
pub mod testutil;
