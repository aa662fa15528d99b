//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: a process-local store implementing the same repository ports
//! - **storage**: media files under a capability-scoped directory
//! - **security**: Argon2 password hashing
//!
//! Adapters convert between domain types and infrastructure representations
//! and contain no business rules.

pub mod memory;
pub mod persistence;
pub mod security;
pub mod storage;
