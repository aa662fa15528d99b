//! Eco-actions web application library.
//!
//! Hexagonal layout: [`domain`] holds entities, form rules, ports and
//! services; [`inbound`] adapts HTTP requests onto them; [`outbound`]
//! implements the ports over PostgreSQL, memory, the filesystem and Argon2.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

pub use middleware::Trace;
