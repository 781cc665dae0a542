//! Modules layer - Infrastructure components for external integrations
//!
//! Contains clients and adapters for external services (the Supabase
//! table store and its object storage).

pub mod supabase;
