//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! Concrete implementations of the domain's driven ports. Adapters are thin
//! translators between domain types and infrastructure representations;
//! business rules stay in the domain services that call them.

pub mod persistence;
