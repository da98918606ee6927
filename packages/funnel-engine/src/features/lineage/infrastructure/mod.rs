//! Lineage infrastructure

mod join_resolver;

pub use join_resolver::JoinResolver;
