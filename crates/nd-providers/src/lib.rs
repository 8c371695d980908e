//! nd-providers: implementations of the newsdesk provider contracts.
//!
//! - `FixtureSearchProvider`: deterministic stand-in for a real search API
//! - `StaticSemanticIndex`: synonym-table stand-in for a vector database

pub mod fixture;
pub mod semantic;

pub use fixture::FixtureSearchProvider;
pub use semantic::StaticSemanticIndex;
