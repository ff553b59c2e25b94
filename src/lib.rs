//! growthalloc: trend/momentum target allocation for a fixed equity watchlist.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`], command line host in [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
