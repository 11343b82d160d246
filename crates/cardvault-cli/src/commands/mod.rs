//! Command implementations.

pub mod autocomplete;
pub mod card;
pub mod collection;
pub mod config;
pub mod search;
pub mod serve;
pub mod sets;
