// Library root: re-exports all modules so integration tests and transport
// or data-source adapters can access the crate's public API.

pub mod bot;
pub mod category;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod matchup;
pub mod provider;
pub mod report;
