//! bookdl
//!
//! Terminal client for searching a book catalog and downloading results in
//! the background while the table stays interactive.
//!
//! Layout follows a pure core / impure shell split:
//! - `model`, `state`, `provider::link` - plain data and transitions
//! - `provider`, `transfer` - network and filesystem collaborators
//! - `view` - terminal, event loop and rendering

pub mod config;
pub mod logging;
pub mod model;
pub mod provider;
pub mod state;
pub mod transfer;
pub mod view;

#[cfg(test)]
mod tests;
