//! Roster API Test Suite
//!
//! End-to-end tests through the public `rosterdb` facade.
//!
//! ## Structure
//!
//! - **persistence**: data survives reopening a data directory
//! - **backup**: export/restore through documents and files
//! - **config**: `roster.toml` handling
//! - **live_views**: feature stores and subscriptions
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test roster_api
//! cargo test --test roster_api backup
//! ```

mod test_utils;

mod backup;
mod config;
mod live_views;
mod persistence;
