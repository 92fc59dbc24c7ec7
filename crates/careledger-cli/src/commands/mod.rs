//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init/status commands and shared utilities (open_db, parse_date)
//! - `facilities` - Nursing home facility commands
//! - `residents` - Resident commands
//! - `transactions` - Financial transaction commands
//! - `configs` - Report configuration commands
//! - `reports` - Report generation, inspection, and export commands

pub mod configs;
pub mod core;
pub mod facilities;
pub mod reports;
pub mod residents;
pub mod transactions;

// Re-export command functions for main.rs
pub use configs::*;
pub use core::*;
pub use facilities::*;
pub use reports::*;
pub use residents::*;
pub use transactions::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}...", &s[..max.saturating_sub(3)])
    }
}
