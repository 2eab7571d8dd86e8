//! Token Management
//!
//! Token lifecycle: the held token state and the manager that renews it.

pub mod manager;
pub mod state;

// Token Manager
pub use manager::AuthManager;

// Token State
pub use state::TokenState;
