//! Server Module
//!
//! Initialization and configuration of the Axum HTTP server.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState and FromRef implementations
//! ├── config.rs       - Environment configuration and store setup
//! └── init.rs         - Server initialization and app creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: Reads `SERVER_PORT` and `DATABASE_URL`
//! 2. **Store Setup**: Connects the `SqlitePool` and applies the schema
//! 3. **Fan-out Worker**: Spawns the single consumer of the update queue
//! 4. **Router Creation**: Configures all routes and middleware

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

// Re-export commonly used types
pub use config::ServerConfig;
pub use init::{build_state, create_app};
pub use state::AppState;
