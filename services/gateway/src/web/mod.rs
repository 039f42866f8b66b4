pub mod auth;
pub mod lost_found;
pub mod reply;
pub mod rest;
pub mod safety;
pub mod state;
pub mod travel;

// Re-export what the binaries need to build the server.
pub use rest::{router, ApiDoc};
pub use state::AppState;
