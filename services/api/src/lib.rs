//! Property management API: managers register, log in, and keep track of the
//! properties they manage and the tenants living in them.

pub mod config;
pub mod context;
pub mod error;
pub mod password;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
pub mod store;

pub use config::Config;
pub use routes::router;
pub use state::AppState;
