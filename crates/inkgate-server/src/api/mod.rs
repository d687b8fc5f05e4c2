//! REST API: routing, handlers and wire types

mod handlers;
mod router;
mod types;


pub use router::create_router;
pub use types::AppState;
