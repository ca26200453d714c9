//! Request and response types shared between the RétroBus Mail backend and
//! its clients.

pub mod api;
pub mod models;

pub use api::*;
pub use models::*;
