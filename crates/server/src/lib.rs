pub mod errors;
pub mod state;
pub mod routes;
pub mod openapi;
pub mod startup;

pub use startup::{launch, run, ServiceKind};
