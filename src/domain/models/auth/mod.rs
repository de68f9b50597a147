pub mod authentication_request;
pub mod executor;

pub use authentication_request::*;
pub use executor::*;
