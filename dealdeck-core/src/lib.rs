//! dealdeck core library exports

pub mod catalog;
pub mod error;
pub mod gateway;
pub mod view;

pub use error::{DealsError, Result, TransportError};
