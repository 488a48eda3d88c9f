pub mod error;
pub mod snapshot;

mod account;
mod core;
mod streams;
mod tags;

pub use core::{Backend, BackendConfig};
