//! Order aggregate and errors.

mod aggregate;
mod errors;

pub use aggregate::{Order, OrderDetails};
pub use errors::OrderError;
