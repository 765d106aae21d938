#[macro_use]
extern crate ndarray as nd;
extern crate linxal;
extern crate num_traits;

pub use cholesky::*;
pub use error::{Error, Result};
pub use primitives::*;
pub use qr::*;

pub mod cholesky;
pub mod decompose;
pub mod error;
pub mod primitives;
pub mod qr;
