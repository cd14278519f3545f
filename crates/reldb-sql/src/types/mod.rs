//! Value and type model.
//!
//! - [`DataType`]: declared column types
//! - [`Value`]: tagged column values
//! - [`Tvl`] and [`compare`]: three-valued comparison logic

mod data_type;
mod logic;
mod value;

pub use data_type::DataType;
pub use logic::{compare, CompareOp, Tvl};
pub use value::{Date, Value};
