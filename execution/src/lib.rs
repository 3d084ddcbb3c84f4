#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::cognitive_complexity,
    unused_crate_dependencies,
    unused_extern_crates,
    clippy::unused_self,
    clippy::useless_let_if_seq,
    missing_debug_implementations,
    rust_2018_idioms
)]
#![allow(clippy::type_complexity, clippy::too_many_arguments)]

//! Paper execution venue: order lifecycle, fill models, and position
//! accounting.

pub mod adapter;
pub mod fill_model;
pub mod order;
pub mod position;

pub use adapter::PaperExecutionAdapter;
pub use fill_model::{Bbo, FillDecision, FillModel, TopOfBookCappedFillModel, TopOfBookFullFillModel};
pub use order::OrderRecord;
pub use position::Position;
