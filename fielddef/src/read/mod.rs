mod constraint;
mod field_def;
#[cfg(feature = "inspect")]
pub mod inspect;
mod msgpack;

pub use field_def::{decode_field_def, decode_field_defs};
