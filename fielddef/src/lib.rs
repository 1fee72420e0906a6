pub mod consts;
pub mod constraint;
pub mod error;
mod field_def_array;
pub mod field_type;
pub mod identifier;
pub mod read;
pub mod schema;
pub mod types;

pub use error::{FieldDefError, Result};
pub use field_def_array::FieldDefArray;
pub use field_type::{ExtType, FieldType, WireType};
pub use read::{decode_field_def, decode_field_defs};
pub use schema::FieldDef;
