/// Longest field name accepted by the decoder, in bytes.
pub const BOX_NAME_MAX: usize = 65000;

/// Collation id meaning "no collation".
pub const COLL_NONE: u32 = 0;

/// Field numbers in diagnostics are displayed starting from this base.
pub(crate) const TUPLE_INDEX_BASE: u32 = 1;

/// Byte pattern written over released descriptor memory in debug builds.
pub(crate) const TRASH_BYTE: u8 = 0x23;
