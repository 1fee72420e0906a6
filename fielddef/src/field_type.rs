use std::fmt;
use std::str::FromStr;

/// Primitive wire type of an encoded value, in marker order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WireType {
    Nil,
    Uint,
    Int,
    Str,
    Bin,
    Array,
    Map,
    Bool,
    Float,
    Double,
    Ext,
}

impl WireType {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Uint => "unsigned",
            Self::Int => "integer",
            Self::Str => "string",
            Self::Bin => "blob",
            Self::Array => "array",
            Self::Map => "map",
            Self::Bool => "boolean",
            Self::Float => "float",
            Self::Double => "double",
            Self::Ext => "extension",
        }
    }

    pub const fn bit(self) -> WireTypeSet {
        WireTypeSet::from_bits_retain(1 << self as u32)
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sub-type of an extension value, numbered as on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExtType {
    Unknown = 0,
    Decimal = 1,
    Uuid = 2,
    Error = 3,
    Datetime = 4,
    Compression = 5,
    Interval = 6,
}

impl ExtType {
    pub fn from_tag(tag: i8) -> Self {
        match tag {
            1 => Self::Decimal,
            2 => Self::Uuid,
            3 => Self::Error,
            4 => Self::Datetime,
            5 => Self::Compression,
            6 => Self::Interval,
            _ => Self::Unknown,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Decimal => "decimal",
            Self::Uuid => "uuid",
            Self::Error => "error",
            Self::Datetime => "datetime",
            Self::Compression => "compression",
            Self::Interval => "interval",
        }
    }

    pub const fn bit(self) -> ExtTypeSet {
        ExtTypeSet::from_bits_retain(1 << self as u32)
    }
}

bitflags::bitflags! {
    /// Set of primitive wire types a field type accepts directly.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WireTypeSet: u32 {
        const NIL = 1 << 0;
        const UINT = 1 << 1;
        const INT = 1 << 2;
        const STR = 1 << 3;
        const BIN = 1 << 4;
        const ARRAY = 1 << 5;
        const MAP = 1 << 6;
        const BOOL = 1 << 7;
        const FLOAT = 1 << 8;
        const DOUBLE = 1 << 9;
        const EXT = 1 << 10;
    }
}

bitflags::bitflags! {
    /// Set of extension sub-types a field type accepts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ExtTypeSet: u32 {
        const UNKNOWN = 1 << 0;
        const DECIMAL = 1 << 1;
        const UUID = 1 << 2;
        const ERROR = 1 << 3;
        const DATETIME = 1 << 4;
        const COMPRESSION = 1 << 5;
        const INTERVAL = 1 << 6;
    }
}

const ANY_WIRE: WireTypeSet = WireTypeSet::from_bits_retain(u32::MAX);
const ANY_EXT: ExtTypeSet = ExtTypeSet::from_bits_retain(u32::MAX ^ ExtTypeSet::UNKNOWN.bits());
const INTEGRAL: WireTypeSet = WireTypeSet::UINT.union(WireTypeSet::INT);
const NUMERIC: WireTypeSet = INTEGRAL
    .union(WireTypeSet::FLOAT)
    .union(WireTypeSet::DOUBLE);
const SCALAR: WireTypeSet = NUMERIC
    .union(WireTypeSet::STR)
    .union(WireTypeSet::BIN)
    .union(WireTypeSet::BOOL);
const NO_WIRE: WireTypeSet = WireTypeSet::empty();
const NO_EXT: ExtTypeSet = ExtTypeSet::empty();

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldType {
    Any,
    Unsigned,
    String,
    Number,
    Double,
    Integer,
    Boolean,
    Varbinary,
    Scalar,
    Decimal,
    Uuid,
    Datetime,
    Interval,
    Array,
    Map,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Float32,
    Float64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FixedInt {
    No,
    Signed,
    Unsigned,
}

/// Static description of one field type.
#[derive(Clone, Copy, Debug)]
pub struct FieldTypeInfo {
    field_type: FieldType,
    name: &'static str,
    wire_types: WireTypeSet,
    ext_types: ExtTypeSet,
    fixed_int: FixedInt,
    min_value: i64,
    max_value: u64,
}

impl FieldTypeInfo {
    const fn new(
        field_type: FieldType,
        name: &'static str,
        wire_types: WireTypeSet,
        ext_types: ExtTypeSet,
    ) -> Self {
        Self {
            field_type,
            name,
            wire_types,
            ext_types,
            fixed_int: FixedInt::No,
            min_value: 0,
            max_value: 0,
        }
    }

    const fn signed(field_type: FieldType, name: &'static str, min: i64, max: u64) -> Self {
        Self {
            fixed_int: FixedInt::Signed,
            min_value: min,
            max_value: max,
            ..Self::new(field_type, name, INTEGRAL, NO_EXT)
        }
    }

    const fn unsigned(field_type: FieldType, name: &'static str, max: u64) -> Self {
        Self {
            fixed_int: FixedInt::Unsigned,
            min_value: 0,
            max_value: max,
            ..Self::new(field_type, name, WireTypeSet::UINT, NO_EXT)
        }
    }

    pub const fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Primitive wire types accepted directly. Empty means the value must
    /// be resolved through its extension sub-type.
    pub const fn wire_types(&self) -> WireTypeSet {
        self.wire_types
    }

    pub const fn ext_types(&self) -> ExtTypeSet {
        self.ext_types
    }

    pub const fn is_fixed_signed(&self) -> bool {
        matches!(self.fixed_int, FixedInt::Signed)
    }

    pub const fn is_fixed_unsigned(&self) -> bool {
        matches!(self.fixed_int, FixedInt::Unsigned)
    }

    /// Only meaningful for fixed-width integer types.
    pub const fn min_value(&self) -> i64 {
        self.min_value
    }

    /// Only meaningful for fixed-width integer types.
    pub const fn max_value(&self) -> u64 {
        self.max_value
    }
}

#[rustfmt::skip]
const CATALOG: [FieldTypeInfo; FieldType::COUNT] = [
    FieldTypeInfo::new(FieldType::Any, "any", ANY_WIRE, ANY_EXT),
    FieldTypeInfo::new(FieldType::Unsigned, "unsigned", WireTypeSet::UINT, NO_EXT),
    FieldTypeInfo::new(FieldType::String, "string", WireTypeSet::STR, NO_EXT),
    FieldTypeInfo::new(FieldType::Number, "number", NUMERIC, ExtTypeSet::DECIMAL),
    FieldTypeInfo::new(FieldType::Double, "double", NUMERIC, NO_EXT),
    FieldTypeInfo::new(FieldType::Integer, "integer", INTEGRAL, NO_EXT),
    FieldTypeInfo::new(FieldType::Boolean, "boolean", WireTypeSet::BOOL, NO_EXT),
    FieldTypeInfo::new(FieldType::Varbinary, "varbinary", WireTypeSet::BIN, NO_EXT),
    FieldTypeInfo::new(FieldType::Scalar, "scalar", SCALAR,
                       ExtTypeSet::DECIMAL.union(ExtTypeSet::UUID).union(ExtTypeSet::DATETIME)),
    FieldTypeInfo::new(FieldType::Decimal, "decimal", NO_WIRE, ExtTypeSet::DECIMAL),
    FieldTypeInfo::new(FieldType::Uuid, "uuid", NO_WIRE, ExtTypeSet::UUID),
    FieldTypeInfo::new(FieldType::Datetime, "datetime", NO_WIRE, ExtTypeSet::DATETIME),
    FieldTypeInfo::new(FieldType::Interval, "interval", NO_WIRE, ExtTypeSet::INTERVAL),
    FieldTypeInfo::new(FieldType::Array, "array", WireTypeSet::ARRAY, NO_EXT),
    FieldTypeInfo::new(FieldType::Map, "map", WireTypeSet::MAP, NO_EXT),
    FieldTypeInfo::signed(FieldType::Int8, "int8", i8::MIN as i64, i8::MAX as u64),
    FieldTypeInfo::unsigned(FieldType::Uint8, "uint8", u8::MAX as u64),
    FieldTypeInfo::signed(FieldType::Int16, "int16", i16::MIN as i64, i16::MAX as u64),
    FieldTypeInfo::unsigned(FieldType::Uint16, "uint16", u16::MAX as u64),
    FieldTypeInfo::signed(FieldType::Int32, "int32", i32::MIN as i64, i32::MAX as u64),
    FieldTypeInfo::unsigned(FieldType::Uint32, "uint32", u32::MAX as u64),
    FieldTypeInfo::signed(FieldType::Int64, "int64", i64::MIN, i64::MAX as u64),
    FieldTypeInfo::unsigned(FieldType::Uint64, "uint64", u64::MAX),
    FieldTypeInfo::new(FieldType::Float32, "float32", WireTypeSet::FLOAT, NO_EXT),
    FieldTypeInfo::new(FieldType::Float64, "float64", WireTypeSet::DOUBLE, NO_EXT),
];

static FIELD_TYPE_CATALOG: [FieldTypeInfo; FieldType::COUNT] = CATALOG;

// Entry `i` of the catalog must describe field type `i`.
const _: () = {
    let mut i = 0;
    while i < FieldType::COUNT {
        assert!(CATALOG[i].field_type as usize == i);
        assert!(FieldType::ALL[i] as usize == i);
        assert!(!(CATALOG[i].is_fixed_signed() && CATALOG[i].is_fixed_unsigned()));
        i += 1;
    }
};

impl FieldType {
    pub const COUNT: usize = 25;

    pub const ALL: [FieldType; FieldType::COUNT] = [
        Self::Any,
        Self::Unsigned,
        Self::String,
        Self::Number,
        Self::Double,
        Self::Integer,
        Self::Boolean,
        Self::Varbinary,
        Self::Scalar,
        Self::Decimal,
        Self::Uuid,
        Self::Datetime,
        Self::Interval,
        Self::Array,
        Self::Map,
        Self::Int8,
        Self::Uint8,
        Self::Int16,
        Self::Uint16,
        Self::Int32,
        Self::Uint32,
        Self::Int64,
        Self::Uint64,
        Self::Float32,
        Self::Float64,
    ];

    pub fn info(self) -> &'static FieldTypeInfo {
        &FIELD_TYPE_CATALOG[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn is_fixed_int(self) -> bool {
        !matches!(self.info().fixed_int, FixedInt::No)
    }

    /// Resolve a type name, falling back to the legacy `num`, `str` and `*`
    /// aliases. Names are matched ignoring ASCII case.
    pub fn by_name<N: AsRef<[u8]>>(name: N) -> Option<Self> {
        let name = name.as_ref();
        if let Some(info) = FIELD_TYPE_CATALOG
            .iter()
            .find(|info| info.name.as_bytes().eq_ignore_ascii_case(name))
        {
            return Some(info.field_type);
        }
        if name.eq_ignore_ascii_case(b"num") {
            Some(Self::Unsigned)
        } else if name.eq_ignore_ascii_case(b"str") {
            Some(Self::String)
        } else if name == b"*" {
            Some(Self::Any)
        } else {
            None
        }
    }

    /// True if every value acceptable for `other` is also acceptable for
    /// `self`.
    pub fn contains(self, other: FieldType) -> bool {
        if self == other {
            return true;
        }
        let (info1, info2) = (self.info(), other.info());

        // An empty primitive set on `other` means "extension only".
        let is_ext = info2.wire_types.is_empty();
        let base = if is_ext {
            info1.ext_types.contains(info2.ext_types)
        } else {
            info1.wire_types.contains(info2.wire_types)
        };
        if !base {
            return false;
        }
        if !self.is_fixed_int() {
            return true;
        }
        if !other.is_fixed_int() {
            // uint64 is an alias for unsigned.
            return self == Self::Uint64 && other == Self::Unsigned;
        }
        info1.min_value <= info2.min_value && info1.max_value >= info2.max_value
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, PartialEq)]
pub struct UnknownFieldType;

impl FromStr for FieldType {
    type Err = UnknownFieldType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::by_name(s).ok_or(UnknownFieldType)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_contains_is_reflexive() {
        for t in FieldType::ALL {
            assert!(t.contains(t), "{t} should contain itself");
        }
    }

    #[test]
    fn test_fixed_ints_by_range() {
        assert!(!FieldType::Int8.contains(FieldType::Int16));
        assert!(FieldType::Int16.contains(FieldType::Int8));
        assert!(FieldType::Int64.contains(FieldType::Uint32));
        assert!(!FieldType::Int64.contains(FieldType::Uint64));
        assert!(!FieldType::Uint32.contains(FieldType::Int8));
        assert!(FieldType::Uint16.contains(FieldType::Uint8));
        assert!(!FieldType::Uint8.contains(FieldType::Uint16));
    }

    #[test]
    fn test_uint64_unsigned_alias() {
        assert!(FieldType::Uint64.contains(FieldType::Unsigned));
        assert!(FieldType::Unsigned.contains(FieldType::Uint64));
        assert!(!FieldType::Uint32.contains(FieldType::Unsigned));
        assert!(!FieldType::Int64.contains(FieldType::Integer));
    }

    #[test]
    fn test_scalar_absorption() {
        assert!(FieldType::Scalar.contains(FieldType::String));
        assert!(FieldType::Scalar.contains(FieldType::Uint8));
        assert!(FieldType::Number.contains(FieldType::Int32));
        assert!(FieldType::Double.contains(FieldType::Float32));
        assert!(!FieldType::String.contains(FieldType::Scalar));
        assert!(!FieldType::Float64.contains(FieldType::Double));
    }

    #[test]
    fn test_extension_types() {
        assert!(FieldType::Any.contains(FieldType::Decimal));
        assert!(FieldType::Any.contains(FieldType::Interval));
        assert!(FieldType::Number.contains(FieldType::Decimal));
        assert!(FieldType::Scalar.contains(FieldType::Uuid));
        assert!(FieldType::Scalar.contains(FieldType::Datetime));
        assert!(!FieldType::Scalar.contains(FieldType::Interval));
        assert!(!FieldType::Decimal.contains(FieldType::Number));
        assert!(!FieldType::Decimal.contains(FieldType::Uuid));
        assert!(!FieldType::String.contains(FieldType::Decimal));
    }

    #[test]
    fn test_any_is_top() {
        for t in FieldType::ALL {
            assert!(FieldType::Any.contains(t));
            if t != FieldType::Any {
                assert!(!t.contains(FieldType::Any), "{t} should not contain any");
            }
        }
    }

    #[test]
    fn test_name_round_trip() {
        for t in FieldType::ALL {
            assert_eq!(FieldType::by_name(t.name()), Some(t));
            assert_eq!(t.name().parse::<FieldType>(), Ok(t));
        }
    }

    #[test]
    fn test_legacy_aliases() {
        assert_eq!(FieldType::by_name("num"), Some(FieldType::Unsigned));
        assert_eq!(FieldType::by_name("STR"), Some(FieldType::String));
        assert_eq!(FieldType::by_name("*"), Some(FieldType::Any));
        assert_eq!(FieldType::by_name("UNSIGNED"), Some(FieldType::Unsigned));
        assert_eq!(FieldType::by_name("**"), None);
        assert_eq!(FieldType::by_name("nums"), None);
        assert_eq!(FieldType::by_name(""), None);
        assert_matches!("bignum".parse::<FieldType>(), Err(UnknownFieldType));
    }

    #[test]
    fn test_catalog_entries() {
        let info = FieldType::Int16.info();
        assert!(info.is_fixed_signed());
        assert!(!info.is_fixed_unsigned());
        assert_eq!(info.min_value(), -32768);
        assert_eq!(info.max_value(), 32767);

        let info = FieldType::Uint64.info();
        assert!(info.is_fixed_unsigned());
        assert_eq!(info.max_value(), u64::MAX);

        assert!(!FieldType::Float32.is_fixed_int());
        assert!(FieldType::Uuid.info().wire_types().is_empty());
        assert_eq!(FieldType::Uuid.info().ext_types(), ExtType::Uuid.bit());
        assert!(FieldType::Any.info().wire_types().contains(WireType::Ext.bit()));
        assert!(!FieldType::Any.info().ext_types().contains(ExtType::Unknown.bit()));
    }

    #[test]
    fn test_ext_type_from_tag() {
        assert_eq!(ExtType::from_tag(1), ExtType::Decimal);
        assert_eq!(ExtType::from_tag(6), ExtType::Interval);
        assert_eq!(ExtType::from_tag(0), ExtType::Unknown);
        assert_eq!(ExtType::from_tag(-1), ExtType::Unknown);
        assert_eq!(ExtType::from_tag(42), ExtType::Unknown);
    }
}
