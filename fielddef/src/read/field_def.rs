use super::constraint::{parse_constraints, parse_foreign_keys};
use super::msgpack::{
    parse_array_header, parse_bool, parse_map_header, parse_str, parse_uint, skip_value, wire_type,
};
use crate::consts::{BOX_NAME_MAX, COLL_NONE, TUPLE_INDEX_BASE};
use crate::constraint::ConstraintDef;
use crate::error::{FieldDefError, Result};
use crate::field_type::{FieldType, WireType};
use crate::identifier::identifier_check;
use crate::schema::FieldDef;
use crate::types::{CompressionType, OnConflictAction};
use bumpalo::collections::Vec as BumpVec;
use bumpalo::Bump;
use nom::IResult;
use tracing::{debug, trace};

#[derive(Clone, Copy, Debug, PartialEq)]
enum OptionType {
    Bool,
    Uint32,
    StrPtr,
    Enum,
    Custom,
}

impl OptionType {
    fn name(self) -> &'static str {
        match self {
            Self::Bool => "boolean",
            Self::Uint32 => "unsigned",
            Self::StrPtr => "string",
            Self::Enum => "enum",
            Self::Custom => "custom",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum FieldOption {
    Type,
    Name,
    IsNullable,
    NullableAction,
    Collation,
    Default,
    DefaultFunc,
    Constraint,
    ForeignKey,
    Compression,
}

impl FieldOption {
    fn option_type(self) -> OptionType {
        match self {
            Self::Type | Self::NullableAction | Self::Compression => OptionType::Enum,
            Self::Name => OptionType::StrPtr,
            Self::IsNullable => OptionType::Bool,
            Self::Collation | Self::DefaultFunc => OptionType::Uint32,
            Self::Default | Self::Constraint | Self::ForeignKey => OptionType::Custom,
        }
    }
}

const FIELD_DEF_OPTIONS: &[(&str, FieldOption)] = &[
    ("type", FieldOption::Type),
    ("name", FieldOption::Name),
    ("is_nullable", FieldOption::IsNullable),
    ("nullable_action", FieldOption::NullableAction),
    ("collation", FieldOption::Collation),
    ("default", FieldOption::Default),
    ("default_func", FieldOption::DefaultFunc),
    ("constraint", FieldOption::Constraint),
    ("foreign_key", FieldOption::ForeignKey),
    ("compression", FieldOption::Compression),
];

const FIELD_DEF_OPTIONS_NAMES_ONLY: &[(&str, FieldOption)] = &[("name", FieldOption::Name)];

fn lookup_option(key: &[u8], names_only: bool) -> Option<(&'static str, FieldOption)> {
    let options = if names_only {
        FIELD_DEF_OPTIONS_NAMES_ONLY
    } else {
        FIELD_DEF_OPTIONS
    };
    options
        .iter()
        .find(|(name, _)| name.as_bytes() == key)
        .copied()
}

fn wrong_format<I, T, S: Into<String>>(fieldno: u32, reason: S) -> IResult<I, T, FieldDefError> {
    Err(nom::Err::Error(FieldDefError::WrongSpaceFormat {
        fieldno: fieldno + TUPLE_INDEX_BASE,
        reason: reason.into(),
    }))
}

/// Attribute a sub-decoder failure to `fieldno`. Cursor errors pass through.
fn attribute(fieldno: u32) -> impl Fn(nom::Err<FieldDefError>) -> nom::Err<FieldDefError> {
    move |error| match error {
        nom::Err::Error(
            e @ (FieldDefError::IllegalParams { .. } | FieldDefError::InvalidIdentifier { .. }),
        ) => nom::Err::Error(FieldDefError::WrongSpaceFormat {
            fieldno: fieldno + TUPLE_INDEX_BASE,
            reason: e.to_string(),
        }),
        e => e,
    }
}

/// Fail unless the next value has the wire type `option` expects.
fn expect_wire<'a>(
    input: &'a [u8],
    key: &str,
    option: FieldOption,
    fieldno: u32,
) -> IResult<&'a [u8], (), FieldDefError> {
    let option_type = option.option_type();
    let expected = match option_type {
        OptionType::Bool => WireType::Bool,
        OptionType::Uint32 => WireType::Uint,
        OptionType::StrPtr | OptionType::Enum => WireType::Str,
        OptionType::Custom => return Ok((input, ())),
    };
    let (_, wire) = wire_type(input)?;
    if wire != expected {
        return wrong_format(fieldno, format!("'{}' must be {}", key, option_type.name()));
    }
    Ok((input, ()))
}

fn parse_u32_option<'a>(
    input: &'a [u8],
    key: &str,
    option: FieldOption,
    fieldno: u32,
) -> IResult<&'a [u8], u32, FieldDefError> {
    let (rest, value) = parse_uint(input)?;
    match u32::try_from(value) {
        Ok(value) => Ok((rest, value)),
        Err(_) => wrong_format(
            fieldno,
            format!("'{}' must be {}", key, option.option_type().name()),
        ),
    }
}

/// Decoder state before validation. `None` in an enum slot means the value
/// named nothing known.
struct FieldDefDraft<'b> {
    field_type: Option<FieldType>,
    name: Option<&'b [u8]>,
    is_nullable: bool,
    nullable_action: Option<OnConflictAction>,
    is_action_missing: bool,
    coll_id: u32,
    compression_type: Option<CompressionType>,
    default_value: Option<&'b [u8]>,
    default_func_id: u32,
    constraint_def: BumpVec<'b, ConstraintDef<'b>>,
}

impl<'b> FieldDefDraft<'b> {
    fn new(bump: &'b Bump) -> Self {
        Self {
            field_type: Some(FieldType::Any),
            name: None,
            is_nullable: false,
            nullable_action: Some(OnConflictAction::Default),
            is_action_missing: true,
            coll_id: COLL_NONE,
            compression_type: Some(CompressionType::None),
            default_value: None,
            default_func_id: 0,
            constraint_def: BumpVec::new_in(bump),
        }
    }

    fn finish<'a>(
        self,
        input: &'a [u8],
        fieldno: u32,
    ) -> IResult<&'a [u8], FieldDef<'b>, FieldDefError> {
        let name = match self.name {
            Some(name) => name,
            None => return wrong_format(fieldno, "field name is missing"),
        };
        if name.len() > BOX_NAME_MAX {
            return wrong_format(fieldno, "field name is too long");
        }
        let name = match identifier_check(name) {
            Ok(name) => name,
            Err(e) => return wrong_format(fieldno, e.to_string()),
        };
        let field_type = match self.field_type {
            Some(field_type) => field_type,
            None => return wrong_format(fieldno, "unknown field type"),
        };
        let nullable_action = if self.is_action_missing {
            Some(if self.is_nullable {
                OnConflictAction::None
            } else {
                OnConflictAction::Default
            })
        } else {
            self.nullable_action
        };
        let nullable_action = match nullable_action {
            Some(action) => action,
            None => return wrong_format(fieldno, "unknown nullable action"),
        };
        if self.is_nullable != (nullable_action == OnConflictAction::None) {
            return wrong_format(
                fieldno,
                "conflicting nullability and nullable action properties",
            );
        }
        if self.coll_id != COLL_NONE
            && !matches!(
                field_type,
                FieldType::String | FieldType::Scalar | FieldType::Any
            )
        {
            return wrong_format(
                fieldno,
                "collation is reasonable only for 'string', 'scalar', and 'any' fields",
            );
        }
        let compression_type = match self.compression_type {
            Some(compression_type) => compression_type,
            None => return wrong_format(fieldno, "unknown compression type"),
        };
        let field = FieldDef::from_parts(
            field_type,
            name,
            self.is_nullable,
            nullable_action,
            self.coll_id,
            compression_type,
            self.default_value,
            self.default_func_id,
            self.constraint_def.into_bump_slice(),
        );
        Ok((input, field))
    }
}

pub(crate) fn parse_field_def<'a, 'b>(
    input: &'a [u8],
    fieldno: u32,
    bump: &'b Bump,
    names_only: bool,
) -> IResult<&'a [u8], FieldDef<'b>, FieldDefError> {
    let (_, wire) = wire_type(input)?;
    if wire != WireType::Map {
        return wrong_format(fieldno, "expected a map");
    }
    let (mut input, count) = parse_map_header(input)?;
    let mut draft = FieldDefDraft::new(bump);
    for _ in 0..count {
        let (_, wire) = wire_type(input)?;
        if wire != WireType::Str {
            return wrong_format(fieldno, "expected a map with string keys");
        }
        let (rest, key) = parse_str(input)?;
        let (key, option) = match lookup_option(key, names_only) {
            Some(found) => found,
            None => {
                trace!(
                    fieldno,
                    key = %String::from_utf8_lossy(key),
                    "skipping unknown field option"
                );
                input = skip_value(rest)?.0;
                continue;
            }
        };
        let (rest, _) = expect_wire(rest, key, option, fieldno)?;
        input = match option {
            FieldOption::Type => {
                let (rest, value) = parse_str(rest)?;
                draft.field_type = FieldType::by_name(value);
                rest
            }
            FieldOption::Name => {
                let (rest, value) = parse_str(rest)?;
                draft.name = Some(&*bump.alloc_slice_copy(value));
                rest
            }
            FieldOption::IsNullable => {
                let (rest, value) = parse_bool(rest)?;
                draft.is_nullable = value;
                rest
            }
            FieldOption::NullableAction => {
                let (rest, value) = parse_str(rest)?;
                draft.nullable_action = OnConflictAction::by_name(value);
                draft.is_action_missing = false;
                rest
            }
            FieldOption::Collation => {
                let (rest, value) = parse_u32_option(rest, key, option, fieldno)?;
                draft.coll_id = value;
                rest
            }
            FieldOption::Compression => {
                let (rest, value) = parse_str(rest)?;
                draft.compression_type = CompressionType::by_name(value);
                rest
            }
            FieldOption::Default => {
                let (rest, raw) = skip_value(rest)?;
                draft.default_value = Some(&*bump.alloc_slice_copy(raw));
                rest
            }
            FieldOption::DefaultFunc => {
                let (rest, value) = parse_u32_option(rest, key, option, fieldno)?;
                draft.default_func_id = value;
                rest
            }
            FieldOption::Constraint => {
                parse_constraints(rest, &mut draft.constraint_def, bump)
                    .map_err(attribute(fieldno))?
                    .0
            }
            FieldOption::ForeignKey => {
                parse_foreign_keys(rest, &mut draft.constraint_def, bump)
                    .map_err(attribute(fieldno))?
                    .0
            }
        };
    }
    let (input, field) = draft.finish(input, fieldno)?;
    trace!(
        fieldno,
        name = field.name(),
        field_type = %field.field_type(),
        constraints = field.constraint_count(),
        "decoded field definition"
    );
    Ok((input, field))
}

/// Decode a single field definition map. `fieldno` is the 0-based position of
/// the field and only shows up in errors.
///
/// With `names_only` every key except `name` is skipped and the other
/// properties keep their defaults.
pub fn decode_field_def<'a, 'b>(
    input: &'a [u8],
    fieldno: u32,
    bump: &'b Bump,
    names_only: bool,
) -> Result<(&'a [u8], FieldDef<'b>)> {
    Ok(parse_field_def(input, fieldno, bump, names_only)?)
}

/// Decode an array of field definition maps into `bump`.
///
/// Decoding stops at the first bad element. Whatever was already allocated in
/// `bump` stays there; the caller is expected to drop the arena on error.
pub fn decode_field_defs<'a, 'b>(
    input: &'a [u8],
    bump: &'b Bump,
    names_only: bool,
) -> Result<(&'a [u8], &'b [FieldDef<'b>])> {
    let (_, wire) = wire_type(input)?;
    if wire != WireType::Array {
        return Err(FieldDefError::WrongFormat {
            reason: "expected an array of field definitions".to_string(),
        });
    }
    let (mut input, count) = parse_array_header(input)?;
    if count == 0 {
        debug!(count, "decoded empty field definition array");
        return Ok((input, &[]));
    }
    // every element takes at least one byte
    let capacity = usize::try_from(count).map_or(input.len(), |count| count.min(input.len()));
    let mut fields = BumpVec::with_capacity_in(capacity, bump);
    for fieldno in 0..count {
        let (rest, field) = parse_field_def(input, fieldno, bump, names_only)?;
        fields.push(field);
        input = rest;
    }
    debug!(
        count,
        names_only,
        arena_bytes = bump.allocated_bytes(),
        "decoded field definition array"
    );
    Ok((input, fields.into_bump_slice()))
}
