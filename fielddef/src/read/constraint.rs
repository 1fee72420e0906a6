use super::msgpack::{parse_map_header, parse_str, parse_uint, wire_type};
use crate::constraint::{ConstraintDef, ConstraintKind, ForeignKeyDef, ForeignKeyField};
use crate::error::FieldDefError;
use crate::field_type::WireType;
use crate::identifier::identifier_check;
use bumpalo::collections::Vec as BumpVec;
use bumpalo::Bump;
use nom::IResult;

fn illegal<I, T>(reason: &str) -> IResult<I, T, FieldDefError> {
    Err(nom::Err::Error(FieldDefError::illegal_params(reason)))
}

fn parse_u32<'a>(input: &'a [u8], reason: &str) -> IResult<&'a [u8], u32, FieldDefError> {
    let (_, wire) = wire_type(input)?;
    if wire != WireType::Uint {
        return illegal(reason);
    }
    let (rest, value) = parse_uint(input)?;
    match u32::try_from(value) {
        Ok(value) => Ok((rest, value)),
        Err(_) => illegal(reason),
    }
}

fn parse_name<'a, 'b>(
    input: &'a [u8],
    bump: &'b Bump,
    reason: &str,
) -> IResult<&'a [u8], &'b str, FieldDefError> {
    let (_, wire) = wire_type(input)?;
    if wire != WireType::Str {
        return illegal(reason);
    }
    let (rest, name) = parse_str(input)?;
    let name = identifier_check(name).map_err(nom::Err::Error)?;
    Ok((rest, bump.alloc_str(name)))
}

/// Decode `{name: func_id, ...}` and append the constraints to `out`.
pub(crate) fn parse_constraints<'a, 'b>(
    input: &'a [u8],
    out: &mut BumpVec<'b, ConstraintDef<'b>>,
    bump: &'b Bump,
) -> IResult<&'a [u8], (), FieldDefError> {
    let (_, wire) = wire_type(input)?;
    if wire != WireType::Map {
        return illegal("constraint must be a map");
    }
    let (mut input, count) = parse_map_header(input)?;
    for _ in 0..count {
        let (rest, name) = parse_name(input, bump, "constraint name is expected to be a string")?;
        let (rest, func_id) = parse_u32(
            rest,
            "constraint function id is expected to be an unsigned integer",
        )?;
        out.push(ConstraintDef::new(name, ConstraintKind::Func { func_id }));
        input = rest;
    }
    Ok((input, ()))
}

fn parse_foreign_key_def<'a, 'b>(
    input: &'a [u8],
    bump: &'b Bump,
) -> IResult<&'a [u8], ForeignKeyDef<'b>, FieldDefError> {
    let (_, wire) = wire_type(input)?;
    if wire != WireType::Map {
        return illegal("foreign key definition is expected to be a map");
    }
    let (mut input, count) = parse_map_header(input)?;
    let mut space_id = None;
    let mut field = None;
    for _ in 0..count {
        let (_, wire) = wire_type(input)?;
        if wire != WireType::Str {
            return illegal("foreign key definition keys must be strings");
        }
        let (rest, key) = parse_str(input)?;
        input = match key {
            b"space" => {
                let (rest, id) = parse_u32(rest, "foreign key: space must be an unsigned integer")?;
                space_id = Some(id);
                rest
            }
            b"field" => {
                const REASON: &str = "foreign key: field must be an unsigned integer or a string";
                let (_, wire) = wire_type(rest)?;
                let (rest, value) = match wire {
                    WireType::Uint => {
                        let (rest, id) = parse_u32(rest, REASON)?;
                        (rest, ForeignKeyField::Id(id))
                    }
                    WireType::Str => {
                        let (rest, name) = parse_name(rest, bump, REASON)?;
                        (rest, ForeignKeyField::Name(name))
                    }
                    _ => return illegal(REASON),
                };
                field = Some(value);
                rest
            }
            _ => {
                return illegal(&format!(
                    "foreign key: unexpected key '{}'",
                    String::from_utf8_lossy(key)
                ))
            }
        };
    }
    match field {
        Some(field) => Ok((input, ForeignKeyDef::new(space_id, field))),
        None => illegal("foreign key: field is missing"),
    }
}

/// Decode `{name: {space: .., field: ..}, ...}` and append the foreign keys to
/// `out`.
pub(crate) fn parse_foreign_keys<'a, 'b>(
    input: &'a [u8],
    out: &mut BumpVec<'b, ConstraintDef<'b>>,
    bump: &'b Bump,
) -> IResult<&'a [u8], (), FieldDefError> {
    let (_, wire) = wire_type(input)?;
    if wire != WireType::Map {
        return illegal("foreign key must be a map");
    }
    let (mut input, count) = parse_map_header(input)?;
    for _ in 0..count {
        let (rest, name) = parse_name(input, bump, "foreign key name is expected to be a string")?;
        let (rest, fkey) = parse_foreign_key_def(rest, bump)?;
        out.push(ConstraintDef::new(name, ConstraintKind::ForeignKey(fkey)));
        input = rest;
    }
    Ok((input, ()))
}
