use crate::error::FieldDefError;
use crate::field_type::{ExtType, WireType};
use nom::{
    bytes::complete::take,
    number::complete::{be_i8, be_u16, be_u32, be_u64, be_u8},
    IResult, Offset,
};

fn marker_error<I, T>() -> IResult<I, T, FieldDefError> {
    Err(nom::Err::Error(FieldDefError::ParseError {
        error_kind: nom::error::ErrorKind::Tag,
    }))
}

/// Classify the next value without consuming it.
pub(crate) fn wire_type(input: &[u8]) -> IResult<&[u8], WireType, FieldDefError> {
    let (_, marker) = be_u8(input)?;
    let wire_type = match marker {
        0x00..=0x7F | 0xCC..=0xCF => WireType::Uint,
        0xE0..=0xFF | 0xD0..=0xD3 => WireType::Int,
        0x80..=0x8F | 0xDE | 0xDF => WireType::Map,
        0x90..=0x9F | 0xDC | 0xDD => WireType::Array,
        0xA0..=0xBF | 0xD9..=0xDB => WireType::Str,
        0xC0 => WireType::Nil,
        0xC2 | 0xC3 => WireType::Bool,
        0xC4..=0xC6 => WireType::Bin,
        0xC7..=0xC9 | 0xD4..=0xD8 => WireType::Ext,
        0xCA => WireType::Float,
        0xCB => WireType::Double,
        0xC1 => return marker_error(),
    };
    Ok((input, wire_type))
}

pub(crate) fn parse_map_header(input: &[u8]) -> IResult<&[u8], u32, FieldDefError> {
    let (input, marker) = be_u8(input)?;
    match marker {
        0x80..=0x8F => Ok((input, u32::from(marker & 0x0F))),
        0xDE => be_u16(input).map(|(input, count)| (input, u32::from(count))),
        0xDF => be_u32(input),
        _ => marker_error(),
    }
}

pub(crate) fn parse_array_header(input: &[u8]) -> IResult<&[u8], u32, FieldDefError> {
    let (input, marker) = be_u8(input)?;
    match marker {
        0x90..=0x9F => Ok((input, u32::from(marker & 0x0F))),
        0xDC => be_u16(input).map(|(input, count)| (input, u32::from(count))),
        0xDD => be_u32(input),
        _ => marker_error(),
    }
}

/// Raw string payload; UTF-8 validity is left to the caller.
pub(crate) fn parse_str(input: &[u8]) -> IResult<&[u8], &[u8], FieldDefError> {
    let (input, marker) = be_u8(input)?;
    let (input, len) = match marker {
        0xA0..=0xBF => (input, u32::from(marker & 0x1F)),
        0xD9 => be_u8(input).map(|(input, len)| (input, u32::from(len)))?,
        0xDA => be_u16(input).map(|(input, len)| (input, u32::from(len)))?,
        0xDB => be_u32(input)?,
        _ => return marker_error(),
    };
    take(len)(input)
}

pub(crate) fn parse_uint(input: &[u8]) -> IResult<&[u8], u64, FieldDefError> {
    let (input, marker) = be_u8(input)?;
    match marker {
        0x00..=0x7F => Ok((input, u64::from(marker))),
        0xCC => be_u8(input).map(|(input, v)| (input, u64::from(v))),
        0xCD => be_u16(input).map(|(input, v)| (input, u64::from(v))),
        0xCE => be_u32(input).map(|(input, v)| (input, u64::from(v))),
        0xCF => be_u64(input),
        _ => marker_error(),
    }
}

pub(crate) fn parse_bool(input: &[u8]) -> IResult<&[u8], bool, FieldDefError> {
    let (input, marker) = be_u8(input)?;
    match marker {
        0xC2 => Ok((input, false)),
        0xC3 => Ok((input, true)),
        _ => marker_error(),
    }
}

/// Extension sub-type and payload length. The payload itself is not consumed.
#[cfg_attr(not(feature = "inspect"), allow(dead_code))]
pub(crate) fn parse_ext_header(input: &[u8]) -> IResult<&[u8], (ExtType, u32), FieldDefError> {
    let (input, marker) = be_u8(input)?;
    let (input, len) = match marker {
        0xD4 => (input, 1),
        0xD5 => (input, 2),
        0xD6 => (input, 4),
        0xD7 => (input, 8),
        0xD8 => (input, 16),
        0xC7 => be_u8(input).map(|(input, len)| (input, u32::from(len)))?,
        0xC8 => be_u16(input).map(|(input, len)| (input, u32::from(len)))?,
        0xC9 => be_u32(input)?,
        _ => return marker_error(),
    };
    let (input, tag) = be_i8(input)?;
    Ok((input, (ExtType::from_tag(tag), len)))
}

/// Advance past exactly one value, nested containers included, returning its
/// raw encoded bytes.
pub(crate) fn skip_value(input: &[u8]) -> IResult<&[u8], &[u8], FieldDefError> {
    let start = input;
    let mut input = input;
    // Values still to be skipped; containers add their children.
    let mut pending: u64 = 1;
    while pending > 0 {
        pending -= 1;
        let (rest, marker) = be_u8(input)?;
        input = match marker {
            0x00..=0x7F | 0xE0..=0xFF | 0xC0 | 0xC2 | 0xC3 => rest,
            0x80..=0x8F => {
                pending += 2 * u64::from(marker & 0x0F);
                rest
            }
            0x90..=0x9F => {
                pending += u64::from(marker & 0x0F);
                rest
            }
            0xA0..=0xBF => take(marker & 0x1F)(rest)?.0,
            0xC1 => return marker_error(),
            0xC4 | 0xD9 => {
                let (rest, len) = be_u8(rest)?;
                take(len)(rest)?.0
            }
            0xC5 | 0xDA => {
                let (rest, len) = be_u16(rest)?;
                take(len)(rest)?.0
            }
            0xC6 | 0xDB => {
                let (rest, len) = be_u32(rest)?;
                take(len)(rest)?.0
            }
            0xC7 => {
                let (rest, len) = be_u8(rest)?;
                take(u32::from(len) + 1)(rest)?.0
            }
            0xC8 => {
                let (rest, len) = be_u16(rest)?;
                take(u32::from(len) + 1)(rest)?.0
            }
            0xC9 => {
                let (rest, len) = be_u32(rest)?;
                let (rest, _ext_type) = be_i8(rest)?;
                take(len)(rest)?.0
            }
            0xCC | 0xD0 => take(1_usize)(rest)?.0,
            0xCD | 0xD1 => take(2_usize)(rest)?.0,
            0xCA | 0xCE | 0xD2 => take(4_usize)(rest)?.0,
            0xCB | 0xCF | 0xD3 => take(8_usize)(rest)?.0,
            0xD4 => take(2_usize)(rest)?.0,
            0xD5 => take(3_usize)(rest)?.0,
            0xD6 => take(5_usize)(rest)?.0,
            0xD7 => take(9_usize)(rest)?.0,
            0xD8 => take(17_usize)(rest)?.0,
            0xDC => {
                let (rest, count) = be_u16(rest)?;
                pending += u64::from(count);
                rest
            }
            0xDD => {
                let (rest, count) = be_u32(rest)?;
                pending += u64::from(count);
                rest
            }
            0xDE => {
                let (rest, count) = be_u16(rest)?;
                pending += 2 * u64::from(count);
                rest
            }
            0xDF => {
                let (rest, count) = be_u32(rest)?;
                pending += 2 * u64::from(count);
                rest
            }
        };
    }
    let len = start.offset(input);
    Ok((input, &start[..len]))
}
