// SPDX-License-Identifier: Apache-2.0

//! Array reader: consumes a `[ … ]` form and writes elements into the
//! template's storage bank, recursing into the object reader for
//! object-kind elements.

use log::debug;

use crate::error::ParseError;
use crate::number::{parse_integer, parse_real, parse_unsigned};
use crate::object::read_internal as read_object_internal;
use crate::target::ArrayCtx;
use crate::template::{ElementTarget, JsonArray};

/// Parse one JSON array against `array`'s template.
///
/// Elements are written in input order starting at slot 0; on success the
/// count output receives the number of elements seen and the returned
/// remainder points just past the consumed document, after trailing
/// whitespace.
pub fn read_array<'input>(
    input: &'input str,
    array: &JsonArray<'_>,
) -> Result<&'input str, ParseError> {
    let end = read_internal(input.as_bytes(), 0, array)?;
    Ok(input.get(end..).unwrap_or(""))
}

fn skip_ws(input: &[u8], pos: &mut usize) {
    while input.get(*pos).is_some_and(u8::is_ascii_whitespace) {
        *pos += 1;
    }
}

pub(crate) fn read_internal(
    input: &[u8],
    start: usize,
    array: &JsonArray<'_>,
) -> Result<usize, ParseError> {
    let mut pos = start;
    debug!("array parse begins at byte {}", start);

    skip_ws(input, &mut pos);
    if input.get(pos) != Some(&b'[') {
        debug!("didn't find expected array start");
        return Err(ParseError::MissingArrayStart);
    }
    pos += 1;

    let mut count = 0usize;
    // Fill point of the flat store of a string-element array.
    let mut next_free = 0usize;

    skip_ws(input, &mut pos);
    if input.get(pos) == Some(&b']') {
        pos += 1;
    } else {
        loop {
            if count >= array.maxlen {
                debug!("too many elements in array");
                return Err(ParseError::TooManyElements);
            }
            skip_ws(input, &mut pos);
            let rest = input.get(pos..).unwrap_or(&[]);
            match &array.elements {
                ElementTarget::Integers(bank) => {
                    let (value, len) = parse_integer(rest);
                    if len == 0 {
                        return Err(ParseError::BadNumber);
                    }
                    bank.get(count)
                        .ok_or(ParseError::TooManyElements)?
                        .set(value);
                    pos += len;
                }
                ElementTarget::Uintegers(bank) => {
                    let (value, len) = parse_unsigned(rest);
                    if len == 0 {
                        return Err(ParseError::BadNumber);
                    }
                    bank.get(count)
                        .ok_or(ParseError::TooManyElements)?
                        .set(value);
                    pos += len;
                }
                ElementTarget::Shorts(bank) => {
                    let (value, len) = parse_integer(rest);
                    if len == 0 {
                        return Err(ParseError::BadNumber);
                    }
                    bank.get(count)
                        .ok_or(ParseError::TooManyElements)?
                        .set(value as i16);
                    pos += len;
                }
                ElementTarget::Ushorts(bank) => {
                    let (value, len) = parse_unsigned(rest);
                    if len == 0 {
                        return Err(ParseError::BadNumber);
                    }
                    bank.get(count)
                        .ok_or(ParseError::TooManyElements)?
                        .set(value as u16);
                    pos += len;
                }
                ElementTarget::Reals(bank) => {
                    let real = parse_real(rest);
                    if real.len == 0 {
                        return Err(ParseError::BadNumber);
                    }
                    if real.clamped {
                        debug!("real exponent out of range, value clamped");
                    }
                    bank.get(count)
                        .ok_or(ParseError::TooManyElements)?
                        .set(real.value);
                    pos += real.len;
                }
                ElementTarget::Booleans(bank) => {
                    let value = if rest.starts_with(b"true") {
                        pos += 4;
                        true
                    } else if rest.starts_with(b"false") {
                        pos += 5;
                        false
                    } else {
                        return Err(ParseError::BadNumber);
                    };
                    bank.get(count)
                        .ok_or(ParseError::TooManyElements)?
                        .set(value);
                }
                ElementTarget::Strings { offsets, store } => {
                    if input.get(pos) != Some(&b'"') {
                        debug!("bad string syntax in string list");
                        return Err(ParseError::BadString);
                    }
                    pos += 1;
                    offsets
                        .get(count)
                        .ok_or(ParseError::TooManyElements)?
                        .set(next_free);
                    loop {
                        match input.get(pos) {
                            None => return Err(ParseError::BadString),
                            Some(&b'"') => {
                                store.get(next_free).ok_or(ParseError::BadString)?.set(0);
                                next_free += 1;
                                pos += 1;
                                break;
                            }
                            Some(&c) => {
                                store.get(next_free).ok_or(ParseError::BadString)?.set(c);
                                next_free += 1;
                                pos += 1;
                            }
                        }
                    }
                }
                ElementTarget::Objects { subtype } => {
                    pos = read_object_internal(
                        input,
                        pos,
                        subtype,
                        Some(&ArrayCtx::Parallel),
                        count,
                    )?;
                }
                ElementTarget::StructObjects {
                    subtype,
                    base,
                    stride,
                } => {
                    let end_of_element = count
                        .checked_mul(*stride)
                        .and_then(|s| s.checked_add(*stride))
                        .ok_or(ParseError::TooManyElements)?;
                    if end_of_element > base.len() {
                        return Err(ParseError::TooManyElements);
                    }
                    let ctx = ArrayCtx::Struct {
                        base: *base,
                        stride: *stride,
                    };
                    pos = read_object_internal(input, pos, subtype, Some(&ctx), count)?;
                }
            }
            count += 1;
            skip_ws(input, &mut pos);
            match input.get(pos) {
                Some(&b']') => {
                    pos += 1;
                    break;
                }
                Some(&b',') => pos += 1,
                _ => {
                    debug!("bad trailing syntax on array");
                    return Err(ParseError::BadArrayTrailer);
                }
            }
        }
    }

    if let Some(cell) = array.count {
        cell.set(count);
    }
    skip_ws(input, &mut pos);
    debug!("leaving array parse with {} elements", count);
    Ok(pos)
}
