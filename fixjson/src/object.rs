// SPDX-License-Identifier: Apache-2.0

//! Object reader: a byte-at-a-time state machine that validates an
//! object form against a template, primes declared defaults, and commits
//! each attribute value to its resolved destination.

use log::{debug, trace};

use crate::array::read_internal as read_array_internal;
use crate::error::ParseError;
use crate::number::{digit_value, parse_integer, parse_real, parse_unsigned};
use crate::target::ArrayCtx;
use crate::template::{AttrSpec, JsonAttr};
#[cfg(feature = "time")]
use crate::time::iso8601_to_unix;

/// Longest accepted attribute name, in bytes.
pub(crate) const ATTR_MAX: usize = 31;
/// Longest accepted scalar value lexeme, in bytes.
pub(crate) const VAL_MAX: usize = 512;

/// Fixed-capacity byte accumulator for names and value lexemes.
struct ScratchBuf<const N: usize> {
    buf: [u8; N],
    len: usize,
}

impl<const N: usize> ScratchBuf<N> {
    fn new() -> Self {
        ScratchBuf {
            buf: [0; N],
            len: 0,
        }
    }

    fn clear(&mut self) {
        self.len = 0;
    }

    /// False when the buffer is full and the byte was not stored.
    fn push(&mut self, byte: u8) -> bool {
        match self.buf.get_mut(self.len) {
            Some(slot) => {
                *slot = byte;
                self.len += 1;
                true
            }
            None => false,
        }
    }

    fn len(&self) -> usize {
        self.len
    }

    fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Init,
    AwaitAttr,
    InAttr,
    AwaitValue,
    InValString,
    InEscape,
    InValToken,
    PostVal,
    PostArray,
}

/// Parse one JSON object against `attrs`, writing attribute values into
/// the template's destinations.
///
/// On success the returned remainder points just past the consumed
/// document, after trailing whitespace, so a sequence of adjacent
/// top-level objects can be parsed by feeding the remainder back in.
pub fn read_object<'input>(
    input: &'input str,
    attrs: &[JsonAttr<'_>],
) -> Result<&'input str, ParseError> {
    let end = read_internal(input.as_bytes(), 0, attrs, None, 0)?;
    Ok(input.get(end..).unwrap_or(""))
}

pub(crate) fn read_internal(
    input: &[u8],
    start: usize,
    attrs: &[JsonAttr<'_>],
    parent: Option<&ArrayCtx<'_>>,
    index: usize,
) -> Result<usize, ParseError> {
    // Stuff destinations with defaults in case the input omits them.
    prime_defaults(attrs, parent, index)?;

    debug!("object parse begins at byte {}", start);

    let mut state = State::Init;
    let mut pos = start;
    let mut cursor = 0usize;
    let mut value_quoted = false;
    let mut value_cap = VAL_MAX;
    let mut attr = ScratchBuf::<ATTR_MAX>::new();
    let mut value = ScratchBuf::<VAL_MAX>::new();

    'doc: while let Some(&ch) = input.get(pos) {
        trace!("state {:?}, looking at {:?} at byte {}", state, ch as char, pos);
        let mut advance = true;
        match state {
            State::Init => {
                if ch.is_ascii_whitespace() {
                } else if ch == b'{' {
                    state = State::AwaitAttr;
                } else {
                    debug!("non-whitespace when expecting object start");
                    return Err(ParseError::ObjectStart);
                }
            }
            State::AwaitAttr => {
                if ch.is_ascii_whitespace() {
                } else if ch == b'"' {
                    attr.clear();
                    state = State::InAttr;
                } else if ch == b'}' {
                    pos += 1;
                    break 'doc;
                } else {
                    debug!("non-whitespace when expecting attribute");
                    return Err(ParseError::AttributeStart);
                }
            }
            State::InAttr => {
                if ch == b'"' {
                    cursor = match attrs
                        .iter()
                        .position(|a| a.attribute.as_bytes() == attr.as_bytes())
                    {
                        Some(found) => found,
                        None => {
                            debug!("unknown attribute name");
                            return Err(ParseError::UnknownAttribute);
                        }
                    };
                    value_cap = value_capacity(&attrs[cursor].spec);
                    value.clear();
                    state = State::AwaitValue;
                } else if !attr.push(ch) {
                    debug!("attribute name too long");
                    return Err(ParseError::AttributeTooLong);
                }
            }
            State::AwaitValue => {
                if ch.is_ascii_whitespace() || ch == b':' {
                } else if ch == b'[' {
                    let AttrSpec::Array(ref array) = attrs[cursor].spec else {
                        debug!("saw [ when not expecting array");
                        return Err(ParseError::UnexpectedArray);
                    };
                    pos = read_array_internal(input, pos, array)?;
                    state = State::PostArray;
                    advance = false;
                } else if matches!(attrs[cursor].spec, AttrSpec::Array(_)) {
                    debug!("array element specified, but no [");
                    return Err(ParseError::MissingBracket);
                } else if ch == b'"' {
                    value_quoted = true;
                    state = State::InValString;
                } else {
                    value_quoted = false;
                    if !value.push(ch) {
                        return Err(ParseError::TokenTooLong);
                    }
                    state = State::InValToken;
                }
            }
            State::InValString => {
                if ch == b'\\' {
                    state = State::InEscape;
                } else if ch == b'"' {
                    state = State::PostVal;
                } else if value.len() >= value_cap || !value.push(ch) {
                    debug!("string value too long");
                    return Err(ParseError::StringTooLong);
                }
            }
            State::InEscape => {
                let byte = match ch {
                    b'b' => 0x08,
                    b'f' => 0x0C,
                    b'n' => b'\n',
                    b'r' => b'\r',
                    b't' => b'\t',
                    b'u' => {
                        // Take the four bytes after the 'u'; only the
                        // leading hex digits among them contribute, and
                        // only the low 8 bits of the code point survive.
                        let avail = input.len().saturating_sub(pos + 1).min(4);
                        let mut code: u32 = 0;
                        for &c in &input[pos + 1..pos + 1 + avail] {
                            let Some(digit) = digit_value(c, 16) else {
                                break;
                            };
                            code = (code << 4) | digit;
                        }
                        pos += avail;
                        (code & 0xFF) as u8
                    }
                    other => other, // covers double quote and solidus
                };
                if value.len() >= value_cap || !value.push(byte) {
                    return Err(ParseError::StringTooLong);
                }
                state = State::InValString;
            }
            State::InValToken => {
                if ch.is_ascii_whitespace() || ch == b',' || ch == b'}' {
                    // The delimiter belongs to the next state.
                    state = State::PostVal;
                    advance = false;
                } else if !value.push(ch) {
                    debug!("token value too long");
                    return Err(ParseError::TokenTooLong);
                }
            }
            State::PostVal => {
                cursor = reconcile(attrs, cursor, attr.as_bytes(), value.as_bytes(), value_quoted);
                commit(&attrs[cursor], parent, index, value.as_bytes(), value_quoted)?;
                state = State::PostArray;
                advance = false;
            }
            State::PostArray => {
                if ch.is_ascii_whitespace() {
                } else if ch == b',' {
                    state = State::AwaitAttr;
                } else if ch == b'}' {
                    pos += 1;
                    break 'doc;
                } else {
                    debug!("garbage while expecting comma or }}");
                    return Err(ParseError::BadTrailer);
                }
            }
        }
        if advance {
            pos += 1;
        }
    }

    // Consume trailing whitespace so another document can follow.
    while input.get(pos).is_some_and(u8::is_ascii_whitespace) {
        pos += 1;
    }
    debug!("object parse ends at byte {}", pos);
    Ok(pos)
}

/// Write every non-suppressed default through the resolver. String
/// destinations become empty; entries without a direct destination are
/// skipped.
fn prime_defaults(
    attrs: &[JsonAttr<'_>],
    parent: Option<&ArrayCtx<'_>>,
    index: usize,
) -> Result<(), ParseError> {
    for attr in attrs {
        if attr.nodefault {
            continue;
        }
        match &attr.spec {
            AttrSpec::Integer { dest, default, .. } => dest.resolve(parent, index)?.set(*default),
            AttrSpec::Uinteger { dest, default } => dest.resolve(parent, index)?.set(*default),
            AttrSpec::Short { dest, default } => dest.resolve(parent, index)?.set(*default),
            AttrSpec::Ushort { dest, default } => dest.resolve(parent, index)?.set(*default),
            AttrSpec::Real { dest, default } => dest.resolve(parent, index)?.set(*default),
            AttrSpec::Boolean { dest, default } => dest.resolve(parent, index)?.set(*default),
            AttrSpec::Character { dest, default } => dest.resolve(parent, index)?.set(*default),
            #[cfg(feature = "time")]
            AttrSpec::Time { dest, default } => dest.resolve(parent, index)?.set(*default),
            AttrSpec::String { dest } => {
                if matches!(parent, Some(ArrayCtx::Parallel)) && index > 0 {
                    debug!("can't support strings in parallel arrays");
                    return Err(ParseError::ParallelString);
                }
                let buf = dest.resolve(parent, index)?;
                buf.first().ok_or(ParseError::NullPointer)?.set(0);
            }
            AttrSpec::Check { .. } | AttrSpec::Ignore | AttrSpec::Array(_) => {}
        }
    }
    Ok(())
}

/// How many value bytes the matched entry will accept.
fn value_capacity(spec: &AttrSpec<'_>) -> usize {
    match spec {
        AttrSpec::String { dest } => dest.capacity().saturating_sub(1).min(VAL_MAX),
        AttrSpec::Check { literal } => literal.len().min(VAL_MAX),
        AttrSpec::Integer { map: Some(_), .. } => VAL_MAX - 1,
        _ => VAL_MAX,
    }
}

/// The cursor points at the first entry matching the attribute name. Any
/// number of adjacent entries may share that name with different kinds;
/// seek forward to the first entry whose kind fits what was scanned.
fn reconcile(
    attrs: &[JsonAttr<'_>],
    mut cursor: usize,
    name: &[u8],
    value: &[u8],
    quoted: bool,
) -> usize {
    loop {
        let spec = &attrs[cursor].spec;
        if quoted && quoted_seek(spec) {
            break;
        }
        if (value == b"true" || value == b"false") && matches!(spec, AttrSpec::Boolean { .. }) {
            break;
        }
        if value.first().is_some_and(u8::is_ascii_digit) {
            let decimal = value.contains(&b'.');
            if decimal && matches!(spec, AttrSpec::Real { .. }) {
                break;
            }
            if !decimal && matches!(spec, AttrSpec::Integer { .. } | AttrSpec::Uinteger { .. }) {
                break;
            }
        }
        match attrs.get(cursor + 1) {
            Some(next) if next.attribute.as_bytes() == name => cursor += 1,
            _ => break,
        }
    }
    cursor
}

fn quoted_seek(spec: &AttrSpec<'_>) -> bool {
    if matches!(spec, AttrSpec::String { .. }) {
        return true;
    }
    #[cfg(feature = "time")]
    if matches!(spec, AttrSpec::Time { .. }) {
        return true;
    }
    false
}

/// Check quoting legality, apply the enum map, convert the collected
/// value per the entry's kind and write it through the resolver.
fn commit(
    attr: &JsonAttr<'_>,
    parent: Option<&ArrayCtx<'_>>,
    index: usize,
    value: &[u8],
    quoted: bool,
) -> Result<(), ParseError> {
    let spec = &attr.spec;
    let mapped = matches!(spec, AttrSpec::Integer { map: Some(_), .. });
    #[cfg(feature = "time")]
    let timeish = matches!(spec, AttrSpec::Time { .. });
    #[cfg(not(feature = "time"))]
    let timeish = false;

    let quoted_ok = mapped
        || timeish
        || matches!(
            spec,
            AttrSpec::String { .. }
                | AttrSpec::Character { .. }
                | AttrSpec::Check { .. }
                | AttrSpec::Ignore
        );
    if quoted && !quoted_ok {
        debug!("saw quoted value when expecting nonstring");
        return Err(ParseError::QuotedNonString);
    }
    let quoted_required =
        mapped || timeish || matches!(spec, AttrSpec::String { .. } | AttrSpec::Check { .. });
    if !quoted && quoted_required {
        debug!("didn't see quoted value when expecting string");
        return Err(ParseError::UnquotedString);
    }

    match spec {
        AttrSpec::Integer {
            dest,
            map: Some(map),
            ..
        } => {
            let Some(entry) = map.iter().find(|m| m.name.as_bytes() == value) else {
                debug!("invalid enumerated value");
                return Err(ParseError::BadEnum);
            };
            dest.resolve(parent, index)?.set(entry.value);
        }
        AttrSpec::Integer {
            dest, map: None, ..
        } => {
            let (converted, len) = parse_integer(value);
            if len == 0 {
                return Err(ParseError::BadNumber);
            }
            dest.resolve(parent, index)?.set(converted);
        }
        AttrSpec::Uinteger { dest, .. } => {
            let (converted, len) = parse_unsigned(value);
            if len == 0 {
                return Err(ParseError::BadNumber);
            }
            dest.resolve(parent, index)?.set(converted);
        }
        AttrSpec::Short { dest, .. } => {
            let (converted, len) = parse_integer(value);
            if len == 0 {
                return Err(ParseError::BadNumber);
            }
            dest.resolve(parent, index)?.set(converted as i16);
        }
        AttrSpec::Ushort { dest, .. } => {
            let (converted, len) = parse_unsigned(value);
            if len == 0 {
                return Err(ParseError::BadNumber);
            }
            dest.resolve(parent, index)?.set(converted as u16);
        }
        AttrSpec::Real { dest, .. } => {
            let real = parse_real(value);
            if real.clamped {
                debug!("real exponent out of range, value clamped");
            }
            dest.resolve(parent, index)?.set(real.value);
        }
        AttrSpec::Boolean { dest, .. } => {
            dest.resolve(parent, index)?.set(value == b"true");
        }
        AttrSpec::Character { dest, .. } => {
            if value.len() > 1 {
                return Err(ParseError::StringTooLong);
            }
            dest.resolve(parent, index)?
                .set(value.first().copied().unwrap_or(0));
        }
        #[cfg(feature = "time")]
        AttrSpec::Time { dest, .. } => {
            let seconds = iso8601_to_unix(value)?;
            dest.resolve(parent, index)?.set(seconds);
        }
        AttrSpec::String { dest } => {
            if matches!(parent, Some(ArrayCtx::Parallel)) && index > 0 {
                return Err(ParseError::ParallelString);
            }
            let buf = dest.resolve(parent, index)?;
            if value.len() >= buf.len() {
                return Err(ParseError::StringTooLong);
            }
            for (cell, &byte) in buf.iter().zip(value) {
                cell.set(byte);
            }
            if let Some(terminator) = buf.get(value.len()) {
                terminator.set(0);
            }
        }
        AttrSpec::Check { literal } => {
            if value != literal.as_bytes() {
                debug!("check attribute not matched");
                return Err(ParseError::CheckMismatch);
            }
        }
        AttrSpec::Ignore | AttrSpec::Array(_) => {}
    }
    Ok(())
}
