//! URI well-formedness checks for the handshake.
//!
//! Syntax only: percent-escapes, control characters and the shape of the
//! authority. Nothing is normalized, decoded or resolved, and the port is
//! not range-checked (`port = *DIGIT`).

use thiserror::Error;

/// Why a string is not an acceptable URI.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UriError {
    #[error("empty URI")]
    Empty,

    #[error("invalid control character in URI")]
    ControlCharacter,

    #[error("missing protocol scheme")]
    MissingScheme,

    #[error("first path segment cannot contain a colon")]
    ColonInFirstSegment,

    #[error("not an absolute URI or absolute path")]
    NotAbsolute,

    #[error("invalid percent-escape")]
    InvalidEscape,

    #[error("invalid userinfo")]
    InvalidUserinfo,

    #[error("invalid character in host")]
    InvalidHost,

    #[error("invalid port")]
    InvalidPort,
}

/// Check a request URI: `*`, an absolute URI or an absolute path.
///
/// `#` is not special here; it ends up in the path and has no escape
/// meaning of its own.
///
/// # Errors
///
/// The first syntax problem found.
pub fn parse_request_uri(value: &str) -> Result<(), UriError> {
    if value.is_empty() {
        return Err(UriError::Empty);
    }
    if value == "*" {
        return check_control(value);
    }
    check(value, true)
}

/// Check a URI reference, absolute or relative, with an optional fragment.
///
/// # Errors
///
/// The first syntax problem found.
pub fn parse_reference(value: &str) -> Result<(), UriError> {
    check_control(value)?;
    let value = match value.split_once('#') {
        Some((value, fragment)) => {
            check_escapes(fragment)?;
            value
        }
        None => value,
    };
    check(value, false)
}

fn check(value: &str, via_request: bool) -> Result<(), UriError> {
    check_control(value)?;

    let (scheme, rest) = split_scheme(value)?;
    // The query is kept raw.
    let rest = rest.split_once('?').map_or(rest, |(path, _)| path);

    if !rest.starts_with('/') {
        if scheme.is_some() {
            // Opaque form, e.g. `mailto:a@b`.
            return Ok(());
        }
        if via_request {
            return Err(UriError::NotAbsolute);
        }
        let segment = rest.split('/').next().unwrap_or_default();
        if segment.contains(':') {
            return Err(UriError::ColonInFirstSegment);
        }
    }

    let mut path = rest;
    if (scheme.is_some() || (!via_request && !rest.starts_with("///"))) && rest.starts_with("//") {
        let after = &rest[2..];
        let (authority, tail) = after.find('/').map_or((after, ""), |i| after.split_at(i));
        check_authority(authority)?;
        path = tail;
    }
    check_escapes(path)
}

/// Split off a leading `scheme:`, if the text before the first colon is one.
fn split_scheme(value: &str) -> Result<(Option<&str>, &str), UriError> {
    for (i, b) in value.bytes().enumerate() {
        match b {
            b'a'..=b'z' | b'A'..=b'Z' => {}
            b'0'..=b'9' | b'+' | b'-' | b'.' if i > 0 => {}
            b':' if i == 0 => return Err(UriError::MissingScheme),
            b':' => return Ok((Some(&value[..i]), &value[i + 1..])),
            _ => return Ok((None, value)),
        }
    }
    Ok((None, value))
}

fn check_authority(authority: &str) -> Result<(), UriError> {
    let host = match authority.rfind('@') {
        Some(i) => {
            let userinfo = &authority[..i];
            if !userinfo.bytes().all(is_userinfo_byte) {
                return Err(UriError::InvalidUserinfo);
            }
            check_escapes(userinfo)?;
            &authority[i + 1..]
        }
        None => authority,
    };
    check_host(host)
}

fn check_host(host: &str) -> Result<(), UriError> {
    let port = if host.starts_with('[') {
        let close = host.rfind(']').ok_or(UriError::InvalidHost)?;
        &host[close + 1..]
    } else {
        host.rfind(':').map_or("", |i| &host[i..])
    };
    if !is_optional_port(port) {
        return Err(UriError::InvalidPort);
    }

    let bytes = host.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let escape = escape_at(bytes, i).ok_or(UriError::InvalidEscape)?;
                // Hosts only escape non-ASCII bytes, plus `%25` for IPv6 zones.
                if escape < 0x80 && &host[i..i + 3] != "%25" {
                    return Err(UriError::InvalidHost);
                }
                i += 3;
            }
            b if b < 0x80 && !is_host_byte(b) => return Err(UriError::InvalidHost),
            _ => i += 1,
        }
    }
    Ok(())
}

/// Empty, or `:` followed by digits (possibly none).
fn is_optional_port(port: &str) -> bool {
    port.is_empty()
        || port
            .strip_prefix(':')
            .is_some_and(|digits| digits.bytes().all(|b| b.is_ascii_digit()))
}

fn check_control(value: &str) -> Result<(), UriError> {
    if value.bytes().any(|b| b < 0x20 || b == 0x7f) {
        return Err(UriError::ControlCharacter);
    }
    Ok(())
}

/// Every `%` must start a `%XX` escape.
fn check_escapes(value: &str) -> Result<(), UriError> {
    let bytes = value.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            escape_at(bytes, i).ok_or(UriError::InvalidEscape)?;
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}

/// Decode the `%XX` escape starting at `i`.
fn escape_at(bytes: &[u8], i: usize) -> Option<u8> {
    let hi = hex_value(*bytes.get(i + 1)?)?;
    let lo = hex_value(*bytes.get(i + 2)?)?;
    Some((hi << 4) | lo)
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

fn is_host_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'-' | b'_'
                | b'.'
                | b'~'
                | b'!'
                | b'$'
                | b'&'
                | b'\''
                | b'('
                | b')'
                | b'*'
                | b'+'
                | b','
                | b';'
                | b'='
                | b':'
                | b'['
                | b']'
                | b'<'
                | b'>'
                | b'"'
        )
}

fn is_userinfo_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'-' | b'.'
                | b'_'
                | b':'
                | b'~'
                | b'!'
                | b'$'
                | b'&'
                | b'\''
                | b'('
                | b')'
                | b'*'
                | b'+'
                | b','
                | b';'
                | b'='
                | b'%'
                | b'@'
        )
}
