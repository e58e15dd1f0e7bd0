//! HTTP/1.1 request head parsing.
//!
//! Only what the upgrade handshake needs: one request line followed by
//! `Name: value` header lines, terminated by an empty line. Lines may end in
//! either `\r\n` or a bare `\n`.

use std::collections::HashMap;

use crate::error::HandshakeError;

/// The first line of a request: `METHOD SP request-target SP HTTP-version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: String,
    pub target: String,
    pub version: String,
}

impl RequestLine {
    /// Split a request line on its first two spaces.
    ///
    /// Everything after the second space is the version, so extra spaces end
    /// up there rather than causing a failure.
    ///
    /// # Errors
    ///
    /// Returns [`HandshakeError::MalformedRequest`] if the line has fewer than
    /// two spaces.
    pub fn parse(line: &str) -> Result<Self, HandshakeError> {
        let malformed = || HandshakeError::MalformedRequest(line.to_string());
        let (method, rest) = line.split_once(' ').ok_or_else(malformed)?;
        let (target, version) = rest.split_once(' ').ok_or_else(malformed)?;
        Ok(Self {
            method: method.to_string(),
            target: target.to_string(),
            version: version.to_string(),
        })
    }
}

/// Split one header line into name and value.
///
/// The name loses trailing spaces, the value loses leading spaces and tabs.
/// Nothing else is trimmed.
///
/// # Errors
///
/// Returns [`HandshakeError::MalformedHeader`] if the line has no colon.
pub fn parse_header_line(line: &str) -> Result<(&str, &str), HandshakeError> {
    let (name, value) = line
        .split_once(':')
        .ok_or_else(|| HandshakeError::MalformedHeader(line.to_string()))?;
    Ok((
        name.trim_end_matches(' '),
        value.trim_start_matches(|c| c == ' ' || c == '\t'),
    ))
}

/// Single-valued header map with case-insensitive names.
///
/// A repeated header replaces the earlier value; multi-valued headers are
/// not merged. Iteration yields the spelling used by the last occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: HashMap<String, (String, String)>,
}

impl Headers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header, replacing any previous value under the same name.
    pub fn insert(&mut self, name: &str, value: &str) {
        self.entries.insert(
            name.to_ascii_lowercase(),
            (name.to_string(), value.to_string()),
        );
    }

    /// Look up a header value by name, ignoring ASCII case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_lowercase())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, value)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .values()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Serialize as `Name: value\r\n` lines (no terminating blank line).
    pub fn write(&self, buf: &mut Vec<u8>) {
        for (name, value) in self.iter() {
            buf.extend_from_slice(name.as_bytes());
            buf.extend_from_slice(b": ");
            buf.extend_from_slice(value.as_bytes());
            buf.extend_from_slice(b"\r\n");
        }
    }
}

/// A parsed request head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub target: String,
    pub version: String,
    pub headers: Headers,
}

impl Request {
    /// Parse a request head from raw bytes.
    ///
    /// Header parsing stops at the first empty line or at the end of `data`.
    ///
    /// # Errors
    ///
    /// - [`HandshakeError::MalformedRequest`] if a line of the head is not
    ///   UTF-8 or the request line is malformed.
    /// - [`HandshakeError::MalformedHeader`] if a header line has no colon.
    pub fn parse(data: &[u8]) -> Result<Self, HandshakeError> {
        Self::parse_checked(data, |_| Ok(()))
    }

    /// Like [`Request::parse`], but runs `check` on the request line before
    /// any header line is read.
    ///
    /// # Errors
    ///
    /// As [`Request::parse`], plus whatever `check` returns.
    pub fn parse_checked<F>(data: &[u8], check: F) -> Result<Self, HandshakeError>
    where
        F: FnOnce(&RequestLine) -> Result<(), HandshakeError>,
    {
        let mut lines = data
            .split(|&b| b == b'\n')
            .map(|line| line.strip_suffix(b"\r").unwrap_or(line));

        let request_line = RequestLine::parse(utf8_line(lines.next().unwrap_or_default())?)?;
        check(&request_line)?;

        let mut headers = Headers::new();
        for line in lines {
            if line.is_empty() {
                break;
            }
            let (name, value) = parse_header_line(utf8_line(line)?)?;
            headers.insert(name, value);
        }

        Ok(Self {
            method: request_line.method,
            target: request_line.target,
            version: request_line.version,
            headers,
        })
    }
}

fn utf8_line(line: &[u8]) -> Result<&str, HandshakeError> {
    std::str::from_utf8(line).map_err(|_| HandshakeError::MalformedRequest("invalid UTF-8".into()))
}

/// Find the end of a request head in `buf`.
///
/// Returns the offset just past the empty line that follows the request
/// line, or `None` if the head is not complete yet. An empty first line is
/// the (malformed) request line, not the terminator.
#[must_use]
pub fn find_head_end(buf: &[u8]) -> Option<usize> {
    let mut start = 0;
    let mut first = true;
    while let Some(pos) = buf[start..].iter().position(|&b| b == b'\n') {
        let end = start + pos;
        let line = &buf[start..end];
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.is_empty() && !first {
            return Some(end + 1);
        }
        first = false;
        start = end + 1;
    }
    None
}
