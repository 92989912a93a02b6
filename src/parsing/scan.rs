// ABOUTME: String-aware structural scan of candidate JSON text
// ABOUTME: Tracks unmatched containers, dangling string literals, separators, and record ends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Byte-level scan shared by diagnostics and repair.
//!
//! Structural characters are ASCII, and UTF-8 continuation bytes never
//! collide with ASCII, so scanning bytes is safe for any `&str` and every
//! recorded offset is a char boundary.

/// Kind of an open container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// `{`
    Object,
    /// `[`
    Array,
}

impl Container {
    /// Character that closes this container
    pub const fn closer(self) -> char {
        match self {
            Self::Object => '}',
            Self::Array => ']',
        }
    }
}

/// An opening character with no matching closer yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opener {
    /// Container kind
    pub kind: Container,
    /// Byte offset of the opening character
    pub offset: usize,
}

/// A `}` that closed a record sitting directly inside an array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordEnd {
    /// Byte offset of the `}`
    pub offset: usize,
    /// Byte offset of the `[` of the enclosing array
    pub array_offset: usize,
}

/// Structural state of a text after scanning it to the end
#[derive(Debug, Clone, Default)]
pub struct Scan {
    /// Unmatched openers, outermost first
    pub open: Vec<Opener>,
    /// Offset of the opening quote when the text ends inside a string literal
    pub unterminated_string: Option<usize>,
    /// Last `,`, `{` or `[` outside any string, with its offset
    pub last_separator: Option<(usize, u8)>,
    /// Records closed inside arrays, in text order
    pub record_ends: Vec<RecordEnd>,
    /// Closers that did not match the innermost open container
    pub mismatched_closers: usize,
}

impl Scan {
    /// Whether any array is still open where the scan stopped
    pub fn inside_open_array(&self) -> bool {
        self.open.iter().any(|opener| opener.kind == Container::Array)
    }

    /// Whether the scanned text is balanced and has no dangling literal
    pub fn is_balanced(&self) -> bool {
        self.open.is_empty() && self.unterminated_string.is_none() && self.mismatched_closers == 0
    }
}

/// Scan `text` from the start
pub fn scan(text: &str) -> Scan {
    scan_bytes(text.as_bytes())
}

/// Scan the first `end` bytes of `text`
pub fn scan_prefix(text: &str, end: usize) -> Scan {
    let bytes = text.as_bytes();
    scan_bytes(&bytes[..end.min(bytes.len())])
}

fn scan_bytes(bytes: &[u8]) -> Scan {
    let mut state = Scan::default();
    let mut in_string = false;
    let mut escaped = false;

    for (i, &byte) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
                state.unterminated_string = None;
            }
            continue;
        }

        match byte {
            b'"' => {
                in_string = true;
                state.unterminated_string = Some(i);
            }
            b'{' => {
                state.open.push(Opener {
                    kind: Container::Object,
                    offset: i,
                });
                state.last_separator = Some((i, byte));
            }
            b'[' => {
                state.open.push(Opener {
                    kind: Container::Array,
                    offset: i,
                });
                state.last_separator = Some((i, byte));
            }
            b',' => state.last_separator = Some((i, byte)),
            b'}' | b']' => close(&mut state, i, byte),
            _ => {}
        }
    }

    state
}

fn close(state: &mut Scan, offset: usize, byte: u8) {
    let expected = if byte == b'}' {
        Container::Object
    } else {
        Container::Array
    };

    match state.open.last() {
        Some(top) if top.kind == expected => {
            state.open.pop();
            if expected == Container::Object {
                if let Some(parent) = state
                    .open
                    .last()
                    .filter(|parent| parent.kind == Container::Array)
                {
                    state.record_ends.push(RecordEnd {
                        offset,
                        array_offset: parent.offset,
                    });
                }
            }
        }
        _ => state.mismatched_closers += 1,
    }
}
