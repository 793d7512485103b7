// Byte-level record helpers.
//
// Records are raw byte spans: the input is never decoded, and the only
// place UTF-8 matters is whitespace trimming, which decodes one char at a
// time from each end and stops at the first non-space or invalid byte.

// ---------------------------------------------------------------------------
// Separator
// ---------------------------------------------------------------------------

/// Byte that splits the input into records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Separator {
    /// `\n` (0x0A).
    #[default]
    Newline,
    /// NUL (0x00), as produced by `find -print0`.
    Nul,
}

impl Separator {
    #[inline]
    pub fn byte(self) -> u8 {
        match self {
            Self::Newline => b'\n',
            Self::Nul => 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Whitespace trimming
// ---------------------------------------------------------------------------

/// Decode the char at the start of `bytes`, with its encoded length.
/// `None` if the leading bytes are not valid UTF-8.
fn first_char(bytes: &[u8]) -> Option<(char, usize)> {
    let head = &bytes[..bytes.len().min(4)];
    let valid = match std::str::from_utf8(head) {
        Ok(s) => s,
        // The prefix up to `valid_up_to` is valid by definition.
        Err(e) => std::str::from_utf8(&head[..e.valid_up_to()]).ok()?,
    };
    valid.chars().next().map(|c| (c, c.len_utf8()))
}

/// Decode the char at the end of `bytes`, with its encoded length.
/// `None` if the trailing bytes are not a complete UTF-8 sequence.
fn last_char(bytes: &[u8]) -> Option<(char, usize)> {
    (1..=bytes.len().min(4)).find_map(|n| {
        let mut chars = std::str::from_utf8(&bytes[bytes.len() - n..]).ok()?.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some((c, n)),
            _ => None,
        }
    })
}

/// Trim leading and trailing Unicode whitespace from a record.
///
/// Invalid UTF-8 elsewhere in the record does not stop trimming; an
/// undecodable byte at either edge does.
pub fn trim_whitespace(record: &[u8]) -> &[u8] {
    let mut start = 0;
    while let Some((c, n)) = first_char(&record[start..]) {
        if !c.is_whitespace() {
            break;
        }
        start += n;
    }

    let mut end = record.len();
    while let Some((c, n)) = last_char(&record[start..end]) {
        if !c.is_whitespace() {
            break;
        }
        end -= n;
    }
    &record[start..end]
}

// ---------------------------------------------------------------------------
// Delimiter escaping
// ---------------------------------------------------------------------------

/// Position of the first occurrence of `needle` in `haystack`.
#[inline]
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Append `content` to `out`, prefixing every non-overlapping occurrence of
/// `delimiter` (scanned left to right) with a backslash.
///
/// An empty delimiter copies `content` unchanged.
pub fn escape_into(out: &mut Vec<u8>, content: &[u8], delimiter: &[u8]) {
    if delimiter.is_empty() {
        out.extend_from_slice(content);
        return;
    }

    let mut rest = content;
    while let Some(pos) = find(rest, delimiter) {
        out.extend_from_slice(&rest[..pos]);
        out.push(b'\\');
        out.extend_from_slice(delimiter);
        rest = &rest[pos + delimiter.len()..];
    }
    out.extend_from_slice(rest);
}
