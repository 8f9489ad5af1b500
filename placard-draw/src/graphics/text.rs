/// Marker appended when wrapped text is cut short
pub const ELLIPSIS: &str = "...";

/// Keeps only what the layout engine knows how to measure:
/// single-byte ASCII and three-byte characters (the CJK blocks live there).
/// Newlines are stripped; two- and four-byte characters are dropped silently.
///
/// This is not general-purpose validation. Accented Latin (two bytes) and emoji (four bytes)
/// disappear.
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter(|&c| c != '\n' && matches!(c.len_utf8(), 1 | 3))
        .collect()
}

/// Byte-level flavor of [`sanitize`] for input that may not be valid UTF-8.
///
/// A match is either a byte below `0x80`, or a lead byte in `0xE0..=0xEF`
/// followed by two continuation bytes in `0x80..=0xBF`. Everything else is skipped a byte at a time.
pub fn sanitize_bytes(raw: &[u8]) -> String {
    let mut kept = String::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        let lead = raw[i];
        if lead < 0x80 {
            if lead != b'\n' {
                kept.push(lead as char);
            }
            i += 1;
            continue;
        }
        let sequence = raw.get(i..i + 3).filter(|seq| {
            (0xE0..=0xEF).contains(&seq[0]) && seq[1..].iter().all(|b| (0x80..=0xBF).contains(b))
        });
        // the shape alone still admits overlongs and surrogates
        match sequence.and_then(|seq| std::str::from_utf8(seq).ok()) {
            Some(c) => {
                kept.push_str(c);
                i += 3;
            }
            None => i += 1,
        }
    }
    kept
}

/// Width of one character in layout units: ASCII counts 1, a three-byte character counts 2.
///
/// For sanitized text this is the same as `(byte length + char length) / 2`,
/// i.e. the length estimate the line breaker works with.
#[inline]
pub fn char_units(c: char) -> usize {
    if c.is_ascii() {
        1
    } else {
        2
    }
}

/// Total layout units of `text`; see [`char_units`]
pub fn units(text: &str) -> usize {
    text.chars().map(char_units).sum()
}

/// Longest prefix of `text` that is at most `max_units` wide, cut on a character boundary.
/// Returns the byte offset of the cut.
pub fn prefix_within(text: &str, max_units: usize) -> usize {
    let mut width = 0;
    for (offset, c) in text.char_indices() {
        width += char_units(c);
        if width > max_units {
            return offset;
        }
    }
    text.len()
}
