//! UTF-8 decoding for terminal input
//!
//! [`decode_codepoint`] is driven by a "read next byte" callback so that
//! continuation bytes are only requested while a sequence is incomplete.

/// Total sequence length announced by a lead byte, `None` when `lead`
/// cannot start a multi-byte sequence
fn sequence_length(lead: u8) -> Option<usize> {
    match lead {
        b if b & 0b1110_0000 == 0b1100_0000 => Some(2),
        b if b & 0b1111_0000 == 0b1110_0000 => Some(3),
        b if b & 0b1111_1000 == 0b1111_0000 => Some(4),
        _ => None,
    }
}

fn is_continuation(byte: u8) -> bool {
    byte & 0b1100_0000 == 0b1000_0000
}

/// Decode one codepoint whose first byte is `lead`.
///
/// Continuation bytes are pulled from `next` one at a time and only while
/// the sequence is incomplete. Returns the character and the number of
/// bytes consumed, `lead` included.
///
/// An invalid lead byte decodes to the Latin-1 character of the same value
/// so no input byte ever vanishes; a truncated or malformed sequence
/// decodes to U+FFFD.
pub fn decode_codepoint<F>(lead: u8, mut next: F) -> (char, usize)
where
    F: FnMut() -> Option<u8>,
{
    if lead < 0x80 {
        return (char::from(lead), 1);
    }
    let Some(length) = sequence_length(lead) else {
        return (char::from(lead), 1);
    };

    let mut buffer = [lead, 0, 0, 0];
    let mut consumed = 1;
    while consumed < length {
        let Some(byte) = next() else {
            return (char::REPLACEMENT_CHARACTER, consumed);
        };
        buffer[consumed] = byte;
        consumed += 1;
        if !is_continuation(byte) {
            return (char::REPLACEMENT_CHARACTER, consumed);
        }
    }

    // Overlong forms and surrogates are rejected here
    let c = std::str::from_utf8(&buffer[..length])
        .ok()
        .and_then(|s| s.chars().next())
        .unwrap_or(char::REPLACEMENT_CHARACTER);
    (c, consumed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> (char, usize) {
        let mut rest = bytes[1..].iter().copied();
        decode_codepoint(bytes[0], || rest.next())
    }

    #[test]
    fn test_ascii() {
        assert_eq!(decode(b"A"), ('A', 1));
    }

    #[test]
    fn test_multibyte() {
        assert_eq!(decode("é".as_bytes()), ('é', 2));
        assert_eq!(decode("中".as_bytes()), ('中', 3));
        assert_eq!(decode("🎉".as_bytes()), ('🎉', 4));
    }

    #[test]
    fn test_pull_stops_at_sequence_end() {
        let bytes = "éx".as_bytes();
        let mut rest = bytes[1..].iter().copied();
        let (c, consumed) = decode_codepoint(bytes[0], || rest.next());
        assert_eq!((c, consumed), ('é', 2));
        assert_eq!(rest.next(), Some(b'x'));
    }

    #[test]
    fn test_ascii_lead_pulls_nothing() {
        let mut pulls = 0;
        let (c, consumed) = decode_codepoint(b'q', || {
            pulls += 1;
            Some(0x80)
        });
        assert_eq!((c, consumed, pulls), ('q', 1, 0));
    }

    #[test]
    fn test_invalid_lead_is_latin1() {
        assert_eq!(decode(&[0xE9]), ('é', 1));
        assert_eq!(decode(&[0x80]), ('\u{80}', 1));
    }

    #[test]
    fn test_truncated_sequence() {
        assert_eq!(decode(&[0xE4, 0xB8]), (char::REPLACEMENT_CHARACTER, 2));
    }

    #[test]
    fn test_invalid_continuation() {
        assert_eq!(decode(&[0xC3, b'A']), (char::REPLACEMENT_CHARACTER, 2));
        assert_eq!(decode(&[0xE4, 0xB8, b'x', 0xAD]), (char::REPLACEMENT_CHARACTER, 3));
    }

    #[test]
    fn test_overlong_and_surrogates_rejected() {
        assert_eq!(decode(&[0xC0, 0x80]), (char::REPLACEMENT_CHARACTER, 2));
        assert_eq!(decode(&[0xED, 0xA0, 0x80]), (char::REPLACEMENT_CHARACTER, 3));
    }
}
