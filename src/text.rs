// src/text.rs

//! Internal character codes.
//!
//! Text reaches the renderer as bytes. Values 0x00..=0xFF are Latin-1 except
//! for eight codes in the unused C1 range that stand for ligatures and
//! typographic punctuation; those are turned into Unicode only when a glyph is
//! looked up in a font.

pub const LIG_FI: u8 = 0x80;
pub const LIG_FL: u8 = 0x81;
pub const UNI_LSQUO: u8 = 0x82;
pub const UNI_RSQUO: u8 = 0x83;
pub const UNI_LDQUO: u8 = 0x84;
pub const UNI_RDQUO: u8 = 0x85;
pub const UNI_NDASH: u8 = 0x86;
pub const UNI_MDASH: u8 = 0x87;

const SYNTHETIC: [(u8, char); 8] = [
    (LIG_FI, '\u{FB01}'),
    (LIG_FL, '\u{FB02}'),
    (UNI_LSQUO, '\u{2018}'),
    (UNI_RSQUO, '\u{2019}'),
    (UNI_LDQUO, '\u{201C}'),
    (UNI_RDQUO, '\u{201D}'),
    (UNI_NDASH, '\u{2013}'),
    (UNI_MDASH, '\u{2014}'),
];

/// Maps an internal code to the Unicode scalar a font is asked for.
pub fn to_unicode(code: u8) -> char {
    SYNTHETIC
        .iter()
        .find(|&&(c, _)| c == code)
        .map(|&(_, ch)| ch)
        .unwrap_or(char::from(code))
}

/// Converts a Unicode string into internal codes.
///
/// Latin-1 passes through, the punctuation above is folded onto its
/// synthetic code, anything else becomes `'?'`. Ligature code points in the
/// input are expanded back into their letter pairs; ligatures are chosen at
/// layout time, not here.
pub fn encode(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\u{FB01}' => out.extend_from_slice(b"fi"),
            '\u{FB02}' => out.extend_from_slice(b"fl"),
            _ => {
                if let Some(&(code, _)) = SYNTHETIC.iter().find(|&&(_, u)| u == ch) {
                    out.push(code);
                } else if (ch as u32) < 0x80 || (0xA0..=0xFF).contains(&(ch as u32)) {
                    out.push(ch as u8);
                } else {
                    out.push(b'?');
                }
            }
        }
    }
    out
}
