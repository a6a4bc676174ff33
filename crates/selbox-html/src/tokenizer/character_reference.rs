//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//!
//! Only the handful of named references that show up in hand-written sandbox
//! markup are recognised, plus decimal and hexadecimal numeric references.
//! Anything else is left in the text verbatim.

/// Named references we resolve, without the leading `&` or trailing `;`.
const NAMED: &[(&str, char)] = &[
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("apos", '\''),
    ("nbsp", '\u{a0}'),
    ("copy", '\u{a9}'),
    ("reg", '\u{ae}'),
    ("hellip", '\u{2026}'),
    ("mdash", '\u{2014}'),
    ("ndash", '\u{2013}'),
];

/// Decode the character references in `input`.
#[must_use]
pub fn decode(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        match resolve(after) {
            Some((c, consumed)) => {
                out.push(c);
                rest = &after[consumed..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Resolve a reference at the start of `after` (the text following `&`).
/// Returns the character and the number of bytes consumed, `;` included.
fn resolve(after: &str) -> Option<(char, usize)> {
    let semi = after.find(';')?;
    let body = &after[..semi];

    // [§ 13.2.5.75 Numeric character reference state]
    if let Some(num) = body.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        // "If the number is 0x00 ... or a surrogate ... set the character
        // reference code to 0xFFFD."
        let c = match code {
            0 => char::REPLACEMENT_CHARACTER,
            _ => char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER),
        };
        return Some((c, semi + 1));
    }

    NAMED
        .iter()
        .find(|(name, _)| *name == body)
        .map(|&(_, c)| (c, semi + 1))
}
