/// Longest entity we try to decode, counted in characters including `&` and `;`
const MAX_ENTITY_LEN: usize = 12;

/// Decodes HTML character references in a title
///
/// Handles numeric references (`&#39;`, `&#x2014;`) and the named entities
/// that commonly show up in page titles. Anything unrecognised is left as
/// written. Stateless, so it can be called from any task.
pub fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        match decode_one(tail) {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Decodes the reference at the start of `tail` (which begins with `&`),
/// returning the character and the number of bytes it spans
fn decode_one(tail: &str) -> Option<(char, usize)> {
    let semi = tail
        .char_indices()
        .take(MAX_ENTITY_LEN)
        .find(|(_, c)| *c == ';')
        .map(|(i, _)| i)?;
    let name = &tail[1..semi];

    let ch = match name.strip_prefix('#') {
        Some(number) => decode_numeric(number)?,
        None => decode_named(name)?,
    };

    Some((ch, semi + 1))
}

fn decode_numeric(number: &str) -> Option<char> {
    let code = match number.strip_prefix('x').or_else(|| number.strip_prefix('X')) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => number.parse::<u32>().ok()?,
    };

    if code == 0 {
        return None;
    }
    char::from_u32(code)
}

fn decode_named(name: &str) -> Option<char> {
    let ch = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201c}',
        "rdquo" => '\u{201d}',
        "laquo" => '\u{ab}',
        "raquo" => '\u{bb}',
        "hellip" => '\u{2026}',
        "middot" => '\u{b7}',
        "bull" => '\u{2022}',
        "copy" => '\u{a9}',
        "reg" => '\u{ae}',
        "trade" => '\u{2122}',
        _ => return None,
    };
    Some(ch)
}
