use snapsave_core::{SnapError, SnapResult};

use crate::args::PackedArgs;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ+/";
const TARGET_BASE: u64 = 10;

/// Reverses the packer: every token between separators is one byte of the
/// plain UTF-8 text, written in `base` with digits drawn from `token_map`.
pub fn decode_packed(args: &PackedArgs) -> SnapResult<String> {
    let base = checked_base(args.base)?;
    let separator = separator(&args.token_map, args.base)?;
    if args.packed.is_empty() {
        return Ok(String::new());
    }

    let body = args
        .packed
        .strip_suffix(separator)
        .unwrap_or(&args.packed);
    let mut codes = Vec::new();
    for token in body.split(separator) {
        let digits = substitute_tokens(token, &args.token_map);
        let value = rebase(&digits, base)?;
        let code = value
            .checked_sub(u64::from(args.shift))
            .and_then(|code| u32::try_from(code).ok())
            .ok_or_else(|| {
                SnapError::MalformedPayload(format!("character code out of range in '{token}'"))
            })?;
        codes.push(code);
    }
    Ok(codes_to_text(&codes))
}

/// Packs `plain` the way the proxies do. `token_map` must hold more than
/// `base` distinct non-digit characters; the one at index `base` separates
/// tokens.
pub fn encode_packed(plain: &str, token_map: &str, base: u32, shift: u32) -> SnapResult<String> {
    let radix = checked_base(base)?;
    if radix > TARGET_BASE {
        return Err(SnapError::MalformedPayload(format!(
            "base {base} cannot be expressed with single-digit tokens"
        )));
    }
    if token_map.chars().any(|c| c.is_ascii_digit()) {
        return Err(SnapError::MalformedPayload(
            "token map must not contain digits".to_string(),
        ));
    }
    let separator = separator(token_map, base)?;
    let symbols: Vec<char> = token_map.chars().collect();

    let mut packed = String::new();
    for byte in plain.bytes() {
        let mut value = u64::from(byte) + u64::from(shift);
        let mut token = Vec::new();
        loop {
            token.push(symbols[(value % radix) as usize]);
            value /= radix;
            if value == 0 {
                break;
            }
        }
        packed.extend(token.iter().rev());
        packed.push(separator);
    }
    Ok(packed)
}

fn checked_base(base: u32) -> SnapResult<u64> {
    if (2..=ALPHABET.len() as u32).contains(&base) {
        Ok(u64::from(base))
    } else {
        Err(SnapError::MalformedPayload(format!("unsupported base {base}")))
    }
}

fn separator(token_map: &str, base: u32) -> SnapResult<char> {
    token_map.chars().nth(base as usize).ok_or_else(|| {
        SnapError::MalformedPayload(format!("token map has no separator at index {base}"))
    })
}

fn substitute_tokens(token: &str, token_map: &str) -> String {
    token_map
        .chars()
        .enumerate()
        .fold(token.to_string(), |acc, (index, symbol)| {
            acc.replace(symbol, &index.to_string())
        })
}

/// Reads `digits` in `base` and returns the value as it reads in base ten.
/// Characters outside the base's alphabet contribute nothing but still occupy
/// a position.
fn rebase(digits: &str, base: u64) -> SnapResult<u64> {
    let alphabet = &ALPHABET[..base as usize];
    let mut value: u64 = 0;
    for (position, digit) in digits.bytes().rev().enumerate() {
        let Some(index) = alphabet.iter().position(|&c| c == digit) else {
            continue;
        };
        let weight = u32::try_from(position)
            .ok()
            .and_then(|position| base.checked_pow(position));
        value = weight
            .and_then(|weight| (index as u64).checked_mul(weight))
            .and_then(|term| value.checked_add(term))
            .ok_or_else(|| SnapError::MalformedPayload(format!("token '{digits}' overflows")))?;
    }
    Ok(value)
}

/// The codes are the bytes of a UTF-8 string. Anything that does not survive
/// UTF-8 decoding is returned as the raw character sequence.
fn codes_to_text(codes: &[u32]) -> String {
    let raw = || -> String { codes.iter().filter_map(|&code| char::from_u32(code)).collect() };
    let bytes: Option<Vec<u8>> = codes.iter().map(|&code| u8::try_from(code).ok()).collect();
    match bytes {
        Some(bytes) => String::from_utf8(bytes).unwrap_or_else(|_| raw()),
        None => raw(),
    }
}
