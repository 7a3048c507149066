use std::num::IntErrorKind;
use std::str::FromStr;
use std::time::Duration;

/// Check `s` against the JSON number grammar:
/// `-? (0 | [1-9][0-9]*) (. [0-9]+)? ([eE] [+-]? [0-9]+)?`
///
/// The locator hands over bare tokens up to the next delimiter, so content like
/// `5.5no` arrives here and is rejected.
pub(crate) fn check_json_number(s: &str) -> Result<(), String> {
    let b = s.as_bytes();
    let mut i = 0;
    if b.first() == Some(&b'-') {
        i += 1;
    }
    match b.get(i) {
        Some(b'0') => i += 1,
        Some(b'1'..=b'9') => {
            while matches!(b.get(i), Some(b'0'..=b'9')) {
                i += 1;
            }
        }
        _ => return Err(format!("`{s}` is not a JSON number")),
    }
    if b.get(i) == Some(&b'.') {
        i += 1;
        let digits = i;
        while matches!(b.get(i), Some(b'0'..=b'9')) {
            i += 1;
        }
        if i == digits {
            return Err(format!("`{s}` is not a JSON number: missing fraction digits"));
        }
    }
    if matches!(b.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(b.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let digits = i;
        while matches!(b.get(i), Some(b'0'..=b'9')) {
            i += 1;
        }
        if i == digits {
            return Err(format!("`{s}` is not a JSON number: missing exponent digits"));
        }
    }
    if i != b.len() {
        return Err(format!("`{s}` is not a JSON number"));
    }
    Ok(())
}

/// Parse a JSON integer literal into `T` without any narrowing.
pub(crate) fn parse_int<T>(s: &str, ty: &'static str) -> Result<T, String>
where
    T: FromStr<Err = std::num::ParseIntError>,
{
    check_json_number(s)?;
    s.parse::<T>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            format!("out of range for {ty}")
        }
        // Unsigned targets report a minus sign as an invalid digit.
        IntErrorKind::InvalidDigit if s.starts_with('-') && !s.contains(['.', 'e', 'E']) => {
            format!("out of range for {ty}")
        }
        _ => "fractions and exponents are not allowed for integers".to_owned(),
    })
}

pub(crate) fn parse_f64(s: &str) -> Result<f64, String> {
    check_json_number(s)?;
    let v = s.parse::<f64>().map_err(|e| e.to_string())?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err("out of range for f64".to_owned())
    }
}

pub(crate) fn parse_f32(s: &str) -> Result<f32, String> {
    check_json_number(s)?;
    let v = s.parse::<f32>().map_err(|e| e.to_string())?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err("out of range for f32".to_owned())
    }
}

const NANOS_PER_UNIT: &[(&str, u128)] = &[
    ("ns", 1),
    ("us", 1_000),
    ("\u{00B5}s", 1_000),
    ("\u{03BC}s", 1_000),
    ("ms", 1_000_000),
    ("s", 1_000_000_000),
    ("m", 60 * 1_000_000_000),
    ("h", 60 * 60 * 1_000_000_000),
];

/// Largest duration a literal may spell out: `i64::MAX` nanoseconds (about 292 years).
const MAX_NANOS: u128 = i64::MAX as u128;

/// Parse a duration literal such as `10s`, `1h30m`, `1.5ms` or `250us`.
///
/// A literal is an optional sign followed by one or more `<decimal><unit>`
/// groups; a bare `0` is also accepted. Units are `ns`, `us` (`µs`, `μs`),
/// `ms`, `s`, `m` and `h`. Negative values are rejected, as [`Duration`] is
/// unsigned.
pub(crate) fn parse_duration(literal: &str) -> Result<Duration, String> {
    let mut rest = literal;
    let mut negative = false;
    if let Some(r) = rest.strip_prefix('-') {
        negative = true;
        rest = r;
    } else if let Some(r) = rest.strip_prefix('+') {
        rest = r;
    }
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err("empty duration".to_owned());
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (int_part, r) = rest.split_at(int_len);
        rest = r;

        let mut frac_part = "";
        if let Some(r) = rest.strip_prefix('.') {
            let frac_len = r.bytes().take_while(u8::is_ascii_digit).count();
            (frac_part, rest) = r.split_at(frac_len);
        }
        if int_part.is_empty() && frac_part.is_empty() {
            return Err("expected a number before the unit".to_owned());
        }

        let unit_len = rest
            .char_indices()
            .find(|&(_, c)| c == '.' || c.is_ascii_digit())
            .map_or(rest.len(), |(i, _)| i);
        let (unit, r) = rest.split_at(unit_len);
        rest = r;
        if unit.is_empty() {
            return Err("missing unit".to_owned());
        }
        let scale = NANOS_PER_UNIT
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|&(_, nanos)| nanos)
            .ok_or_else(|| format!("unknown unit `{unit}`"))?;

        let mut value: u128 = 0;
        for d in int_part.bytes() {
            value = value * 10 + u128::from(d - b'0');
            if value > MAX_NANOS {
                return Err("duration out of range".to_owned());
            }
        }
        let mut nanos = value * scale;
        // Digits past nanosecond resolution cannot change the result.
        let mut frac: u128 = 0;
        let mut frac_scale: u128 = 1;
        for d in frac_part.bytes().take(18) {
            frac = frac * 10 + u128::from(d - b'0');
            frac_scale *= 10;
        }
        nanos += frac * scale / frac_scale;

        total = total.saturating_add(nanos);
        if total > MAX_NANOS {
            return Err("duration out of range".to_owned());
        }
    }

    if negative && total != 0 {
        return Err("negative durations are not supported".to_owned());
    }
    let secs = (total / 1_000_000_000) as u64;
    let subsec = (total % 1_000_000_000) as u32;
    Ok(Duration::new(secs, subsec))
}
