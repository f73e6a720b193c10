//! Codecs of the character string value representations.

use super::{
    kind_of, BadPatternSnafu, IncompatibleValueSnafu, InvalidDateSnafu, Result, TooLongSnafu,
};
use chrono::NaiveDate;
use dcmtree_core::{PrimitiveValue, VR};
use snafu::ensure;

/// Whether the VR is encoded as a character string.
pub(crate) fn is_text(vr: VR) -> bool {
    vr.is_textual() || vr == VR::UI
}

/// Text blocks hold a single value
/// where backslashes and leading spaces are significant.
fn is_text_block(vr: VR) -> bool {
    matches!(vr, VR::LT | VR::ST | VR::UT | VR::UR)
}

/// The maximum number of characters per value, if bounded.
fn max_len(vr: VR) -> Option<usize> {
    match vr {
        VR::AE | VR::CS | VR::SH | VR::DS | VR::TM => Some(16),
        VR::AS => Some(4),
        VR::DA => Some(8),
        VR::DT => Some(26),
        VR::IS => Some(12),
        VR::LO | VR::PN | VR::UI => Some(64),
        VR::ST => Some(1024),
        VR::LT => Some(10240),
        _ => None,
    }
}

pub(crate) fn decode(vr: VR, bytes: &[u8]) -> PrimitiveValue {
    // stop at the first null character
    let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
    let text = String::from_utf8_lossy(&bytes[..end]);
    let text = if is_text_block(vr) {
        text.trim_end_matches(' ').to_owned()
    } else {
        let mut out = String::with_capacity(text.len());
        for (i, part) in text.split('\\').enumerate() {
            if i > 0 {
                out.push('\\');
            }
            out.push_str(part.trim_matches(' '));
        }
        out
    };
    if text.is_empty() {
        PrimitiveValue::Empty
    } else {
        PrimitiveValue::Str(text)
    }
}

pub(crate) fn encode(vr: VR, value: &PrimitiveValue) -> Result<Vec<u8>> {
    let text = to_text(vr, value)?;
    if is_text_block(vr) {
        let text = text.trim_end_matches(' ');
        validate(vr, text)?;
        return Ok(text.as_bytes().to_vec());
    }

    let mut out = String::with_capacity(text.len());
    for (i, part) in text.split('\\').enumerate() {
        let part = part.trim_matches(' ');
        validate(vr, part)?;
        if i > 0 {
            out.push('\\');
        }
        out.push_str(part);
    }
    Ok(out.into_bytes())
}

/// Obtain the text to encode.
/// Numbers are admitted for the numeric strings IS and DS.
fn to_text(vr: VR, value: &PrimitiveValue) -> Result<String> {
    let numbers_ok = match value {
        PrimitiveValue::Str(s) => return Ok(s.clone()),
        PrimitiveValue::I16(_)
        | PrimitiveValue::U16(_)
        | PrimitiveValue::I32(_)
        | PrimitiveValue::U32(_)
        | PrimitiveValue::I64(_) => matches!(vr, VR::IS | VR::DS),
        PrimitiveValue::F32(_) | PrimitiveValue::F64(_) => vr == VR::DS,
        _ => false,
    };
    ensure!(
        numbers_ok,
        IncompatibleValueSnafu {
            vr,
            kind: kind_of(value)
        }
    );
    // Display joins multiple values with a backslash
    Ok(value.to_string())
}

/// Check a single value against the rules of its VR.
fn validate(vr: VR, value: &str) -> Result<()> {
    let len = value.chars().count();
    if let Some(max) = max_len(vr) {
        if vr == VR::PN {
            // the limit applies to each component group
            for group in value.split('=') {
                let len = group.chars().count();
                ensure!(len <= max, TooLongSnafu { vr, len, max });
            }
        } else if !matches!(vr, VR::AS | VR::DA) {
            ensure!(len <= max, TooLongSnafu { vr, len, max });
        }
    }
    if value.is_empty() {
        return Ok(());
    }

    match vr {
        VR::AS => {
            let b = value.as_bytes();
            ensure!(
                b.len() == 4
                    && b[..3].iter().all(u8::is_ascii_digit)
                    && matches!(b[3], b'D' | b'W' | b'M' | b'Y'),
                BadPatternSnafu {
                    vr,
                    value,
                    expected: "three digits followed by D, W, M or Y"
                }
            );
        }
        VR::DA => {
            ensure!(
                value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit()),
                BadPatternSnafu {
                    vr,
                    value,
                    expected: "a date in the form YYYYMMDD"
                }
            );
            let field = |range: std::ops::Range<usize>| value[range].parse::<u32>().unwrap_or(0);
            let (year, month, day) = (field(0..4), field(4..6), field(6..8));
            ensure!(
                NaiveDate::from_ymd_opt(year as i32, month, day).is_some(),
                InvalidDateSnafu { value }
            );
        }
        VR::DS => {
            let parsed = value.trim().parse::<f64>();
            ensure!(
                matches!(parsed, Ok(v) if v.is_finite()),
                BadPatternSnafu {
                    vr,
                    value,
                    expected: "a decimal number"
                }
            );
        }
        VR::IS => {
            let parsed = value.trim().parse::<i64>();
            ensure!(
                matches!(parsed, Ok(v) if i32::try_from(v).is_ok()),
                BadPatternSnafu {
                    vr,
                    value,
                    expected: "an integer in the range of a signed 32-bit number"
                }
            );
        }
        VR::UI => {
            ensure!(
                value.bytes().all(|b| b.is_ascii_digit() || b == b'.'),
                BadPatternSnafu {
                    vr,
                    value,
                    expected: "only digits and dots"
                }
            );
        }
        VR::TM => {
            ensure!(
                leading_digits(value, 6),
                BadPatternSnafu {
                    vr,
                    value,
                    expected: "a time starting with HHMMSS"
                }
            );
        }
        VR::DT => {
            ensure!(
                leading_digits(value, 8),
                BadPatternSnafu {
                    vr,
                    value,
                    expected: "a date time starting with YYYYMMDD"
                }
            );
        }
        _ => {}
    }
    Ok(())
}

/// Values at least `n` bytes long must start with `n` digits.
fn leading_digits(value: &str, n: usize) -> bool {
    let b = value.as_bytes();
    b.len() < n || b[..n].iter().all(u8::is_ascii_digit)
}
