// Delimiter token resolution.
//
// A token starting with `0x` names a single Unicode code point in hex
// (`0x22` is `"`, `0x7C` is `|`). Anything else is taken literally,
// including the empty string and multi-character tokens such as `[]`.

use std::num::IntErrorKind;

use crate::error::WrapError;

/// Prefix marking a hexadecimal code point token.
pub const HEX_PREFIX: &str = "0x";

/// Highest valid Unicode scalar value.
pub const MAX_CODE_POINT: i64 = 0x10FFFF;

/// Resolve a user-supplied delimiter token into the literal wrap string.
pub fn resolve(token: &str) -> Result<String, WrapError> {
    let Some(hex) = token.strip_prefix(HEX_PREFIX) else {
        return Ok(token.to_string());
    };

    let value = i64::from_str_radix(hex, 16).map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => WrapError::DelimiterOutOfRange {
            token: token.to_string(),
        },
        _ => WrapError::InvalidDelimiterSyntax {
            token: token.to_string(),
            reason: e.to_string(),
        },
    })?;

    if !(0..=MAX_CODE_POINT).contains(&value) {
        return Err(WrapError::DelimiterOutOfRange {
            token: token.to_string(),
        });
    }

    // In range, so the cast is lossless. Surrogates have no scalar value.
    let ch = match char::from_u32(value as u32) {
        Some(ch) => ch,
        None => {
            log::warn!("delimiter {token} is a surrogate code point, using U+FFFD");
            char::REPLACEMENT_CHARACTER
        }
    };
    Ok(ch.to_string())
}
