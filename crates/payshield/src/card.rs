//! Display helpers for card numbers.

use crate::error::{HsmError, HsmResult};

/// Pattern character that copies the next digit of the number.
pub const COPY_DIGIT: char = '%';

/// Default character that hides a digit.
pub const DEFAULT_MASK_CHAR: char = '*';

/// Render `number` through `pattern`.
///
/// Each [`COPY_DIGIT`] copies the next character of `number`, each
/// `mask_char` consumes one and emits `mask_char`, and anything else is
/// copied as a literal without consuming input.
///
/// ```rust
/// use payshield::mask_card_number;
///
/// let masked = mask_card_number("4111111111111111", "%%%%-%%**-****-%%%%", '*').unwrap();
/// assert_eq!(masked, "4111-11**-****-1111");
/// ```
///
/// # Errors
///
/// Returns [`HsmError::InvalidArgument`] if the pattern copies more
/// characters than `number` has.
pub fn mask_card_number(number: &str, pattern: &str, mask_char: char) -> HsmResult<String> {
    let mut digits = number.chars();
    let mut masked = String::with_capacity(pattern.len());

    for c in pattern.chars() {
        if c == COPY_DIGIT {
            let digit = digits.next().ok_or_else(|| {
                HsmError::invalid_argument(format!(
                    "mask pattern copies more than {} characters",
                    number.chars().count()
                ))
            })?;
            masked.push(digit);
        } else if c == mask_char {
            digits.next();
            masked.push(c);
        } else {
            masked.push(c);
        }
    }

    Ok(masked)
}

/// Left-pad `value` with `'0'` to `width` characters; longer values are
/// returned unchanged.
pub fn pad_left_zeros(value: &str, width: usize) -> String {
    format!("{value:0>width$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_keeps_literals() {
        assert_eq!(
            mask_card_number("4111111111111111", "%%%%%%******%%%%", DEFAULT_MASK_CHAR).unwrap(),
            "411111******1111"
        );
        assert_eq!(
            mask_card_number("1234", "[%%XX]", 'X').unwrap(),
            "[12XX]"
        );
    }

    #[test]
    fn test_mask_exhausted_number() {
        let err = mask_card_number("123", "%%%%", DEFAULT_MASK_CHAR).unwrap_err();
        assert!(matches!(err, HsmError::InvalidArgument(_)));
        assert!(!err.to_string().contains("123"));
    }

    #[test]
    fn test_trailing_mask_past_end_is_allowed() {
        assert_eq!(mask_card_number("12", "%%**", '*').unwrap(), "12**");
    }

    #[test]
    fn test_pad_left_zeros() {
        assert_eq!(pad_left_zeros("42", 6), "000042");
        assert_eq!(pad_left_zeros("123456", 4), "123456");
        assert_eq!(pad_left_zeros("", 3), "000");
    }
}
