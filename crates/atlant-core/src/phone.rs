//! Phone number handling for `+7` (Russia / Kazakhstan) numbers.
//!
//! Two transforms live here and they are deliberately independent:
//!
//! - [`format_phone_input`] is the as-you-type display mask. It rebuilds the
//!   whole string from the digit sequence on every call, so it is idempotent
//!   and never has to patch punctuation the visitor typed.
//! - [`canonicalize_phone`] runs once at submission time and produces the
//!   `+7XXXXXXXXXX` form sent to the CRM. Lengths it does not recognise are
//!   passed through untouched; rejecting bad input is the job of
//!   [`crate::validation`].

const COUNTRY_CODE: char = '7';
const TRUNK_PREFIX: char = '8';
const MAX_DIGITS: usize = 11;

/// Subscriber digits (after country and area code) are shown as `XXX-XX-XX`.
const SUBSCRIBER_GROUPS: [usize; 3] = [3, 2, 2];

/// Returns only the ASCII digits of `input`, in order.
#[must_use]
pub fn digits_only(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Formats raw keyboard input into the `+7 (XXX) XXX-XX-XX` display mask.
///
/// Rules, applied to the digit sequence only:
/// 1. A leading `8` (domestic trunk prefix) becomes `7`.
/// 2. A missing leading `7` is prepended.
/// 3. Anything beyond 11 digits is dropped.
/// 4. From four digits on, the area code is wrapped as `" (XXX) "`; the
///    remaining subscriber digits are grouped `XXX-XX-XX` as they arrive.
///
/// Input without any digits formats to the empty string.
#[must_use]
pub fn format_phone_input(input: &str) -> String {
    let mut digits = digits_only(input);
    if digits.is_empty() {
        return String::new();
    }

    if digits.starts_with(TRUNK_PREFIX) {
        digits.replace_range(..1, "7");
    }
    if !digits.starts_with(COUNTRY_CODE) {
        digits.insert(0, COUNTRY_CODE);
    }
    digits.truncate(MAX_DIGITS);

    render_mask(&digits)
}

/// Renders an ASCII digit string of 1..=11 digits that starts with the
/// country code.
fn render_mask(digits: &str) -> String {
    let (country, rest) = digits.split_at(1);
    let mut out = String::with_capacity(18);
    out.push('+');
    out.push_str(country);

    if rest.len() < 3 {
        out.push_str(rest);
        return out;
    }

    let (area, subscriber) = rest.split_at(3);
    out.push_str(" (");
    out.push_str(area);
    out.push_str(") ");

    let mut start = 0;
    for (idx, width) in SUBSCRIBER_GROUPS.into_iter().enumerate() {
        if start >= subscriber.len() {
            break;
        }
        let end = (start + width).min(subscriber.len());
        if idx > 0 {
            out.push('-');
        }
        out.push_str(&subscriber[start..end]);
        start = end;
    }

    out
}

/// Converts a phone value into the canonical `+7XXXXXXXXXX` form.
///
/// The value is trimmed first. Recognised shapes (digits only, punctuation
/// ignored):
///
/// | Digits                   | Result             |
/// |--------------------------|--------------------|
/// | 11, leading `8`          | `+7` + last 10     |
/// | 10                       | `+7` + all 10      |
/// | 11, leading `7`          | `+` + all 11       |
///
/// Any other shape is returned as the trimmed input, unchanged.
#[must_use]
pub fn canonicalize_phone(raw: &str) -> String {
    let trimmed = raw.trim();
    let digits = digits_only(trimmed);

    match (digits.len(), digits.chars().next()) {
        (11, Some(TRUNK_PREFIX)) => format!("+7{}", &digits[1..]),
        (10, _) => format!("+7{digits}"),
        (11, Some(COUNTRY_CODE)) => format!("+{digits}"),
        _ => trimmed.to_owned(),
    }
}

#[cfg(test)]
#[path = "phone_test.rs"]
mod tests;
