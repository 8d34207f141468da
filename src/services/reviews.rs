//! Review-code helpers: parsing inbound SMS bodies and minting the
//! 6-character code attached to each pick.

use rand::Rng;

/// Review codes are exactly this many word characters.
pub const CODE_LEN: usize = 6;

const CODE_PAD: char = 'X';

// Word character in the SMS sense: ASCII letter, digit or underscore.
fn is_code_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

/// Splits an SMS body into its leading review code and the review text.
///
/// The code is a run of exactly [`CODE_LEN`] word characters followed by
/// whitespace and single-line review text; it is returned upper-cased. Any
/// body not matching that shape is treated entirely as review text with no
/// code.
pub fn extract_code_and_review(body: &str) -> (Option<String>, String) {
    let trimmed = body.trim();

    let code: String = trimmed.chars().take_while(|c| is_code_char(*c)).collect();
    if code.chars().count() == CODE_LEN {
        let rest = &trimmed[code.len()..];
        let review = rest.trim_start();
        let had_separator = review.len() < rest.len();
        if had_separator && !review.is_empty() && !review.chars().any(is_line_break) {
            return (Some(code.to_ascii_uppercase()), review.to_string());
        }
    }

    (None, trimmed.to_string())
}

/// Mints a review code for a pick: the first three alphanumerics of the
/// title, the last two digits of the year (or "00"), one random digit,
/// right-padded to [`CODE_LEN`] with `X`. No uniqueness guarantee; only one
/// pick is live at a time.
pub fn generate_movie_code(title: &str, year: &str) -> String {
    let prefix: String = title
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .take(3)
        .collect();

    let year_digits: Vec<char> = year.chars().collect();
    let year_part: String = if year_digits.is_empty() {
        "00".to_string()
    } else {
        year_digits[year_digits.len().saturating_sub(2)..]
            .iter()
            .collect()
    };

    let digit = rand::thread_rng().gen_range(0..10);

    let mut code = format!("{prefix}{year_part}{digit}");
    while code.chars().count() < CODE_LEN {
        code.push(CODE_PAD);
    }
    code
}
