use validator::ValidateEmail;

/// Validates that the input looks like a valid email address
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && email.validate_email()
}

/// Normalizes an inbound email address.
/// Returns `None` when nothing usable is left, which callers treat as a missing email.
pub fn sanitize_email(raw: &str) -> Option<String> {
    let email = raw.trim();
    if !is_valid_email(email) {
        return None;
    }
    Some(email.to_lowercase())
}

/// Cleans a free-text field from an untrusted sender.
/// Rules:
/// - Markup tags (`<` followed by a letter, `/` or `!`, up to `>`) are removed
/// - A `<` that does not open a tag is kept, as is an unterminated tag's text
/// - Line breaks, tabs and runs of spaces collapse to one space
/// - Leading and trailing whitespace is trimmed
pub fn sanitize_text_field(raw: &str) -> String {
    let mut stripped = String::with_capacity(raw.len());
    let mut tag: Option<String> = None;
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(buffered) = tag.as_mut() {
            if c == '>' {
                tag = None;
            } else {
                buffered.push(c);
            }
            continue;
        }
        match c {
            '<' if chars
                .peek()
                .is_some_and(|next| next.is_ascii_alphabetic() || matches!(next, '/' | '!')) =>
            {
                tag = Some(String::from('<'));
            }
            c if c.is_control() && !c.is_whitespace() => {}
            c => stripped.push(c),
        }
    }

    if let Some(unclosed) = tag {
        stripped.extend(unclosed.chars().filter(|c| !c.is_control() || c.is_whitespace()));
    }

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
