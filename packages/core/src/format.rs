//! Display and input helpers shared by every client surface.

use url::Url;

/// Default length used by [`truncate_text`] for listing previews.
pub const PREVIEW_LENGTH: usize = 150;

/// Render a salary range in rupees, e.g. `Rs. 80,000 - Rs. 120,000`.
pub fn format_salary(min: Option<u64>, max: Option<u64>) -> String {
    match (min, max) {
        (None, None) => "Salary not specified".to_string(),
        (Some(min), None) => format!("Rs. {} +", group_thousands(min)),
        (None, Some(max)) => format!("Up to Rs. {}", group_thousands(max)),
        (Some(min), Some(max)) => {
            format!("Rs. {} - Rs. {}", group_thousands(min), group_thousands(max))
        }
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Cut `text` to at most `max_chars` characters, appending `...` when shortened.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

/// Build a URL slug from a posting title.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for ch in title.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Loose `local@domain.tld` check, no whitespace allowed.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// True when `value` parses as an absolute URL with a host.
pub fn is_absolute_url(value: &str) -> bool {
    Url::parse(value.trim()).is_ok_and(|url| url.has_host())
}
