//! Address format check
//!
//! Only the shape is checked: four dot-separated groups of one to three
//! ASCII digits. Octet values are not range checked, so `999.999.999.999`
//! is accepted and passed through to the provider as-is.

use fancy_regex::Regex;
use std::sync::LazyLock;

static DOTTED_QUAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[0-9]{1,3}\.){3}[0-9]{1,3}$").expect("dotted-quad pattern compiles")
});

/// Whether `value` looks like a dotted-quad IPv4 address
pub fn is_dotted_quad(value: &str) -> bool {
    DOTTED_QUAD.is_match(value).unwrap_or(false)
}
