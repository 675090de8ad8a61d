//! String predicates backing the format rules on leaf fields.

use email_address::EmailAddress;
use url::Url;
use uuid::Uuid;

/// Returns `true` if the submitted string is a syntactically valid email address.
pub fn is_valid_email(value: &str) -> bool {
    EmailAddress::is_valid(value.trim())
}

/// Returns `true` if the submitted string is an absolute URL with a host.
///
/// Scheme-only values such as `mailto:someone` are rejected, since form inputs
/// validated as URLs are expected to be links.
pub fn is_valid_url(value: &str) -> bool {
    Url::parse(value.trim()).map(|url| url.has_host()).unwrap_or(false)
}

/// Returns `true` if the submitted string parses as a UUID.
pub fn is_valid_uuid(value: &str) -> bool {
    Uuid::parse_str(value.trim()).is_ok()
}
