//! Domain name syntax and hierarchy helpers.

/// Maximum length of a full domain name.
const MAX_DOMAIN_LEN: usize = 253;

/// Maximum length of a single label.
const MAX_LABEL_LEN: usize = 63;

/// Check whether `name` is a syntactically valid domain name.
///
/// Labels are ASCII letters, digits, `-` and `_`, between 1 and 63 characters,
/// and may not start or end with `-`. At least two labels are required and
/// the last one must start with a letter, so neither `192.168.0.999` nor the
/// range `10.0.0.2-3` is a domain.
///
/// # Examples
/// ```
/// use hostscope::rule::is_domain_name;
///
/// assert!(is_domain_name("example.com"));
/// assert!(is_domain_name("_dmarc.example.co.uk"));
/// assert!(!is_domain_name("localhost"));
/// assert!(!is_domain_name("*.example.com"));
/// ```
pub fn is_domain_name(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_DOMAIN_LEN {
        return false;
    }

    let labels: Vec<&str> = name.split('.').collect();
    if labels.len() < 2 || !labels.iter().all(|label| is_label(label)) {
        return false;
    }

    labels
        .last()
        .and_then(|tld| tld.bytes().next())
        .map_or(false, |b| b.is_ascii_alphabetic())
}

fn is_label(label: &str) -> bool {
    if label.is_empty() || label.len() > MAX_LABEL_LEN {
        return false;
    }
    if label.starts_with('-') || label.ends_with('-') {
        return false;
    }
    label
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Check whether `name` sits strictly below `parent` in the DNS hierarchy.
///
/// This is a plain dot-delimited suffix test; `parent` itself is not a
/// subdomain of `parent`.
pub fn is_subdomain_of(name: &str, parent: &str) -> bool {
    name.len() > parent.len() + 1
        && name.ends_with(parent)
        && name.as_bytes()[name.len() - parent.len() - 1] == b'.'
}
