//! Normalization shared by rule definitions and queried targets.
//!
//! Every string that enters a [`Scope`](crate::Scope), whether it is stored as
//! a rule or only queried, goes through the same steps:
//!
//! 1. drop a `<scheme>://` prefix (the scheme itself is not validated)
//! 2. drop exactly one trailing `/`
//! 3. lower-case the rest
//! 4. optionally split a `host:port` suffix
//!
//! None of these steps can fail. Malformed input comes back unchanged as the
//! host with no port.

/// Host and optional port produced by [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostPort {
    /// Lower-cased host, brackets removed from a ported IPv6 literal
    pub host: String,
    /// Numeric port, if the input carried one
    pub port: Option<String>,
}

impl HostPort {
    /// Rebuild the `host[:port]` key, bracketing IPv6 hosts that carry a port.
    pub fn to_key(&self) -> String {
        join_host_port(&self.host, self.port.as_deref())
    }
}

/// Fully normalize `input` into host and optional port.
///
/// # Examples
/// ```
/// use hostscope::normalize::normalize;
///
/// let hp = normalize("HTTPS://Example.com:8080/");
/// assert_eq!(hp.host, "example.com");
/// assert_eq!(hp.port.as_deref(), Some("8080"));
/// ```
pub fn normalize(input: &str) -> HostPort {
    let canonical = canonicalize(input);
    let (host, port) = split_host_port(&canonical);
    HostPort {
        host: host.to_string(),
        port: port.map(str::to_string),
    }
}

/// Strip scheme and trailing slash and lower-case, without splitting the port.
///
/// This is the form targets are compared in.
pub fn canonicalize(input: &str) -> String {
    strip_trailing_slash(strip_scheme(input)).to_lowercase()
}

/// Remove everything up to and including the first `://`.
pub fn strip_scheme(input: &str) -> &str {
    match input.find("://") {
        Some(idx) => &input[idx + 3..],
        None => input,
    }
}

/// Remove exactly one trailing `/`.
pub fn strip_trailing_slash(input: &str) -> &str {
    input.strip_suffix('/').unwrap_or(input)
}

/// Split `host:port` on the rightmost colon.
///
/// A bracketed IPv6 literal (`[::1]:8080`) yields the address without
/// brackets. An unbracketed host that still contains a colon after the split
/// (a bare IPv6 address) is returned whole, as is anything whose suffix is not
/// a non-empty run of ASCII digits.
pub fn split_host_port(input: &str) -> (&str, Option<&str>) {
    if let Some(rest) = input.strip_prefix('[') {
        if let Some((host, port)) = rest.split_once("]:") {
            if is_port(port) && !host.contains(']') {
                return (host, Some(port));
            }
        }
        return (input, None);
    }

    match input.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') && is_port(port) => (host, Some(port)),
        _ => (input, None),
    }
}

/// Split a queried target into base and port for exclusion checks.
///
/// Unlike [`split_host_port`], whatever follows the rightmost colon is taken
/// as the port, digits or not, so `sub.example.com:8443/login` has base
/// `sub.example.com`. A bracketed IPv6 literal yields the bare address and
/// an unbracketed host that still contains a colon is returned whole. An
/// empty port counts as no port.
pub fn split_base_port(input: &str) -> (&str, Option<&str>) {
    if let Some(rest) = input.strip_prefix('[') {
        return match rest.split_once("]:") {
            Some((host, port)) if !host.contains(']') => (host, non_empty(port)),
            _ => (input, None),
        };
    }

    match input.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') => (host, non_empty(port)),
        _ => (input, None),
    }
}

fn non_empty(port: &str) -> Option<&str> {
    (!port.is_empty()).then_some(port)
}

/// Join host and port back into a single key.
pub fn join_host_port(host: &str, port: Option<&str>) -> String {
    match port {
        Some(port) if host.contains(':') => format!("[{}]:{}", host, port),
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

fn is_port(port: &str) -> bool {
    !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit())
}
