//! Hostscope - include/exclude scope resolution for security tooling.
//!
//! This crate decides whether a network identifier (a bare IP address, a
//! hostname or a URL) is a permissible target, given a set of include and
//! exclude rules.
//!
//! # Features
//!
//! - **Exact hosts**: IPs and domains, optionally pinned to a port
//! - **Wildcards**: `*.example.com`, `*.example.*.test`
//! - **CIDR blocks**: IPv4 and IPv6 (`192.168.2.0/24`, `fc00::/7`)
//! - **IP ranges**: `192.168.3.2-5` or `10.0.0.1-10.0.0.50`
//! - **URL input**: any `scheme://` prefix and a trailing `/` are ignored
//! - **Domain hierarchy**: excluding a domain excludes all its subdomains
//! - **Target registry**: confirmed targets, categorized by kind
//!
//! # Quick Start
//!
//! ```
//! use hostscope::Scope;
//!
//! let mut scope = Scope::new();
//! scope.add_includes(["192.168.0.1-5", "192.168.10.0/24", "*.example.com", "example2.com:8080"])?;
//! scope.add_excludes(["somedomain.com", "exclude.example.com", "192.168.0.6"])?;
//!
//! assert!(scope.in_scope("foo.example.com"));
//! assert!(scope.in_scope("https://192.168.10.50/"));
//! assert!(!scope.in_scope("exclude.example.com"));
//! assert!(!scope.in_scope("example2.com:1234"));
//! # Ok::<(), hostscope::Error>(())
//! ```
//!
//! # Matching Rules
//!
//! A target is included when any include rule admits it:
//! 1. the normalized target equals the rule key
//! 2. the rule key is a string prefix of the target (legacy, see
//!    [`ScopeOptions::parent_prefix_includes`])
//! 3. a wildcard rule matches the whole target
//! 4. the target is a bare IP inside a CIDR or range rule
//!
//! A target is excluded when any exclude rule:
//! 1. has the same host and the same port (or both have none)
//! 2. is a parent domain of the target's host, regardless of ports
//!
//! A target is in scope when it is included and not excluded.

mod error;
mod rule_type;
mod scope;
mod shared;

pub mod config;
pub mod normalize;
pub mod rule;
pub mod ruleset;
pub mod target;

// Re-export core types
pub use error::{Error, Result};
pub use rule_type::RuleType;
pub use scope::Scope;
pub use shared::SharedScope;

pub use config::{ScopeConfig, ScopeOptions};
pub use rule::Rule;
pub use ruleset::RuleSet;
pub use target::{classify, TargetKind, Targets};
