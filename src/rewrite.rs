//! Key/value list rewriting over configuration text.
//!
//! Locates `key = v1, v2, ...` lines, reinterprets each value as a CIDR
//! network and feeds the IPv4 ones through the excluder. Every other line
//! is passed through byte-identical.

use ipnet::{Ipv4Net, Ipv6Net};
use std::borrow::Cow;
use std::net::{Ipv4Addr, Ipv6Addr};
use tracing::warn;

use crate::exclude::exclude;

/// Rewrite every `key = ...` line of `config`, removing `exclusion` from the
/// IPv4 networks listed there.
///
/// Lines are processed independently and rejoined with a single newline, so
/// the original line structure (including a trailing newline) is preserved.
/// Running the rewrite twice yields the same text as running it once: after
/// the first pass the excluded range is no longer present in any value list.
pub fn rewrite_config(config: &str, key: &str, exclusion: Ipv4Net) -> String {
    config
        .split('\n')
        .map(|line| rewrite_line(line, key, exclusion))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rewrite a single line, or return it unchanged if it is not a field line
/// for `key`.
fn rewrite_line<'a>(line: &'a str, key: &str, exclusion: Ipv4Net) -> Cow<'a, str> {
    // Fast path: most lines don't mention the key at all.
    if !line.contains(key) {
        return Cow::Borrowed(line);
    }
    // Only the text before the first '=' decides whether this is a field
    // line; later '=' characters belong to the value.
    let Some((lhs, rhs)) = line.split_once('=') else {
        return Cow::Borrowed(line);
    };
    if lhs.trim() != key {
        return Cow::Borrowed(line);
    }

    let mut v4 = Vec::new();
    let mut v6 = Vec::new();
    for token in rhs.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        if let Some(net) = parse_ipv4(token) {
            v4.push(net);
        } else if let Some(net) = parse_ipv6(token) {
            v6.push(net);
        } else {
            warn!("Dropping unparseable {} entry: {}", key, token);
        }
    }

    let mut values: Vec<String> = v4
        .into_iter()
        .flat_map(|net| exclude(net, exclusion))
        .map(|net| net.to_string())
        .collect();
    values.extend(v6.into_iter().map(|net| net.to_string()));

    Cow::Owned(format!("{} = {}", key, values.join(", ")))
}

/// Parse a value token as an IPv4 network. Bare addresses count as /32;
/// host bits below the prefix are masked off.
fn parse_ipv4(token: &str) -> Option<Ipv4Net> {
    if token.contains('/') {
        token.parse::<Ipv4Net>().ok().map(|net| net.trunc())
    } else {
        token.parse::<Ipv4Addr>().ok().map(Ipv4Net::from)
    }
}

/// Parse a value token as an IPv6 network. Bare addresses count as /128.
fn parse_ipv6(token: &str) -> Option<Ipv6Net> {
    if token.contains('/') {
        token.parse::<Ipv6Net>().ok().map(|net| net.trunc())
    } else {
        token.parse::<Ipv6Addr>().ok().map(Ipv6Net::from)
    }
}
