//! Recipient resolution for digest delivery.
//!
//! Rather than requiring `--to` on every scheduled invocation, the recipient
//! is resolved through a chain:
//!
//! 1. `--to <address>`: explicit per-run override
//! 2. `DDL_TO_EMAIL` env var: set once in the scheduler's environment
//! 3. `to` under `[digest]` in the config file

use std::env;

/// Environment variable consulted when `--to` is absent.
pub const RECIPIENT_ENV: &str = "DDL_TO_EMAIL";

/// Resolve the digest recipient from the tiered chain.
///
/// Returns `None` when no source yields a non-empty address; delivery
/// decides whether that is an error.
pub fn resolve_recipient(explicit: Option<&str>, configured: Option<&str>) -> Option<String> {
    resolve_with(explicit, env::var(RECIPIENT_ENV).ok().as_deref(), configured)
}

fn resolve_with(
    explicit: Option<&str>,
    from_env: Option<&str>,
    configured: Option<&str>,
) -> Option<String> {
    [explicit, from_env, configured]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_wins() {
        let to = resolve_with(Some("flag@x.edu"), Some("env@x.edu"), Some("cfg@x.edu"));
        assert_eq!(to.as_deref(), Some("flag@x.edu"));
    }

    #[test]
    fn env_beats_config() {
        let to = resolve_with(None, Some("env@x.edu"), Some("cfg@x.edu"));
        assert_eq!(to.as_deref(), Some("env@x.edu"));
    }

    #[test]
    fn config_is_last_resort() {
        let to = resolve_with(None, None, Some("cfg@x.edu"));
        assert_eq!(to.as_deref(), Some("cfg@x.edu"));
    }

    #[test]
    fn empty_values_are_skipped() {
        let to = resolve_with(Some(""), Some("  "), Some("cfg@x.edu"));
        assert_eq!(to.as_deref(), Some("cfg@x.edu"));
    }

    #[test]
    fn nothing_resolves_to_none() {
        assert_eq!(resolve_with(None, None, None), None);
    }
}
