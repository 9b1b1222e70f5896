//! Access policy evaluation.
//!
//! An [`AccessPolicy`] is an ordered list of path patterns, each mapped to an
//! [`AccessRule`], followed by a catch-all rule for everything else. The first
//! pattern that matches a request path decides; when none does, the catch-all
//! applies. Every path therefore resolves to exactly one rule.
//!
//! ```
//! use google0auth_platform_access::{AccessPolicy, AccessRule, PathPattern};
//!
//! let policy = AccessPolicy::builder()
//!     .permit_all("/api/public".parse::<PathPattern>().unwrap())
//!     .any_request(AccessRule::Authenticated)
//!     .build();
//!
//! assert_eq!(policy.evaluate("/api/public"), AccessRule::Public);
//! assert_eq!(policy.evaluate("/api/private"), AccessRule::Authenticated);
//! ```

use crate::error::PolicyError;
use rootcause::Report;
use std::fmt;
use std::str::FromStr;

/// What a request must present before it reaches a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessRule {
    /// Anyone may proceed, authenticated or not.
    Public,
    /// An authenticated principal is required.
    Authenticated,
}

impl fmt::Display for AccessRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "permit_all"),
            Self::Authenticated => write!(f, "authenticated"),
        }
    }
}

/// A request path pattern.
///
/// Two forms are supported:
/// - `/api/public` matches that path exactly.
/// - `/static/**` matches `/static` and everything below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// Matches one path exactly.
    Exact(String),
    /// Matches a base path and any path nested under it.
    Prefix(String),
}

impl PathPattern {
    /// Parses a pattern, rejecting anything that is not an absolute path or
    /// that uses wildcards other than a trailing `/**`.
    pub fn parse(pattern: &str) -> Result<Self, Report<PolicyError>> {
        let invalid = |reason: &str| PolicyError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        if !pattern.starts_with('/') {
            return Err(invalid("pattern must start with '/'").into());
        }

        let (base, is_prefix) = match pattern.strip_suffix("/**") {
            Some(base) => (base, true),
            None => (pattern, false),
        };

        if base.contains('*') {
            return Err(invalid("only a trailing '/**' wildcard is supported").into());
        }

        if base.contains(['?', '#']) {
            return Err(invalid("pattern must not contain a query or fragment").into());
        }

        if is_prefix {
            Ok(Self::Prefix(base.to_string()))
        } else {
            Ok(Self::Exact(base.to_string()))
        }
    }

    /// Returns true if the request path matches this pattern.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(exact) => path == exact,
            Self::Prefix(base) => match path.strip_prefix(base.as_str()) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            },
        }
    }
}

impl FromStr for PathPattern {
    type Err = Report<PolicyError>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(path) => write!(f, "{path}"),
            Self::Prefix(base) => write!(f, "{base}/**"),
        }
    }
}

/// Ordered pattern-to-rule table with a catch-all.
///
/// Built once at startup and only read afterwards.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    rules: Vec<(PathPattern, AccessRule)>,
    any_request: AccessRule,
}

impl AccessPolicy {
    /// Starts building a policy. Unless overridden, unmatched paths require
    /// authentication.
    #[must_use]
    pub fn builder() -> AccessPolicyBuilder {
        AccessPolicyBuilder::default()
    }

    /// Builds the common shape: the given patterns are public, every other
    /// path requires authentication.
    pub fn permit_all_then_authenticated<I, P>(patterns: I) -> Result<Self, Report<PolicyError>>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let mut builder = Self::builder();
        for pattern in patterns {
            builder = builder.permit_all(PathPattern::parse(pattern.as_ref())?);
        }
        Ok(builder.any_request(AccessRule::Authenticated).build())
    }

    /// Returns the rule that applies to the given request path.
    #[must_use]
    pub fn evaluate(&self, path: &str) -> AccessRule {
        self.rules
            .iter()
            .find(|(pattern, _)| pattern.matches(path))
            .map_or(self.any_request, |(_, rule)| *rule)
    }

    /// Returns true if the path is only reachable by an authenticated principal.
    #[must_use]
    pub fn requires_authentication(&self, path: &str) -> bool {
        self.evaluate(path) == AccessRule::Authenticated
    }

    /// Returns the explicit rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[(PathPattern, AccessRule)] {
        &self.rules
    }

    /// Returns the rule for paths no pattern matches.
    #[must_use]
    pub fn any_request_rule(&self) -> AccessRule {
        self.any_request
    }
}

/// Builder for [`AccessPolicy`]. Rules are evaluated in insertion order.
#[derive(Debug)]
pub struct AccessPolicyBuilder {
    rules: Vec<(PathPattern, AccessRule)>,
    any_request: AccessRule,
}

impl Default for AccessPolicyBuilder {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            any_request: AccessRule::Authenticated,
        }
    }
}

impl AccessPolicyBuilder {
    /// Lets anyone reach paths matching the pattern.
    #[must_use]
    pub fn permit_all(self, pattern: PathPattern) -> Self {
        self.rule(pattern, AccessRule::Public)
    }

    /// Requires authentication for paths matching the pattern.
    #[must_use]
    pub fn authenticated(self, pattern: PathPattern) -> Self {
        self.rule(pattern, AccessRule::Authenticated)
    }

    /// Appends a rule.
    #[must_use]
    pub fn rule(mut self, pattern: PathPattern, rule: AccessRule) -> Self {
        self.rules.push((pattern, rule));
        self
    }

    /// Sets the rule for paths no pattern matches.
    #[must_use]
    pub fn any_request(mut self, rule: AccessRule) -> Self {
        self.any_request = rule;
        self
    }

    /// Builds the policy.
    #[must_use]
    pub fn build(self) -> AccessPolicy {
        AccessPolicy {
            rules: self.rules,
            any_request: self.any_request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(s: &str) -> PathPattern {
        PathPattern::parse(s).expect("valid pattern")
    }

    fn default_policy() -> AccessPolicy {
        AccessPolicy::permit_all_then_authenticated(["/api/public"]).expect("valid policy")
    }

    #[test]
    fn exact_pattern_matches_only_itself() {
        let p = pattern("/api/public");
        assert_eq!(p, PathPattern::Exact("/api/public".to_string()));
        assert!(p.matches("/api/public"));
        assert!(!p.matches("/api/public/"));
        assert!(!p.matches("/api/publicity"));
        assert!(!p.matches("/api/public/more"));
        assert!(!p.matches("/api"));
    }

    #[test]
    fn prefix_pattern_matches_base_and_children() {
        let p = pattern("/static/**");
        assert_eq!(p, PathPattern::Prefix("/static".to_string()));
        assert!(p.matches("/static"));
        assert!(p.matches("/static/"));
        assert!(p.matches("/static/css/site.css"));
        assert!(!p.matches("/statics"));
        assert!(!p.matches("/"));
    }

    #[test]
    fn root_prefix_matches_everything() {
        let p = pattern("/**");
        assert!(p.matches("/"));
        assert!(p.matches("/api/private"));
    }

    #[test]
    fn pattern_display_matches_source() {
        for source in ["/api/public", "/static/**", "/**"] {
            assert_eq!(pattern(source).to_string(), source);
        }
    }

    #[test]
    fn rejects_relative_pattern() {
        let err = PathPattern::parse("api/public").expect_err("should reject");
        assert!(err.to_string().contains("must start with '/'"));
    }

    #[test]
    fn rejects_inner_wildcards() {
        for source in ["/api/*/public", "/api/**/public", "/api/pub*", "/api/*"] {
            assert!(PathPattern::parse(source).is_err(), "{source} should be rejected");
        }
    }

    #[test]
    fn rejects_query_in_pattern() {
        assert!(PathPattern::parse("/api/public?x=1").is_err());
    }

    #[test]
    fn public_path_bypasses_authentication() {
        let policy = default_policy();
        assert_eq!(policy.evaluate("/api/public"), AccessRule::Public);
        assert!(!policy.requires_authentication("/api/public"));
    }

    #[test]
    fn private_path_falls_under_any_request() {
        let policy = default_policy();
        assert_eq!(policy.evaluate("/api/private"), AccessRule::Authenticated);
    }

    #[test]
    fn every_other_path_requires_authentication() {
        let policy = default_policy();
        for path in ["/", "/api", "/api/public/", "/api/public/x", "/favicon.ico", ""] {
            assert!(policy.requires_authentication(path), "{path:?}");
        }
    }

    #[test]
    fn evaluation_is_stable_across_calls() {
        let policy = default_policy();
        let first = policy.evaluate("/api/private");
        for _ in 0..10 {
            assert_eq!(policy.evaluate("/api/private"), first);
        }
    }

    #[test]
    fn first_matching_rule_wins() {
        let policy = AccessPolicy::builder()
            .authenticated(pattern("/docs/internal/**"))
            .permit_all(pattern("/docs/**"))
            .build();

        assert_eq!(policy.evaluate("/docs/internal/plan"), AccessRule::Authenticated);
        assert_eq!(policy.evaluate("/docs/readme"), AccessRule::Public);
        assert_eq!(policy.rules().len(), 2);
    }

    #[test]
    fn builder_defaults_to_authenticated() {
        let policy = AccessPolicy::builder().build();
        assert_eq!(policy.any_request_rule(), AccessRule::Authenticated);
        assert!(policy.requires_authentication("/anything"));
    }

    #[test]
    fn any_request_can_be_opened() {
        let policy = AccessPolicy::builder()
            .any_request(AccessRule::Public)
            .build();
        assert_eq!(policy.evaluate("/anything"), AccessRule::Public);
    }

    #[test]
    fn invalid_pattern_fails_policy_construction() {
        assert!(AccessPolicy::permit_all_then_authenticated(["/ok", "bad"]).is_err());
    }
}
