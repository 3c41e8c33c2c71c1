//! Authentication primitives: implicit-grant redirect parsing and the API session.
//!
//! # Design
//! - An identity provider hands the token back as `#access_token=...&...`
//!   appended to the redirect URL; the fragment is read as a query string.
//! - The session is a plain value handed to every API call, so two sessions
//!   never share a token by accident.

use std::fmt::{self, Debug, Formatter};

use url::Url;

/// Fragment parameter carrying the bearer token.
pub const ACCESS_TOKEN_PARAM: &str = "access_token";

/// Token material returned by an implicit-grant redirect.
#[derive(Clone, PartialEq, Eq)]
pub struct ImplicitGrant {
    /// Bearer token.
    pub access_token: String,
    /// Token type, normally `Bearer`.
    pub token_type: Option<String>,
    /// Lifetime in seconds as reported by the provider.
    pub expires_in: Option<u64>,
    /// Granted scope string.
    pub scope: Option<String>,
}

impl Debug for ImplicitGrant {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ImplicitGrant")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Outcome encoded in a redirect fragment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RedirectFragment {
    /// The provider issued a token.
    Granted(ImplicitGrant),
    /// The provider refused the authorization request.
    Denied {
        /// Error code such as `access_denied`.
        error: String,
        /// Optional human-readable description.
        description: Option<String>,
    },
}

/// Interpret the fragment of a redirect URL.
///
/// Returns `None` when there is no fragment or it carries neither a token nor
/// an error. The first occurrence of each parameter wins and empty values
/// count as absent.
#[must_use]
pub fn parse_fragment(url: &Url) -> Option<RedirectFragment> {
    let fragment = url.fragment().filter(|fragment| !fragment.is_empty())?;
    let param = |name: &str| {
        url::form_urlencoded::parse(fragment.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    };

    if let Some(access_token) = param(ACCESS_TOKEN_PARAM) {
        return Some(RedirectFragment::Granted(ImplicitGrant {
            access_token,
            token_type: param("token_type"),
            expires_in: param("expires_in").and_then(|raw| raw.parse().ok()),
            scope: param("scope"),
        }));
    }

    param("error").map(|error| RedirectFragment::Denied {
        error,
        description: param("error_description"),
    })
}

/// Recover the access token from a redirect URL, if one is present.
#[must_use]
pub fn extract_token(url: &Url) -> Option<String> {
    match parse_fragment(url)? {
        RedirectFragment::Granted(grant) => Some(grant.access_token),
        RedirectFragment::Denied { .. } => None,
    }
}

/// API base URL plus the bearer token used to call it.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    base_url: Url,
    token: Option<String>,
}

impl Session {
    /// Build a session; blank tokens are treated as absent.
    #[must_use]
    pub fn new(base_url: Url, token: Option<String>) -> Self {
        Self {
            base_url,
            token: token.filter(|token| !token.trim().is_empty()),
        }
    }

    /// API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Append an API path to the base URL, keeping any base path prefix.
    ///
    /// # Errors
    ///
    /// Returns the parse error when the combined string is not a valid URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}{path}"))
    }
}

impl Debug for Session {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Session")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(raw: &str) -> Url {
        Url::parse(raw).expect("valid url")
    }

    #[test]
    fn urls_without_fragment_yield_no_token() {
        for raw in [
            "https://app.example.com/",
            "https://app.example.com/?access_token=query-not-fragment",
            "https://app.example.com/#",
        ] {
            assert_eq!(extract_token(&url(raw)), None, "{raw}");
        }
    }

    #[test]
    fn fragment_token_is_extracted() {
        let redirect = url("https://app.example.com/#access_token=T&other=x");
        assert_eq!(extract_token(&redirect).as_deref(), Some("T"));
    }

    #[test]
    fn first_token_wins_and_encoding_is_decoded() {
        let redirect = url("https://app.example.com/#access_token=a%2Eb+c&access_token=second");
        assert_eq!(extract_token(&redirect).as_deref(), Some("a.b c"));
    }

    #[test]
    fn empty_token_counts_as_absent() {
        let redirect = url("https://app.example.com/#access_token=&token_type=Bearer");
        assert_eq!(parse_fragment(&redirect), None);
    }

    #[test]
    fn grant_metadata_is_parsed() {
        let redirect =
            url("http://a.test/#access_token=abc&expires_in=7200&token_type=Bearer&scope=openid");
        let Some(RedirectFragment::Granted(grant)) = parse_fragment(&redirect) else {
            panic!("expected a grant");
        };
        assert_eq!(grant.access_token, "abc");
        assert_eq!(grant.expires_in, Some(7200));
        assert_eq!(grant.token_type.as_deref(), Some("Bearer"));
        assert_eq!(grant.scope.as_deref(), Some("openid"));
        assert!(!format!("{grant:?}").contains("abc"));
    }

    #[test]
    fn provider_errors_are_surfaced() {
        let redirect = url(
            "https://app.example.com/#error=access_denied&error_description=User%20cancelled",
        );
        assert_eq!(
            parse_fragment(&redirect),
            Some(RedirectFragment::Denied {
                error: "access_denied".into(),
                description: Some("User cancelled".into()),
            })
        );
        assert_eq!(extract_token(&redirect), None);
    }

    #[test]
    fn session_endpoint_keeps_base_path() {
        let session = Session::new(url("https://api.example.com/v1/"), Some("tok".into()));
        assert_eq!(
            session.endpoint("/movies/3").expect("endpoint").as_str(),
            "https://api.example.com/v1/movies/3"
        );
        assert_eq!(session.token(), Some("tok"));
        assert!(format!("{session:?}").contains("<redacted>"));
    }

    #[test]
    fn blank_session_token_is_dropped() {
        let session = Session::new(url("https://api.example.com"), Some("  ".into()));
        assert_eq!(session.token(), None);
    }
}
