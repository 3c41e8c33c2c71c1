//! Bootstrap configuration supplied by the host.

use url::Url;

/// URLs the container needs to talk to the API and drive the login flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// API base URL.
    pub api_url: Url,
    /// Application URL; replaces the redirect URL once the token is captured.
    pub app_url: Url,
    /// Where the login affordance sends the user.
    pub login_url: Url,
    /// Where logout sends the user.
    pub logout_url: Url,
}

impl AppConfig {
    /// Derive login and logout URLs from an identity provider description.
    ///
    /// # Errors
    ///
    /// Returns the parse error when the provider domain does not form a URL.
    pub fn with_provider(
        api_url: Url,
        app_url: Url,
        provider: &IdentityProvider,
    ) -> Result<Self, url::ParseError> {
        Ok(Self {
            login_url: provider.login_url(&app_url)?,
            logout_url: provider.logout_url(&app_url)?,
            api_url,
            app_url,
        })
    }
}

/// OAuth2 provider issuing implicit-grant tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentityProvider {
    /// Provider host, e.g. `tenant.auth0.com`.
    pub domain: String,
    /// API audience the token is issued for.
    pub audience: String,
    /// Registered client identifier.
    pub client_id: String,
}

impl IdentityProvider {
    /// `/authorize` URL requesting a token redirect back to `redirect`.
    ///
    /// # Errors
    ///
    /// Returns the parse error when the domain does not form a URL.
    pub fn login_url(&self, redirect: &Url) -> Result<Url, url::ParseError> {
        Url::parse_with_params(
            &format!("https://{}/authorize", self.domain),
            &[
                ("audience", self.audience.as_str()),
                ("response_type", "token"),
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", redirect.as_str()),
            ],
        )
    }

    /// `/v2/logout` URL returning the user to `return_to`.
    ///
    /// # Errors
    ///
    /// Returns the parse error when the domain does not form a URL.
    pub fn logout_url(&self, return_to: &Url) -> Result<Url, url::ParseError> {
        Url::parse_with_params(
            &format!("https://{}/v2/logout", self.domain),
            &[
                ("audience", self.audience.as_str()),
                ("client_id", self.client_id.as_str()),
                ("returnTo", return_to.as_str()),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> IdentityProvider {
        IdentityProvider {
            domain: "casting.eu.auth0.com".into(),
            audience: "castlist".into(),
            client_id: "abc123".into(),
        }
    }

    fn url(raw: &str) -> Url {
        Url::parse(raw).expect("valid url")
    }

    #[test]
    fn login_url_requests_token_redirect() {
        let login = provider()
            .login_url(&url("http://localhost:8000/"))
            .expect("login url");
        assert_eq!(login.path(), "/authorize");
        let pairs: Vec<(String, String)> = login
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        assert!(pairs.contains(&("response_type".into(), "token".into())));
        assert!(pairs.contains(&("redirect_uri".into(), "http://localhost:8000/".into())));
        assert!(pairs.contains(&("client_id".into(), "abc123".into())));
    }

    #[test]
    fn config_derives_both_urls_from_provider() {
        let config = AppConfig::with_provider(
            url("http://localhost:8000/api"),
            url("http://localhost:8000/"),
            &provider(),
        )
        .expect("config");
        assert_eq!(config.logout_url.path(), "/v2/logout");
        assert!(
            config
                .logout_url
                .query_pairs()
                .any(|(key, value)| key == "returnTo" && value == "http://localhost:8000/")
        );
        assert_eq!(config.login_url.host_str(), Some("casting.eu.auth0.com"));
    }

    #[test]
    fn invalid_domain_is_rejected() {
        let broken = IdentityProvider {
            domain: "bad domain".into(),
            ..provider()
        };
        assert!(broken.login_url(&url("http://localhost/")).is_err());
    }
}
