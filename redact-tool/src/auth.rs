use serde::{Deserialize, Serialize};

/// Failure of an authentication exchange. There is no taxonomy beyond
/// "accepted" and "not accepted": anything non-2xx surfaces the server's
/// `detail` message (or the bare status) for the user-facing alert.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{detail}")]
    Rejected { status: u16, detail: String },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("malformed token response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct IdentityToken<'a> {
    id_token: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    detail: Option<String>,
}

/// Blocking client for the redaction service's token endpoints. `Clone` so a
/// request can move onto a worker thread
/// (see [`UiFuture::spawn_blocking`](crate::UiFuture::spawn_blocking)).
#[derive(Clone)]
pub struct AuthClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl AuthClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            http: reqwest::blocking::Client::new(),
        }
    }

    pub fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        self.request("/login", Some(&Credentials { username, password }))
    }

    pub fn signup(&self, username: &str, password: &str) -> Result<String, AuthError> {
        self.request("/signup", Some(&Credentials { username, password }))
    }

    /// Anonymous sign-in; the service mints a throwaway account.
    pub fn guest(&self) -> Result<String, AuthError> {
        self.request("/guest", None::<&()>)
    }

    /// Exchanges a federated identity token for a service bearer token.
    pub fn google(&self, id_token: &str) -> Result<String, AuthError> {
        self.request("/auth/google", Some(&IdentityToken { id_token }))
    }

    fn request<B: Serialize>(&self, path: &str, body: Option<&B>) -> Result<String, AuthError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.post(&url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send()?;
        let status = response.status().as_u16();
        let bytes = response.bytes()?;
        token_from_response(status, &bytes)
    }
}

/// Interprets a token-endpoint response: 2xx carries `{"token": …}`,
/// everything else a best-effort `{"detail": …}` body.
pub fn token_from_response(status: u16, body: &[u8]) -> Result<String, AuthError> {
    if (200..300).contains(&status) {
        let TokenResponse { token } = serde_json::from_slice(body)?;
        return Ok(token);
    }
    let ErrorBody { detail } = serde_json::from_slice(body).unwrap_or_default();
    Err(AuthError::Rejected {
        status,
        detail: detail.unwrap_or_else(|| status.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_yields_the_token() {
        let token = token_from_response(200, br#"{"token":"abc123"}"#).unwrap();
        assert_eq!(token, "abc123");
    }

    #[test]
    fn rejection_carries_the_server_detail() {
        let err = token_from_response(401, br#"{"detail":"bad credentials"}"#).unwrap_err();
        assert!(err.to_string().contains("bad credentials"), "{err}");
    }

    #[test]
    fn rejection_without_a_body_falls_back_to_the_status() {
        let err = token_from_response(502, b"").unwrap_err();
        assert_eq!(err.to_string(), "502");
    }

    #[test]
    fn malformed_success_body_is_an_error() {
        assert!(token_from_response(200, b"not json").is_err());
    }
}
