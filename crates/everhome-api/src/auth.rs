use futures_util::future::BoxFuture;
use secrecy::SecretString;

use crate::error::Error;

/// Source of bearer tokens for the Everhome API.
///
/// The token lifecycle (OAuth2 authorization, refresh, persistence) is owned
/// by the host. The client only asks for a currently valid token right
/// before each request and never caches it.
///
/// Implementations signal an unusable credential with
/// [`Error::Authentication`]; any other error is treated the same way by
/// callers, since no request was sent.
pub trait TokenProvider: Send + Sync {
    /// Return a valid access token.
    fn access_token(&self) -> BoxFuture<'_, Result<SecretString, Error>>;
}

/// A fixed access token, e.g. one pasted from the Everhome developer portal.
#[derive(Debug, Clone)]
pub struct StaticToken {
    token: SecretString,
}

impl StaticToken {
    pub fn new(token: SecretString) -> Self {
        Self { token }
    }
}

impl From<String> for StaticToken {
    fn from(token: String) -> Self {
        Self::new(SecretString::from(token))
    }
}

impl TokenProvider for StaticToken {
    fn access_token(&self) -> BoxFuture<'_, Result<SecretString, Error>> {
        let token = self.token.clone();
        Box::pin(async move { Ok(token) })
    }
}
