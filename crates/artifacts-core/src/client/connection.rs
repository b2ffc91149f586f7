//! Validated base URL + credentials, and endpoint URL construction.

use std::fmt;
use url::Url;

use super::ClientError;

/// Basic-auth credentials. The password never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Where the storage service lives and how to authenticate against it.
#[derive(Debug, Clone)]
pub struct Connection {
    base: Url,
    credentials: Option<Credentials>,
}

impl Connection {
    /// Validates `base_url` (http/https only) and the username/password pairing.
    ///
    /// An empty username counts as unset. A username without a password is an
    /// error; a password without a username is ignored.
    pub fn new(
        base_url: &str,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, ClientError> {
        let mut base = Url::parse(base_url.trim()).map_err(|source| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(ClientError::UnsupportedScheme {
                url: base_url.to_string(),
                scheme: base.scheme().to_string(),
            });
        }
        base.set_query(None);
        base.set_fragment(None);

        let credentials = match username.filter(|u| !u.is_empty()) {
            Some(username) => match password.filter(|p| !p.is_empty()) {
                Some(password) => Some(Credentials {
                    username: username.to_string(),
                    password: password.to_string(),
                }),
                None => {
                    return Err(ClientError::MissingPassword {
                        username: username.to_string(),
                    })
                }
            },
            None => {
                if password.is_some_and(|p| !p.is_empty()) {
                    tracing::warn!("password configured without a username; ignoring it");
                }
                None
            }
        };

        Ok(Self { base, credentials })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// `{base}/{path}`: target of PUT and DELETE.
    pub fn file_url(&self, path: &str) -> Result<Url, ClientError> {
        join_segments(&self.base, &[], path)
    }

    /// `{base}/api/storage/{path}`: file info endpoint carrying the checksums.
    pub fn storage_info_url(&self, path: &str) -> Result<Url, ClientError> {
        join_segments(&self.base, &["api", "storage"], path)
    }
}

/// Appends `prefix` and the non-empty `/`-separated segments of `path` to `base`.
/// Segments are percent-encoded by `url`.
fn join_segments(base: &Url, prefix: &[&str], path: &str) -> Result<Url, ClientError> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return Err(ClientError::EmptyPath);
    }
    let mut url = base.clone();
    {
        // http(s) URLs always have a path, checked in Connection::new.
        let mut parts = url
            .path_segments_mut()
            .map_err(|()| ClientError::UnsupportedScheme {
                url: base.to_string(),
                scheme: base.scheme().to_string(),
            })?;
        parts.pop_if_empty();
        parts.extend(prefix.iter().copied());
        parts.extend(segments);
    }
    Ok(url)
}
