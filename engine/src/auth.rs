//! Third-party sign-in
//!
//! A sign-in attempt is an explicit request object. Each request owns its
//! completion callback, so two attempts in flight can never overwrite each
//! other's callback. The platform side holds on to the request while its UI
//! is up and finishes it with whatever authorization it received.

use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

/// Information the user is asked to share.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    FullName,
    Email,
}

/// Identity returned by a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// Stable user identifier issued by the provider
    pub user: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    /// Raw identity token, if the provider issued one
    pub identity_token: Option<Vec<u8>>,
}

/// What the platform handed back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    /// The credential type we asked for
    Credential(Credential),
    /// Anything else (e.g. a password credential), named by kind
    Other(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignInError {
    #[error("unexpected credential type: {0}")]
    UnexpectedCredential(String),
    #[error("sign-in was cancelled")]
    Cancelled,
    #[error("identity provider failed: {0}")]
    Provider(String),
    #[error("sign-in request was dropped before completing")]
    Abandoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub u64);

type Completion = Box<dyn FnOnce(Result<Credential, SignInError>) + Send>;

static NEXT_REQUEST: AtomicU64 = AtomicU64::new(1);

/// One in-flight sign-in attempt.
///
/// The completion runs exactly once: through [`SignInRequest::finish`] /
/// [`SignInRequest::fail`], or with [`SignInError::Abandoned`] when the
/// request is dropped unfinished.
pub struct SignInRequest {
    id: RequestId,
    scopes: Vec<Scope>,
    completion: Option<Completion>,
}

impl SignInRequest {
    pub fn new<F>(scopes: &[Scope], completion: F) -> Self
    where
        F: FnOnce(Result<Credential, SignInError>) + Send + 'static,
    {
        Self {
            id: RequestId(NEXT_REQUEST.fetch_add(1, Ordering::Relaxed)),
            scopes: scopes.to_vec(),
            completion: Some(Box::new(completion)),
        }
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    /// Complete with the authorization the platform returned.
    pub fn finish(self, authorization: Authorization) {
        let result = match authorization {
            Authorization::Credential(credential) => Ok(credential),
            Authorization::Other(kind) => Err(SignInError::UnexpectedCredential(kind)),
        };
        self.complete(result);
    }

    pub fn fail(self, error: SignInError) {
        self.complete(Err(error));
    }

    fn complete(mut self, result: Result<Credential, SignInError>) {
        if let Err(err) = &result {
            log::warn!("sign-in request {:?} failed: {}", self.id, err);
        } else {
            log::info!("sign-in request {:?} succeeded", self.id);
        }
        if let Some(completion) = self.completion.take() {
            completion(result);
        }
    }
}

impl Drop for SignInRequest {
    fn drop(&mut self) {
        if let Some(completion) = self.completion.take() {
            log::warn!("sign-in request {:?} dropped unfinished", self.id);
            completion(Err(SignInError::Abandoned));
        }
    }
}

impl std::fmt::Debug for SignInRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignInRequest")
            .field("id", &self.id)
            .field("scopes", &self.scopes)
            .field("pending", &self.completion.is_some())
            .finish()
    }
}
