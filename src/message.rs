use std::fmt;

use crate::schema::{LoginResult, LoginWithPassword, LoginWithToken};

/// Discriminant carried in the first element of every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Request,
    Response,
    Notification,
}

impl MessageKind {
    pub fn from_u64(kind: u64) -> Option<Self> {
        match kind {
            0 => Some(MessageKind::Request),
            1 => Some(MessageKind::Response),
            2 => Some(MessageKind::Notification),
            _ => None,
        }
    }
}

/// Decoded parameters, one variant per registered method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Params {
    LoginWithPassword(LoginWithPassword),
    LoginWithToken(LoginWithToken),
}

impl Params {
    /// The method name this variant is registered under.
    pub fn method(&self) -> &'static str {
        match self {
            Params::LoginWithPassword(_) => LoginWithPassword::METHOD,
            Params::LoginWithToken(_) => LoginWithToken::METHOD,
        }
    }
}

/// A decoded RPC request.
///
/// The method name is derived from `params`, so the two always agree.
#[derive(Clone, PartialEq, Eq)]
pub struct Request {
    id: u32,
    params: Params,
}

impl Request {
    pub(crate) fn new(id: u32, params: Params) -> Self {
        Request { id, params }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn method(&self) -> &'static str {
        self.params.method()
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn into_params(self) -> Params {
        self.params
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("id", &self.id)
            .field("method", &self.method())
            .field("params", &self.params)
            .finish()
    }
}

/// Results for each registered method. Defined for symmetry with `Params`; never decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Results {
    LoginWithPassword(LoginResult),
    LoginWithToken(LoginResult),
}

/// The response shape of the wire format. Decoding responses is not supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub id: u32,
    pub error: Option<String>,
    pub result: Option<Results>,
}
