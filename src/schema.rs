//! The closed set of methods this decoder understands, and the parameter shape of each.

use std::collections::HashMap;
use std::fmt;

use log::{debug, trace};

use crate::cursor::{Value, ValueKind};
use crate::error::{DecodeError, Result};
use crate::message::Params;

/// A field required by a method's parameter map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: ValueKind,
}

/// The expected parameter map of one method, and how to build its `Params` variant.
pub struct ParamSchema {
    pub method: &'static str,
    pub fields: &'static [FieldSpec],
    build: fn(Fields) -> Result<Params>,
}

impl ParamSchema {
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Validates a decoded params map against this schema and builds the typed variant.
    pub fn decode(&self, entries: Vec<(String, Value)>) -> Result<Params> {
        let fields = Fields::project(self, entries)?;
        (self.build)(fields)
    }
}

impl fmt::Debug for ParamSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamSchema")
            .field("method", &self.method)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Every method that can be decoded.
pub static REGISTRY: &[ParamSchema] = &[LoginWithPassword::SCHEMA, LoginWithToken::SCHEMA];

pub fn lookup(method: &str) -> Option<&'static ParamSchema> {
    REGISTRY.iter().find(|schema| schema.method == method)
}

/// A params map projected onto a schema: unknown keys dropped, every schema field present with the
/// declared kind.
#[derive(Debug)]
pub struct Fields {
    values: HashMap<&'static str, Value>,
}

impl Fields {
    pub fn project(schema: &ParamSchema, entries: Vec<(String, Value)>) -> Result<Fields> {
        let mut values = HashMap::with_capacity(schema.fields.len());
        for (key, value) in entries {
            match schema.field(&key) {
                Some(field) => {
                    if values.insert(field.name, value).is_some() {
                        debug!("{}: duplicate field {:?}, keeping the last", schema.method, key);
                    }
                }
                None => trace!("{}: ignoring unknown field {:?}", schema.method, key),
            }
        }

        for field in schema.fields {
            match values.get(field.name) {
                None => return Err(DecodeError::MissingField(field.name)),
                Some(value) if value.kind() != field.kind => {
                    return Err(mismatch(field.name, field.kind, value.kind()))
                }
                Some(_) => {}
            }
        }

        Ok(Fields { values })
    }

    pub fn take_string(&mut self, name: &'static str) -> Result<String> {
        match self.take(name)? {
            Value::Str(s) => Ok(s),
            other => Err(mismatch(name, ValueKind::String, other.kind())),
        }
    }

    pub fn take_bytes(&mut self, name: &'static str) -> Result<Vec<u8>> {
        match self.take(name)? {
            Value::Bin(bytes) => Ok(bytes),
            other => Err(mismatch(name, ValueKind::Bytes, other.kind())),
        }
    }

    pub fn take_uint(&mut self, name: &'static str) -> Result<u64> {
        match self.take(name)? {
            Value::UInt(n) => Ok(n),
            other => Err(mismatch(name, ValueKind::UInt, other.kind())),
        }
    }

    fn take(&mut self, name: &'static str) -> Result<Value> {
        self.values
            .remove(name)
            .ok_or(DecodeError::MissingField(name))
    }
}

fn mismatch(name: &'static str, expected: ValueKind, actual: ValueKind) -> DecodeError {
    DecodeError::FieldTypeMismatch {
        name,
        expected,
        actual,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginWithPassword {
    pub username: String,
    pub password: String,
    pub bytes: Vec<u8>,
}

impl LoginWithPassword {
    pub const METHOD: &'static str = "Profile.LoginWithPassword";

    pub const SCHEMA: ParamSchema = ParamSchema {
        method: Self::METHOD,
        fields: &[
            FieldSpec {
                name: "username",
                kind: ValueKind::String,
            },
            FieldSpec {
                name: "password",
                kind: ValueKind::String,
            },
            FieldSpec {
                name: "bytes",
                kind: ValueKind::Bytes,
            },
        ],
        build: Self::build,
    };

    fn build(mut fields: Fields) -> Result<Params> {
        Ok(Params::LoginWithPassword(LoginWithPassword {
            username: fields.take_string("username")?,
            password: fields.take_string("password")?,
            bytes: fields.take_bytes("bytes")?,
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginWithToken {
    pub token: String,
}

impl LoginWithToken {
    pub const METHOD: &'static str = "Profile.LoginWithToken";

    pub const SCHEMA: ParamSchema = ParamSchema {
        method: Self::METHOD,
        fields: &[FieldSpec {
            name: "token",
            kind: ValueKind::String,
        }],
        build: Self::build,
    };

    fn build(mut fields: Fields) -> Result<Params> {
        Ok(Params::LoginWithToken(LoginWithToken {
            token: fields.take_string("token")?,
        }))
    }
}

/// Result shape shared by the login methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResult {
    pub ok: bool,
}
