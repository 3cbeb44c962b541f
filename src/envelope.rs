use serde::Serialize;

use crate::error::{Classify, ErrorKind};

/// Uniform result returned by every request operation:
/// `{ "ok": bool, "error"?: string, ...fields }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    pub kind: Option<ErrorKind>,
    #[serde(flatten)]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            ok: true,
            error: None,
            kind: None,
            data: Some(data),
        }
    }

    pub fn failure(error: impl Classify) -> Self {
        Self {
            ok: false,
            kind: Some(error.kind()),
            error: Some(error.to_string()),
            data: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.ok
    }
}

impl Envelope<()> {
    /// Success without result fields.
    pub fn done() -> Self {
        Self::success(())
    }
}

impl<T, E: Classify> From<Result<T, E>> for Envelope<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(error) => Self::failure(error),
        }
    }
}
