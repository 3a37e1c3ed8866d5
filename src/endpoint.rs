use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{ClientError, JsonMap};

/// HTTP verbs an endpoint may be declared with.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
        }
    }

    pub(crate) fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
            Self::Patch => reqwest::Method::PATCH,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ClientError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        [
            Self::Get,
            Self::Post,
            Self::Put,
            Self::Delete,
            Self::Patch,
        ]
        .into_iter()
        .find(|method| method.as_str().eq_ignore_ascii_case(value.trim()))
        .ok_or_else(|| ClientError::Config(format!("unsupported http method '{value}'")))
    }
}

impl TryFrom<String> for HttpMethod {
    type Error = ClientError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HttpMethod> for String {
    fn from(method: HttpMethod) -> Self {
        method.as_str().to_owned()
    }
}

/// A named, templated HTTP route with a fixed method.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDefinition {
    /// Unique key the endpoint is invoked by.
    pub name: String,
    /// Path template with `:param` placeholders, appended to the base URL.
    pub path: String,
    #[serde(alias = "httpMethod")]
    pub method: HttpMethod,
    /// Static body used when no default-table body exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<JsonMap>,
}

impl EndpointDefinition {
    pub fn new(name: impl Into<String>, path: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            method,
            body: None,
        }
    }

    pub fn with_body(mut self, body: JsonMap) -> Self {
        self.body = Some(body);
        self
    }
}

/// Per-endpoint fallback values, used only when the caller omits the field.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<JsonMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<JsonMap>,
}
