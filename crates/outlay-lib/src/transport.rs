use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, de::DeserializeOwned};

use crate::error::{Error, Field, FieldErrors, Result};
use crate::models::ReceiptFile;

/// Multipart field name the OCR endpoint reads the image from.
pub const RECEIPT_FIELD: &str = "receipt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Json(serde_json::Value),
    Receipt(ReceiptFile),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub endpoint: String,
    pub query: Vec<(String, String)>,
    pub bearer: Option<String>,
    pub body: Body,
}

impl HttpRequest {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            query: vec![],
            bearer: None,
            body: Body::Empty,
        }
    }

    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Turns a non-2xx response into an [`Error::Api`], reading the
    /// `detail` field when the server provided one.
    pub fn api_error(&self) -> Error {
        let detail = serde_json::from_slice::<ErrorBody>(&self.body)
            .ok()
            .and_then(|body| body.detail)
            .and_then(|detail| match detail {
                serde_json::Value::String(detail) if !detail.is_empty() => Some(detail),
                // request validation failures come back as a list of {loc, msg, type}
                serde_json::Value::Array(items) => {
                    let messages = items
                        .iter()
                        .filter_map(|item| item.get("msg").and_then(|msg| msg.as_str()))
                        .collect::<Vec<_>>();
                    (!messages.is_empty()).then(|| messages.join("; "))
                }
                _ => None,
            })
            .unwrap_or_else(|| format!("Request failed with status {}", self.status));

        Error::Api {
            status: self.status,
            detail,
        }
    }
}

#[async_trait(?Send)]
pub trait Transport {
    /// Performs one HTTP exchange. Only failures where no response was
    /// received are errors; every status code is returned as a response.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), request.endpoint);

        let mut req = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Delete => self.client.delete(&url),
        };
        if !request.query.is_empty() {
            req = req.query(&request.query);
        }
        if let Some(token) = request.bearer {
            req = req.header("Authorization", format!("Bearer {}", token));
        }
        req = match request.body {
            Body::Empty => req,
            Body::Json(value) => req.json(&value),
            Body::Receipt(file) => {
                let part = Part::bytes(file.bytes)
                    .file_name(file.name)
                    .mime_str(&file.mime)
                    .map_err(|_| {
                        let mut errors = FieldErrors::new();
                        errors.push(Field::Receipt, "Unsupported file type");
                        Error::Validation(errors)
                    })?;
                req.multipart(Form::new().part(RECEIPT_FIELD, part))
            }
        };

        let res = req.send().await.map_err(|e| {
            error!("request to {} failed: {}", url, e);
            Error::Network(e.to_string())
        })?;
        let status = res.status().as_u16();
        let body = res.bytes().await.map_err(|e| {
            error!("error reading response from {}: {}", url, e);
            Error::Network(e.to_string())
        })?;

        Ok(HttpResponse::new(status, body.to_vec()))
    }
}
