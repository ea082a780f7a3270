//! Endpoint callers, one module per service family.
//!
//! Every caller builds a [`RequestSpec`](crate::request::RequestSpec), sends it through
//! [`Client::call`](crate::Client::call) and decodes the body into a typed response.

pub mod inference;
pub mod pose;
pub mod recognition;
pub mod speech;
pub mod translation;
pub mod vision;

use crate::params::{FileParam, Params};
use crate::request::{AuthScheme, RequestSpec};
use crate::{Client, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

/// An image given either as bytes to upload or as a URL the service fetches itself.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// Uploaded as the multipart field `file`.
    File(FileParam),
    /// Sent as the field `image_url`.
    Url(String),
}

impl ImageSource {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        ImageSource::File(FileParam::from_bytes(bytes))
    }

    /// Reads the image at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the file cannot be read.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(ImageSource::File(FileParam::from_path(path)?))
    }

    pub fn url(url: impl Into<String>) -> Self {
        ImageSource::Url(url.into())
    }

    pub(crate) fn into_params(self) -> Params {
        match self {
            ImageSource::File(file) => Params::new().with("file", file),
            ImageSource::Url(url) => Params::new().with("image_url", url),
        }
    }
}

impl From<FileParam> for ImageSource {
    fn from(file: FileParam) -> Self {
        ImageSource::File(file)
    }
}

impl Client {
    /// POSTs `params` with `KakaoAK` authentication and decodes the JSON response.
    pub(crate) fn post_params<T: DeserializeOwned>(&self, url: String, params: Params) -> Result<T> {
        self.call_json(RequestSpec::post(url, AuthScheme::KakaoAk).with_params(params))
    }
}
