//! # kakao-api - A client for the Kakao AI APIs
//!
//! Text generation (KoGPT), image generation (Karlo), vision, translation, pose
//! estimation and speech, behind one blocking [`Client`].
//!
//! Every endpoint method goes through the same pipeline: parameters are encoded
//! (JSON, URL-encoded form, or multipart when a file is attached), the request is
//! authenticated with the endpoint family's scheme, dispatched once, and the response
//! is classified into raw bytes or a typed [`Error`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use kakao_api::Client;
//! use kakao_api::api::ImageSource;
//! use kakao_api::api::translation::Language;
//!
//! fn main() -> Result<(), kakao_api::Error> {
//!     let client = Client::new("your-rest-api-key")?;
//!
//!     let faces = client.detect_face(ImageSource::from_path("faces.jpg")?, 0.7)?;
//!     println!("Found {} faces", faces.result.faces.len());
//!
//!     let translated = client.translate_text("안녕하세요", Language::Korean, Language::English)?;
//!     println!("{}", translated.joined());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Failures after a response arrived keep the raw body:
//!
//! ```no_run
//! use kakao_api::{Client, Error};
//! use kakao_api::api::inference::TextGenerationParams;
//!
//! # fn example() -> Result<(), Error> {
//! # let client = Client::new("your-rest-api-key")?;
//! match client.generate_texts(TextGenerationParams::new("prompt", 16)) {
//!     Ok(texts) => println!("{:?}", texts.generations),
//!     Err(Error::Api { status, kind, message, .. }) => {
//!         eprintln!("rejected with {} ({}): {}", kind, status, message);
//!     }
//!     Err(Error::Decoding { message, raw_body, .. }) => {
//!         eprintln!("unexpected body ({}): {}", message, String::from_utf8_lossy(&raw_body));
//!     }
//!     Err(e) => eprintln!("other error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! The crate logs through `tracing` and never installs a subscriber. Turn on
//! [`Client::set_verbose`] to get full request and response dumps at `info` level.

pub mod api;
pub mod classify;
mod client;
mod endpoints;
mod error;
pub mod params;
pub mod request;
mod response;
pub mod sniff;
pub mod transport;
pub mod util;

pub use classify::ErrorFieldPolicy;
pub use client::{Client, ClientBuilder};
pub use endpoints::{
    Endpoints, API_BASE_URL_DAPI, API_BASE_URL_KARLO, API_BASE_URL_KOGPT, API_BASE_URL_POSE,
    API_BASE_URL_SPEECH,
};
pub use error::{ApiErrorKind, BoxError, Error, Result};
pub use params::{BodyEncoding, FileParam, Params};
pub use request::{AuthScheme, RequestSpec};
pub use response::RawResponse;
pub use transport::{Transport, TransportConfig};
