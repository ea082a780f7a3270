//! Request parameters and the parameter encoder.
//!
//! [`Params`] is an ordered mapping from parameter name to a [`ParamValue`]. Its
//! encoding depends on its content: any [`FileParam`] forces `multipart/form-data`,
//! otherwise the configured [`BodyEncoding`] applies (JSON by default, URL-encoded
//! form for the legacy protocol variant).

use crate::request::{Body, FormPart};
use crate::{sniff, Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Body encoding used for parameter payloads without files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BodyEncoding {
    /// A single JSON object.
    #[default]
    Json,
    /// `application/x-www-form-urlencoded` fields.
    FormUrlEncoded,
}

/// An in-memory binary payload destined for a multipart file part.
///
/// The content type is sniffed from the bytes when the request is encoded.
#[derive(Clone, PartialEq, Eq)]
pub struct FileParam {
    bytes: Vec<u8>,
}

impl FileParam {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Reads the whole file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_bytes(std::fs::read(path)?))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// The sniffed MIME type.
    pub fn mime_type(&self) -> &'static str {
        sniff::mime_type_of(&self.bytes)
    }

    /// The sniffed extension (MIME subtype).
    pub fn extension(&self) -> &'static str {
        sniff::extension_of(&self.bytes)
    }
}

impl fmt::Debug for FileParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileParam")
            .field("len", &self.bytes.len())
            .field("mime_type", &self.mime_type())
            .finish()
    }
}

/// A parameter value. The set of kinds is closed.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    List(Vec<serde_json::Value>),
    File(FileParam),
}

impl ParamValue {
    /// Converts a JSON value into a parameter value.
    ///
    /// Returns `Ok(None)` for `null`, so unset optional fields are omitted from the
    /// wire payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] for JSON objects, which are not a supported kind.
    pub fn from_json(value: serde_json::Value) -> Result<Option<Self>> {
        use serde_json::Value;

        Ok(Some(match value {
            Value::Null => return Ok(None),
            Value::Bool(b) => ParamValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => ParamValue::Integer(i),
                None => ParamValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => ParamValue::Text(s),
            Value::Array(items) => ParamValue::List(items),
            Value::Object(_) => {
                return Err(Error::Encoding(
                    "nested objects are not supported as parameter values".to_string(),
                ))
            }
        }))
    }

    /// JSON representation of this value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] for non-finite floats and for files.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        use serde_json::Value;

        match self {
            ParamValue::Text(s) => Ok(Value::String(s.clone())),
            ParamValue::Integer(i) => Ok(Value::from(*i)),
            ParamValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .ok_or_else(|| Error::Encoding(format!("{f} is not representable in JSON"))),
            ParamValue::Bool(b) => Ok(Value::Bool(*b)),
            ParamValue::List(items) => Ok(Value::Array(items.clone())),
            ParamValue::File(_) => Err(Error::Encoding(
                "file parameters can only be sent as multipart form data".to_string(),
            )),
        }
    }

    /// Generic scalar rendering used for query strings and URL-encoded forms.
    ///
    /// List items are joined with commas.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] for files.
    pub fn to_plain_string(&self) -> Result<String> {
        match self {
            ParamValue::List(items) => Ok(items
                .iter()
                .map(|item| match item {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(",")),
            ParamValue::File(_) => Err(Error::Encoding(
                "file parameters cannot be sent as plain fields".to_string(),
            )),
            other => Ok(other.to_string()),
        }
    }

    /// Value of a non-file multipart field: text verbatim, everything else JSON, with
    /// the plain rendering as fallback when JSON encoding fails.
    ///
    /// Text is not JSON-quoted: the services take form fields as plain strings, and
    /// quotes would end up inside the value.
    fn to_form_field(&self) -> String {
        match self {
            ParamValue::Text(s) => s.clone(),
            other => other
                .to_json()
                .map(|json| json.to_string())
                .unwrap_or_else(|_| other.to_string()),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::Integer(i) => write!(f, "{i}"),
            ParamValue::Float(x) => write!(f, "{x}"),
            ParamValue::Bool(b) => write!(f, "{b}"),
            ParamValue::List(items) => write!(f, "{}", serde_json::Value::Array(items.clone())),
            ParamValue::File(file) => write!(f, "<{} bytes of {}>", file.bytes.len(), file.mime_type()),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Integer(v.into())
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        ParamValue::Integer(v.into())
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Integer(v)
    }
}

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        ParamValue::Float(v.into())
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(v: Vec<String>) -> Self {
        ParamValue::List(v.into_iter().map(serde_json::Value::String).collect())
    }
}

impl From<Vec<serde_json::Value>> for ParamValue {
    fn from(v: Vec<serde_json::Value>) -> Self {
        ParamValue::List(v)
    }
}

impl From<FileParam> for ParamValue {
    fn from(v: FileParam) -> Self {
        ParamValue::File(v)
    }
}

/// Request parameters, keyed by name in sorted order.
///
/// # Examples
///
/// ```
/// use kakao_api::params::{BodyEncoding, Params};
/// use kakao_api::request::Body;
///
/// let params = Params::new().with("prompt", "hi").with_opt("n", None::<i32>);
/// let body = params.encode(BodyEncoding::Json).unwrap();
/// assert_eq!(body.bytes(), Some(&br#"{"prompt":"hi"}"#[..]));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds parameters from any serializable struct or map.
    ///
    /// `None` fields are omitted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if the value does not serialize to a JSON object,
    /// or if a field has an unsupported kind.
    pub fn from_serializable<T: Serialize>(value: &T) -> Result<Self> {
        let json = serde_json::to_value(value).map_err(|e| Error::Encoding(e.to_string()))?;
        let serde_json::Value::Object(fields) = json else {
            return Err(Error::Encoding(
                "parameters must serialize to a JSON object".to_string(),
            ));
        };

        let mut params = Self::new();
        for (key, value) in fields {
            if let Some(value) = ParamValue::from_json(value)? {
                params.insert(key, value);
            }
        }
        Ok(params)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds the parameter only when `value` is `Some`.
    pub fn with_opt<V: Into<ParamValue>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns `true` if any value is a file.
    pub fn has_file(&self) -> bool {
        self.0.values().any(|v| matches!(v, ParamValue::File(_)))
    }

    /// Encodes the parameters as a request body.
    ///
    /// Files force a multipart body regardless of `encoding`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if a value cannot be represented in the chosen
    /// encoding.
    pub fn encode(&self, encoding: BodyEncoding) -> Result<Body> {
        if self.has_file() {
            return Ok(Body::Multipart(self.encode_multipart()));
        }

        match encoding {
            BodyEncoding::Json => Ok(Body::Bytes {
                content_type: JSON_CONTENT_TYPE.to_string(),
                data: self.encode_json()?,
            }),
            BodyEncoding::FormUrlEncoded => Ok(Body::Bytes {
                content_type: FORM_CONTENT_TYPE.to_string(),
                data: self.encode_form()?,
            }),
        }
    }

    fn encode_json(&self) -> Result<Vec<u8>> {
        let mut object = serde_json::Map::new();
        for (key, value) in &self.0 {
            object.insert(key.clone(), value.to_json()?);
        }
        serde_json::to_vec(&object).map_err(|e| Error::Encoding(e.to_string()))
    }

    fn encode_form(&self) -> Result<Vec<u8>> {
        let mut form = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.0 {
            form.append_pair(key, &value.to_plain_string()?);
        }
        Ok(form.finish().into_bytes())
    }

    fn encode_multipart(&self) -> Vec<FormPart> {
        self.0
            .iter()
            .map(|(key, value)| match value {
                ParamValue::File(file) => FormPart::File {
                    name: key.clone(),
                    filename: format!("{}.{}", key, file.extension()),
                    mime_type: file.mime_type(),
                    bytes: file.bytes.clone(),
                },
                other => FormPart::Text {
                    name: key.clone(),
                    value: other.to_form_field(),
                },
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

    #[test]
    fn plain_params_encode_as_json() {
        let body = Params::new().with("prompt", "hi").encode(BodyEncoding::Json).unwrap();
        assert_eq!(
            body,
            Body::Bytes {
                content_type: JSON_CONTENT_TYPE.to_string(),
                data: br#"{"prompt":"hi"}"#.to_vec(),
            }
        );
    }

    #[test]
    fn file_params_force_multipart() {
        let params = Params::new()
            .with("file", FileParam::from_bytes(PNG))
            .with("width", 200);

        for encoding in [BodyEncoding::Json, BodyEncoding::FormUrlEncoded] {
            let Body::Multipart(parts) = params.encode(encoding).unwrap() else {
                panic!("expected multipart body");
            };
            assert_eq!(
                parts,
                vec![
                    FormPart::File {
                        name: "file".to_string(),
                        filename: "file.png".to_string(),
                        mime_type: "image/png",
                        bytes: PNG.to_vec(),
                    },
                    FormPart::Text {
                        name: "width".to_string(),
                        value: "200".to_string(),
                    },
                ]
            );
        }
    }

    #[test]
    fn multipart_fields_keep_nested_structures_as_json() {
        let boxes = vec![json!([[0, 0], [10, 0], [10, 5], [0, 5]])];
        let params = Params::new()
            .with("file", FileParam::from_bytes(PNG))
            .with("boxes", boxes)
            .with("image_url", "https://example.com/a.png")
            .with("ratio", f64::NAN);
        let Body::Multipart(parts) = params.encode(BodyEncoding::Json).unwrap() else {
            panic!("expected multipart body");
        };

        let field = |name: &str| {
            parts.iter().find_map(|part| match part {
                FormPart::Text { name: n, value } if n == name => Some(value.clone()),
                _ => None,
            })
        };
        assert_eq!(field("boxes").as_deref(), Some("[[[0,0],[10,0],[10,5],[0,5]]]"));
        assert_eq!(field("image_url").as_deref(), Some("https://example.com/a.png"));
        assert_eq!(field("ratio").as_deref(), Some("NaN"));
    }

    #[test]
    fn json_encoding_is_deterministic() {
        let build = || {
            Params::new()
                .with("z", 1)
                .with("a", vec!["x".to_string(), "y".to_string()])
                .with("m", true)
                .with("temperature", 0.7)
        };
        let first = build().encode(BodyEncoding::Json).unwrap();
        let second = build().encode(BodyEncoding::Json).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first.bytes(),
            Some(&br#"{"a":["x","y"],"m":true,"temperature":0.7,"z":1}"#[..])
        );
    }

    #[test]
    fn empty_params_still_produce_a_body() {
        let json = Params::new().encode(BodyEncoding::Json).unwrap();
        assert_eq!(json.bytes(), Some(&b"{}"[..]));

        let form = Params::new().encode(BodyEncoding::FormUrlEncoded).unwrap();
        assert_eq!(form.bytes(), Some(&b""[..]));
        assert_eq!(form.content_type(), Some(FORM_CONTENT_TYPE));
    }

    #[test]
    fn form_encoding_uses_scalar_rendering() {
        let body = Params::new()
            .with("query", "안녕 world")
            .with("langs", vec!["kr".to_string(), "en".to_string()])
            .with("n", 2)
            .encode(BodyEncoding::FormUrlEncoded)
            .unwrap();
        assert_eq!(
            body.bytes(),
            Some(&b"langs=kr%2Cen&n=2&query=%EC%95%88%EB%85%95+world"[..])
        );
    }

    #[test]
    fn non_finite_float_fails_json_encoding() {
        let err = Params::new()
            .with("temperature", f64::INFINITY)
            .encode(BodyEncoding::Json)
            .unwrap_err();
        assert!(matches!(err, Error::Encoding(_)));
    }

    #[test]
    fn from_serializable_omits_unset_fields() {
        #[derive(Serialize)]
        struct Generation {
            prompt: String,
            max_tokens: u32,
            #[serde(skip_serializing_if = "Option::is_none")]
            top_p: Option<f64>,
            n: Option<u32>,
        }

        let params = Params::from_serializable(&Generation {
            prompt: "hello".to_string(),
            max_tokens: 64,
            top_p: None,
            n: None,
        })
        .unwrap();

        assert_eq!(params.len(), 2);
        assert_eq!(params.get("prompt"), Some(&ParamValue::Text("hello".to_string())));
        assert_eq!(params.get("max_tokens"), Some(&ParamValue::Integer(64)));
        assert!(params.get("n").is_none());
    }

    #[test]
    fn from_serializable_rejects_non_objects_and_nested_objects() {
        assert!(matches!(
            Params::from_serializable(&vec![1, 2]),
            Err(Error::Encoding(_))
        ));
        assert!(matches!(
            Params::from_serializable(&json!({"nested": {"a": 1}})),
            Err(Error::Encoding(_))
        ));
    }

    #[test]
    fn file_param_debug_hides_bytes() {
        let debug = format!("{:?}", FileParam::from_bytes(PNG));
        assert_eq!(debug, r#"FileParam { len: 12, mime_type: "image/png" }"#);
    }
}
