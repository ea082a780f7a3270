//! Speech recognition and synthesis.

use super::recognition::{final_result, parse_recognition_stream, SpeechRecognition};
use crate::endpoints::join;
use crate::request::{AuthScheme, Body, RequestSpec};
use crate::{Client, Error, Result};
use serde::{Deserialize, Serialize};

pub const PCM_CONTENT_TYPE: &str = "application/octet-stream";
pub const SSML_CONTENT_TYPE: &str = "application/xml";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoiceType {
    #[default]
    WomanReadCalm,
    ManReadCalm,
    WomanDialogBright,
    ManDialogBright,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum SpeechStyle {
    #[default]
    #[serde(rename = "SS_READ_SPEECH")]
    ReadSpeech,
    #[serde(rename = "SS_ALT_FAST_1")]
    AltFast,
    #[serde(rename = "SS_ALT_SLOW_1")]
    AltSlow,
}

/// A synthesis document: the `<speak>` root of the markup.
///
/// # Examples
///
/// ```
/// use kakao_api::api::speech::{Speak, Voice, VoiceType};
///
/// let speak = Speak::new(vec![Voice::new("안녕하세요").with_voice_type(VoiceType::ManReadCalm)]);
/// assert_eq!(
///     speak.to_xml().unwrap(),
///     r#"<speak><voice name="MAN_READ_CALM">안녕하세요</voice></speak>"#
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename = "speak")]
pub struct Speak {
    #[serde(rename = "voice", default)]
    pub voices: Vec<Voice>,
}

/// Text read out by one voice.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Voice {
    #[serde(rename = "@name", default, skip_serializing_if = "Option::is_none")]
    pub voice_type: Option<VoiceType>,
    #[serde(rename = "@speechStyle", default, skip_serializing_if = "Option::is_none")]
    pub speech_style: Option<SpeechStyle>,
    #[serde(rename = "$text", default)]
    pub text: String,
}

impl Voice {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_voice_type(mut self, voice_type: VoiceType) -> Self {
        self.voice_type = Some(voice_type);
        self
    }

    pub fn with_speech_style(mut self, style: SpeechStyle) -> Self {
        self.speech_style = Some(style);
        self
    }
}

impl Speak {
    pub fn new(voices: Vec<Voice>) -> Self {
        Self { voices }
    }

    /// Serializes the document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if the document cannot be written as XML.
    pub fn to_xml(&self) -> Result<String> {
        quick_xml::se::to_string(self).map_err(|e| Error::Encoding(e.to_string()))
    }

    /// Parses a document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if `xml` is not a valid document.
    pub fn from_xml(xml: &str) -> Result<Self> {
        quick_xml::de::from_str(xml).map_err(|e| Error::Encoding(e.to_string()))
    }
}

/// Synthesized audio and its content type, sniffed from the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedSpeech {
    pub audio: Vec<u8>,
    pub content_type: &'static str,
}

impl Client {
    /// Transcribes speech given as mono 16 kHz 16-bit raw PCM.
    ///
    /// The audio is uploaded with chunked transfer encoding.
    pub fn speech_to_text(&self, pcm: Vec<u8>) -> Result<SpeechRecognition> {
        let url = join(&self.endpoints().speech, "/v1/recognize");
        let spec = RequestSpec::post(url, AuthScheme::KakaoAk).with_body(Body::Chunked {
            content_type: PCM_CONTENT_TYPE.to_string(),
            data: pcm,
        });

        let response = self.call(spec)?;
        let chunks = parse_recognition_stream(response.header("content-type"), &response.body)
            .map_err(|e| {
                if self.is_verbose() {
                    tracing::warn!(error = %e, raw_response = %response.text(), "Failed to parse recognition stream");
                }
                e
            })?;
        final_result(chunks, &response.body)
    }

    /// Synthesizes speech from a markup document.
    pub fn text_to_speech(&self, speak: &Speak) -> Result<SynthesizedSpeech> {
        self.text_to_speech_raw(speak.to_xml()?.into_bytes())
    }

    /// Synthesizes speech from hand-written markup, sent verbatim.
    pub fn text_to_speech_raw(&self, ssml: Vec<u8>) -> Result<SynthesizedSpeech> {
        let url = join(&self.endpoints().speech, "/v1/synthesize");
        let spec = RequestSpec::post(url, AuthScheme::KakaoAk).with_body(Body::Bytes {
            content_type: SSML_CONTENT_TYPE.to_string(),
            data: ssml,
        });

        let response = self.call(spec)?;
        let content_type = response.sniffed_mime_type();
        Ok(SynthesizedSpeech {
            audio: response.into_body(),
            content_type,
        })
    }
}
