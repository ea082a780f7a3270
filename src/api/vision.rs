//! Vision: face, product and adult content detection, thumbnails, tags and OCR.
//!
//! Response types default every field, so partially populated results still decode.

use super::ImageSource;
use crate::endpoints::join;
use crate::params::{FileParam, Params};
use crate::{Client, Error, Result};
use serde::{Deserialize, Serialize};

/// A point as `[x, y]`.
pub type Point = [f64; 2];

/// A quadrilateral around a text area, as four `[x, y]` corners.
pub type TextBox = Vec<[i64; 2]>;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DetectedFaces {
    pub rid: String,
    pub result: FaceResult,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FaceResult {
    pub width: u32,
    pub height: u32,
    pub faces: Vec<Face>,
}

/// A detected face. Coordinates are relative to the image size.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Face {
    pub facial_attributes: FacialAttributes,
    pub facial_points: FacialPoints,
    pub score: f64,
    pub class_idx: i64,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FacialAttributes {
    pub gender: Gender,
    pub age: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Gender {
    pub male: f64,
    pub female: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FacialPoints {
    pub jaw: Vec<Point>,
    pub right_eyebrow: Vec<Point>,
    pub left_eyebrow: Vec<Point>,
    pub nose: Vec<Point>,
    pub right_eye: Vec<Point>,
    pub left_eye: Vec<Point>,
    pub lip: Vec<Point>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DetectedNsfw {
    pub rid: String,
    pub result: NsfwScores,
}

/// Probabilities of each content class. They sum to 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NsfwScores {
    pub normal: f64,
    pub soft: f64,
    pub adult: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DetectedProducts {
    pub rid: String,
    pub result: ProductResult,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProductResult {
    pub width: u32,
    pub height: u32,
    pub objects: Vec<Product>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Product {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    #[serde(rename = "class")]
    pub class_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CroppedThumbnail {
    pub thumbnail_image_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SuggestedThumbnail {
    pub rid: String,
    pub result: ThumbnailResult,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ThumbnailResult {
    pub width: u32,
    pub height: u32,
    pub thumbnail: ThumbnailArea,
}

/// The suggested crop, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ThumbnailArea {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneratedTags {
    pub rid: String,
    pub result: TagResult,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TagResult {
    pub label: Vec<String>,
    pub label_kr: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DetectedText {
    pub result: TextDetectionResult,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TextDetectionResult {
    pub boxes: Vec<TextBox>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RecognizedText {
    pub result: TextRecognitionResult,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TextRecognitionResult {
    pub recognition_words: Vec<String>,
}

impl Client {
    /// Detects faces. Faces scoring below `threshold` (0.0 to 1.0) are dropped.
    pub fn detect_face(&self, image: ImageSource, threshold: f64) -> Result<DetectedFaces> {
        let url = join(&self.endpoints().dapi, "/v1/vision/face/detect");
        self.post_params(url, image.into_params().with("threshold", threshold))
    }

    /// Scores an image for adult content.
    pub fn detect_nsfw(&self, image: ImageSource) -> Result<DetectedNsfw> {
        let url = join(&self.endpoints().dapi, "/v1/vision/adult/detect");
        self.post_params(url, image.into_params())
    }

    /// Detects fashion, bag and shoe products.
    pub fn detect_product(&self, image: ImageSource, threshold: f64) -> Result<DetectedProducts> {
        let url = join(&self.endpoints().dapi, "/v1/vision/product/detect");
        self.post_params(url, image.into_params().with("threshold", threshold))
    }

    /// Crops a thumbnail of the given size around the image's point of interest.
    pub fn crop_thumbnail(&self, image: ImageSource, width: u32, height: u32) -> Result<CroppedThumbnail> {
        let url = join(&self.endpoints().dapi, "/v1/vision/thumbnail/crop");
        let params = image.into_params().with("width", width).with("height", height);
        self.post_params(url, params)
    }

    /// Suggests a thumbnail area with the given aspect ratio.
    pub fn suggest_thumbnail(&self, image: ImageSource, width: u32, height: u32) -> Result<SuggestedThumbnail> {
        let url = join(&self.endpoints().dapi, "/v1/vision/thumbnail/detect");
        let params = image.into_params().with("width", width).with("height", height);
        self.post_params(url, params)
    }

    /// Generates descriptive tags in English and Korean.
    pub fn generate_tags(&self, image: ImageSource) -> Result<GeneratedTags> {
        let url = join(&self.endpoints().dapi, "/v1/vision/multitag/generate");
        self.post_params(url, image.into_params())
    }

    /// Finds areas containing text.
    pub fn detect_text(&self, image: FileParam) -> Result<DetectedText> {
        let url = join(&self.endpoints().dapi, "/v1/vision/text/detect");
        self.post_params(url, Params::new().with("file", image))
    }

    /// Reads the text inside `boxes`, usually the output of [`detect_text`](Self::detect_text).
    pub fn recognize_text(&self, image: FileParam, boxes: &[TextBox]) -> Result<RecognizedText> {
        let boxes = boxes
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::Encoding(e.to_string()))?;

        let url = join(&self.endpoints().dapi, "/v1/vision/text/recognize");
        self.post_params(url, Params::new().with("file", image).with("boxes", boxes))
    }
}
