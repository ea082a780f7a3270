//! Text generation (KoGPT) and image generation (Karlo).

use crate::endpoints::join;
use crate::params::Params;
use crate::{util, Client, Result};
use serde::{Deserialize, Serialize};

/// Parameters for [`Client::generate_texts`].
///
/// # Examples
///
/// ```
/// use kakao_api::api::inference::TextGenerationParams;
///
/// let params = TextGenerationParams::new("오늘 아침 하늘은", 32)
///     .with_temperature(0.7)
///     .with_n(2);
/// assert_eq!(params.n, Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextGenerationParams {
    pub prompt: String,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
}

impl TextGenerationParams {
    pub fn new(prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens,
            temperature: None,
            top_p: None,
            n: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Number of results to generate.
    pub fn with_n(mut self, n: u32) -> Self {
        self.n = Some(n);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GeneratedTexts {
    pub id: String,
    pub generations: Vec<Generation>,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Generation {
    pub text: String,
    pub tokens: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub generated_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Webp,
    Jpeg,
    Png,
}

/// How generated images are returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImageReturnType {
    #[serde(rename = "url")]
    Url,
    #[serde(rename = "base64_string")]
    Base64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImageDecodeScheduler {
    #[serde(rename = "decoder_ddim_v_prediction")]
    Ddim,
    #[serde(rename = "decoder_ddpm_v_prediction")]
    Ddpm,
}

/// Options shared by image generation and image variation.
///
/// Unset options are left out of the request so the service defaults apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImageOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upscale: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_format: Option<ImageFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_quality: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub samples: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<ImageReturnType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_inference_steps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance_scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduler: Option<ImageDecodeScheduler>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nsfw_checker: Option<bool>,
}

impl ImageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_negative_prompt(mut self, negative_prompt: impl Into<String>) -> Self {
        self.negative_prompt = Some(negative_prompt.into());
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_upscale(mut self, upscale: bool, scale: u32) -> Self {
        self.upscale = Some(upscale);
        self.scale = Some(scale);
        self
    }

    pub fn with_image_format(mut self, format: ImageFormat) -> Self {
        self.image_format = Some(format);
        self
    }

    pub fn with_image_quality(mut self, quality: u32) -> Self {
        self.image_quality = Some(quality);
        self
    }

    pub fn with_samples(mut self, samples: u32) -> Self {
        self.samples = Some(samples);
        self
    }

    pub fn with_return_type(mut self, return_type: ImageReturnType) -> Self {
        self.return_type = Some(return_type);
        self
    }

    pub fn with_num_inference_steps(mut self, steps: u32) -> Self {
        self.num_inference_steps = Some(steps);
        self
    }

    pub fn with_guidance_scale(mut self, scale: f64) -> Self {
        self.guidance_scale = Some(scale);
        self
    }

    pub fn with_scheduler(mut self, scheduler: ImageDecodeScheduler) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// One seed per sample.
    pub fn with_seed(mut self, seed: Vec<i64>) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_nsfw_checker(mut self, enabled: bool) -> Self {
        self.nsfw_checker = Some(enabled);
        self
    }
}

/// Parameters for [`Client::generate_images`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageGenerationParams {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prior_num_inference_steps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prior_guidance_scale: Option<f64>,
    #[serde(flatten)]
    pub options: ImageOptions,
}

impl ImageGenerationParams {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            prior_num_inference_steps: None,
            prior_guidance_scale: None,
            options: ImageOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ImageOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_prior_num_inference_steps(mut self, steps: u32) -> Self {
        self.prior_num_inference_steps = Some(steps);
        self
    }

    pub fn with_prior_guidance_scale(mut self, scale: f64) -> Self {
        self.prior_guidance_scale = Some(scale);
        self
    }
}

/// Parameters for [`Client::vary_image`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageVariationParams {
    /// The source image, base64-encoded.
    pub image: String,
    pub prompt: String,
    #[serde(flatten)]
    pub options: ImageOptions,
}

impl ImageVariationParams {
    pub fn new(base64_image: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            image: base64_image.into(),
            prompt: prompt.into(),
            options: ImageOptions::default(),
        }
    }

    /// Encodes raw image bytes as the source image.
    pub fn from_image_bytes(bytes: &[u8], prompt: impl Into<String>) -> Self {
        Self::new(util::encode_base64(bytes), prompt)
    }

    pub fn with_options(mut self, options: ImageOptions) -> Self {
        self.options = options;
        self
    }
}

/// Parameters for [`Client::upscale_images`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageUpscaleParams {
    /// Base64-encoded images.
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_format: Option<ImageFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_quality: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<ImageReturnType>,
}

impl ImageUpscaleParams {
    pub fn new(base64_images: Vec<String>) -> Self {
        Self {
            images: base64_images,
            scale: None,
            image_format: None,
            image_quality: None,
            return_type: None,
        }
    }

    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_image_format(mut self, format: ImageFormat) -> Self {
        self.image_format = Some(format);
        self
    }

    pub fn with_image_quality(mut self, quality: u32) -> Self {
        self.image_quality = Some(quality);
        self
    }

    pub fn with_return_type(mut self, return_type: ImageReturnType) -> Self {
        self.return_type = Some(return_type);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GeneratedImages {
    pub id: String,
    #[serde(default)]
    pub model_version: String,
    pub images: Vec<GeneratedImage>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GeneratedImage {
    pub id: String,
    pub seed: i64,
    /// A URL or a base64 string, depending on the requested return type.
    pub image: String,
    #[serde(default)]
    pub nsfw_content_detected: Option<bool>,
    #[serde(default)]
    pub nsfw_score: Option<f64>,
}

impl GeneratedImage {
    /// Decodes `image` when it was returned as a base64 string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Base64`](crate::Error::Base64) if `image` is not base64.
    pub fn decode_image(&self) -> Result<Vec<u8>> {
        util::decode_base64(&self.image)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UpscaledImages {
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NsfwResults {
    pub id: String,
    #[serde(default)]
    pub model_version: String,
    pub results: Vec<NsfwResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct NsfwResult {
    pub nsfw_content_detected: bool,
    pub nsfw_score: f64,
}

impl Client {
    /// Generates texts continuing `params.prompt` with KoGPT.
    pub fn generate_texts(&self, params: TextGenerationParams) -> Result<GeneratedTexts> {
        let url = join(&self.endpoints().kogpt, "/generation");
        self.post_params(url, Params::from_serializable(&params)?)
    }

    /// Generates images from a text prompt with Karlo.
    pub fn generate_images(&self, params: ImageGenerationParams) -> Result<GeneratedImages> {
        let url = join(&self.endpoints().karlo, "/t2i");
        self.post_params(url, Params::from_serializable(&params)?)
    }

    /// Upscales base64-encoded images.
    pub fn upscale_images(&self, params: ImageUpscaleParams) -> Result<UpscaledImages> {
        let url = join(&self.endpoints().karlo, "/upscale");
        self.post_params(url, Params::from_serializable(&params)?)
    }

    /// Generates variations of a base64-encoded image.
    pub fn vary_image(&self, params: ImageVariationParams) -> Result<GeneratedImages> {
        let url = join(&self.endpoints().karlo, "/variations");
        self.post_params(url, Params::from_serializable(&params)?)
    }

    /// Scores base64-encoded images for NSFW content.
    pub fn check_nsfw(&self, base64_images: Vec<String>) -> Result<NsfwResults> {
        let url = join(&self.endpoints().karlo, "/nsfw_checker");
        self.post_params(url, Params::new().with("images", base64_images))
    }
}
