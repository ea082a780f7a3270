//! Base URLs of the service families.

/// KoGPT text generation.
pub const API_BASE_URL_KOGPT: &str = "https://api.kakaobrain.com/v1/inference/kogpt";
/// Karlo image generation.
pub const API_BASE_URL_KARLO: &str = "https://api.kakaobrain.com/v2/inference/karlo";
/// Vision and translation.
pub const API_BASE_URL_DAPI: &str = "https://dapi.kakao.com";
/// Pose estimation.
pub const API_BASE_URL_POSE: &str = "https://cv-api.kakaobrain.com";
/// Speech recognition and synthesis.
pub const API_BASE_URL_SPEECH: &str = "https://kakaoi-newtone-openapi.kakao.com";

/// Base URL per service family.
///
/// Defaults to the production hosts. Override for proxies or test servers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub kogpt: String,
    pub karlo: String,
    pub dapi: String,
    pub pose: String,
    pub speech: String,
}

impl Endpoints {
    /// Points every family at `origin`, keeping the families' path prefixes.
    ///
    /// # Examples
    ///
    /// ```
    /// use kakao_api::Endpoints;
    ///
    /// let endpoints = Endpoints::rooted_at("http://127.0.0.1:8080/");
    /// assert_eq!(endpoints.karlo, "http://127.0.0.1:8080/v2/inference/karlo");
    /// assert_eq!(endpoints.dapi, "http://127.0.0.1:8080");
    /// ```
    pub fn rooted_at(origin: &str) -> Self {
        let origin = origin.trim_end_matches('/');
        Self {
            kogpt: format!("{origin}/v1/inference/kogpt"),
            karlo: format!("{origin}/v2/inference/karlo"),
            dapi: origin.to_string(),
            pose: origin.to_string(),
            speech: origin.to_string(),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            kogpt: API_BASE_URL_KOGPT.to_string(),
            karlo: API_BASE_URL_KARLO.to_string(),
            dapi: API_BASE_URL_DAPI.to_string(),
            pose: API_BASE_URL_POSE.to_string(),
            speech: API_BASE_URL_SPEECH.to_string(),
        }
    }
}

/// Joins a family base URL and an endpoint path.
pub(crate) fn join(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}
