//! Pose estimation for images and videos.
//!
//! Video analysis is a job: [`Client::analyze_pose_from_video_url`] submits it and
//! [`Client::retrieve_pose_video_analysis`] fetches its current state once. Polling is
//! left to the caller.

use super::ImageSource;
use crate::endpoints::join;
use crate::params::Params;
use crate::request::{AuthScheme, RequestSpec};
use crate::{Client, Error, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// One detected person.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DetectedPose {
    pub area: f64,
    /// `[x, y, width, height]`
    pub bbox: Vec<f64>,
    pub category_id: i64,
    /// Flattened `[x, y, score]` triples, one per keypoint.
    pub keypoints: Vec<f64>,
    pub score: f64,
}

impl DetectedPose {
    /// Keypoints as `(x, y, score)` triples.
    pub fn keypoint_triples(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.keypoints.chunks_exact(3).map(|k| (k[0], k[1], k[2]))
    }
}

/// People found in an image.
pub type AnalyzedPoses = Vec<DetectedPose>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PoseJobRequested {
    pub job_id: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PoseJobStatus {
    Waiting,
    Processing,
    Success,
    Failed,
    #[serde(rename = "not found", alias = "not_found")]
    NotFound,
    #[default]
    #[serde(other)]
    Unknown,
}

impl PoseJobStatus {
    /// Whether the job will not change state anymore.
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            PoseJobStatus::Success | PoseJobStatus::Failed | PoseJobStatus::NotFound
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PoseVideoAnalysis {
    pub job_id: String,
    pub status: PoseJobStatus,
    pub description: Option<String>,
    pub annotations: Vec<FrameAnnotation>,
    pub categories: Vec<PoseCategory>,
    pub info: Option<VideoInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FrameAnnotation {
    pub frame_num: u64,
    pub objects: Vec<DetectedPose>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PoseCategory {
    pub id: i64,
    pub name: String,
    pub supercategory: String,
    pub keypoints: Vec<String>,
    /// Pairs of 1-based keypoint indices.
    pub skeleton: Vec<[u32; 2]>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct VideoInfo {
    pub video: VideoMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub frame_num: u64,
    pub fps: f64,
}

impl Client {
    /// Estimates the poses of people in an image.
    pub fn analyze_pose(&self, image: ImageSource) -> Result<AnalyzedPoses> {
        let url = join(&self.endpoints().pose, "/pose");
        self.post_params(url, image.into_params())
    }

    /// Submits a video for pose analysis.
    ///
    /// `callback_url` is only sent when non-empty; the service calls it when the job ends.
    pub fn analyze_pose_from_video_url(
        &self,
        video_url: &str,
        smoothing: bool,
        callback_url: Option<&str>,
    ) -> Result<PoseJobRequested> {
        let url = join(&self.endpoints().pose, "/pose/job");
        let params = Params::new()
            .with("video_url", video_url)
            .with("smoothing", smoothing)
            .with_opt("callback_url", callback_url.filter(|u| !u.is_empty()));
        self.post_params(url, params)
    }

    /// Fetches the current state of a video analysis job.
    pub fn retrieve_pose_video_analysis(&self, job_id: &str) -> Result<PoseVideoAnalysis> {
        let url = job_url(&self.endpoints().pose, job_id)?;
        self.call_json(RequestSpec::get(url, AuthScheme::KakaoAk))
    }
}

/// `{base}/pose/job/{job_id}`, with the id percent-encoded as one path segment.
fn job_url(base: &str, job_id: &str) -> Result<String> {
    let mut url = Url::parse(&join(base, "/pose/job"))?;
    url.path_segments_mut()
        .map_err(|_| Error::Configuration(format!("invalid pose base URL: {}", base)))?
        .push(job_id);
    Ok(url.into())
}
