//! Generation dispatcher.
//!
//! Runs one request end to end:
//! 1. Parse and validate the configuration
//! 2. Pre-process (trend expansion, variation specs)
//! 3. Dispatch units of work sequentially (N images or one video)
//! 4. Report exactly one result or error, then a final 100% status
//!
//! A configuration error skips straight to a single error event.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};
use vstudio_genai::{GenerationClient, ImageInput, ImageRequest, VideoRequest};
use vstudio_models::{
    ClipDuration, GenerationMode, GenerationRequest, ImageOptions, ImageResultMetadata,
    ModeOptions, ReferenceTag, ResultMetadata, ResultPayload, VideoOptions, VideoResultMetadata,
    MAX_ANCHOR_IMAGES,
};
use vstudio_prompt::{
    build_image_prompt, build_variant_prompt, build_video_prompt, variants_needed,
    ImagePromptParams, VideoPromptParams,
};

use crate::attachments::Attachments;
use crate::error::{PipelineError, PipelineResult};
use crate::metrics::{record_config_error, record_request, record_unit};
use crate::progress::ProgressSender;
use crate::store::AssetStore;
use crate::trend::resolve_trend;
use crate::variation::generate_variation_specs;

/// Dispatch stages. Strictly forward; no stage is revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DispatchStage {
    Init,
    ParseConfig,
    PreProcess,
    DispatchLoop,
    Finalize,
    Closed,
}

impl DispatchStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchStage::Init => "init",
            DispatchStage::ParseConfig => "parse_config",
            DispatchStage::PreProcess => "pre_process",
            DispatchStage::DispatchLoop => "dispatch_loop",
            DispatchStage::Finalize => "finalize",
            DispatchStage::Closed => "closed",
        }
    }
}

impl fmt::Display for DispatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A result event was sent.
    Completed { assets: usize },
    /// A unit of work failed; an error event was sent.
    Failed { message: String, stage: DispatchStage },
    /// The configuration was rejected before any work started.
    Rejected { message: String },
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DispatchOutcome::Completed { .. })
    }
}

/// Forward-only stage tracker for one request.
#[derive(Debug)]
struct StageTracker {
    stage: DispatchStage,
}

impl StageTracker {
    fn new() -> Self {
        Self {
            stage: DispatchStage::Init,
        }
    }

    fn advance(&mut self, next: DispatchStage) {
        debug_assert!(next > self.stage, "dispatch stage went backwards");
        debug!(from = %self.stage, to = %next, "Dispatch stage");
        self.stage = next;
    }

    fn current(&self) -> DispatchStage {
        self.stage
    }
}

/// Executes generation requests against a client and an asset store.
#[derive(Clone)]
pub struct Dispatcher {
    client: Arc<dyn GenerationClient>,
    store: Arc<dyn AssetStore>,
}

impl Dispatcher {
    pub fn new(client: Arc<dyn GenerationClient>, store: Arc<dyn AssetStore>) -> Self {
        Self { client, store }
    }

    /// Parse the raw `config` payload and run the request.
    ///
    /// The progress channel is closed when this returns.
    pub async fn dispatch(
        &self,
        raw_config: Option<&str>,
        attachments: Attachments,
        progress: ProgressSender,
    ) -> DispatchOutcome {
        let mut stages = StageTracker::new();
        stages.advance(DispatchStage::ParseConfig);

        match GenerationRequest::from_json(raw_config.unwrap_or_default()) {
            Ok(request) => self.execute(request, attachments, progress, stages).await,
            Err(e) => reject(PipelineError::from(e), progress).await,
        }
    }

    async fn execute(
        &self,
        request: GenerationRequest,
        attachments: Attachments,
        mut progress: ProgressSender,
        mut stages: StageTracker,
    ) -> DispatchOutcome {
        let mode = request.mode();
        record_request(mode.as_str());
        info!(
            mode = %mode,
            aspect_ratio = %request.aspect_ratio,
            trend = request.trend.identifier(),
            "Starting generation"
        );

        let result = match &request.options {
            ModeOptions::Image(options) => {
                self.run_image(&request, options, &attachments, &mut progress, &mut stages)
                    .await
            }
            ModeOptions::Video(options) => {
                self.run_video(&request, options, &attachments, &mut progress, &mut stages)
                    .await
            }
        };

        let outcome = match result {
            Ok((payload, metadata)) => {
                let assets = payload.len();
                progress.result(payload, metadata).await;
                info!(mode = %mode, assets, "Generation complete");
                DispatchOutcome::Completed { assets }
            }
            Err(e) => {
                let message = e.user_message();
                error!(mode = %mode, stage = %stages.current(), error = %e, "Generation failed");
                progress.error(message.clone()).await;
                DispatchOutcome::Failed {
                    message,
                    stage: stages.current(),
                }
            }
        };

        if stages.current() < DispatchStage::Finalize {
            stages.advance(DispatchStage::Finalize);
        }
        progress.status("Done", 100).await;
        stages.advance(DispatchStage::Closed);
        outcome
    }

    async fn run_image(
        &self,
        request: &GenerationRequest,
        options: &ImageOptions,
        attachments: &Attachments,
        progress: &mut ProgressSender,
        stages: &mut StageTracker,
    ) -> PipelineResult<(ResultPayload, ResultMetadata)> {
        let references = &attachments.product_images;
        let moodboard = attachments.moodboard_images();
        if options.moodboard_image_count != moodboard.len() {
            warn!(
                configured = options.moodboard_image_count,
                attached = moodboard.len(),
                "Moodboard count does not match attachments, using attachments"
            );
        }

        stages.advance(DispatchStage::PreProcess);
        progress.status("Preparing image generation", 5).await;

        progress.status("Resolving creative trend", 10).await;
        let trend_text = resolve_trend(self.client.as_ref(), &request.trend, GenerationMode::Image).await;

        let params = ImagePromptParams {
            reference_interaction: options.reference_interaction.as_deref(),
            reference_image_count: references.len(),
            trend_text: trend_text.as_deref(),
            brand: &request.brand,
            moodboard_image_count: moodboard.len(),
            aspect_ratio: request.aspect_ratio,
        };
        let base_prompt = build_image_prompt(&params);

        let specs = if variants_needed(options.variant_count, &options.variance_factors) > 0 {
            progress.status("Planning variations", 15).await;
            generate_variation_specs(
                self.client.as_ref(),
                &base_prompt,
                &request.brand,
                &options.variance_factors,
                options.variant_count,
            )
            .await
        } else {
            Vec::new()
        };

        stages.advance(DispatchStage::DispatchLoop);
        let images: Vec<ImageInput> = references.iter().chain(moodboard).cloned().collect();
        let total = usize::from(options.variant_count.max(1));
        let mut assets = Vec::with_capacity(total);

        for i in 0..total {
            let percent = 25 + (i * 60 / total) as u8;
            progress
                .status(format!("Generating image {} of {}", i + 1, total), percent)
                .await;

            let prompt = if i == 0 {
                base_prompt.clone()
            } else {
                build_variant_prompt(&params, i + 1, specs.get(i - 1))
            };

            let started = Instant::now();
            let media = self
                .client
                .generate_image(ImageRequest {
                    prompt,
                    reference_images: images.clone(),
                    aspect_ratio: request.aspect_ratio,
                    count: 1,
                })
                .await
                .map_err(|e| {
                    record_unit("image", "failed", started.elapsed().as_secs_f64());
                    warn!(variant = i + 1, total, error = %e, "Image variant failed, aborting batch");
                    PipelineError::ImageGeneration(e)
                })?;

            let asset = self.store.save(&media).await?;
            record_unit("image", "succeeded", started.elapsed().as_secs_f64());
            debug!(variant = i + 1, file = %asset.file_name, "Image variant stored");
            assets.push(asset);
        }

        stages.advance(DispatchStage::Finalize);
        let metadata = ResultMetadata::Image(ImageResultMetadata {
            aspect_ratio: request.aspect_ratio.to_string(),
            count: options.variant_count,
            trend: request.trend.identifier().to_string(),
        });
        Ok((ResultPayload::from_assets(assets), metadata))
    }

    async fn run_video(
        &self,
        request: &GenerationRequest,
        options: &VideoOptions,
        attachments: &Attachments,
        progress: &mut ProgressSender,
        stages: &mut StageTracker,
    ) -> PipelineResult<(ResultPayload, ResultMetadata)> {
        if attachments.anchor_images.len() > MAX_ANCHOR_IMAGES {
            warn!(
                attached = attachments.anchor_images.len(),
                max = MAX_ANCHOR_IMAGES,
                "Too many anchor images, extra images ignored"
            );
        }
        let anchors: Vec<ImageInput> = attachments
            .anchor_images
            .iter()
            .take(MAX_ANCHOR_IMAGES)
            .cloned()
            .collect();

        let has_anchors = !anchors.is_empty();
        let requested = match &options.requested_duration {
            Some(raw) if has_anchors => {
                if raw.to_clip().ok() != Some(ClipDuration::MAX) {
                    info!(requested = %raw, effective = %ClipDuration::MAX, "Duration locked by anchor images");
                }
                None
            }
            Some(raw) => match raw.to_clip() {
                Ok(duration) => Some(duration),
                Err(e) => {
                    warn!(
                        requested = %raw,
                        error = %e,
                        fallback = %ClipDuration::DEFAULT,
                        "Unsupported duration requested, using default"
                    );
                    None
                }
            },
            None => None,
        };
        let duration = ClipDuration::resolve(has_anchors, requested);

        if !options.references.is_empty() && options.references.len() != anchors.len() {
            warn!(
                tagged = options.references.len(),
                attached = anchors.len(),
                "Reference tags do not match anchor images"
            );
        }
        let references: Vec<ReferenceTag> = (0..anchors.len())
            .map(|i| options.references.get(i).cloned().unwrap_or_default())
            .collect();

        stages.advance(DispatchStage::PreProcess);
        progress.status("Preparing video generation", 5).await;

        progress.status("Resolving creative trend", 10).await;
        let trend_text = resolve_trend(self.client.as_ref(), &request.trend, GenerationMode::Video).await;

        let prompt = build_video_prompt(&VideoPromptParams {
            references: &references,
            trend_text: trend_text.as_deref(),
            brand: &request.brand,
            narrative: &options.narrative,
            narrative_template: options.narrative_template.as_deref(),
            duration,
            aspect_ratio: request.aspect_ratio,
        });

        stages.advance(DispatchStage::DispatchLoop);
        progress
            .status(format!("Generating {} video, this can take a few minutes", duration), 25)
            .await;

        let has_reference_images = has_anchors;
        let started = Instant::now();
        let media = self
            .client
            .generate_video(VideoRequest {
                prompt,
                anchor_images: anchors,
                duration,
                aspect_ratio: request.aspect_ratio,
            })
            .await
            .map_err(|e| {
                record_unit("video", "failed", started.elapsed().as_secs_f64());
                PipelineError::VideoGeneration(e)
            })?;

        progress.status("Saving video", 90).await;
        let asset = self.store.save(&media).await?;
        record_unit("video", "succeeded", started.elapsed().as_secs_f64());

        stages.advance(DispatchStage::Finalize);
        let metadata = ResultMetadata::Video(VideoResultMetadata {
            trend: request.trend.identifier().to_string(),
            duration: duration.to_string(),
            aspect_ratio: request.aspect_ratio.to_string(),
            has_reference_images,
        });
        Ok((ResultPayload::Single(asset), metadata))
    }
}

async fn reject(error: PipelineError, progress: ProgressSender) -> DispatchOutcome {
    record_config_error();
    let message = error.user_message();
    warn!(error = %error, "Rejected generation request");
    progress.error(message.clone()).await;
    DispatchOutcome::Rejected { message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        assert!(DispatchStage::Init < DispatchStage::ParseConfig);
        assert!(DispatchStage::DispatchLoop < DispatchStage::Finalize);
        assert_eq!(DispatchStage::PreProcess.to_string(), "pre_process");
    }

    #[test]
    fn test_tracker_advances() {
        let mut stages = StageTracker::new();
        stages.advance(DispatchStage::ParseConfig);
        stages.advance(DispatchStage::DispatchLoop);
        assert_eq!(stages.current(), DispatchStage::DispatchLoop);
    }
}
