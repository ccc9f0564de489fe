//! Generation endpoint: multipart in, server-sent progress events out.

use std::convert::Infallible;

use axum::extract::multipart::Field;
use axum::extract::{Multipart, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::Stream;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};
use uuid::Uuid;
use vstudio_genai::ImageInput;
use vstudio_models::ProgressEvent;
use vstudio_pipeline::{progress_channel, AttachmentKey, Attachments};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Name of the multipart field carrying the JSON configuration.
pub const CONFIG_FIELD: &str = "config";

/// MIME type assumed for uploads that do not declare one.
const DEFAULT_IMAGE_MIME: &str = "image/png";

/// Everything read from one generation form.
#[derive(Debug, Default)]
pub struct GenerationUpload {
    pub config: Option<String>,
    pub attachments: Attachments,
}

/// Start a generation and stream its progress.
///
/// Configuration problems are reported inside the stream as a single error
/// event, so the response is `200 text/event-stream` whenever the form itself
/// could be read.
pub async fn generate(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let upload = read_upload(multipart).await?;
    let request_id = Uuid::new_v4();

    info!(
        request_id = %request_id,
        product_images = upload.attachments.product_images.len(),
        anchor_images = upload.attachments.anchor_images.len(),
        look_and_feel = upload.attachments.look_and_feel.is_some(),
        "Generation request received"
    );

    let (sender, receiver) = progress_channel(state.config.sse_buffer);
    let dispatcher = state.dispatcher.clone();

    tokio::spawn(async move {
        let outcome = dispatcher
            .dispatch(upload.config.as_deref(), upload.attachments, sender)
            .await;
        if outcome.is_success() {
            info!(request_id = %request_id, "Generation finished");
        } else {
            warn!(request_id = %request_id, outcome = ?outcome, "Generation did not complete");
        }
    });

    metrics::record_sse_stream();
    let stream = receiver.into_stream().map(|event| Ok::<_, Infallible>(to_sse_event(&event)));

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// Render one progress event as an SSE `data:` frame.
pub fn to_sse_event(event: &ProgressEvent) -> Event {
    Event::default().json_data(event).unwrap_or_else(|e| {
        warn!(error = %e, kind = event.kind(), "Failed to serialize progress event");
        Event::default().comment("unserializable progress event")
    })
}

/// Read the `config` field and every recognised image field.
///
/// Unknown fields are skipped. Image order follows the numeric suffix of
/// the field name, not arrival order.
pub async fn read_upload(mut multipart: Multipart) -> ApiResult<GenerationUpload> {
    let mut config = None;
    let mut keyed = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == CONFIG_FIELD {
            let text = field
                .text()
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?;
            config = Some(text);
            continue;
        }

        match name.parse::<AttachmentKey>() {
            Ok(key) => {
                if let Some(image) = read_image(field).await? {
                    keyed.push((key, image));
                } else {
                    debug!(field = %name, "Skipping empty upload");
                }
            }
            Err(()) => debug!(field = %name, "Ignoring unknown form field"),
        }
    }

    let attachments = Attachments::from_keyed(keyed);
    metrics::record_uploaded_images("product", attachments.product_images.len());
    metrics::record_uploaded_images("anchor", attachments.anchor_images.len());
    if attachments.look_and_feel.is_some() {
        metrics::record_uploaded_images("look_and_feel", 1);
    }

    Ok(GenerationUpload { config, attachments })
}

async fn read_image(field: Field<'_>) -> ApiResult<Option<ImageInput>> {
    let mime_type = field
        .content_type()
        .filter(|ct| !ct.is_empty() && *ct != "application/octet-stream")
        .unwrap_or(DEFAULT_IMAGE_MIME)
        .to_string();

    let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?;

    if bytes.is_empty() {
        return Ok(None);
    }
    Ok(Some(ImageInput::new(bytes.to_vec(), mime_type)))
}

