//! Generation pipeline for the VStudio backend.
//!
//! This crate provides:
//! - The [`Dispatcher`], which runs one request end to end
//! - The progress channel the dispatcher reports through
//! - Trend expansion and variation spec generation on top of the text model
//! - Storage for generated media

pub mod attachments;
pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod progress;
pub mod store;
pub mod trend;
pub mod variation;

pub use attachments::{AttachmentKey, Attachments};
pub use dispatcher::{DispatchOutcome, DispatchStage, Dispatcher};
pub use error::{PipelineError, PipelineResult};
pub use progress::{channel as progress_channel, ProgressReceiver, ProgressSender};
pub use store::{AssetStore, LocalAssetStore};
pub use trend::resolve_trend;
pub use variation::generate_variation_specs;
