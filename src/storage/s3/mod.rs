//! Amazon S3 storage backends.
//!
//! All three backends use default credentials from the environment
//! (AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY, or IAM role) and accept
//! an explicit client for testing.

mod analytics_store;
mod job_store;
mod transcript_store;

pub use analytics_store::S3AnalyticsStore;
pub use job_store::S3JobStore;
pub use transcript_store::S3TranscriptStore;
