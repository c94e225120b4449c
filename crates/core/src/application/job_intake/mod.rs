// Job Intake Service - Core use case for job submission

pub mod submit;


use crate::domain::{ExchangeTarget, JobSubmission};
use crate::error::Result;
use crate::port::Publisher;
use std::sync::Arc;
use std::time::Duration;

/// Upper bound on declare + publish for one request.
pub const DEFAULT_PUBLISH_TIMEOUT: Duration = Duration::from_secs(5);

/// Job Intake Service
///
/// Holds the injected publisher and the fixed exchange target.
pub struct JobIntakeService {
    publisher: Arc<dyn Publisher>,
    target: ExchangeTarget,
    publish_timeout: Duration,
}

impl JobIntakeService {
    pub fn new(publisher: Arc<dyn Publisher>, target: ExchangeTarget) -> Self {
        Self {
            publisher,
            target,
            publish_timeout: DEFAULT_PUBLISH_TIMEOUT,
        }
    }

    pub fn with_publish_timeout(mut self, publish_timeout: Duration) -> Self {
        self.publish_timeout = publish_timeout;
        self
    }

    pub fn target(&self) -> &ExchangeTarget {
        &self.target
    }

    /// Publish a job to the configured exchange
    pub async fn submit(&self, submission: &JobSubmission) -> Result<()> {
        submit::execute(
            self.publisher.as_ref(),
            &self.target,
            self.publish_timeout,
            submission,
        )
        .await
    }
}
