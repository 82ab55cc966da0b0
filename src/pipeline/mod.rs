//! Response-stage pipeline.
//!
//! # Data Flow
//! ```text
//! proxy handler builds ResponseContext
//!     → ResponsePipeline::run
//!         → stage[0].on_response(ctx, next)
//!             → next.run(ctx) → stage[1] ... → Ok(())
//!     → handler serializes ctx.headers
//! ```
//!
//! # Design Decisions
//! - Built once at startup and shared via Arc; no global chain state
//! - Each stage decides whether and when to call the rest of the chain
//! - A stage error stops the chain; mutations already made are kept

pub mod context;

use std::sync::Arc;

pub use context::ResponseContext;

use crate::headers::HeaderError;

/// Failure raised by a response stage.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("stage `{stage}` failed: {source}")]
    Headers {
        stage: &'static str,
        #[source]
        source: HeaderError,
    },
}

impl StageError {
    pub fn headers(stage: &'static str, source: HeaderError) -> Self {
        StageError::Headers { stage, source }
    }

    /// Name of the stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            StageError::Headers { stage, .. } => stage,
        }
    }
}

/// One link in the response pipeline.
pub trait ResponseStage: Send + Sync {
    /// Short identifier used in logs and errors.
    fn name(&self) -> &'static str;

    /// Process the response, then hand off to `next` (or not).
    fn on_response(&self, ctx: &mut ResponseContext, next: Next<'_>) -> Result<(), StageError>;
}

/// The remaining stages after the current one.
pub struct Next<'a> {
    stages: &'a [Arc<dyn ResponseStage>],
}

impl<'a> Next<'a> {
    /// Run the rest of the chain.
    pub fn run(self, ctx: &mut ResponseContext) -> Result<(), StageError> {
        match self.stages.split_first() {
            Some((stage, rest)) => {
                tracing::trace!(stage = stage.name(), "Entering response stage");
                stage.on_response(ctx, Next { stages: rest })
            }
            None => Ok(()),
        }
    }
}

/// Ordered, immutable list of response stages.
#[derive(Clone, Default)]
pub struct ResponsePipeline {
    stages: Vec<Arc<dyn ResponseStage>>,
}

impl ResponsePipeline {
    pub fn builder() -> ResponsePipelineBuilder {
        ResponsePipelineBuilder::default()
    }

    /// Run every stage against `ctx`.
    pub fn run(&self, ctx: &mut ResponseContext) -> Result<(), StageError> {
        Next {
            stages: &self.stages,
        }
        .run(ctx)
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }
}

/// Builder for [`ResponsePipeline`].
#[derive(Default)]
pub struct ResponsePipelineBuilder {
    stages: Vec<Arc<dyn ResponseStage>>,
}

impl ResponsePipelineBuilder {
    /// Append a stage; stages run in the order they are added.
    pub fn stage<S: ResponseStage + 'static>(mut self, stage: S) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    pub fn build(self) -> ResponsePipeline {
        ResponsePipeline {
            stages: self.stages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::{set_or_clear, HeaderList, HeaderListLimits};

    struct Tag(&'static str);

    impl ResponseStage for Tag {
        fn name(&self) -> &'static str {
            self.0
        }

        fn on_response(&self, ctx: &mut ResponseContext, next: Next<'_>) -> Result<(), StageError> {
            let trail = match ctx.headers.get("x-trail") {
                Some(t) => format!("{t},{}", self.0),
                None => self.0.to_string(),
            };
            set_or_clear(&mut ctx.headers, "X-Trail", &trail)
                .map_err(|e| StageError::headers(self.0, e))?;
            next.run(ctx)
        }
    }

    struct ShortCircuit;

    impl ResponseStage for ShortCircuit {
        fn name(&self) -> &'static str {
            "short-circuit"
        }

        fn on_response(&self, _ctx: &mut ResponseContext, _next: Next<'_>) -> Result<(), StageError> {
            Ok(())
        }
    }

    #[test]
    fn stages_run_in_order() {
        let pipeline = ResponsePipeline::builder()
            .stage(Tag("a"))
            .stage(Tag("b"))
            .build();
        let mut ctx = ResponseContext::for_test(200, "http", "text/html");

        pipeline.run(&mut ctx).unwrap();

        assert_eq!(ctx.headers.get("x-trail"), Some("a,b"));
        assert_eq!(pipeline.stage_names(), ["a", "b"]);
    }

    #[test]
    fn stage_can_stop_the_chain() {
        let pipeline = ResponsePipeline::builder()
            .stage(Tag("a"))
            .stage(ShortCircuit)
            .stage(Tag("c"))
            .build();
        let mut ctx = ResponseContext::for_test(200, "http", "text/html");

        pipeline.run(&mut ctx).unwrap();

        assert_eq!(ctx.headers.get("x-trail"), Some("a"));
    }

    #[test]
    fn failure_keeps_earlier_mutations() {
        let pipeline = ResponsePipeline::builder()
            .stage(Tag("a"))
            .stage(Tag("b"))
            .build();
        let mut ctx = ResponseContext::for_test(200, "http", "text/html");
        ctx.headers = HeaderList::with_limits(HeaderListLimits {
            part_size: 4,
            max_entries: Some(1),
        });
        set_or_clear(&mut ctx.headers, "Vary", "Accept").unwrap();

        let err = pipeline.run(&mut ctx).unwrap_err();
        assert_eq!(err.stage(), "a");
        assert_eq!(ctx.headers.get("vary"), Some("Accept"));
    }

    #[test]
    fn stage_error_names_stage_and_keeps_source() {
        let err = StageError::headers("tag", HeaderError::LimitReached { limit: 3 });

        assert_eq!(err.stage(), "tag");
        assert_eq!(err.to_string(), "stage `tag` failed: header list is full (3 entries)");
        let source = std::error::Error::source(&err)
            .and_then(|s| s.downcast_ref::<HeaderError>())
            .unwrap();
        assert_eq!(source, &HeaderError::LimitReached { limit: 3 });
    }

    #[test]
    fn empty_pipeline_is_a_no_op() {
        let pipeline = ResponsePipeline::default();
        let mut ctx = ResponseContext::for_test(204, "http", "");
        pipeline.run(&mut ctx).unwrap();
        assert!(ctx.headers.is_empty());
    }
}
