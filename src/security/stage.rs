//! Pipeline stage wrapping the security header policy.

use crate::observability::metrics;
use crate::pipeline::{Next, ResponseContext, ResponseStage, StageError};
use crate::security::policy;

/// Applies the matched route's security settings, then continues the chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecurityHeadersStage;

impl SecurityHeadersStage {
    pub const NAME: &'static str = "security-headers";
}

impl ResponseStage for SecurityHeadersStage {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn on_response(&self, ctx: &mut ResponseContext, next: Next<'_>) -> Result<(), StageError> {
        let settings = ctx.settings.clone();
        let report =
            policy::apply(&settings, ctx).map_err(|e| StageError::headers(Self::NAME, e))?;

        tracing::debug!(
            status = ctx.status,
            set = report.set,
            suppressed = report.suppressed,
            collapsed = report.collapsed,
            "Security headers applied"
        );
        metrics::record_policy(&report);

        next.run(ctx)
    }
}
