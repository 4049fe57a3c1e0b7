//! Justification generation for a whole case
//!
//! One request per agent. With an external service configured, requests run
//! with bounded concurrency and a per-call timeout; any failure falls back to
//! a template sentence for that agent and is only logged.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use kitty_allocator::{RawAllocation, WeightConfig};
use kitty_common::SalesAgent;
use tracing::{instrument, warn};

use crate::selection::{select, JustificationRequest};
use crate::service::{GenerationError, JustificationService};
use crate::templates::TemplateJustifier;

/// Where a justification came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JustificationSource {
    External,
    Template,
}

/// Text for one agent
#[derive(Debug, Clone, PartialEq)]
pub struct Justification {
    pub text: String,
    pub source: JustificationSource,
}

/// Generator settings
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    /// Allocation share at or above which the tone is praising
    pub threshold: f64,
    /// Per-call timeout of the external service
    pub timeout: Duration,
    /// Maximum external calls in flight
    pub concurrency: usize,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            threshold: kitty_common::DEFAULT_JUSTIFICATION_THRESHOLD,
            timeout: Duration::from_millis(crate::DEFAULT_TIMEOUT_MS),
            concurrency: crate::DEFAULT_CONCURRENCY,
        }
    }
}

/// Produces one justification per agent
pub struct JustificationGenerator {
    external: Option<Arc<dyn JustificationService>>,
    templates: TemplateJustifier,
    settings: GeneratorSettings,
}

impl JustificationGenerator {
    /// Templates only
    pub fn templates(templates: TemplateJustifier, settings: GeneratorSettings) -> Self {
        Self {
            external: None,
            templates,
            settings,
        }
    }

    /// External service first, templates on failure
    pub fn external(
        service: Arc<dyn JustificationService>,
        templates: TemplateJustifier,
        settings: GeneratorSettings,
    ) -> Self {
        Self {
            external: Some(service),
            templates,
            settings,
        }
    }

    /// Justify every agent; output order matches `agents`
    ///
    /// `allocations[i]` must belong to `agents[i]`.
    #[instrument(skip_all, fields(agents = agents.len()))]
    pub async fn justify_all(
        &self,
        agents: &[SalesAgent],
        allocations: &[RawAllocation],
        weights: &WeightConfig,
        kitty: f64,
    ) -> Vec<Justification> {
        let requests: Vec<JustificationRequest> = agents
            .iter()
            .zip(allocations)
            .map(|(agent, allocation)| {
                select(agent, weights, allocation.amount, kitty, self.settings.threshold)
            })
            .collect();

        stream::iter(requests.iter().map(|request| self.justify(request)))
            .buffered(self.settings.concurrency.max(1))
            .collect()
            .await
    }

    /// Justify a single agent, never failing
    pub async fn justify(&self, request: &JustificationRequest) -> Justification {
        if let Some(service) = &self.external {
            match self.call(service.as_ref(), request).await {
                Ok(text) => {
                    return Justification {
                        text,
                        source: JustificationSource::External,
                    }
                }
                Err(err) => {
                    warn!(
                        agent = %request.agent,
                        service = service.name(),
                        error = %err,
                        "Text generation failed, falling back to templates"
                    );
                }
            }
        }

        Justification {
            text: self.templates.render(request),
            source: JustificationSource::Template,
        }
    }

    async fn call(
        &self,
        service: &dyn JustificationService,
        request: &JustificationRequest,
    ) -> Result<String, GenerationError> {
        let text = tokio::time::timeout(self.settings.timeout, service.generate(request))
            .await
            .map_err(|_| GenerationError::Timeout)??;

        let text = text.trim();
        if text.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}
