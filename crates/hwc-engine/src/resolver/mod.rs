//! Resolution: pick the best candidate for a query and obtain its answer.
//!
//! Candidates whose aliases match the component name and whose constructor
//! requirements are met by the query's attributes are tried in descending
//! priority order. The first candidate that produces a value and passes the
//! query's selection hints wins. When none does, the error carries every
//! candidate's messages.

pub mod trial;

use std::fmt;

use hwc_core::config::{HwcConfig, ResolverConfig};
use hwc_core::errors::resolve_error::indent_block;
use hwc_core::errors::{FailedAttempt, InitFailure, ModelError, ResolveError};
use hwc_core::messages::{MessageLog, MessageSink};

use crate::estimation::Estimation;
use crate::model::CostModel;
use crate::query::Query;
use crate::registry::ModelEntry;

pub use trial::{Stage, TrialOutcome};

/// What a resolution should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Energy,
    Latency,
    Area,
    LeakPower,
    /// The winning model instance itself.
    ModelSelection,
}

impl Target {
    pub fn needs_action(&self) -> bool {
        matches!(self, Self::Energy | Self::Latency)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Energy => "energy",
            Self::Latency => "latency",
            Self::Area => "area",
            Self::LeakPower => "leak_power",
            Self::ModelSelection => "model",
        })
    }
}

/// The value a resolution produced.
pub enum Estimate {
    Value(f64),
    Model(Box<dyn CostModel>),
}

impl Estimate {
    pub fn as_value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Model(_) => None,
        }
    }

    pub fn into_model(self) -> Option<Box<dyn CostModel>> {
        match self {
            Self::Model(m) => Some(m),
            Self::Value(_) => None,
        }
    }
}

impl fmt::Debug for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Model(m) => f.debug_tuple("Model").field(&m.name()).finish(),
        }
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}"),
            Self::Model(m) => write!(f, "model {}", m.name()),
        }
    }
}

/// Runs resolutions and reports their outcome to a message log.
///
/// Every resolution appends at least one summary. Callers drain the log
/// (`log_mut().drain(..)`) between batches; once a channel holds
/// `logging.capacity` messages the oldest are dropped.
#[derive(Debug)]
pub struct Resolver {
    config: ResolverConfig,
    channel: String,
    log: MessageLog,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(&HwcConfig::default())
    }
}

impl Resolver {
    pub fn new(config: &HwcConfig) -> Self {
        let log = if config.logging.effective_mirror_to_tracing() {
            MessageLog::mirrored()
        } else {
            MessageLog::new()
        }
        .with_capacity(config.logging.effective_capacity());
        Self {
            config: config.resolver.clone(),
            channel: config.logging.effective_channel().to_string(),
            log,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Channel resolution summaries are appended to.
    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut MessageLog {
        &mut self.log
    }

    /// Resolve `query` for `target` against `candidates`, in discovery order.
    pub fn resolve(
        &mut self,
        query: &Query,
        candidates: &[ModelEntry],
        target: Target,
    ) -> Result<Estimation<Estimate>, ResolveError> {
        tracing::info!(%target, %query, "resolving");
        if candidates.is_empty() {
            return Err(ResolveError::NoModelsRegistered);
        }

        let (normalized, mut selection) =
            query.normalize().map_err(|source| ResolveError::Usage {
                model: query.component_name.clone(),
                source,
            })?;
        if target.needs_action() && normalized.action.is_none() {
            return Err(ResolveError::Usage {
                model: query.component_name.clone(),
                source: ModelError::usage(
                    query.component_name.clone(),
                    format!("{target} queries need an action"),
                ),
            });
        }
        if selection.min_priority.is_none() {
            let floor = self.config.effective_min_priority();
            if floor > 0.0 {
                selection.min_priority = Some(floor);
            }
        }

        let named: Vec<&ModelEntry> = candidates
            .iter()
            .filter(|c| c.descriptor().matches_component(&query.component_name))
            .collect();
        if named.is_empty() {
            return Err(self.unsupported(&query.component_name, candidates));
        }

        let mut init_failures = Vec::new();
        let mut eligible = Vec::with_capacity(named.len());
        for entry in named {
            match entry
                .descriptor()
                .constructor()
                .missing_error(&normalized.attributes)
            {
                Some(message) => init_failures.push(InitFailure {
                    model: entry.name().to_string(),
                    message,
                }),
                None => eligible.push(entry),
            }
        }
        if eligible.is_empty() {
            return Err(ResolveError::UnsatisfiedParameters {
                component: query.component_name.clone(),
                failures: init_failures,
            });
        }
        // Stable: equal priorities keep discovery order.
        eligible.sort_by(|a, b| b.priority().total_cmp(&a.priority()));

        let request = trial::TrialRequest {
            query: &normalized,
            selection: &selection,
            target,
            max_depth: self.config.effective_max_depth(),
        };
        let mut attempts = Vec::new();
        for entry in eligible {
            match trial::run(entry, &request) {
                TrialOutcome::Ok(estimation) => {
                    self.report_failures(&attempts);
                    self.report_success(&estimation, entry.priority());
                    return Ok(estimation);
                }
                TrialOutcome::Decline {
                    stage: Stage::Init,
                    messages,
                } => {
                    tracing::debug!(model = entry.name(), "could not be initialized");
                    init_failures.push(InitFailure {
                        model: entry.name().to_string(),
                        message: messages.join("\n"),
                    });
                }
                TrialOutcome::Decline { stage, messages } => {
                    tracing::debug!(model = entry.name(), ?stage, "declined");
                    attempts.push(FailedAttempt {
                        model: entry.name().to_string(),
                        priority: entry.priority(),
                        messages,
                    });
                }
                TrialOutcome::Error(source) => {
                    tracing::error!(model = entry.name(), error = %source, "malformed cost model");
                    return Err(ResolveError::Usage {
                        model: entry.name().to_string(),
                        source,
                    });
                }
            }
        }

        self.report_failures(&attempts);
        Err(ResolveError::Exhausted {
            target: target.to_string(),
            query: query.to_string(),
            attempts,
            init_failures,
        })
    }

    fn unsupported(&self, component: &str, candidates: &[ModelEntry]) -> ResolveError {
        let mut known: Vec<String> = candidates
            .iter()
            .flat_map(|c| c.descriptor().component_names().iter().cloned())
            .collect();
        known.sort();
        known.dedup();

        let mut suggestions: Vec<String> = Vec::new();
        if self.config.effective_suggest_relaxed_names() {
            for candidate in candidates {
                for alias in candidate.descriptor().relaxed_matches(component) {
                    if !suggestions.iter().any(|s| s == alias) {
                        suggestions.push(alias.to_string());
                    }
                }
            }
        }
        ResolveError::UnsupportedComponent {
            component: component.to_string(),
            known,
            suggestions,
        }
    }

    fn report_success(&mut self, estimation: &Estimation<Estimate>, priority: f64) {
        let model = estimation.model_name().unwrap_or("<unknown>");
        tracing::info!(model, priority, value = %estimation.value, "resolved");
        let mut summary = format!(
            "{model} returned {} with priority {priority}.",
            estimation.value
        );
        let messages = indent_block("Messages:", &estimation.messages);
        if !messages.is_empty() {
            summary.push(' ');
            summary.push_str(&messages);
        }
        self.log.append(&self.channel, summary);
    }

    fn report_failures(&mut self, attempts: &[FailedAttempt]) {
        let reasons: Vec<String> = attempts
            .iter()
            .map(|a| {
                format!(
                    "{} with priority {} estimating value: {}",
                    a.model,
                    a.priority,
                    a.last_message()
                )
            })
            .collect();
        let block = indent_block("Models provided priority but failed to estimate:", &reasons);
        if !block.is_empty() {
            self.log.append(&self.channel, block);
        }
    }
}
