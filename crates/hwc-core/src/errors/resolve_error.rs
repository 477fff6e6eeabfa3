//! Resolution errors and the diagnostics they carry.

use super::error_code::{self, HwcErrorCode};
use super::{ModelError, RegistryError};

/// A candidate that ran (or was rejected before running) without producing
/// a successful estimation.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedAttempt {
    pub model: String,
    pub priority: f64,
    /// Every message the candidate produced, oldest first.
    pub messages: Vec<String>,
}

impl FailedAttempt {
    /// The final message, which holds the reason the attempt failed.
    pub fn last_message(&self) -> &str {
        self.messages
            .last()
            .map(String::as_str)
            .unwrap_or("No messages found.")
    }
}

/// A candidate whose constructor could not be called or raised.
#[derive(Debug, Clone, PartialEq)]
pub struct InitFailure {
    pub model: String,
    pub message: String,
}

/// Terminal errors of a resolution request.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("No models registered. Register at least one cost model before resolving queries")]
    NoModelsRegistered,

    #[error("{}", render_unsupported(.component, .known, .suggestions))]
    UnsupportedComponent {
        component: String,
        known: Vec<String>,
        suggestions: Vec<String>,
    },

    #[error("{}", render_unsatisfied(.component, .failures))]
    UnsatisfiedParameters {
        component: String,
        failures: Vec<InitFailure>,
    },

    #[error("{}", render_exhausted(.target, .query, .attempts, .init_failures))]
    Exhausted {
        target: String,
        query: String,
        attempts: Vec<FailedAttempt>,
        init_failures: Vec<InitFailure>,
    },

    #[error("Model {model} is malformed: {source}")]
    Usage {
        model: String,
        #[source]
        source: ModelError,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl ResolveError {
    /// Names of every candidate that was tried and failed, in trial order.
    pub fn attempted_models(&self) -> Vec<&str> {
        match self {
            Self::Exhausted { attempts, .. } => {
                attempts.iter().map(|a| a.model.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}

impl HwcErrorCode for ResolveError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NoModelsRegistered => error_code::NO_MODELS_REGISTERED,
            Self::UnsupportedComponent { .. } | Self::UnsatisfiedParameters { .. } => {
                error_code::NO_ELIGIBLE_MODELS
            }
            Self::Exhausted { .. } => error_code::RESOLUTION_FAILED,
            Self::Usage { source, .. } => source.error_code(),
            Self::Registry(e) => e.error_code(),
        }
    }
}

/// Render `lines` under `header` as a `| `-prefixed block. Multi-line entries
/// keep their continuation lines inside the block. Empty input renders as "".
pub fn indent_block(header: &str, lines: &[String]) -> String {
    if lines.is_empty() {
        return String::new();
    }
    let mut out = header.to_string();
    for line in lines {
        out.push_str("\n| ");
        out.push_str(&line.replace('\n', "\n|  "));
    }
    out
}

fn render_unsupported(component: &str, known: &[String], suggestions: &[String]) -> String {
    let mut out = format!(
        "Component {component} is not supported by any models. Supported components: {}",
        known.join(", ")
    );
    if !suggestions.is_empty() {
        out.push_str(&format!("\nDid you mean: {}?", suggestions.join(", ")));
    }
    out
}

fn render_unsatisfied(component: &str, failures: &[InitFailure]) -> String {
    let mut lines = vec![format!(
        "Component {component} is supported by models, but the following models could not be initialized."
    )];
    for failure in failures {
        lines.push(format!("\t{}", failure.model));
        lines.push(format!("\t{}", failure.message.replace('\n', "\n\t")));
    }
    lines.join("\n")
}

fn render_exhausted(
    target: &str,
    query: &str,
    attempts: &[FailedAttempt],
    init_failures: &[InitFailure],
) -> String {
    let full_logs: Vec<String> = attempts
        .iter()
        .map(|a| {
            indent_block(
                &format!("{} with priority {} estimating value: ", a.model, a.priority),
                &a.messages,
            )
        })
        .collect();
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
    let inits: Vec<String> = init_failures
        .iter()
        .map(|f| format!("{}: {}", f.model, f.message))
        .collect();

    let mut out = format!("Can not find an {target} model for {query}");
    for block in [
        indent_block("Logs for models that could estimate query:", &full_logs),
        indent_block("Why models did not estimate:", &reasons),
        indent_block("Models that could not be initialized:", &inits),
    ] {
        if !block.is_empty() {
            out.push('\n');
            out.push_str(&block);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_block_empty() {
        assert_eq!(indent_block("Header:", &[]), "");
    }

    #[test]
    fn test_indent_block_multiline() {
        let block = indent_block("Header:", &["a".to_string(), "b\nc".to_string()]);
        assert_eq!(block, "Header:\n| a\n| b\n|  c");
    }

    #[test]
    fn test_last_message_default() {
        let attempt = FailedAttempt {
            model: "M".into(),
            priority: 0.5,
            messages: vec![],
        };
        assert_eq!(attempt.last_message(), "No messages found.");
    }
}
