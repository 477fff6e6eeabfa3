//! One candidate trial: instantiate, evaluate, check selection hints.

use hwc_core::constants::LEAK_ACTION;
use hwc_core::errors::ModelError;

use super::{Estimate, Target};
use crate::estimation::Estimation;
use crate::model::{drain_messages, invoke, total_area, total_leak_power, CallContext, CostModel};
use crate::query::{Query, Selection};
use crate::registry::ModelEntry;

/// Where a candidate gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Construction failed or was declined.
    Init,
    /// The model was built but could not produce a value.
    Estimate,
    /// A value was produced but the candidate doesn't satisfy the query's
    /// selection hints or required actions.
    Selection,
}

/// Result of trialling one candidate.
#[derive(Debug)]
pub enum TrialOutcome {
    Ok(Estimation<Estimate>),
    /// Recoverable: the resolver moves on to the next candidate.
    Decline { stage: Stage, messages: Vec<String> },
    /// Fatal: the candidate is malformed.
    Error(ModelError),
}

impl TrialOutcome {
    fn declined(stage: Stage, messages: Vec<String>) -> Self {
        Self::Decline { stage, messages }
    }

    fn from_error(stage: Stage, error: ModelError, mut messages: Vec<String>) -> Self {
        if error.is_fatal() {
            return Self::Error(error);
        }
        messages.push(error.to_string());
        Self::declined(stage, messages)
    }
}

/// Everything a trial needs besides the candidate.
pub(crate) struct TrialRequest<'a> {
    pub query: &'a Query,
    pub selection: &'a Selection,
    pub target: Target,
    pub max_depth: usize,
}

pub(crate) fn run(entry: &ModelEntry, request: &TrialRequest<'_>) -> TrialOutcome {
    let descriptor = entry.descriptor();
    let name = descriptor.name();

    for action in &request.query.required_actions {
        if !descriptor.supports_action(action) {
            return TrialOutcome::declined(
                Stage::Selection,
                vec![format!("Model {name} does not support action {action}")],
            );
        }
    }

    let args = match descriptor.constructor().bind(&request.query.attributes) {
        Ok(args) => args,
        Err(e) => return TrialOutcome::from_error(Stage::Init, e, Vec::new()),
    };
    let mut messages = Vec::new();
    if !args.unused().is_empty() {
        tracing::debug!(model = name, unused = ?args.unused(), "unused component attributes");
        messages.push(format!(
            "Unused arguments ({}) provided for {name}",
            args.unused().join(", ")
        ));
    }

    let mut model = match entry.construct(&args) {
        Ok(model) => model,
        Err(e) => return TrialOutcome::from_error(Stage::Init, e, messages),
    };

    let value = evaluate(model.as_mut(), request);
    messages.extend(drain_messages(model.as_mut()));
    let value = match value {
        Ok(Some(v)) => Estimate::Value(v),
        Ok(None) => Estimate::Model(model),
        Err(e) => return TrialOutcome::from_error(Stage::Estimate, e, messages),
    };

    let rejections = request.selection.rejections(name, descriptor.priority());
    if !rejections.is_empty() {
        messages.extend(rejections);
        return TrialOutcome::declined(Stage::Selection, messages);
    }

    let mut estimation = Estimation::new(value);
    estimation.set_model_name(name);
    estimation.add_messages(messages);
    if scales_with_instances(request) {
        let n = request.selection.n_instances;
        estimation.add_message(format!("Multiplying by n_instances {n}"));
        if let Estimate::Value(v) = &mut estimation.value {
            *v *= n;
        }
    }
    TrialOutcome::Ok(estimation)
}

/// Numeric value for the request's target, or `None` when the target is the
/// model itself.
fn evaluate(
    model: &mut dyn CostModel,
    request: &TrialRequest<'_>,
) -> Result<Option<f64>, ModelError> {
    let query = request.query;
    match request.target {
        Target::Area => total_area(&*model, request.max_depth).map(Some),
        Target::LeakPower => total_leak_power(&*model, request.max_depth).map(Some),
        Target::Energy | Target::Latency => {
            let action = query.action.as_deref().ok_or_else(|| {
                ModelError::usage(model.name(), "energy and latency queries need an action")
            })?;
            let ctx = CallContext::root(request.max_depth);
            let pair = invoke(model, action, &query.arguments, &ctx)?;
            Ok(Some(if request.target == Target::Energy {
                pair.energy
            } else {
                pair.latency
            }))
        }
        Target::ModelSelection => Ok(None),
    }
}

fn scales_with_instances(request: &TrialRequest<'_>) -> bool {
    match request.target {
        Target::Area | Target::LeakPower => true,
        Target::Energy | Target::Latency => request.query.action.as_deref() == Some(LEAK_ACTION),
        Target::ModelSelection => false,
    }
}
