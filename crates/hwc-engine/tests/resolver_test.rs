//! Resolution: eligibility, ranking, fallback, selection hints, and
//! diagnostics.

mod common;

use common::{close, entry, Decliner, Forgetful, Leaf, ModelA, ModelB, SnakeAdder, TwinA, TwinB};
use hwc_core::config::HwcConfig;
use hwc_core::errors::{HwcErrorCode, ModelError, ResolveError};
use hwc_engine::{ModelEntry, Params, Query, Resolver, Target};

fn pool_ab() -> Vec<ModelEntry> {
    vec![entry::<ModelA>(), entry::<ModelB>()]
}

fn op_query(attributes: Params) -> Query {
    Query::new("widget", attributes).with_action("op", Params::new())
}

#[test]
fn test_falls_back_when_required_parameter_is_absent() {
    let mut resolver = Resolver::default();
    let est = resolver
        .resolve(&op_query(Params::new()), &pool_ab(), Target::Energy)
        .unwrap();
    assert_eq!(est.model_name(), Some("ModelB"));
    assert!(close(est.value.as_value().unwrap(), 1e-13));
}

#[test]
fn test_higher_priority_wins_when_both_can_answer() {
    let mut resolver = Resolver::default();
    let est = resolver
        .resolve(&op_query(Params::new().with("width", 8)), &pool_ab(), Target::Energy)
        .unwrap();
    assert_eq!(est.model_name(), Some("ModelA"));
    assert!(close(est.value.as_value().unwrap(), 8e-12));
}

#[test]
fn test_ranking_ignores_discovery_order() {
    let mut resolver = Resolver::default();
    let pool = vec![entry::<ModelB>(), entry::<ModelA>()];
    let est = resolver
        .resolve(&op_query(Params::new().with("width", 8)), &pool, Target::Energy)
        .unwrap();
    assert_eq!(est.model_name(), Some("ModelA"));
}

#[test]
fn test_equal_priorities_keep_discovery_order() {
    let mut resolver = Resolver::default();
    let query = Query::new("twin", Params::new()).with_action("op", Params::new());

    let est = resolver
        .resolve(&query, &[entry::<TwinA>(), entry::<TwinB>()], Target::Energy)
        .unwrap();
    assert_eq!(est.model_name(), Some("TwinA"));
    assert_eq!(est.value.as_value(), Some(1.0));

    let est = resolver
        .resolve(&query, &[entry::<TwinB>(), entry::<TwinA>()], Target::Energy)
        .unwrap();
    assert_eq!(est.model_name(), Some("TwinB"));
    assert_eq!(est.value.as_value(), Some(2.0));
}

#[test]
fn test_component_names_are_case_insensitive() {
    let mut resolver = Resolver::default();
    let query = Query::new("WIDGET", Params::new()).with_action("op", Params::new());
    let est = resolver.resolve(&query, &pool_ab(), Target::Energy).unwrap();
    assert_eq!(est.model_name(), Some("ModelB"));
}

#[test]
fn test_declining_constructor_falls_through() {
    let mut resolver = Resolver::default();
    let pool = vec![entry::<Decliner>(), entry::<ModelB>()];
    let est = resolver
        .resolve(&op_query(Params::new()), &pool, Target::Energy)
        .unwrap();
    assert_eq!(est.model_name(), Some("ModelB"));
}

#[test]
fn test_exhausted_lists_initialization_failures() {
    let mut resolver = Resolver::default();
    let err = resolver
        .resolve(&op_query(Params::new()), &[entry::<Decliner>()], Target::Energy)
        .unwrap_err();
    match &err {
        ResolveError::Exhausted { init_failures, attempts, .. } => {
            assert!(attempts.is_empty());
            assert_eq!(init_failures[0].model, "Decliner");
        }
        other => panic!("Expected Exhausted, got: {:?}", other),
    }
    let msg = err.to_string();
    assert!(msg.starts_with("Can not find an energy model for widget().op()"));
    assert!(msg.contains("Models that could not be initialized:"));
    assert!(msg.contains("Decliner: widget too coarse for this model"));
}

#[test]
fn test_exhausted_mentions_every_candidate_tried() {
    let mut resolver = Resolver::default();
    let query = op_query(Params::new().with("width", 8).with("model", "Nope"));
    let err = resolver.resolve(&query, &pool_ab(), Target::Energy).unwrap_err();
    assert_eq!(err.attempted_models(), vec!["ModelA", "ModelB"]);
    assert_eq!(err.error_code(), "RESOLUTION_FAILED");
    let msg = err.to_string();
    assert!(msg.contains(
        "ModelA with priority 0.9 estimating value: Model ModelA did not match requested model Nope"
    ));
    assert!(msg.contains("ModelB with priority 0.5"));
    assert!(msg.contains("Logs for models that could estimate query:"));
}

#[test]
fn test_requested_model_is_case_insensitive() {
    let mut resolver = Resolver::default();
    let query = op_query(Params::new().with("width", 8).with("model", "modelb"));
    let est = resolver.resolve(&query, &pool_ab(), Target::Energy).unwrap();
    assert_eq!(est.model_name(), Some("ModelB"));
}

#[test]
fn test_min_priority_rejects_low_fidelity_models() {
    let mut resolver = Resolver::default();
    let query = op_query(Params::new().with("min_priority", 0.6));
    let err = resolver
        .resolve(&query, &[entry::<ModelB>()], Target::Energy)
        .unwrap_err();
    assert!(err
        .to_string()
        .contains("Model ModelB did not meet min_priority 0.6"));

    let query = op_query(Params::new().with("width", 8).with("min_accuracy", 0.6));
    let est = resolver.resolve(&query, &pool_ab(), Target::Energy).unwrap();
    assert_eq!(est.model_name(), Some("ModelA"));
}

#[test]
fn test_configured_min_priority_applies_when_query_is_silent() {
    let config = HwcConfig::from_toml("[resolver]\nmin_priority = 0.6\n").unwrap();
    let mut resolver = Resolver::new(&config);
    let err = resolver
        .resolve(&op_query(Params::new()), &[entry::<ModelB>()], Target::Energy)
        .unwrap_err();
    assert!(matches!(err, ResolveError::Exhausted { .. }));
}

#[test]
fn test_empty_pool_is_distinct() {
    let mut resolver = Resolver::default();
    let err = resolver
        .resolve(&op_query(Params::new()), &[], Target::Energy)
        .unwrap_err();
    assert!(matches!(err, ResolveError::NoModelsRegistered));
    assert_eq!(err.error_code(), "NO_MODELS_REGISTERED");
}

#[test]
fn test_unknown_component_lists_known_names() {
    let mut resolver = Resolver::default();
    let pool = vec![entry::<ModelA>(), entry::<SnakeAdder>()];
    let err = resolver
        .resolve(&Query::new("gizmo", Params::new()), &pool, Target::Area)
        .unwrap_err();
    match err {
        ResolveError::UnsupportedComponent { known, suggestions, .. } => {
            assert_eq!(known, vec!["adder", "snake_adder", "widget"]);
            assert!(suggestions.is_empty());
        }
        other => panic!("Expected UnsupportedComponent, got: {:?}", other),
    }
}

#[test]
fn test_relaxed_names_only_suggest() {
    let mut resolver = Resolver::default();
    let pool = vec![entry::<SnakeAdder>()];
    let err = resolver
        .resolve(&Query::new("SnakeAdder", Params::new()), &pool, Target::Area)
        .unwrap_err();
    match &err {
        ResolveError::UnsupportedComponent { suggestions, .. } => {
            assert_eq!(suggestions, &vec!["snake_adder".to_string()]);
        }
        other => panic!("Expected UnsupportedComponent, got: {:?}", other),
    }
    assert!(err.to_string().contains("Did you mean: snake_adder?"));
}

#[test]
fn test_relaxed_suggestions_can_be_disabled() {
    let config = HwcConfig::from_toml("[resolver]\nsuggest_relaxed_names = false\n").unwrap();
    let mut resolver = Resolver::new(&config);
    let err = resolver
        .resolve(
            &Query::new("snakeadder", Params::new()),
            &[entry::<SnakeAdder>()],
            Target::Area,
        )
        .unwrap_err();
    match err {
        ResolveError::UnsupportedComponent { suggestions, .. } => assert!(suggestions.is_empty()),
        other => panic!("Expected UnsupportedComponent, got: {:?}", other),
    }
}

#[test]
fn test_unsatisfied_constructor_is_reported() {
    let mut resolver = Resolver::default();
    let err = resolver
        .resolve(&op_query(Params::new()), &[entry::<ModelA>()], Target::Energy)
        .unwrap_err();
    assert!(matches!(err, ResolveError::UnsatisfiedParameters { .. }));
    let msg = err.to_string();
    assert!(msg.contains("could not be initialized"));
    assert!(msg.contains("Argument for ModelA is missing: width"));
}

#[test]
fn test_required_actions_filter_before_instantiation() {
    let mut resolver = Resolver::default();
    let query = Query::new("widget", Params::new().with("width", 8)).requiring(["special"]);
    let est = resolver
        .resolve(&query, &pool_ab(), Target::ModelSelection)
        .unwrap();
    let model = est.value.into_model().unwrap();
    assert_eq!(model.name(), "ModelA");

    let query = Query::new("widget", Params::new()).requiring(["special"]);
    let err = resolver
        .resolve(&query, &pool_ab(), Target::ModelSelection)
        .unwrap_err();
    assert!(err
        .to_string()
        .contains("Model ModelB does not support action special"));
}

#[test]
fn test_n_instances_scales_area() {
    let mut resolver = Resolver::default();
    let query = Query::new("widget", Params::new().with("n_instances", 4));
    let est = resolver
        .resolve(&query, &[entry::<ModelB>()], Target::Area)
        .unwrap();
    assert!(close(est.value.as_value().unwrap(), 4e-12));
    assert_eq!(est.last_message(), "Multiplying by n_instances 4");

    let est = resolver
        .resolve(&query, &[entry::<ModelB>()], Target::LeakPower)
        .unwrap();
    assert!(close(est.value.as_value().unwrap(), 4e-3));
}

#[test]
fn test_n_instances_scales_leak_action_but_not_others() {
    let mut resolver = Resolver::default();
    let attrs = Params::new().with("n_instances", 4);
    let op = Query::new("widget", attrs.clone()).with_action("op", Params::new());
    let est = resolver.resolve(&op, &[entry::<ModelB>()], Target::Energy).unwrap();
    assert!(close(est.value.as_value().unwrap(), 1e-13));

    let leak = Query::new("widget", attrs)
        .with_action("leak", Params::new().with("time_period", 2.0));
    let est = resolver.resolve(&leak, &[entry::<ModelB>()], Target::Energy).unwrap();
    assert!(close(est.value.as_value().unwrap(), 8e-3));
}

#[test]
fn test_selection_keys_never_reach_constructors() {
    let mut resolver = Resolver::default();
    let query = op_query(
        Params::new()
            .with("width", 8)
            .with("energy", 5.0)
            .with("area_scale", 2.0)
            .with("n_instances", 1),
    );
    let est = resolver
        .resolve(&query, &[entry::<ModelA>()], Target::Energy)
        .unwrap();
    assert!(!est.messages.iter().any(|m| m.starts_with("Unused arguments")));
}

#[test]
fn test_unknown_attributes_are_reported_not_fatal() {
    let mut resolver = Resolver::default();
    let query = op_query(Params::new().with("color", "red"));
    let est = resolver
        .resolve(&query, &[entry::<ModelB>()], Target::Energy)
        .unwrap();
    assert!(est
        .messages
        .iter()
        .any(|m| m == "Unused arguments (color) provided for ModelB"));
}

#[test]
fn test_malformed_model_aborts_resolution() {
    let mut resolver = Resolver::default();
    let pool = vec![entry::<Forgetful>(), entry::<ModelB>()];
    let err = resolver
        .resolve(&op_query(Params::new()), &pool, Target::Energy)
        .unwrap_err();
    match &err {
        ResolveError::Usage { model, source } => {
            assert_eq!(model, "Forgetful");
            assert!(matches!(source, ModelError::MissingReturn { .. }));
        }
        other => panic!("Expected Usage, got: {:?}", other),
    }
    assert_eq!(err.error_code(), "USAGE_ERROR");
}

#[test]
fn test_latency_target() {
    let mut resolver = Resolver::default();
    let est = resolver
        .resolve(&op_query(Params::new()), &[entry::<ModelB>()], Target::Latency)
        .unwrap();
    assert!(close(est.value.as_value().unwrap(), 2e-9));
}

#[test]
fn test_energy_without_action_is_a_usage_error() {
    let mut resolver = Resolver::default();
    let err = resolver
        .resolve(&Query::new("widget", Params::new()), &pool_ab(), Target::Energy)
        .unwrap_err();
    assert!(matches!(err, ResolveError::Usage { .. }));
}

#[test]
fn test_success_summary_is_logged() {
    let mut resolver = Resolver::default();
    resolver
        .resolve(&op_query(Params::new()), &pool_ab(), Target::Energy)
        .unwrap();
    let logged = resolver.log().peek("hwc");
    assert_eq!(logged.len(), 1);
    assert!(logged[0].starts_with("ModelB returned 0.0000000000001 with priority 0.5."));
    assert!(logged[0].contains("ModelB estimating op"));
}

#[test]
fn test_zero_nominal_width_declines_instead_of_returning_infinity() {
    let mut resolver = Resolver::default();
    let query = Query::new("leaf", Params::new().with("width", 0))
        .with_action("op", Params::new().with("bits_per_action", 16));
    let err = resolver
        .resolve(&query, &[entry::<Leaf>()], Target::Energy)
        .unwrap_err();
    assert!(matches!(err, ResolveError::Exhausted { .. }));
    assert!(err.to_string().contains("nominal width = 0"));
}

#[test]
fn test_undrained_summaries_are_capped() {
    let config = HwcConfig::from_toml("[logging]\ncapacity = 2\n").unwrap();
    let mut resolver = Resolver::new(&config);
    for width in [1, 2, 3] {
        resolver
            .resolve(&op_query(Params::new().with("width", width)), &pool_ab(), Target::Energy)
            .unwrap();
    }
    let pending = resolver.log().peek(resolver.channel());
    assert_eq!(pending.len(), 2);
    assert!(pending.iter().all(|m| m.starts_with("ModelA returned")));
    assert_eq!(resolver.log().dropped(), 1);
}
