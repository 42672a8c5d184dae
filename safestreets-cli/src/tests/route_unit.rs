//! Focused unit tests covering route CLI configuration and ranking output.

use super::helpers::{NOW, Workspace};
use super::*;
use camino::Utf8PathBuf;
use crate::route::{RouteArgs, RouteConfig, RouteReport, config_from_layers_for_test, run_route_with};
use crate::score::{ScoreArgs, run_score_with};
use rstest::{fixture, rstest};
use safestreets_routes::{RouteEvaluatorConfig, RouteEvaluatorConfigError};

#[fixture]
fn workspace() -> Workspace {
    Workspace::new()
}

fn scored(workspace: Workspace) -> Workspace {
    workspace.write_inputs();
    let args = ScoreArgs {
        streets: Some(workspace.streets()),
        crimes: Some(workspace.crimes()),
        store: Some(workspace.store()),
        now: Some(NOW.to_owned()),
        ..ScoreArgs::default()
    };
    run_score_with(args, &mut Vec::new()).expect("store should be scored");
    workspace
}

fn route_args(workspace: &Workspace) -> RouteArgs {
    RouteArgs {
        request_path: Some(workspace.request()),
        store: Some(workspace.store()),
        ..RouteArgs::default()
    }
}

#[rstest]
fn converting_route_without_request_errors() {
    match RouteConfig::try_from(RouteArgs::default()) {
        Err(CliError::MissingArgument { field, env }) => {
            assert_eq!(field, ARG_ROUTE_REQUEST);
            assert_eq!(env, ENV_ROUTE_REQUEST);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn route_config_applies_defaults() {
    let args = RouteArgs {
        request_path: Some("request.json".into()),
        ..RouteArgs::default()
    };
    let config = RouteConfig::try_from(args).expect("config should build");
    assert_eq!(config.store, Utf8PathBuf::from(DEFAULT_STORE_PATH));
    assert_eq!(config.evaluator, RouteEvaluatorConfig::default());
}

#[rstest]
fn out_of_range_default_score_is_rejected() {
    let args = RouteArgs {
        request_path: Some("request.json".into()),
        default_point_score: Some(11.0),
        ..RouteArgs::default()
    };
    match RouteConfig::try_from(args) {
        Err(CliError::Evaluator(RouteEvaluatorConfigError::InvalidDefaultScore { score })) => {
            assert_eq!(score, 11.0);
        }
        other => panic!("expected InvalidDefaultScore, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_reports_missing_store(workspace: Workspace) {
    workspace.write_request();
    let config = RouteConfig::try_from(route_args(&workspace)).expect("config should build");
    match config.validate_sources() {
        Err(CliError::MissingSourceFile { field, .. }) => assert_eq!(field, ARG_STORE),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({ "default_point_score": 3.0, "walking_speed_kmh": 4.0 }),
        None,
    );
    composer.push_environment(json!({ "walking_speed_kmh": 6.0 }));
    composer.push_cli(json!({ "request_path": "from-cli.json" }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.request_path, Utf8PathBuf::from("from-cli.json"));
    assert_eq!(config.evaluator.default_point_score().value(), 3.0);
    assert_eq!(config.evaluator.walking_speed_kmh(), 6.0);
}

#[rstest]
fn route_ranks_against_scored_store(workspace: Workspace) {
    let ready = scored(workspace);
    ready.write_request();
    let mut stdout = Vec::new();
    run_route_with(route_args(&ready), &mut stdout).expect("route should succeed");

    let report: RouteReport = serde_json::from_slice(&stdout).expect("JSON report");
    let best = report.best.expect("a best route");
    assert_eq!(best.route_index, 1);
    assert_eq!(best.summary.as_deref(), Some("safe"));
    assert_eq!(best.avg_safety_score, 10.0);
    assert_eq!(best.matched_samples, 2);

    let order: Vec<usize> = report.ranking.iter().map(|score| score.route_index).collect();
    assert_eq!(order, vec![1, 0]);
    let risky = report.ranking.scores().last().expect("two routes");
    assert_eq!(risky.avg_safety_score, 6.0);
}

#[rstest]
fn empty_requests_print_no_best_route(workspace: Workspace) {
    let ready = scored(workspace);
    super::helpers::write_utf8(&ready.request(), br#"{"routes": []}"#);
    let mut stdout = Vec::new();
    run_route_with(route_args(&ready), &mut stdout).expect("route should succeed");

    let report: serde_json::Value = serde_json::from_slice(&stdout).expect("JSON report");
    assert!(report["best"].is_null());
    assert_eq!(report["ranking"], serde_json::json!([]));
}
