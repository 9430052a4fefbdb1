//! Request routing: maps API paths onto catalog queries and game operations.

use std::sync::Arc;

use log::{error, warn};
use rand::Rng;
use serde::Deserialize;
use serde_json::{json, Value};

use super::http::{Request, Response};
use crate::build_info::{BUILD_COMMIT, BUILD_DATE, BUILD_VERSION};
use crate::catalog::{accept_reorder, export, Catalog, ListQuery, QueryError};
use crate::guess::{parse_difficulty, GameController, GameError};

/// Everything a request handler can reach.
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub game: GameController<Catalog>,
}

impl AppState {
    pub fn new(catalog: Catalog) -> Self {
        let catalog = Arc::new(catalog);
        Self {
            game: GameController::new(Arc::clone(&catalog)),
            catalog,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct GuessBody {
    #[serde(default)]
    guess: String,
}

/// Dispatch one request on behalf of `player`.
pub fn handle<R: Rng + ?Sized>(
    state: &AppState,
    request: &Request,
    player: &str,
    rng: &mut R,
) -> Response {
    let path = request.path.trim_end_matches('/');
    let method = request.method.as_str();

    match (method, path) {
        ("GET", "/api/health") => Response::json(
            200,
            &json!({
                "status": "ok",
                "version": BUILD_VERSION,
                "commit": BUILD_COMMIT,
                "date": BUILD_DATE,
            }),
        ),
        ("GET", "/api/emperors") => {
            let query = ListQuery::from_params(&request.query);
            Response::json(200, &state.catalog.list(&query))
        }
        ("GET", "/api/emperors/all") => {
            Response::json(200, &json!({ "data": state.catalog.all_brief() }))
        }
        ("GET", "/api/emperors/export") => {
            let query = ListQuery::from_params(&request.query);
            let csv = export::export_csv(&state.catalog, &query);
            Response::csv(csv, &export::export_filename())
        }
        ("POST", "/api/emperors/reorder") => reorder(request),
        ("GET", "/api/eras") => Response::json(200, &json!({ "data": state.catalog.eras() })),
        ("GET", "/api/guess/start") => start(state, request, player, rng),
        ("POST", "/api/guess/guess") => guess(state, request, player),
        ("POST", "/api/guess/giveup") => match state.game.give_up(player) {
            Ok(outcome) => Response::json(200, &outcome),
            Err(e) => game_error(&e),
        },
        ("GET", "/api/guess/names") => match state.game.list_names() {
            Ok(names) => Response::json(200, &json!({ "data": names })),
            Err(e) => game_error(&e),
        },
        ("GET", p) if p.starts_with("/api/emperors/") => {
            let rank = p.trim_start_matches("/api/emperors/");
            match rank.parse::<u32>() {
                Ok(rank) => match state.catalog.detail(rank) {
                    Ok(record) => Response::json(200, &record),
                    Err(QueryError::NotFound) => Response::error(404, "Not found"),
                },
                Err(_) => Response::error(404, "Not found"),
            }
        }
        (_, p) if is_known_path(p) => Response::error(405, "Method not allowed"),
        _ => Response::error(404, "Not found"),
    }
}

fn is_known_path(path: &str) -> bool {
    matches!(
        path,
        "/api/health"
            | "/api/emperors"
            | "/api/emperors/all"
            | "/api/emperors/export"
            | "/api/emperors/reorder"
            | "/api/eras"
            | "/api/guess/start"
            | "/api/guess/guess"
            | "/api/guess/giveup"
            | "/api/guess/names"
    )
}

fn reorder(request: &Request) -> Response {
    let body: Value = if request.body.is_empty() {
        Value::Object(Default::default())
    } else {
        match serde_json::from_slice(&request.body) {
            Ok(v) => v,
            Err(_) => return Response::json(400, &json!({ "success": false, "error": "invalid JSON" })),
        }
    };
    match accept_reorder(&body) {
        Ok(_) => Response::json(200, &json!({ "success": true })),
        Err(message) => Response::json(400, &json!({ "success": false, "error": message })),
    }
}

fn start<R: Rng + ?Sized>(
    state: &AppState,
    request: &Request,
    player: &str,
    rng: &mut R,
) -> Response {
    let raw = request.param("difficulty").unwrap_or("medium");
    let outcome = parse_difficulty(raw).and_then(|d| state.game.start(player, d, rng));
    match outcome {
        Ok(outcome) => {
            // `hint` keeps single-hint clients working
            let mut body = json!(outcome);
            body["hint"] = json!(outcome.hints.first());
            Response::json(200, &body)
        }
        Err(e) => game_error(&e),
    }
}

fn guess(state: &AppState, request: &Request, player: &str) -> Response {
    let body: GuessBody = if request.body.is_empty() {
        GuessBody::default()
    } else {
        match serde_json::from_slice(&request.body) {
            Ok(body) => body,
            Err(_) => return Response::error(400, "请求体必须是 JSON"),
        }
    };
    match state.game.guess(player, &body.guess) {
        Ok(outcome) => Response::json(200, &outcome),
        Err(e) => game_error(&e),
    }
}

fn game_error(err: &GameError) -> Response {
    let status = match err {
        GameError::InvalidInput(_) | GameError::NoActiveGame | GameError::GuessesExhausted => 400,
        GameError::NotFound(_) => 404,
        GameError::NoEligibleCandidate => 503,
        GameError::Source(_) => 500,
    };
    if status >= 500 {
        error!("Game operation failed: {err}");
    } else {
        warn!("Game operation rejected ({}): {err}", err.kind());
    }
    Response::json(status, &json!({ "error": err.to_string(), "kind": err.kind() }))
}
