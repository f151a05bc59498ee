//! Single binary web server: bracket board page at `/`, board API under `/api`.
//! Run with: API_BASE_URL=http://localhost:5000/api cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! See `tournament_bracket_web::config` for the other settings.

use actix_web::{
    delete, get, post, put,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use serde::Deserialize;
use std::io;
use tokio::sync::Mutex;
use tournament_bracket_web::{
    Board, BoardError, Config, MatchId, RemoteService, TeamId, TournamentService,
};

/// One board for the whole process; requests take turns on it.
type AppState = Data<Mutex<Board<RemoteService>>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct AddTeamBody {
    name: String,
}

#[derive(Deserialize)]
struct DeclareWinnerBody {
    round: String,
    match_id: MatchId,
    team_id: TeamId,
}

/// Path segment: team id (e.g. /api/teams/{team_id})
#[derive(Deserialize)]
struct TeamPath {
    team_id: TeamId,
}

/// Answer with the board snapshot; its `error` field carries the message on failure.
/// Service failures are 502, refused operations 400.
fn respond<S: TournamentService>(
    board: &Board<S>,
    result: Result<(), BoardError>,
) -> HttpResponse {
    let mut response = match result {
        Ok(()) => HttpResponse::Ok(),
        Err(e) if e.is_remote() => HttpResponse::BadGateway(),
        Err(_) => HttpResponse::BadRequest(),
    };
    response.json(board.snapshot())
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "tournament-bracket-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

#[get("/api/board")]
async fn api_get_board(state: AppState) -> HttpResponse {
    let board = state.lock().await;
    HttpResponse::Ok().json(board.snapshot())
}

#[post("/api/teams")]
async fn api_add_team(state: AppState, body: Json<AddTeamBody>) -> HttpResponse {
    let mut board = state.lock().await;
    let result = board.add_team(&body.name).await;
    respond(&board, result)
}

/// Remove every team (and the bracket).
#[delete("/api/teams")]
async fn api_clear_teams(state: AppState) -> HttpResponse {
    let mut board = state.lock().await;
    let result = board.clear_teams().await;
    respond(&board, result)
}

#[delete("/api/teams/{team_id}")]
async fn api_remove_team(state: AppState, path: Path<TeamPath>) -> HttpResponse {
    let mut board = state.lock().await;
    let result = board.remove_team(path.team_id).await;
    respond(&board, result)
}

#[post("/api/draw")]
async fn api_draw(state: AppState) -> HttpResponse {
    let mut board = state.lock().await;
    let result = board.draw().await;
    respond(&board, result)
}

#[post("/api/bracket")]
async fn api_generate_bracket(state: AppState) -> HttpResponse {
    let mut board = state.lock().await;
    let result = board.generate_bracket().await;
    respond(&board, result)
}

#[post("/api/bracket/refresh")]
async fn api_refresh_bracket(state: AppState) -> HttpResponse {
    let mut board = state.lock().await;
    let result = board.refresh_bracket().await;
    respond(&board, result)
}

/// Declare a match winner and advance them.
#[put("/api/matches/winner")]
async fn api_declare_winner(state: AppState, body: Json<DeclareWinnerBody>) -> HttpResponse {
    let mut board = state.lock().await;
    let result = board
        .declare_winner(&body.round, body.match_id, body.team_id)
        .await;
    respond(&board, result)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("{e}");
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;
    let service = RemoteService::new(&config.api_base_url, config.request_timeout)
        .map_err(io::Error::other)?;
    log::info!("Using tournament API at {}", service.base_url());

    let mut board = Board::new(service, config.auto_advance_byes);
    if board.load_teams().await.is_err() {
        log::warn!("Starting without teams; the API did not answer");
    }
    let state = Data::new(Mutex::new(board));

    let bind = (config.host.as_str(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .route("/", web::get().to(serve_index_async))
            .service(api_health)
            .service(favicon)
            .service(api_get_board)
            .service(api_add_team)
            .service(api_clear_teams)
            .service(api_remove_team)
            .service(api_draw)
            .service(api_generate_bracket)
            .service(api_refresh_bracket)
            .service(api_declare_winner)
    })
    .bind(bind)?
    .run()
    .await
}

async fn serve_index_async() -> HttpResponse {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
