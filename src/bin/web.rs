//! Single binary web server: JSON API for brackets, fill-outs, the weekly bracket and pools.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! ADMIN_IDS lists participant ids allowed to run admin actions.

use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
    cookie::Key,
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use bracket_tournament_web::export::{bracket_view, entries_from_csv, leaderboard_csv, tree_view};
use bracket_tournament_web::models::SubmissionId;
use bracket_tournament_web::{
    advance_weekly, cast_ballot, check_and_auto_advance, close_pool, create_pool, join_pool,
    leaderboard, record_result, select_winner, start_weekly, submit_predictions, Bracket,
    BracketError, BracketId, Category, DayToRoundMap, NewBracket, PoolError, PoolId,
    ScoringRules, Seed, ServerConfig, Slot, Store, StoreError, SystemClock, WeeklyError,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// Shared state: the single in-memory store plus configuration.
struct AppContext {
    store: RwLock<Store>,
    config: ServerConfig,
}

type AppState = Data<AppContext>;

const IDENTITY_KEY: &str = "identity";

/// Who is making the request, as stored in the session cookie.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct Identity {
    participant_id: String,
    display_name: String,
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct LoginBody {
    participant_id: String,
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Deserialize)]
struct SelectWinnerBody {
    matchups: Bracket,
    round: usize,
    matchup: usize,
    slot: Slot,
}

#[derive(Deserialize)]
struct SubmitFilledBody {
    matchups: Bracket,
}

#[derive(Deserialize)]
struct CreatePoolBody {
    name: String,
    bracket_id: BracketId,
    #[serde(default)]
    rules: Option<ScoringRules>,
}

#[derive(Deserialize)]
struct JoinPoolBody {
    code: String,
}

#[derive(Deserialize)]
struct PredictionsBody {
    predictions: Bracket,
    #[serde(default)]
    sleeper1: Option<Seed>,
    #[serde(default)]
    sleeper2: Option<Seed>,
}

#[derive(Deserialize)]
struct ResultBody {
    round: usize,
    matchup: usize,
    slot: Slot,
}

#[derive(Deserialize)]
struct StartWeeklyBody {
    title: String,
    entries: Vec<String>,
    #[serde(default)]
    schedule: Option<DayToRoundMap>,
}

#[derive(Deserialize)]
struct VoteBody {
    matchup_id: String,
    slot: Slot,
}

#[derive(Deserialize)]
struct BallotBody {
    votes: Vec<VoteBody>,
}

/// Path segment: bracket id (e.g. /api/brackets/{id})
#[derive(Deserialize)]
struct BracketPath {
    id: BracketId,
}

/// Path segment: submission id (e.g. /api/submissions/{id}/view)
#[derive(Deserialize)]
struct SubmissionPath {
    id: SubmissionId,
}

/// Path segment: pool id (e.g. /api/pools/{id})
#[derive(Deserialize)]
struct PoolPath {
    id: PoolId,
}

fn current_identity(session: &Session) -> Option<Identity> {
    session.get::<Identity>(IDENTITY_KEY).ok().flatten()
}

fn error_body(e: impl std::fmt::Display) -> serde_json::Value {
    serde_json::json!({ "error": e.to_string() })
}

fn not_logged_in() -> HttpResponse {
    HttpResponse::Unauthorized().json(error_body("Log in first"))
}

fn bracket_error(e: BracketError) -> HttpResponse {
    HttpResponse::BadRequest().json(error_body(e))
}

fn store_error(e: StoreError) -> HttpResponse {
    match e {
        StoreError::BracketNotFound => HttpResponse::NotFound().json(error_body(e)),
        StoreError::NotOwner => HttpResponse::Forbidden().json(error_body(e)),
        _ => HttpResponse::BadRequest().json(error_body(e)),
    }
}

fn pool_error(e: PoolError) -> HttpResponse {
    match e {
        PoolError::PoolNotFound => HttpResponse::NotFound().json(error_body(e)),
        PoolError::NotHost => HttpResponse::Forbidden().json(error_body(e)),
        _ => HttpResponse::BadRequest().json(error_body(e)),
    }
}

fn weekly_error(e: WeeklyError) -> HttpResponse {
    match e {
        WeeklyError::NoWeeklyBracket => HttpResponse::NotFound().json(error_body(e)),
        WeeklyError::NotAdmin => HttpResponse::Forbidden().json(error_body(e)),
        _ => HttpResponse::BadRequest().json(error_body(e)),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "bracket-tournament-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Set the caller's identity (participant id + display name) in the session cookie.
#[post("/api/session")]
async fn api_login(session: Session, body: Json<LoginBody>) -> HttpResponse {
    let participant_id = body.participant_id.trim().to_string();
    if participant_id.is_empty() {
        return HttpResponse::BadRequest().json(error_body("participant_id is required"));
    }
    let identity = Identity {
        display_name: body
            .display_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(bracket_tournament_web::models::ANONYMOUS)
            .to_string(),
        participant_id,
    };
    match session.insert(IDENTITY_KEY, &identity) {
        Ok(()) => HttpResponse::Ok().json(identity),
        Err(e) => HttpResponse::InternalServerError().json(error_body(e)),
    }
}

#[get("/api/session")]
async fn api_whoami(state: AppState, session: Session) -> HttpResponse {
    match current_identity(&session) {
        Some(identity) => HttpResponse::Ok().json(serde_json::json!({
            "participant_id": identity.participant_id,
            "display_name": identity.display_name,
            "is_admin": state.config.is_admin(&identity.participant_id),
        })),
        None => not_logged_in(),
    }
}

#[delete("/api/session")]
async fn api_logout(session: Session) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

#[get("/api/categories")]
async fn api_categories() -> HttpResponse {
    let labels: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
    HttpResponse::Ok().json(labels)
}

/// Parse a CSV entry list (one name per row) for the create form.
#[post("/api/entries/import")]
async fn api_import_entries(body: String) -> HttpResponse {
    match entries_from_csv(&body) {
        Ok(names) => HttpResponse::Ok().json(names),
        Err(e) => HttpResponse::BadRequest().json(error_body(e)),
    }
}

/// All published brackets, newest first.
#[get("/api/brackets")]
async fn api_list_brackets(state: AppState) -> HttpResponse {
    let g = match state.store.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    HttpResponse::Ok().json(g.all_brackets())
}

/// Brackets created by the caller, newest first.
#[get("/api/brackets/mine")]
async fn api_my_brackets(state: AppState, session: Session) -> HttpResponse {
    let Some(me) = current_identity(&session) else {
        return not_logged_in();
    };
    let g = match state.store.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    HttpResponse::Ok().json(g.user_brackets(&me.participant_id))
}

/// Publish a bracket (seeds the tree from the entry order).
#[post("/api/brackets")]
async fn api_create_bracket(state: AppState, session: Session, body: Json<NewBracket>) -> HttpResponse {
    let Some(me) = current_identity(&session) else {
        return not_logged_in();
    };
    let mut g = match state.store.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.create_bracket(body.into_inner(), &me.participant_id, Some(&me.display_name), Utc::now()) {
        Ok(b) => HttpResponse::Ok().json(b),
        Err(e) => store_error(e),
    }
}

#[get("/api/brackets/{id}")]
async fn api_get_bracket(state: AppState, path: Path<BracketPath>) -> HttpResponse {
    let g = match state.store.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.bracket(path.id) {
        Ok(b) => HttpResponse::Ok().json(b),
        Err(e) => store_error(e),
    }
}

/// Delete a bracket (creator only).
#[delete("/api/brackets/{id}")]
async fn api_delete_bracket(state: AppState, session: Session, path: Path<BracketPath>) -> HttpResponse {
    let Some(me) = current_identity(&session) else {
        return not_logged_in();
    };
    let mut g = match state.store.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.delete_bracket(path.id, &me.participant_id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => store_error(e),
    }
}

/// Blank printable layout of a published bracket.
#[get("/api/brackets/{id}/view")]
async fn api_bracket_view(state: AppState, path: Path<BracketPath>) -> HttpResponse {
    let g = match state.store.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.bracket(path.id) {
        Ok(b) => HttpResponse::Ok().json(bracket_view(b, None)),
        Err(e) => store_error(e),
    }
}

/// Apply one winner pick to a client-held, in-progress fill-out and return the new tree.
#[post("/api/fill/select")]
async fn api_fill_select(body: Json<SelectWinnerBody>) -> HttpResponse {
    match select_winner(&body.matchups, body.round, body.matchup, body.slot) {
        Ok(next) => HttpResponse::Ok().json(next),
        Err(e) => bracket_error(e),
    }
}

/// Save a filled-out bracket. Anonymous fill-outs are not stored.
#[post("/api/brackets/{id}/submissions")]
async fn api_submit_filled(
    state: AppState,
    session: Session,
    path: Path<BracketPath>,
    body: Json<SubmitFilledBody>,
) -> HttpResponse {
    let Some(me) = current_identity(&session) else {
        return not_logged_in();
    };
    let mut g = match state.store.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let body = body.into_inner();
    match g.submit_filled(path.id, &me.participant_id, Some(&me.display_name), body.matchups, Utc::now()) {
        Ok(s) => HttpResponse::Ok().json(s),
        Err(e) => store_error(e),
    }
}

#[get("/api/brackets/{id}/submissions")]
async fn api_bracket_submissions(state: AppState, path: Path<BracketPath>) -> HttpResponse {
    let g = match state.store.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    HttpResponse::Ok().json(g.bracket_submissions(path.id))
}

#[get("/api/submissions/mine")]
async fn api_my_submissions(state: AppState, session: Session) -> HttpResponse {
    let Some(me) = current_identity(&session) else {
        return not_logged_in();
    };
    let g = match state.store.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    HttpResponse::Ok().json(g.user_submissions(&me.participant_id))
}

/// Printable layout of a filled-out submission, champion included.
#[get("/api/submissions/{id}/view")]
async fn api_submission_view(state: AppState, path: Path<SubmissionPath>) -> HttpResponse {
    let g = match state.store.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let Some(s) = g.submission(path.id) else {
        return HttpResponse::NotFound().json(error_body("Submission not found"));
    };
    match g.bracket(s.bracket_id) {
        Ok(b) => HttpResponse::Ok().json(bracket_view(b, Some(&s.matchups))),
        Err(_) => HttpResponse::Ok().json(tree_view("Bracket", &s.display_name, &s.matchups)),
    }
}

/// Current weekly bracket. Loading it also catches up any rounds the schedule says are due.
#[get("/api/weekly")]
async fn api_get_weekly(state: AppState) -> HttpResponse {
    let mut g = match state.store.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let weekly = match g.weekly_mut() {
        Ok(w) => w,
        Err(e) => return weekly_error(e),
    };
    if let Err(e) = check_and_auto_advance(weekly, &SystemClock) {
        log::warn!("Weekly auto-advance failed: {}", e);
    }
    HttpResponse::Ok().json(&*weekly)
}

/// Start a new weekly bracket (admin only). Replaces the running one.
#[post("/api/weekly")]
async fn api_start_weekly(state: AppState, session: Session, body: Json<StartWeeklyBody>) -> HttpResponse {
    let Some(me) = current_identity(&session) else {
        return not_logged_in();
    };
    let is_admin = |id: &str| state.config.is_admin(id);
    let body = body.into_inner();
    let weekly = match start_weekly(
        body.title,
        &body.entries,
        body.schedule.unwrap_or_default(),
        &me.participant_id,
        &is_admin,
        Utc::now(),
    ) {
        Ok(w) => w,
        Err(e) => return weekly_error(e),
    };
    let mut g = match state.store.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    g.set_weekly(weekly);
    match g.weekly() {
        Ok(w) => HttpResponse::Ok().json(w),
        Err(e) => weekly_error(e),
    }
}

/// Vote in the open round of the weekly bracket (one ballot per round).
#[post("/api/weekly/votes")]
async fn api_weekly_vote(state: AppState, session: Session, body: Json<BallotBody>) -> HttpResponse {
    let Some(me) = current_identity(&session) else {
        return not_logged_in();
    };
    let votes: Vec<(String, Slot)> = body
        .into_inner()
        .votes
        .into_iter()
        .map(|v| (v.matchup_id, v.slot))
        .collect();
    let mut g = match state.store.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let weekly = match g.weekly_mut() {
        Ok(w) => w,
        Err(e) => return weekly_error(e),
    };
    if let Err(e) = check_and_auto_advance(weekly, &SystemClock) {
        log::warn!("Weekly auto-advance failed: {}", e);
    }
    match cast_ballot(weekly, &me.participant_id, &votes) {
        Ok(receipt) => HttpResponse::Ok().json(receipt),
        Err(e) => weekly_error(e),
    }
}

/// Resolve the open round now (admin only).
#[post("/api/weekly/advance")]
async fn api_weekly_advance(state: AppState, session: Session) -> HttpResponse {
    let Some(me) = current_identity(&session) else {
        return not_logged_in();
    };
    let is_admin = |id: &str| state.config.is_admin(id);
    let mut g = match state.store.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let weekly = match g.weekly_mut() {
        Ok(w) => w,
        Err(e) => return weekly_error(e),
    };
    match advance_weekly(weekly, &me.participant_id, &is_admin) {
        Ok(()) => HttpResponse::Ok().json(&*weekly),
        Err(e) => weekly_error(e),
    }
}

/// Create a pool over a published bracket; the caller becomes host.
#[post("/api/pools")]
async fn api_create_pool(state: AppState, session: Session, body: Json<CreatePoolBody>) -> HttpResponse {
    let Some(me) = current_identity(&session) else {
        return not_logged_in();
    };
    let mut g = match state.store.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let body = body.into_inner();
    let pool = match g.bracket(body.bracket_id) {
        Ok(b) => create_pool(
            body.name,
            &me.participant_id,
            &me.display_name,
            b,
            body.rules,
            Utc::now(),
        ),
        Err(e) => return store_error(e),
    };
    HttpResponse::Ok().json(g.insert_pool(pool))
}

#[get("/api/pools/{id}")]
async fn api_get_pool(state: AppState, path: Path<PoolPath>) -> HttpResponse {
    let g = match state.store.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.pool(path.id) {
        Ok(p) => HttpResponse::Ok().json(p),
        Err(e) => pool_error(e),
    }
}

/// Join a pool by its join code.
#[post("/api/pools/join")]
async fn api_join_pool(state: AppState, session: Session, body: Json<JoinPoolBody>) -> HttpResponse {
    let Some(me) = current_identity(&session) else {
        return not_logged_in();
    };
    let mut g = match state.store.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let pool = match g.pool_by_code_mut(&body.code) {
        Ok(p) => p,
        Err(e) => return pool_error(e),
    };
    match join_pool(pool, &me.participant_id, &me.display_name, Utc::now()) {
        Ok(()) => HttpResponse::Ok().json(&*pool),
        Err(e) => pool_error(e),
    }
}

/// Submit the caller's predictions and sleeper picks (once).
#[post("/api/pools/{id}/predictions")]
async fn api_submit_predictions(
    state: AppState,
    session: Session,
    path: Path<PoolPath>,
    body: Json<PredictionsBody>,
) -> HttpResponse {
    let Some(me) = current_identity(&session) else {
        return not_logged_in();
    };
    let mut g = match state.store.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let pool = match g.pool_mut(path.id) {
        Ok(p) => p,
        Err(e) => return pool_error(e),
    };
    let body = body.into_inner();
    match submit_predictions(
        pool,
        &me.participant_id,
        body.predictions,
        body.sleeper1,
        body.sleeper2,
        Utc::now(),
    ) {
        Ok(()) => HttpResponse::Ok().json(&*pool),
        Err(e) => pool_error(e),
    }
}

/// Close a pool to new joins and predictions (host only).
#[post("/api/pools/{id}/close")]
async fn api_close_pool(state: AppState, session: Session, path: Path<PoolPath>) -> HttpResponse {
    let Some(me) = current_identity(&session) else {
        return not_logged_in();
    };
    let mut g = match state.store.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let pool = match g.pool_mut(path.id) {
        Ok(p) => p,
        Err(e) => return pool_error(e),
    };
    match close_pool(pool, &me.participant_id) {
        Ok(()) => HttpResponse::Ok().json(&*pool),
        Err(e) => pool_error(e),
    }
}

/// Record an actual result and re-score every entry (host or admin).
#[put("/api/pools/{id}/results")]
async fn api_pool_result(
    state: AppState,
    session: Session,
    path: Path<PoolPath>,
    body: Json<ResultBody>,
) -> HttpResponse {
    let Some(me) = current_identity(&session) else {
        return not_logged_in();
    };
    let is_admin = |id: &str| state.config.is_admin(id);
    let mut g = match state.store.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let pool = match g.pool_mut(path.id) {
        Ok(p) => p,
        Err(e) => return pool_error(e),
    };
    match record_result(pool, &me.participant_id, &is_admin, body.round, body.matchup, body.slot) {
        Ok(()) => HttpResponse::Ok().json(&*pool),
        Err(e) => pool_error(e),
    }
}

#[get("/api/pools/{id}/leaderboard")]
async fn api_pool_leaderboard(state: AppState, path: Path<PoolPath>) -> HttpResponse {
    let g = match state.store.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.pool(path.id).and_then(leaderboard) {
        Ok(ranked) => HttpResponse::Ok().json(ranked),
        Err(e) => pool_error(e),
    }
}

#[get("/api/pools/{id}/leaderboard.csv")]
async fn api_pool_leaderboard_csv(state: AppState, path: Path<PoolPath>) -> HttpResponse {
    let g = match state.store.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let ranked = match g.pool(path.id).and_then(leaderboard) {
        Ok(r) => r,
        Err(e) => return pool_error(e),
    };
    match leaderboard_csv(&ranked) {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .body(csv),
        Err(e) => HttpResponse::InternalServerError().json(error_body(e)),
    }
}

fn session_key(config: &ServerConfig) -> Key {
    match config.session_key.as_deref() {
        // from_lookup only keeps keys of 64+ bytes
        Some(raw) => Key::from(raw.as_bytes()),
        None => {
            log::warn!("SESSION_KEY unset or shorter than 64 bytes; sessions will not survive a restart");
            Key::generate()
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);
    if config.admin_ids.is_empty() {
        log::warn!("ADMIN_IDS is empty; weekly bracket admin actions are disabled");
    }

    let key = session_key(&config);
    let interval = config.weekly_check_interval;
    let state = Data::new(AppContext {
        store: RwLock::new(Store::new()),
        config,
    });

    // Background task: catch up the weekly bracket on its schedule even when nobody loads it
    let state_scheduler = state.clone();
    actix_web::rt::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let mut g = match state_scheduler.store.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let Ok(weekly) = g.weekly_mut() else {
                continue;
            };
            match check_and_auto_advance(weekly, &SystemClock) {
                Ok(true) => log::info!("Scheduled check advanced the weekly bracket"),
                Ok(false) => {}
                Err(e) => log::warn!("Scheduled weekly advance failed: {}", e),
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .service(api_health)
            .service(favicon)
            .service(api_login)
            .service(api_whoami)
            .service(api_logout)
            .service(api_categories)
            .service(api_import_entries)
            .service(api_list_brackets)
            .service(api_my_brackets)
            .service(api_create_bracket)
            .service(api_get_bracket)
            .service(api_delete_bracket)
            .service(api_bracket_view)
            .service(api_fill_select)
            .service(api_submit_filled)
            .service(api_bracket_submissions)
            .service(api_my_submissions)
            .service(api_submission_view)
            .service(api_get_weekly)
            .service(api_start_weekly)
            .service(api_weekly_vote)
            .service(api_weekly_advance)
            .service(api_create_pool)
            .service(api_join_pool)
            .service(api_get_pool)
            .service(api_submit_predictions)
            .service(api_close_pool)
            .service(api_pool_result)
            .service(api_pool_leaderboard)
            .service(api_pool_leaderboard_csv)
    })
    .bind(bind)?
    .run()
    .await
}
