//! REST API server for the banking core
//!
//! Exposes accounts, goals, widgets, the virtual pet, health scoring and
//! market quotes over HTTP for the frontend.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tracing::info;
use uuid::Uuid;

use crate::accounts;
use crate::error::BankableError;
use crate::goals::GoalService;
use crate::health::{calculate_health, FinancialProfile};
use crate::market::MarketDataClient;
use crate::pet::VirtualPet;
use crate::widgets::WidgetService;

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Deserialize)]
pub struct CreateGoalRequest {
    pub name: String,
    pub target: f64,
    pub owner: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContributeRequest {
    pub amount: f64,
}

#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub member: String,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Deserialize)]
pub struct AddWidgetRequest {
    pub widget_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SetVisibleRequest {
    pub visible: bool,
}

#[derive(Debug, Deserialize)]
pub struct RecordSavingRequest {
    pub amount: f64,
}

#[derive(Debug, Deserialize)]
pub struct RedeemRewardRequest {
    pub reward_id: String,
}

#[derive(Debug, Deserialize)]
pub struct WearRequest {
    pub outfit_id: String,
}

#[derive(Debug, Deserialize)]
pub struct TransactionsQuery {
    pub count: Option<usize>,
}

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Map a domain error to an HTTP status
fn status_for(error: &BankableError) -> StatusCode {
    match error {
        BankableError::ValidationError(_) => StatusCode::BAD_REQUEST,
        BankableError::NotFound(_) => StatusCode::NOT_FOUND,
        BankableError::MarketDataError(_) | BankableError::RateLimitExceeded(_) => {
            StatusCode::BAD_GATEWAY
        }
        BankableError::ConfigError(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn ok<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse>) {
    (StatusCode::OK, Json(ApiResponse::success(data)))
}

fn err(error: BankableError) -> (StatusCode, Json<ApiResponse>) {
    (status_for(&error), Json(ApiResponse::error(error.to_string())))
}

/// =============================
/// API State
/// =============================

/// Pet plus the moment decay was last applied.
///
/// The pet decays while nobody is looking, so each handler applies the
/// elapsed wall-clock time before acting.
pub struct PetHandle {
    pet: VirtualPet,
    last_tick: Instant,
}

impl PetHandle {
    fn new(pet: VirtualPet) -> Self {
        Self {
            pet,
            last_tick: Instant::now(),
        }
    }

    fn tick(&mut self) -> &mut VirtualPet {
        let elapsed = self.last_tick.elapsed().as_secs_f64();
        self.pet.tick(elapsed);
        self.last_tick = Instant::now();
        &mut self.pet
    }
}

#[derive(Clone)]
pub struct ApiState {
    pub goals: Arc<GoalService>,
    pub widgets: Arc<WidgetService>,
    pub pet: Arc<RwLock<PetHandle>>,
    pub market: Option<Arc<MarketDataClient>>,
}

impl ApiState {
    pub fn new(
        goals: Arc<GoalService>,
        widgets: Arc<WidgetService>,
        market: Option<Arc<MarketDataClient>>,
    ) -> Self {
        Self {
            goals,
            widgets,
            pet: Arc::new(RwLock::new(PetHandle::new(VirtualPet::new()))),
            market,
        }
    }
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Accounts
/// =============================

async fn list_accounts() -> (StatusCode, Json<ApiResponse>) {
    ok(serde_json::json!({
        "accounts": accounts::sample_accounts(),
        "total_balance": accounts::total_balance(),
        "affirmation": accounts::daily_affirmation(),
    }))
}

async fn list_transactions(
    Query(query): Query<TransactionsQuery>,
) -> (StatusCode, Json<ApiResponse>) {
    let count = query.count.unwrap_or(10);
    ok(accounts::recent_transactions(count))
}

/// =============================
/// Goals
/// =============================

async fn list_goals(State(state): State<ApiState>) -> (StatusCode, Json<ApiResponse>) {
    ok(state.goals.list().await)
}

async fn create_goal(
    State(state): State<ApiState>,
    Json(req): Json<CreateGoalRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    let owner = req.owner.as_deref().unwrap_or("You");
    match state.goals.create(&req.name, req.target, owner).await {
        Ok(goal) => (StatusCode::CREATED, Json(ApiResponse::success(goal))),
        Err(e) => err(e),
    }
}

async fn contribute_to_goal(
    State(state): State<ApiState>,
    Path(goal_id): Path<Uuid>,
    Json(req): Json<ContributeRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    match state.goals.contribute(goal_id, req.amount).await {
        Ok(goal) => ok(goal),
        Err(e) => err(e),
    }
}

async fn add_goal_member(
    State(state): State<ApiState>,
    Path(goal_id): Path<Uuid>,
    Json(req): Json<AddMemberRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    match state.goals.add_member(goal_id, &req.member).await {
        Ok(goal) => ok(goal),
        Err(e) => err(e),
    }
}

async fn delete_goal(
    State(state): State<ApiState>,
    Path(goal_id): Path<Uuid>,
) -> (StatusCode, Json<ApiResponse>) {
    match state.goals.delete(goal_id).await {
        Ok(()) => ok(serde_json::json!({ "deleted": goal_id })),
        Err(e) => err(e),
    }
}

/// =============================
/// Widgets
/// =============================

async fn get_widgets(State(state): State<ApiState>) -> (StatusCode, Json<ApiResponse>) {
    ok(serde_json::json!({
        "layout": state.widgets.list().await,
        "available": state.widgets.available().await,
    }))
}

async fn reorder_widgets(
    State(state): State<ApiState>,
    Json(req): Json<ReorderRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    match state.widgets.move_widget(req.from, req.to).await {
        Ok(layout) => ok(layout),
        Err(e) => err(e),
    }
}

async fn add_widget(
    State(state): State<ApiState>,
    Json(req): Json<AddWidgetRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    match state.widgets.add(&req.widget_id).await {
        Ok(layout) => (StatusCode::CREATED, Json(ApiResponse::success(layout))),
        Err(e) => err(e),
    }
}

async fn remove_widget(
    State(state): State<ApiState>,
    Path(widget_id): Path<String>,
) -> (StatusCode, Json<ApiResponse>) {
    match state.widgets.remove(&widget_id).await {
        Ok(layout) => ok(layout),
        Err(e) => err(e),
    }
}

async fn set_widget_visible(
    State(state): State<ApiState>,
    Path(widget_id): Path<String>,
    Json(req): Json<SetVisibleRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    match state.widgets.set_visible(&widget_id, req.visible).await {
        Ok(widget) => ok(widget),
        Err(e) => err(e),
    }
}

/// =============================
/// Virtual Pet
/// =============================

async fn get_pet(State(state): State<ApiState>) -> (StatusCode, Json<ApiResponse>) {
    let mut handle = state.pet.write().await;
    let pet = handle.tick();
    ok(&*pet)
}

async fn feed_pet(State(state): State<ApiState>) -> (StatusCode, Json<ApiResponse>) {
    let mut handle = state.pet.write().await;
    let pet = handle.tick();
    pet.feed();
    ok(&*pet)
}

async fn play_with_pet(State(state): State<ApiState>) -> (StatusCode, Json<ApiResponse>) {
    let mut handle = state.pet.write().await;
    let pet = handle.tick();
    pet.play();
    ok(&*pet)
}

async fn toggle_pet_sleep(State(state): State<ApiState>) -> (StatusCode, Json<ApiResponse>) {
    let mut handle = state.pet.write().await;
    let pet = handle.tick();
    pet.toggle_sleep();
    ok(&*pet)
}

async fn record_pet_saving(
    State(state): State<ApiState>,
    Json(req): Json<RecordSavingRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    let mut handle = state.pet.write().await;
    let pet = handle.tick();
    match pet.record_saving(req.amount) {
        Ok(earned) => ok(serde_json::json!({ "points_earned": earned, "pet": &*pet })),
        Err(e) => err(e),
    }
}

async fn redeem_pet_reward(
    State(state): State<ApiState>,
    Json(req): Json<RedeemRewardRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    let mut handle = state.pet.write().await;
    let pet = handle.tick();
    match pet.redeem_reward(&req.reward_id) {
        Ok(reward) => ok(serde_json::json!({ "reward": reward, "points": pet.points })),
        Err(e) => err(e),
    }
}

async fn wear_outfit(
    State(state): State<ApiState>,
    Json(req): Json<WearRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    let mut handle = state.pet.write().await;
    let pet = handle.tick();
    match pet.wear(&req.outfit_id) {
        Ok(()) => ok(&*pet),
        Err(e) => err(e),
    }
}

async fn buy_outfit(
    State(state): State<ApiState>,
    Json(req): Json<WearRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    let mut handle = state.pet.write().await;
    let pet = handle.tick();
    match pet.buy_outfit(&req.outfit_id) {
        Ok(()) => ok(&*pet),
        Err(e) => err(e),
    }
}

async fn pet_leaderboard(State(state): State<ApiState>) -> (StatusCode, Json<ApiResponse>) {
    let handle = state.pet.read().await;
    ok(handle.pet.leaderboard())
}

/// =============================
/// Health Score
/// =============================

async fn health_score(
    Json(profile): Json<FinancialProfile>,
) -> (StatusCode, Json<ApiResponse>) {
    match calculate_health(&profile) {
        Ok(report) => ok(report),
        Err(e) => err(e),
    }
}

/// =============================
/// Market Data
/// =============================

async fn market_quote(
    State(state): State<ApiState>,
    Path(symbol): Path<String>,
) -> (StatusCode, Json<ApiResponse>) {
    let Some(market) = state.market.as_ref() else {
        return err(BankableError::ConfigError(
            "market data is not configured".to_string(),
        ));
    };

    match market.quote(&symbol).await {
        Ok(quote) => ok(quote),
        Err(e) => err(e),
    }
}

/// =============================
/// Router
/// =============================

pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/accounts", get(list_accounts))
        .route("/api/transactions", get(list_transactions))
        .route("/api/goals", get(list_goals).post(create_goal))
        .route("/api/goals/:id/contribute", post(contribute_to_goal))
        .route("/api/goals/:id/members", post(add_goal_member))
        .route("/api/goals/:id", delete(delete_goal))
        .route("/api/widgets", get(get_widgets))
        .route("/api/widgets/reorder", post(reorder_widgets))
        .route("/api/widgets/add", post(add_widget))
        .route("/api/widgets/:id/visible", post(set_widget_visible))
        .route("/api/widgets/:id", delete(remove_widget))
        .route("/api/pet", get(get_pet))
        .route("/api/pet/feed", post(feed_pet))
        .route("/api/pet/play", post(play_with_pet))
        .route("/api/pet/sleep", post(toggle_pet_sleep))
        .route("/api/pet/savings", post(record_pet_saving))
        .route("/api/pet/rewards", post(redeem_pet_reward))
        .route("/api/pet/outfits/buy", post(buy_outfit))
        .route("/api/pet/outfits/wear", post(wear_outfit))
        .route("/api/pet/leaderboard", get(pet_leaderboard))
        .route("/api/health-score", post(health_score))
        .route("/api/market/quote/:symbol", get(market_quote))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    state: ApiState,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
