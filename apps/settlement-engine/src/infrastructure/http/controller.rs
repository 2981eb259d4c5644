//! HTTP Controller (Driver Adapter)
//!
//! Axum-based REST API that delegates to the commission and transaction
//! engines and the statistics aggregator.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{FromRequestParts, Path, State},
    http::{StatusCode, request::Parts},
    response::IntoResponse,
    routing::{get, patch, post},
};
use tower_http::trace::TraceLayer;

use crate::application::dto::{CommissionView, Page, StatsQuery, TransactionView};
use crate::application::ports::{
    MarketDataPort, NotificationPort, SettlementStore, UserDirectoryPort,
};
use crate::application::services::Directory;
use crate::application::use_cases::{CommissionEngine, StatisticsAggregator, TransactionEngine};
use crate::domain::access::Actor;
use crate::domain::market::MarketStats;
use crate::domain::shared::{CommissionId, TransactionId};
use crate::domain::statistics::{CommissionStats, TransactionStats};

use super::extract::{CallerId, JsonBody, QueryParams};
use super::request::{
    CommissionListParams, CommissionStatusRequest, CreateCommissionRequest,
    CreateTransactionRequest, PaymentProofRequest, StatsParams, TransactionListParams,
    TransactionStatusRequest, UpdateCommissionRequest, UpdateTransactionRequest,
};
use super::response::{ApiError, ApiResponse, HealthResponse};

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Application state shared across handlers.
pub struct AppState<S, U, N, M>
where
    S: SettlementStore,
    U: UserDirectoryPort + 'static,
    N: NotificationPort + 'static,
    M: MarketDataPort,
{
    /// Commission use cases.
    pub commissions: Arc<CommissionEngine<S, U, N>>,
    /// Transaction use cases.
    pub transactions: Arc<TransactionEngine<S, U, N, M>>,
    /// Statistics queries.
    pub statistics: Arc<StatisticsAggregator<S, M>>,
    /// Resolves the `x-user-id` header into an actor.
    pub directory: Directory<U>,
    /// Application version.
    pub version: String,
}

impl<S, U, N, M> Clone for AppState<S, U, N, M>
where
    S: SettlementStore,
    U: UserDirectoryPort + 'static,
    N: NotificationPort + 'static,
    M: MarketDataPort,
{
    fn clone(&self) -> Self {
        Self {
            commissions: Arc::clone(&self.commissions),
            transactions: Arc::clone(&self.transactions),
            statistics: Arc::clone(&self.statistics),
            directory: self.directory.clone(),
            version: self.version.clone(),
        }
    }
}

/// The caller, resolved through the user directory.
struct Authenticated(Actor);

impl<S, U, N, M> FromRequestParts<AppState<S, U, N, M>> for Authenticated
where
    S: SettlementStore,
    U: UserDirectoryPort + 'static,
    N: NotificationPort + 'static,
    M: MarketDataPort,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S, U, N, M>,
    ) -> Result<Self, Self::Rejection> {
        let CallerId(user_id) = CallerId::from_request_parts(parts, state).await?;
        let actor = state.directory.resolve_actor(&user_id).await?;
        Ok(Self(actor))
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router<S, U, N, M>(state: AppState<S, U, N, M>) -> Router
where
    S: SettlementStore + 'static,
    U: UserDirectoryPort + 'static,
    N: NotificationPort + 'static,
    M: MarketDataPort + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/commissions",
            post(create_commission).get(list_commissions),
        )
        .route("/commissions/my/commissions", get(my_commissions))
        .route("/commissions/stats", get(commission_stats))
        .route(
            "/commissions/{id}",
            get(get_commission)
                .put(update_commission)
                .delete(delete_commission),
        )
        .route("/commissions/{id}/status", patch(update_commission_status))
        .route(
            "/transactions",
            post(create_transaction).get(list_transactions),
        )
        .route("/transactions/my/transactions", get(my_transactions))
        .route("/transactions/stats", get(transaction_stats))
        .route(
            "/transactions/{id}",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
        .route(
            "/transactions/{id}/status",
            patch(update_transaction_status),
        )
        .route(
            "/transactions/{id}/payment-proof",
            post(upload_payment_proof),
        )
        .route("/market/stats", get(market_stats))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check<S, U, N, M>(State(state): State<AppState<S, U, N, M>>) -> impl IntoResponse
where
    S: SettlementStore,
    U: UserDirectoryPort + 'static,
    N: NotificationPort + 'static,
    M: MarketDataPort,
{
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
    })
}

// ============================================
// Commissions
// ============================================

async fn create_commission<S, U, N, M>(
    State(state): State<AppState<S, U, N, M>>,
    Authenticated(actor): Authenticated,
    JsonBody(body): JsonBody<CreateCommissionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CommissionView>>), ApiError>
where
    S: SettlementStore,
    U: UserDirectoryPort + 'static,
    N: NotificationPort + 'static,
    M: MarketDataPort,
{
    let view = state.commissions.create(&actor, body.try_into()?).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(view, "Commission created successfully")),
    ))
}

async fn list_commissions<S, U, N, M>(
    State(state): State<AppState<S, U, N, M>>,
    Authenticated(actor): Authenticated,
    QueryParams(params): QueryParams<CommissionListParams>,
) -> ApiResult<Page<CommissionView>>
where
    S: SettlementStore,
    U: UserDirectoryPort + 'static,
    N: NotificationPort + 'static,
    M: MarketDataPort,
{
    let query = params.into_query(state.commissions.page_settings());
    let page = state.commissions.list(&actor, query).await?;
    Ok(Json(ApiResponse::ok(page)))
}

async fn my_commissions<S, U, N, M>(
    State(state): State<AppState<S, U, N, M>>,
    Authenticated(actor): Authenticated,
    QueryParams(params): QueryParams<CommissionListParams>,
) -> ApiResult<Page<CommissionView>>
where
    S: SettlementStore,
    U: UserDirectoryPort + 'static,
    N: NotificationPort + 'static,
    M: MarketDataPort,
{
    let query = params.into_query(state.commissions.page_settings());
    let page = state.commissions.list_mine(&actor, query).await?;
    Ok(Json(ApiResponse::ok(page)))
}

async fn commission_stats<S, U, N, M>(
    State(state): State<AppState<S, U, N, M>>,
    Authenticated(actor): Authenticated,
    QueryParams(params): QueryParams<StatsParams>,
) -> ApiResult<CommissionStats>
where
    S: SettlementStore,
    U: UserDirectoryPort + 'static,
    N: NotificationPort + 'static,
    M: MarketDataPort,
{
    let query = StatsQuery::try_from(params)?;
    let stats = state.statistics.commission_stats(&actor, query).await?;
    Ok(Json(ApiResponse::ok(stats)))
}

async fn get_commission<S, U, N, M>(
    State(state): State<AppState<S, U, N, M>>,
    Authenticated(actor): Authenticated,
    Path(id): Path<CommissionId>,
) -> ApiResult<CommissionView>
where
    S: SettlementStore,
    U: UserDirectoryPort + 'static,
    N: NotificationPort + 'static,
    M: MarketDataPort,
{
    let view = state.commissions.get(&actor, &id).await?;
    Ok(Json(ApiResponse::ok(view)))
}

async fn update_commission<S, U, N, M>(
    State(state): State<AppState<S, U, N, M>>,
    Authenticated(actor): Authenticated,
    Path(id): Path<CommissionId>,
    JsonBody(body): JsonBody<UpdateCommissionRequest>,
) -> ApiResult<CommissionView>
where
    S: SettlementStore,
    U: UserDirectoryPort + 'static,
    N: NotificationPort + 'static,
    M: MarketDataPort,
{
    let view = state.commissions.update(&actor, &id, body.try_into()?).await?;
    Ok(Json(ApiResponse::with_message(
        view,
        "Commission updated successfully",
    )))
}

async fn update_commission_status<S, U, N, M>(
    State(state): State<AppState<S, U, N, M>>,
    Authenticated(actor): Authenticated,
    Path(id): Path<CommissionId>,
    JsonBody(body): JsonBody<CommissionStatusRequest>,
) -> ApiResult<CommissionView>
where
    S: SettlementStore,
    U: UserDirectoryPort + 'static,
    N: NotificationPort + 'static,
    M: MarketDataPort,
{
    let view = state
        .commissions
        .update_status(&actor, &id, body.status, body.notes)
        .await?;
    Ok(Json(ApiResponse::with_message(
        view,
        "Commission status updated successfully",
    )))
}

async fn delete_commission<S, U, N, M>(
    State(state): State<AppState<S, U, N, M>>,
    Authenticated(actor): Authenticated,
    Path(id): Path<CommissionId>,
) -> ApiResult<()>
where
    S: SettlementStore,
    U: UserDirectoryPort + 'static,
    N: NotificationPort + 'static,
    M: MarketDataPort,
{
    state.commissions.delete(&actor, &id).await?;
    Ok(Json(ApiResponse::message("Commission deleted successfully")))
}

// ============================================
// Transactions
// ============================================

async fn create_transaction<S, U, N, M>(
    State(state): State<AppState<S, U, N, M>>,
    Authenticated(actor): Authenticated,
    JsonBody(body): JsonBody<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionView>>), ApiError>
where
    S: SettlementStore,
    U: UserDirectoryPort + 'static,
    N: NotificationPort + 'static,
    M: MarketDataPort,
{
    let view = state.transactions.create(&actor, body.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            view,
            "Transaction request created successfully",
        )),
    ))
}

async fn list_transactions<S, U, N, M>(
    State(state): State<AppState<S, U, N, M>>,
    Authenticated(actor): Authenticated,
    QueryParams(params): QueryParams<TransactionListParams>,
) -> ApiResult<Page<TransactionView>>
where
    S: SettlementStore,
    U: UserDirectoryPort + 'static,
    N: NotificationPort + 'static,
    M: MarketDataPort,
{
    let query = params.into_query(state.transactions.page_settings());
    let page = state.transactions.list(&actor, query).await?;
    Ok(Json(ApiResponse::ok(page)))
}

async fn my_transactions<S, U, N, M>(
    State(state): State<AppState<S, U, N, M>>,
    Authenticated(actor): Authenticated,
    QueryParams(params): QueryParams<TransactionListParams>,
) -> ApiResult<Page<TransactionView>>
where
    S: SettlementStore,
    U: UserDirectoryPort + 'static,
    N: NotificationPort + 'static,
    M: MarketDataPort,
{
    let query = params.into_query(state.transactions.page_settings());
    let page = state.transactions.list_mine(&actor, query).await?;
    Ok(Json(ApiResponse::ok(page)))
}

async fn transaction_stats<S, U, N, M>(
    State(state): State<AppState<S, U, N, M>>,
    Authenticated(actor): Authenticated,
    QueryParams(params): QueryParams<StatsParams>,
) -> ApiResult<TransactionStats>
where
    S: SettlementStore,
    U: UserDirectoryPort + 'static,
    N: NotificationPort + 'static,
    M: MarketDataPort,
{
    let query = StatsQuery::try_from(params)?;
    let stats = state.statistics.transaction_stats(&actor, query).await?;
    Ok(Json(ApiResponse::ok(stats)))
}

async fn get_transaction<S, U, N, M>(
    State(state): State<AppState<S, U, N, M>>,
    Authenticated(actor): Authenticated,
    Path(id): Path<TransactionId>,
) -> ApiResult<TransactionView>
where
    S: SettlementStore,
    U: UserDirectoryPort + 'static,
    N: NotificationPort + 'static,
    M: MarketDataPort,
{
    let view = state.transactions.get(&actor, &id).await?;
    Ok(Json(ApiResponse::ok(view)))
}

async fn update_transaction<S, U, N, M>(
    State(state): State<AppState<S, U, N, M>>,
    Authenticated(actor): Authenticated,
    Path(id): Path<TransactionId>,
    JsonBody(body): JsonBody<UpdateTransactionRequest>,
) -> ApiResult<TransactionView>
where
    S: SettlementStore,
    U: UserDirectoryPort + 'static,
    N: NotificationPort + 'static,
    M: MarketDataPort,
{
    let view = state.transactions.update(&actor, &id, body.into()).await?;
    Ok(Json(ApiResponse::with_message(
        view,
        "Transaction updated successfully",
    )))
}

async fn update_transaction_status<S, U, N, M>(
    State(state): State<AppState<S, U, N, M>>,
    Authenticated(actor): Authenticated,
    Path(id): Path<TransactionId>,
    JsonBody(body): JsonBody<TransactionStatusRequest>,
) -> ApiResult<TransactionView>
where
    S: SettlementStore,
    U: UserDirectoryPort + 'static,
    N: NotificationPort + 'static,
    M: MarketDataPort,
{
    let view = state
        .transactions
        .update_status(&actor, &id, body.status, body.notes)
        .await?;
    Ok(Json(ApiResponse::with_message(
        view,
        "Transaction status updated successfully",
    )))
}

async fn upload_payment_proof<S, U, N, M>(
    State(state): State<AppState<S, U, N, M>>,
    Authenticated(actor): Authenticated,
    Path(id): Path<TransactionId>,
    JsonBody(body): JsonBody<PaymentProofRequest>,
) -> ApiResult<TransactionView>
where
    S: SettlementStore,
    U: UserDirectoryPort + 'static,
    N: NotificationPort + 'static,
    M: MarketDataPort,
{
    let view = state
        .transactions
        .upload_payment_proof(&actor, &id, body.payment_proof_url)
        .await?;
    Ok(Json(ApiResponse::with_message(
        view,
        "Payment proof uploaded successfully",
    )))
}

async fn delete_transaction<S, U, N, M>(
    State(state): State<AppState<S, U, N, M>>,
    Authenticated(actor): Authenticated,
    Path(id): Path<TransactionId>,
) -> ApiResult<()>
where
    S: SettlementStore,
    U: UserDirectoryPort + 'static,
    N: NotificationPort + 'static,
    M: MarketDataPort,
{
    state.transactions.delete(&actor, &id).await?;
    Ok(Json(ApiResponse::message("Transaction deleted successfully")))
}

// ============================================
// Market
// ============================================

async fn market_stats<S, U, N, M>(
    State(state): State<AppState<S, U, N, M>>,
    Authenticated(actor): Authenticated,
) -> ApiResult<MarketStats>
where
    S: SettlementStore,
    U: UserDirectoryPort + 'static,
    N: NotificationPort + 'static,
    M: MarketDataPort,
{
    let stats = state.statistics.market_stats(&actor).await?;
    Ok(Json(ApiResponse::ok(stats)))
}
