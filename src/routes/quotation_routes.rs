use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};

use crate::dto::quotation_dto::{QuotationForm, QuotationQuery};
use crate::dto::ApiResponse;
use crate::models::{EntityId, QuotationSummary, SessionContext};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::pagination::Page;

pub fn create_quotation_router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit))
        .route("/:id", get(get_quotation))
        .route("/:id/approve", put(approve))
        .route("/:id/reject", put(reject))
        .route("/:id/pdf", get(download_pdf))
        .route("/vendor/:vendor_id", get(list_by_vendor))
        .route("/company/:company_id", get(list_by_company))
}

async fn submit(
    State(state): State<AppState>,
    session: SessionContext,
    Json(form): Json<QuotationForm>,
) -> Result<(StatusCode, Json<ApiResponse<QuotationSummary>>), AppError> {
    let quotation = state.quotations.submit(&session, form).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(quotation, "Quotation submitted successfully")),
    ))
}

async fn get_quotation(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<EntityId>,
) -> Result<Json<ApiResponse<QuotationSummary>>, AppError> {
    let quotation = state.quotations.get(&session, id).await?;
    Ok(Json(ApiResponse::success(quotation)))
}

async fn approve(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<EntityId>,
) -> Result<Json<ApiResponse<QuotationSummary>>, AppError> {
    let quotation = state.quotations.approve(&session, id).await?;
    Ok(Json(ApiResponse::success_with_message(quotation, "Quotation approved")))
}

async fn reject(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<EntityId>,
) -> Result<Json<ApiResponse<QuotationSummary>>, AppError> {
    let quotation = state.quotations.reject(&session, id).await?;
    Ok(Json(ApiResponse::success_with_message(quotation, "Quotation rejected")))
}

async fn download_pdf(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<EntityId>,
) -> Result<Response, AppError> {
    let pdf = state.quotations.download_pdf(&session, id).await?;
    let disposition = format!("attachment; filename=\"{}\"", pdf.filename);
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf.bytes,
    )
        .into_response())
}

async fn list_by_vendor(
    State(state): State<AppState>,
    session: SessionContext,
    Path(vendor_id): Path<EntityId>,
    Query(query): Query<QuotationQuery>,
) -> Result<Json<ApiResponse<Page<QuotationSummary>>>, AppError> {
    let page = state.quotations.list_by_vendor(&session, vendor_id, &query).await?;
    Ok(Json(ApiResponse::success(page)))
}

async fn list_by_company(
    State(state): State<AppState>,
    session: SessionContext,
    Path(company_id): Path<EntityId>,
    Query(query): Query<QuotationQuery>,
) -> Result<Json<ApiResponse<Page<QuotationSummary>>>, AppError> {
    let page = state.quotations.list_by_company(&session, company_id, &query).await?;
    Ok(Json(ApiResponse::success(page)))
}
