use crate::domain::expense::{CreateExpense, ExpenseQuery, UpdateExpense};
use crate::domain::report::ReportQuery;
use crate::presentation::auth::MessageResponse;
use crate::presentation::handlers::{ApiError, AppState};
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::{HttpResponse, web};
use chrono::Utc;
use tracing::{info, instrument};

#[instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn list_expenses(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<ExpenseQuery>,
) -> Result<HttpResponse, ApiError> {
    let expenses = state
        .expense_service
        .list_expenses(&user.user_id, query.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(expenses))
}

#[instrument(skip(state, req), fields(user_id = %user.user_id))]
pub async fn create_expense(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<CreateExpense>,
) -> Result<HttpResponse, ApiError> {
    let expense = state
        .expense_service
        .create_expense(&user.user_id, req.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(expense))
}

#[instrument(skip(state, req), fields(user_id = %user.user_id, expense_id = %*path))]
pub async fn update_expense(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    req: web::Json<UpdateExpense>,
) -> Result<HttpResponse, ApiError> {
    let expense = state
        .expense_service
        .update_expense(&user.user_id, &path.into_inner(), req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(expense))
}

#[instrument(skip(state), fields(user_id = %user.user_id, expense_id = %*path))]
pub async fn delete_expense(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    state
        .expense_service
        .delete_expense(&user.user_id, &path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Deleted".to_string(),
    }))
}

#[instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn get_report(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner();
    let reference = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let report = state
        .expense_service
        .report(&user.user_id, query.period, reference)
        .await?;

    info!(period = %report.period.label, "Report served");
    Ok(HttpResponse::Ok().json(report))
}
