use crate::presentation::auth::{
    forgot_password, login, me, reset_password, signup_send_otp, signup_verify_otp,
};
use crate::presentation::expenses::{
    create_expense, delete_expense, get_report, list_expenses, update_expense,
};
use crate::presentation::handlers::{ApiError, health_check, list_categories};
use actix_web::web;

/// Mounts the whole API under `/api`. Malformed JSON bodies and query strings
/// are answered in the same error format as domain failures.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ApiError::Validation(err.to_string()).into()),
    )
    .service(
        web::scope("/api")
            .route("/health", web::get().to(health_check))
            .route("/categories", web::get().to(list_categories))
            .service(
                web::scope("/auth")
                    .route("/signup-send-otp", web::post().to(signup_send_otp))
                    .route("/signup-verify-otp", web::post().to(signup_verify_otp))
                    .route("/forgot-password", web::post().to(forgot_password))
                    .route("/reset-password", web::post().to(reset_password))
                    .route("/login", web::post().to(login))
                    .route("/me", web::get().to(me)),
            )
            .route("/expenses", web::get().to(list_expenses))
            .route("/expenses", web::post().to(create_expense))
            .route("/expenses/{id}", web::put().to(update_expense))
            .route("/expenses/{id}", web::delete().to(delete_expense))
            .route("/reports", web::get().to(get_report)),
    );
}
