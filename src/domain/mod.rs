pub mod category;
pub mod error;
pub mod expense;
pub mod notification;
pub mod otp;
pub mod report;
pub mod repository;
pub mod user;
pub mod validation;
