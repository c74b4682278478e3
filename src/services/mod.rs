pub mod employee_service;
pub mod media_service;
pub mod user_service;
