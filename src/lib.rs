pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{
    employee_service::EmployeeService, media_service::MediaService, user_service::UserService,
};
use reqwest::Client;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub user_service: UserService,
    pub employee_service: EmployeeService,
    pub media_service: MediaService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let config = crate::config::get_config();
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client for media service");

        let user_service = UserService::new(pool.clone());
        let employee_service = EmployeeService::new(pool.clone());
        let media_service = MediaService::new(
            http_client,
            config.cloudinary_cloud_name.clone(),
            config.cloudinary_api_key.clone(),
            config.cloudinary_api_secret.clone(),
            config.max_upload_bytes,
        );

        Self {
            pool,
            user_service,
            employee_service,
            media_service,
        }
    }
}
