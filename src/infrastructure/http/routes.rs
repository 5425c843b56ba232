//! HTTP Routes
//!
//! Endpoints:
//! - /              GET   首页 index.html
//! - /create        POST  生成故事音频，返回 HTML 片段
//! - /audio/{file}  GET   已生成的音频文件
//! - /api/ping      GET   健康检查

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};

use super::handlers;
use super::server::ServerConfig;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes(config: &ServerConfig) -> Router<Arc<AppState>> {
    Router::new()
        .route_service("/", ServeFile::new(config.static_dir.join("index.html")))
        .route("/create", post(handlers::create_story))
        .nest_service(
            config.audio_url_prefix.trim_end_matches('/'),
            ServeDir::new(&config.audio_dir),
        )
        .nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new().route("/ping", get(handlers::ping))
}
