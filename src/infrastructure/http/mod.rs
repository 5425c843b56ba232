//! HTTP Layer - 页面、表单提交与音频文件服务

pub mod error;
pub mod form;
pub mod handlers;
pub mod middleware;
pub mod render;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use routes::create_routes;
pub use server::{HttpServer, ServerConfig};
pub use state::AppState;
