mod dto;
pub mod handlers;
pub mod repo;
pub mod types;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::clothes_routes())
        .merge(handlers::insert_list_routes())
}
