use axum::Router;

pub mod client;
pub mod objects;

use crate::daemon::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .merge(objects::router(state.clone()))
        .with_state(state)
}
