pub mod models_response;
pub mod models_route;
