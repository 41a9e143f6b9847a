pub mod generate_request;
pub mod generate_response;
pub mod generate_route;
