pub mod spec_route;
pub mod spec_summary_response;
pub mod upload_spec_request;
