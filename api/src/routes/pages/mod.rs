pub mod pages_route;
