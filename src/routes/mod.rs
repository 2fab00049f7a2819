pub mod availability_routes;
pub mod contract_routes;
pub mod inspection_routes;
pub mod reservation_routes;
pub mod vehicle_routes;
