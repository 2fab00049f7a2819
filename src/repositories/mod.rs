//! Repositorios
//!
//! Acceso a datos con SQLx, un repositorio por agregado.

pub mod blocked_date_repository;
pub mod inspection_repository;
pub mod reservation_repository;
pub mod user_repository;
pub mod vehicle_repository;
