//! Controllers
//!
//! Reglas de negocio por agregado. Cada controller recibe la identidad
//! explícita del actor resuelta por el middleware de autenticación.

pub mod availability_controller;
pub mod contract_controller;
pub mod inspection_controller;
pub mod reservation_controller;
pub mod vehicle_controller;
