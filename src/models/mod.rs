//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL con las convenciones estándar.

pub mod blocked_date;
pub mod inspection;
pub mod reservation;
pub mod user;
pub mod vehicle;
