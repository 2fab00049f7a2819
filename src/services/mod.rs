//! Services module
//!
//! Este módulo contiene la lógica de negocio y servicios de la aplicación.
//! Los servicios encapsulan la derivación de disponibilidad y los
//! colaboradores externos: despachador de emails, renderizador de
//! documentos y object store.

pub mod availability_service;
pub mod document_service;
pub mod notification_service;

pub use availability_service::*;
pub use document_service::*;
pub use notification_service::*;
