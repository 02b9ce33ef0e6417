//! Modelo de dominio de TradChem: registros de medicinas tradicionales con
//! su composición química, más el validador de completitud.
//!
//! El dominio no posee la colección: el almacén (`tradchem-store`) es el
//! dueño exclusivo y el resto de componentes reciben vistas de solo lectura.

mod errors;
mod medicine;
pub mod validator;

pub use errors::DomainError;
pub use medicine::{ChemicalComposition, Ingredient, MedicineRecord};
pub use validator::{validate_batch, validate_record, BatchReport, ValidationResult};
