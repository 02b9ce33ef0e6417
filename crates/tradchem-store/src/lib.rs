//! Almacén de registros de medicinas tradicionales: carga y exportación de
//! archivos (JSON/CSV), búsqueda por recorrido lineal y estadísticas.
//!
//! Modelo de ejecución: síncrono y monohilo. El almacén no coordina
//! escritores concurrentes; un servicio que lo exponga por red debe
//! serializar el acceso (por ejemplo con un candado global alrededor de
//! `load`/`add`/`export`). El núcleo nunca imprime ni registra eventos:
//! todo fallo se devuelve al llamador.

mod errors;
mod formats;
pub mod search;
pub mod stats;
mod store;

pub use errors::{Result, StoreError};
pub use formats::{DataFormat, LoadPolicy, RowError, CSV_HEADERS};
pub use search::{filter, get_by_name, search, FieldFilter, SearchMode};
pub use stats::{chemical_summary, distribution_by, overview, total_count, ChemicalSummary, DistributionField,
                StoreOverview};
pub use store::{read_database, LoadReport, MedicineStore};
