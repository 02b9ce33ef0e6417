// errors.rs
// Taxonomía de errores del almacén. El almacén nunca imprime ni registra:
// todo fallo se devuelve al llamador, que decide el comportamiento visible.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// La estructura del archivo no corresponde a ningún formato soportado.
    /// Aborta la operación completa bajo cualquier política de carga.
    #[error("Formato no soportado: {0}")]
    Format(String),
    /// Un archivo estructuralmente válido contiene una fila que no puede
    /// convertirse en registro. Recuperable por fila bajo `SkipAndReport`.
    #[error("Fila {row}: {message}")]
    Parse { row: usize, message: String },
    /// Parámetro malformado del llamador. Siempre se devuelve, nunca se
    /// corrige en silencio.
    #[error("Argumento inválido: {0}")]
    InvalidArgument(String),
    #[error("Error de E/S: {0}")]
    Io(#[from] std::io::Error),
}

/// Alias de resultado usado por las APIs del crate.
pub type Result<T> = std::result::Result<T, StoreError>;
