// store.rs
use crate::errors::Result;
use crate::formats::{self, DataFormat, LoadPolicy, RowError};
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tradchem_domain::MedicineRecord;

/// Resultado de una carga: cuántos registros entraron y qué filas fallaron
/// (vacío bajo `AbortOnError`, que corta en la primera).
#[derive(Debug, Serialize)]
pub struct LoadReport {
    pub loaded: usize,
    pub row_errors: Vec<RowError>,
}

/// Almacén en memoria de registros de medicinas.
///
/// Dueño exclusivo de la colección: validador, búsqueda y estadísticas
/// reciben `records()` como vista de solo lectura. El ciclo de vida es carga
/// masiva, `add` de a uno y reemplazo por recarga; no hay actualización en
/// sitio ni borrado individual.
///
/// Limitación conocida: no hay coordinación entre procesos. Dos procesos
/// escribiendo el mismo archivo de respaldo quedan en "último escritor
/// gana".
#[derive(Debug, Default)]
pub struct MedicineStore {
    records: Vec<MedicineRecord>,
}

impl MedicineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reemplaza la colección con el contenido del archivo. El formato se
    /// deduce de la extensión (`.json` / `.csv`); una extensión desconocida
    /// o un documento ilegible es `StoreError::Format` y aborta sin tocar
    /// la colección en memoria.
    pub fn load(&mut self, path: impl AsRef<Path>, policy: LoadPolicy) -> Result<LoadReport> {
        let path = path.as_ref();
        let format = DataFormat::from_path(path)?;
        let text = fs::read_to_string(path)?;
        self.load_from_str(&text, format, policy)
    }

    /// Núcleo de la carga, sin E/S: útil para cargar desde memoria.
    pub fn load_from_str(&mut self, text: &str, format: DataFormat, policy: LoadPolicy) -> Result<LoadReport> {
        let parsed = match format {
            DataFormat::Json => formats::parse_json_str(text, policy)?,
            DataFormat::Csv => formats::parse_csv_str(text, policy)?,
        };
        self.records = parsed.records;
        Ok(LoadReport { loaded: self.records.len(), row_errors: parsed.row_errors })
    }

    /// Agrega un registro al final. No valida (eso es del llamador): solo
    /// normaliza espacios y sella `entry_id` y `date_added` si faltan.
    /// Devuelve la copia almacenada.
    pub fn add(&mut self, mut record: MedicineRecord) -> &MedicineRecord {
        record.normalize();
        if record.entry_id.is_none() {
            record.entry_id = Some(format!("TC_{:06}", self.records.len() + 1));
        }
        if record.date_added.is_none() {
            record.date_added = Some(Utc::now());
        }
        self.records.push(record);
        self.records.last().expect("recién insertado")
    }

    /// Serializa la colección completa. JSON reproduce el modelo campo a
    /// campo; CSV aplana según la regla documentada en `formats`.
    pub fn export(&self, format: DataFormat) -> Result<String> {
        match format {
            DataFormat::Json => formats::to_json_string(&self.records),
            DataFormat::Csv => formats::to_csv_string(&self.records),
        }
    }

    /// Exporta a un archivo; el formato se deduce de la extensión.
    pub fn export_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = DataFormat::from_path(path)?;
        let text = self.export(format)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Copia de respaldo en JSON, independiente de la extensión destino.
    pub fn backup_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = formats::to_json_string(&self.records)?;
        fs::write(path.as_ref(), text)?;
        Ok(())
    }

    /// Vista de solo lectura de la colección, en orden de inserción.
    pub fn records(&self) -> &[MedicineRecord] {
        &self.records
    }

    pub fn list_names(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.product_name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

/// Carga un archivo en un almacén nuevo.
pub fn read_database(path: impl AsRef<Path>, policy: LoadPolicy) -> Result<MedicineStore> {
    let mut store = MedicineStore::new();
    store.load(path, policy)?;
    Ok(store)
}
