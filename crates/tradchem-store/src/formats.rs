// formats.rs
//
// Lectura y escritura de los dos formatos de archivo soportados. JSON es el
// formato de fidelidad completa (ida y vuelta campo a campo); CSV es plano y
// con pérdida: por ingrediente sobreviven el nombre y su SMILES, y se
// descartan `additional_properties` y el resto de campos del ingrediente.
use crate::errors::{Result, StoreError};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::path::Path;
use tradchem_domain::{Ingredient, MedicineRecord};

/// Encabezado canónico del CSV. Los campos multivalor van delimitados por
/// `;` y el n-ésimo ingrediente se alinea con el n-ésimo SMILES.
pub const CSV_HEADERS: [&str; 7] =
    ["product_name", "benefits", "diseases", "ingredients", "smiles", "source", "traditional_system"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Json,
    Csv,
}

impl DataFormat {
    /// Deduce el formato por la extensión del archivo.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()).as_deref() {
            Some("json") => Ok(DataFormat::Json),
            Some("csv") => Ok(DataFormat::Csv),
            other => Err(StoreError::Format(format!("extensión no soportada: {:?}", other.unwrap_or("")))),
        }
    }
}

/// Política ante una fila malformada dentro de un archivo bien formado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// La primera fila mala aborta la carga completa con `StoreError::Parse`.
    AbortOnError,
    /// Las filas malas se saltan y se informan una a una en el reporte.
    #[default]
    SkipAndReport,
}

/// Problema de una fila individual bajo `SkipAndReport`.
#[derive(Debug, Clone, Serialize)]
pub struct RowError {
    pub row: usize,
    pub message: String,
}

pub(crate) struct ParsedFile {
    pub records: Vec<MedicineRecord>,
    pub row_errors: Vec<RowError>,
}

/// Interpreta un documento JSON: un arreglo de registros, u objeto con la
/// clave `medicines` (forma histórica de la base de datos).
pub(crate) fn parse_json_str(text: &str, policy: LoadPolicy) -> Result<ParsedFile> {
    let document: JsonValue =
        serde_json::from_str(text).map_err(|e| StoreError::Format(format!("JSON ilegible: {}", e)))?;
    let rows = match document {
        JsonValue::Array(rows) => rows,
        JsonValue::Object(mut obj) => match obj.remove("medicines") {
            Some(JsonValue::Array(rows)) => rows,
            _ => {
                return Err(StoreError::Format("se esperaba un arreglo o un objeto con la clave 'medicines'".into()))
            }
        },
        _ => return Err(StoreError::Format("se esperaba un arreglo de registros".into())),
    };

    let mut records = Vec::with_capacity(rows.len());
    let mut row_errors = Vec::new();
    for (index, row) in rows.into_iter().enumerate() {
        match MedicineRecord::from_json_value(row) {
            Ok(record) => records.push(record),
            Err(e) => match policy {
                LoadPolicy::AbortOnError => {
                    return Err(StoreError::Parse { row: index, message: e.to_string() })
                }
                LoadPolicy::SkipAndReport => row_errors.push(RowError { row: index, message: e.to_string() }),
            },
        }
    }
    Ok(ParsedFile { records, row_errors })
}

/// Interpreta un CSV con el encabezado canónico. `product_name` es la única
/// columna obligatoria; su ausencia en el encabezado es un error de formato.
pub(crate) fn parse_csv_str(text: &str, policy: LoadPolicy) -> Result<ParsedFile> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(text.as_bytes());
    let headers = reader.headers().map_err(|e| StoreError::Format(format!("CSV ilegible: {}", e)))?.clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);
    let name_col =
        column("product_name").ok_or_else(|| StoreError::Format("el CSV no tiene columna product_name".into()))?;
    let benefits_col = column("benefits");
    let diseases_col = column("diseases");
    let ingredients_col = column("ingredients");
    let smiles_col = column("smiles");
    let source_col = column("source");
    let system_col = column("traditional_system");

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let fail = |message: String, row_errors: &mut Vec<RowError>| -> Result<()> {
            match policy {
                LoadPolicy::AbortOnError => Err(StoreError::Parse { row: index, message }),
                LoadPolicy::SkipAndReport => {
                    row_errors.push(RowError { row: index, message });
                    Ok(())
                }
            }
        };
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                fail(e.to_string(), &mut row_errors)?;
                continue;
            }
        };
        let field = |col: Option<usize>| col.and_then(|c| row.get(c)).unwrap_or("").trim().to_string();

        let product_name = field(Some(name_col));
        if product_name.is_empty() {
            fail("product_name requerido".into(), &mut row_errors)?;
            continue;
        }

        let mut record = MedicineRecord::new(product_name);
        record.benefits = split_multi(&field(benefits_col));
        record.diseases = split_multi(&field(diseases_col));
        let source = field(source_col);
        record.source = (!source.is_empty()).then_some(source);
        let system = field(system_col);
        record.traditional_system = (!system.is_empty()).then_some(system);

        // Alineación posicional: el n-ésimo ingrediente toma el n-ésimo
        // SMILES; los ingredientes sobrantes quedan sin SMILES. Las
        // posiciones vacías se conservan para no correr la alineación.
        let ingredients = split_multi(&field(ingredients_col));
        let smiles_list: Vec<String> =
            field(smiles_col).split(';').map(|s| s.trim().to_string()).collect();
        for (i, ingredient_name) in ingredients.into_iter().enumerate() {
            let ingredient = match smiles_list.get(i) {
                Some(smiles) if !smiles.is_empty() => Ingredient::from_smiles(smiles.clone()),
                _ => Ingredient::default(),
            };
            record.chemical_composition.ingredients.insert(ingredient_name, ingredient);
        }
        records.push(record);
    }
    Ok(ParsedFile { records, row_errors })
}

fn split_multi(value: &str) -> Vec<String> {
    value.split(';').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect()
}

/// Serializa la colección completa como arreglo JSON. Inversa de la carga
/// JSON: la ida y vuelta reproduce la colección campo a campo.
pub(crate) fn to_json_string(records: &[MedicineRecord]) -> Result<String> {
    serde_json::to_string_pretty(records).map_err(|e| StoreError::Format(format!("no se pudo serializar: {}", e)))
}

/// Serializa la colección como CSV plano, una fila por registro. Con
/// pérdida: ver la regla de aplanado en el encabezado del módulo.
pub(crate) fn to_csv_string(records: &[MedicineRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADERS).map_err(|e| StoreError::Format(e.to_string()))?;
    for record in records {
        let ingredients: Vec<&str> = record.ingredient_names().collect();
        let smiles: Vec<&str> = record.chemical_composition
                                      .ingredients
                                      .values()
                                      .map(|i| i.smiles.as_deref().unwrap_or(""))
                                      .collect();
        writer.write_record([record.product_name.as_str(),
                             &record.benefits.join("; "),
                             &record.diseases.join("; "),
                             &ingredients.join("; "),
                             &smiles.join("; "),
                             record.source.as_deref().unwrap_or(""),
                             record.traditional_system.as_deref().unwrap_or("")])
              .map_err(|e| StoreError::Format(e.to_string()))?;
    }
    let bytes = writer.into_inner().map_err(|e| StoreError::Format(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| StoreError::Format(e.to_string()))
}
