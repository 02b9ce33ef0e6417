// medicine.rs
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// Un componente químico dentro de la composición de una medicina.
///
/// El SMILES puede ser sintácticamente inválido: la validez la determina el
/// motor quimioinformático, nunca la construcción del valor. Los datos
/// abiertos que no caben en los campos tipados viajan en
/// `additional_properties` y sobreviven el viaje de ida y vuelta en JSON
/// (la exportación CSV los descarta).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Ingredient {
  #[serde(default, alias = "primary_smiles", skip_serializing_if = "Option::is_none")]
  pub smiles: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub molecular_weight: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub formula: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub cas_number: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub pubchem_id: Option<String>,
  #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
  pub additional_properties: serde_json::Map<String, JsonValue>,
}

impl Ingredient {
  pub fn from_smiles(smiles: impl Into<String>) -> Self {
    Self { smiles: Some(smiles.into()), ..Self::default() }
  }
}

/// Composición química de una medicina: nombre de ingrediente -> ingrediente.
/// El mapa conserva el orden de inserción y garantiza claves únicas dentro
/// del registro.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChemicalComposition {
  #[serde(default)]
  pub ingredients: IndexMap<String, Ingredient>,
}

/// Una entrada de medicina tradicional.
///
/// `product_name` es la clave principal de búsqueda pero no es única: la
/// colección tolera nombres duplicados y la búsqueda devuelve todas las
/// coincidencias. `benefits` y `diseases` siempre existen (vacíos por
/// defecto) para que búsqueda y estadísticas no manejen ausencias.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MedicineRecord {
  pub product_name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub scientific_name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub traditional_system: Option<String>,
  #[serde(default)]
  pub benefits: Vec<String>,
  #[serde(default)]
  pub diseases: Vec<String>,
  #[serde(default)]
  pub chemical_composition: ChemicalComposition,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub source: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub source_url: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub dosage_info: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub contraindications: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub interactions: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub geographic_origin: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub harvesting_season: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub preparation_method: Option<String>,
  /// Identificador `TC_NNNNNN` asignado por el almacén al agregar.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub entry_id: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub date_added: Option<DateTime<Utc>>,
}

impl MedicineRecord {
  pub fn new(product_name: impl Into<String>) -> Self {
    Self { product_name: product_name.into(), ..Self::default() }
  }

  /// Construye un registro desde un valor JSON suelto (una fila de un
  /// archivo de carga, el cuerpo de un `add`). Un objeto que no encaja en
  /// el modelo produce `DomainError::SerializationError`.
  pub fn from_json_value(value: JsonValue) -> Result<Self, crate::DomainError> {
    Ok(serde_json::from_value(value)?)
  }

  /// Recorta espacios en el nombre y en cada beneficio/enfermedad, y
  /// descarta entradas que quedaron vacías. No toca los SMILES: esos los
  /// normaliza el motor químico si el llamador lo pide.
  pub fn normalize(&mut self) {
    self.product_name = self.product_name.trim().to_string();
    let clean = |values: &mut Vec<String>| {
      *values = values.iter().map(|v| v.trim().to_string()).filter(|v| !v.is_empty()).collect();
    };
    clean(&mut self.benefits);
    clean(&mut self.diseases);
    if let Some(s) = &self.scientific_name {
      self.scientific_name = Some(s.trim().to_string());
    }
    if let Some(s) = &self.traditional_system {
      self.traditional_system = Some(s.trim().to_string());
    }
  }

  pub fn ingredient_names(&self) -> impl Iterator<Item = &str> {
    self.chemical_composition.ingredients.keys().map(String::as_str)
  }
}

impl fmt::Display for MedicineRecord {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f,
           "MedicineRecord({}, sistema: {}, ingredientes: {})",
           self.product_name,
           self.traditional_system.as_deref().unwrap_or("-"),
           self.chemical_composition.ingredients.len())
  }
}
