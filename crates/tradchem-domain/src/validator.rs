// validator.rs
//
// Evaluación de completitud y consistencia de registros. Funciones puras:
// el mismo registro produce siempre el mismo resultado, sin efectos
// secundarios ni registro de eventos.
use crate::{DomainError, MedicineRecord};
use serde::Serialize;
use std::collections::BTreeSet;
use tradchem_chem::ChemEngine;

/// Resultado de validar un registro individual.
///
/// Un campo requerido ausente o un SMILES inválido invalidan el registro;
/// un SMILES *ausente* se anota como defecto pero no lo invalida. Cuando el
/// motor químico no está disponible los SMILES quedan sin verificar: no
/// verificable no es lo mismo que inválido.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
  pub is_valid: bool,
  pub missing_fields: BTreeSet<String>,
  pub defects: Vec<String>,
}

/// Resumen de validar un lote completo.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
  pub total: usize,
  pub valid: usize,
  pub invalid: usize,
  /// Fracción de registros válidos, en `[0, 1]`. Vale 0 para el lote vacío.
  pub data_quality_score: f64,
  pub per_record: Vec<ValidationResult>,
}

impl BatchReport {
  /// Compuerta estricta: error si algún registro del lote resultó inválido.
  /// Útil para flujos de carga que exigen un lote limpio antes de continuar.
  pub fn ensure_all_valid(&self) -> Result<(), DomainError> {
    if self.invalid == 0 {
      Ok(())
    } else {
      Err(DomainError::ValidationError(format!("{} de {} registros inválidos", self.invalid, self.total)))
    }
  }
}

pub fn validate_record(record: &MedicineRecord, engine: &dyn ChemEngine) -> ValidationResult {
  let mut missing_fields = BTreeSet::new();
  let mut defects = Vec::new();
  let mut hard_defect = false;

  if record.product_name.trim().is_empty() {
    missing_fields.insert("product_name".to_string());
  }
  if record.benefits.is_empty() && record.diseases.is_empty() {
    missing_fields.insert("benefits/diseases".to_string());
  }

  for (name, ingredient) in &record.chemical_composition.ingredients {
    match ingredient.smiles.as_deref() {
      None | Some("") => {
        defects.push(format!("ingrediente '{}' sin SMILES", name));
      }
      Some(smiles) => {
        if engine.is_available() && !engine.validate(smiles) {
          defects.push(format!("SMILES inválido para '{}': {}", name, smiles));
          hard_defect = true;
        }
      }
    }
  }

  ValidationResult { is_valid: missing_fields.is_empty() && !hard_defect,
                     missing_fields,
                     defects }
}

pub fn validate_batch(records: &[MedicineRecord], engine: &dyn ChemEngine) -> BatchReport {
  let per_record: Vec<ValidationResult> = records.iter().map(|r| validate_record(r, engine)).collect();
  let total = records.len();
  let valid = per_record.iter().filter(|r| r.is_valid).count();
  let data_quality_score = if total == 0 { 0.0 } else { valid as f64 / total as f64 };
  BatchReport { total,
                valid,
                invalid: total - valid,
                data_quality_score,
                per_record }
}
