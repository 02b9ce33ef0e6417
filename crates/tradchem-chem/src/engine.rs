// engine.rs
use crate::parser;
use serde::{Deserialize, Serialize};

/// Descriptores moleculares calculados a partir de un SMILES válido.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MolecularProperties {
  pub formula: String,
  pub molecular_weight: f64,
  pub heavy_atoms: usize,
  pub aromatic_atoms: usize,
}

/// Capacidad quimioinformática. Puede no estar disponible: los consumidores
/// deben comprobar `is_available` o aceptar `false`/`None` como respuesta
/// normal. Ninguna operación falla por un SMILES malformado.
pub trait ChemEngine: Send + Sync {
  /// Indica si el motor puede interpretar SMILES.
  fn is_available(&self) -> bool;

  /// `true` si la cadena es un SMILES estructuralmente válido. Las cadenas
  /// vacías o malformadas devuelven `false`, nunca un error.
  fn validate(&self, smiles: &str) -> bool;

  /// Descriptores del SMILES, o `None` si es inválido o el motor no está
  /// disponible.
  fn properties(&self, smiles: &str) -> Option<MolecularProperties>;

  fn molecular_weight(&self, smiles: &str) -> Option<f64> {
    self.properties(smiles).map(|p| p.molecular_weight)
  }

  fn molecular_formula(&self, smiles: &str) -> Option<String> {
    self.properties(smiles).map(|p| p.formula)
  }

  /// Forma normalizada del SMILES, o `None` si es inválido. La implementación
  /// integrada normaliza a nivel de tokens; no es una canonicalización de
  /// grafo.
  fn canonicalize(&self, smiles: &str) -> Option<String>;
}

/// Motor integrado: tokeniza y verifica la estructura del SMILES sin
/// depender de un toolkit externo. Cubre el subconjunto orgánico, átomos
/// entre corchetes, ramas, anillos y componentes separados por punto.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinEngine;

impl BuiltinEngine {
  pub fn new() -> Self {
    Self
  }

  /// Variante diagnóstica de `validate`: en vez de `false`, devuelve el
  /// defecto estructural concreto del SMILES.
  pub fn diagnose(&self, smiles: &str) -> Result<(), crate::SmilesError> {
    parser::parse(smiles).map(|_| ())
  }
}

impl ChemEngine for BuiltinEngine {
  fn is_available(&self) -> bool {
    true
  }

  fn validate(&self, smiles: &str) -> bool {
    parser::parse(smiles).is_ok()
  }

  fn properties(&self, smiles: &str) -> Option<MolecularProperties> {
    let parsed = parser::parse(smiles).ok()?;
    let molecular_weight = parsed.molecular_weight()?;
    Some(MolecularProperties { formula: parsed.formula(),
                               molecular_weight,
                               heavy_atoms: parsed.heavy_atoms(),
                               aromatic_atoms: parsed.aromatic_atoms() })
  }

  fn canonicalize(&self, smiles: &str) -> Option<String> {
    parser::parse(smiles).ok().map(|m| m.emit())
  }
}

/// Motor ausente: representa el sistema sin capacidad quimioinformática.
/// Todo SMILES es no verificable (`validate` = `false`) y ninguna propiedad
/// es calculable.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledEngine;

impl DisabledEngine {
  pub fn new() -> Self {
    Self
  }
}

impl ChemEngine for DisabledEngine {
  fn is_available(&self) -> bool {
    false
  }

  fn validate(&self, _smiles: &str) -> bool {
    false
  }

  fn properties(&self, _smiles: &str) -> Option<MolecularProperties> {
    None
  }

  fn canonicalize(&self, _smiles: &str) -> Option<String> {
    None
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn methane_is_valid() {
    let engine = BuiltinEngine::new();
    assert!(engine.validate("C"));
    let props = engine.properties("C").unwrap();
    assert_eq!(props.formula, "CH4");
    assert!((props.molecular_weight - 16.043).abs() < 0.01);
    assert_eq!(props.heavy_atoms, 1);
  }

  #[test]
  fn ethanol_formula_and_weight() {
    let engine = BuiltinEngine::new();
    let props = engine.properties("CCO").unwrap();
    assert_eq!(props.formula, "C2H6O");
    assert!((props.molecular_weight - 46.069).abs() < 0.01);
  }

  #[test]
  fn benzene_aromatic_form() {
    let engine = BuiltinEngine::new();
    let props = engine.properties("c1ccccc1").unwrap();
    assert_eq!(props.formula, "C6H6");
    assert_eq!(props.aromatic_atoms, 6);
    assert!((props.molecular_weight - 78.114).abs() < 0.05);
  }

  #[test]
  fn bracket_atoms_and_charges() {
    let engine = BuiltinEngine::new();
    // Sodio acuoso y un amonio: cargas y H explícitos entre corchetes.
    assert!(engine.validate("[Na+].[Cl-]"));
    assert!(engine.validate("[NH4+]"));
    // Orden de Hill sin carbono: todo alfabético, el hidrógeno incluido.
    let props = engine.properties("[NH4+]").unwrap();
    assert_eq!(props.formula, "H4N");
  }

  #[test]
  fn curcumin_like_smiles_is_valid() {
    let engine = BuiltinEngine::new();
    assert!(engine.validate("CC1=CC(=C(C=C1)O)C(=O)O"));
  }

  #[test]
  fn diagnose_names_the_defect() {
    let engine = BuiltinEngine::new();
    assert!(engine.diagnose("CCO").is_ok());
    assert!(matches!(engine.diagnose("C1CC"), Err(crate::SmilesError::UnpairedRing(1))));
    assert!(matches!(engine.diagnose(""), Err(crate::SmilesError::Empty)));
  }

  #[test]
  fn malformed_inputs_are_invalid_not_errors() {
    let engine = BuiltinEngine::new();
    assert!(!engine.validate(""));
    assert!(!engine.validate("   "));
    assert!(!engine.validate("not_a_smiles"));
    assert!(!engine.validate("C(("));
    assert!(!engine.validate("C1CC"));
    assert!(!engine.validate("C="));
    assert!(!engine.validate("[Xx]"));
    assert_eq!(engine.molecular_weight("not_a_smiles"), None);
    assert_eq!(engine.canonicalize("C(("), None);
  }

  #[test]
  fn canonicalize_round_trips_valid_input() {
    let engine = BuiltinEngine::new();
    assert_eq!(engine.canonicalize(" CCO "), Some("CCO".to_string()));
    assert_eq!(engine.canonicalize("c1ccccc1"), Some("c1ccccc1".to_string()));
    // La reemisión normalizada sigue siendo válida.
    let emitted = engine.canonicalize("CC1=CC(=C(C=C1)O)C(=O)O").unwrap();
    assert!(engine.validate(&emitted));
  }

  #[test]
  fn disabled_engine_degrades_gracefully() {
    let engine = DisabledEngine::new();
    assert!(!engine.is_available());
    assert!(!engine.validate("C"));
    assert_eq!(engine.properties("C"), None);
    assert_eq!(engine.molecular_weight("CCO"), None);
    assert_eq!(engine.canonicalize("CCO"), None);
  }
}
