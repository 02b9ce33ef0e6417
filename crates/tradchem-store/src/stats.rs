// stats.rs
//
// Agregación de solo lectura sobre la colección. Funciones puras y
// deterministas: la misma colección produce siempre el mismo resultado.
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeSet;
use tradchem_domain::MedicineRecord;
use tradchem_chem::ChemEngine;

/// Campo sobre el que se calcula una distribución de conteos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistributionField {
    TraditionalSystem,
    Benefit,
    Disease,
}

pub fn total_count(records: &[MedicineRecord]) -> usize {
    records.len()
}

/// Conteo por valor del campo. Para los campos multivalor (beneficios y
/// enfermedades) cada registro aporta un conteo por valor *distinto* que
/// contiene: tres beneficios alimentan tres cubetas, repetidos dentro del
/// mismo registro cuentan una vez. El mapa conserva el orden de primera
/// aparición.
pub fn distribution_by(records: &[MedicineRecord], field: DistributionField) -> IndexMap<String, usize> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for record in records {
        match field {
            DistributionField::TraditionalSystem => {
                if let Some(system) = record.traditional_system.as_deref() {
                    if !system.is_empty() {
                        *counts.entry(system.to_string()).or_insert(0) += 1;
                    }
                }
            }
            DistributionField::Benefit => bump_distinct(&mut counts, &record.benefits),
            DistributionField::Disease => bump_distinct(&mut counts, &record.diseases),
        }
    }
    counts
}

fn bump_distinct(counts: &mut IndexMap<String, usize>, values: &[String]) {
    let distinct: BTreeSet<&str> = values.iter().map(String::as_str).collect();
    for value in distinct {
        *counts.entry(value.to_string()).or_insert(0) += 1;
    }
}

/// Resumen químico de la colección completa.
///
/// Siempre vale `valid_smiles + invalid_smiles == total_compounds`: un
/// ingrediente sin SMILES (o con el motor químico ausente) cuenta como
/// inválido. El promedio se calcula solo sobre ingredientes con SMILES
/// válido y peso resoluble, y es `None` cuando ese conjunto está vacío:
/// cero daría a entender un promedio calculado de 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChemicalSummary {
    pub total_compounds: usize,
    pub valid_smiles: usize,
    pub invalid_smiles: usize,
    pub avg_molecular_weight: Option<f64>,
}

pub fn chemical_summary(records: &[MedicineRecord], engine: &dyn ChemEngine) -> ChemicalSummary {
    let mut total = 0usize;
    let mut valid = 0usize;
    let mut weights: Vec<f64> = Vec::new();
    for record in records {
        for ingredient in record.chemical_composition.ingredients.values() {
            total += 1;
            let Some(smiles) = ingredient.smiles.as_deref().filter(|s| !s.is_empty()) else {
                continue;
            };
            if engine.validate(smiles) {
                valid += 1;
                // El peso declarado en el registro tiene prioridad sobre el
                // calculado por el motor.
                if let Some(w) = ingredient.molecular_weight.or_else(|| engine.molecular_weight(smiles)) {
                    weights.push(w);
                }
            }
        }
    }
    let avg = if weights.is_empty() { None } else { Some(weights.iter().sum::<f64>() / weights.len() as f64) };
    ChemicalSummary { total_compounds: total,
                      valid_smiles: valid,
                      invalid_smiles: total - valid,
                      avg_molecular_weight: avg }
}

/// Panorama general de la base de datos, como lo mostraba el comando de
/// estadísticas histórico.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreOverview {
    pub total_medicines: usize,
    pub distinct_benefits: usize,
    pub distinct_diseases: usize,
    pub distinct_ingredients: usize,
    pub distinct_systems: usize,
    pub avg_ingredients_per_medicine: f64,
}

pub fn overview(records: &[MedicineRecord]) -> StoreOverview {
    let mut benefits = BTreeSet::new();
    let mut diseases = BTreeSet::new();
    let mut ingredients = BTreeSet::new();
    let mut systems = BTreeSet::new();
    let mut ingredient_total = 0usize;
    for record in records {
        benefits.extend(record.benefits.iter().map(String::as_str));
        diseases.extend(record.diseases.iter().map(String::as_str));
        ingredients.extend(record.ingredient_names());
        if let Some(system) = record.traditional_system.as_deref() {
            if !system.is_empty() {
                systems.insert(system);
            }
        }
        ingredient_total += record.chemical_composition.ingredients.len();
    }
    let avg = if records.is_empty() { 0.0 } else { ingredient_total as f64 / records.len() as f64 };
    StoreOverview { total_medicines: records.len(),
                    distinct_benefits: benefits.len(),
                    distinct_diseases: diseases.len(),
                    distinct_ingredients: ingredients.len(),
                    distinct_systems: systems.len(),
                    avg_ingredients_per_medicine: avg }
}
