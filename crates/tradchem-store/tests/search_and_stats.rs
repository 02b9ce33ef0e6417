use std::str::FromStr;
use tradchem_chem::{BuiltinEngine, DisabledEngine};
use tradchem_domain::{Ingredient, MedicineRecord};
use tradchem_store::{search, stats, FieldFilter, SearchMode, StoreError};

fn collection() -> Vec<MedicineRecord> {
  let mut turmeric = MedicineRecord::new("Turmeric");
  turmeric.benefits = vec!["Anti-inflammatory".into()];
  turmeric.diseases = vec!["Arthritis".into(), "Inflammation".into()];
  turmeric.traditional_system = Some("Ayurvedic".into());
  turmeric.chemical_composition
          .ingredients
          .insert("Curcumin".into(), Ingredient::from_smiles("CC1=CC(=C(C=C1)O)C(=O)O"));

  let mut ginger = MedicineRecord::new("Ginger Root");
  ginger.benefits = vec!["Digestive health".into(), "Anti-inflammatory".into()];
  ginger.traditional_system = Some("Ayurvedic".into());
  ginger.geographic_origin = Some("India".into());
  ginger.chemical_composition.ingredients.insert("Gingerol".into(), Ingredient::from_smiles("CCCCC"));

  let mut ginseng = MedicineRecord::new("Ginseng");
  ginseng.benefits = vec!["Energy boost".into()];
  ginseng.traditional_system = Some("TCM".into());
  ginseng.chemical_composition.ingredients.insert("Ginsenoside".into(), Ingredient::default());

  // Nombre duplicado a propósito: la búsqueda debe devolver ambos.
  let mut turmeric_extract = MedicineRecord::new("Turmeric");
  turmeric_extract.diseases = vec!["Inflammation".into()];

  vec![turmeric, ginger, ginseng, turmeric_extract]
}

#[test]
fn search_by_name_is_case_insensitive_substring() {
  let records = collection();
  let found = search::search(&records, "turmeric", SearchMode::Name, None);
  assert_eq!(found.len(), 2);
  let found = search::search(&records, "GIN", SearchMode::Name, None);
  assert_eq!(found.iter().map(|r| r.product_name.as_str()).collect::<Vec<_>>(),
             vec!["Ginger Root", "Ginseng"]);
}

#[test]
fn search_modes_cover_their_fields() {
  let records = collection();
  assert_eq!(search::search(&records, "digestive", SearchMode::Benefit, None).len(), 1);
  assert_eq!(search::search(&records, "inflammation", SearchMode::Disease, None).len(), 2);
  assert_eq!(search::search(&records, "curcumin", SearchMode::Ingredient, None).len(), 1);
  assert_eq!(search::search(&records, "CCCCC", SearchMode::Smiles, None).len(), 1);
  // `any` cubre nombre, beneficio, enfermedad e ingrediente.
  assert_eq!(search::search(&records, "gin", SearchMode::Any, None).len(), 2);
}

#[test]
fn search_misses_return_empty_not_error() {
  let records = collection();
  assert!(search::search(&records, "xyz-not-found", SearchMode::Name, None).is_empty());
}

#[test]
fn limit_truncates_preserving_insertion_order() {
  let records = collection();
  let unlimited = search::search(&records, "a", SearchMode::Any, None);
  for limit in 0..=unlimited.len() + 1 {
    let capped = search::search(&records, "a", SearchMode::Any, Some(limit));
    assert!(capped.len() <= limit);
    // Prefijo del resultado ilimitado: truncamiento, no reordenamiento.
    assert_eq!(capped.as_slice(), &unlimited[..capped.len()]);
  }
  assert!(search::search(&records, "a", SearchMode::Any, Some(0)).is_empty());
}

#[test]
fn unknown_mode_fails_fast() {
  let err = SearchMode::from_str("nombre").unwrap_err();
  assert!(matches!(err, StoreError::InvalidArgument(_)));
  assert_eq!(SearchMode::from_str("Benefit").unwrap(), SearchMode::Benefit);
}

#[test]
fn get_by_name_prefers_exact_match_over_substring() {
  let mut records = collection();
  // "Turmeric Extract Plus" aparece antes que el primer "Turmeric" exacto.
  records.insert(0, MedicineRecord::new("Turmeric Extract Plus"));
  let found = search::get_by_name(&records, "turmeric").unwrap();
  assert_eq!(found.product_name, "Turmeric");
  assert!(!found.diseases.is_empty(), "debe ser el primer Turmeric insertado");

  // Sin coincidencia exacta gana la primera subcadena.
  let found = search::get_by_name(&records, "extract").unwrap();
  assert_eq!(found.product_name, "Turmeric Extract Plus");
  assert!(search::get_by_name(&records, "nothing").is_none());
}

#[test]
fn filter_matches_field_equality() {
  let records = collection();
  let ayurvedic = search::filter(&records, &FieldFilter::TraditionalSystem("ayurvedic".into()));
  assert_eq!(ayurvedic.len(), 2);
  let from_india = search::filter(&records, &FieldFilter::GeographicOrigin("India".into()));
  assert_eq!(from_india.len(), 1);
  assert_eq!(from_india[0].product_name, "Ginger Root");
}

#[test]
fn distribution_counts_multi_valued_fields_once_per_record() {
  let records = collection();
  let by_system = stats::distribution_by(&records, stats::DistributionField::TraditionalSystem);
  assert_eq!(by_system.get("Ayurvedic"), Some(&2));
  assert_eq!(by_system.get("TCM"), Some(&1));

  let by_benefit = stats::distribution_by(&records, stats::DistributionField::Benefit);
  assert_eq!(by_benefit.get("Anti-inflammatory"), Some(&2));
  assert_eq!(by_benefit.get("Energy boost"), Some(&1));

  let by_disease = stats::distribution_by(&records, stats::DistributionField::Disease);
  assert_eq!(by_disease.get("Inflammation"), Some(&2));
}

#[test]
fn chemical_summary_counts_are_consistent() {
  let engine = BuiltinEngine::new();
  let mut records = collection();
  // Un SMILES roto más, para el conteo de inválidos.
  records[1].chemical_composition.ingredients.insert("Broken".into(), Ingredient::from_smiles("not_a_smiles"));

  let summary = stats::chemical_summary(&records, &engine);
  assert_eq!(summary.total_compounds, 4);
  assert_eq!(summary.valid_smiles, 2);
  assert_eq!(summary.invalid_smiles, 2);
  assert_eq!(summary.valid_smiles + summary.invalid_smiles, summary.total_compounds);
  assert!(summary.avg_molecular_weight.is_some());
}

#[test]
fn chemical_summary_two_compound_scenario() {
  let engine = BuiltinEngine::new();
  let mut record = MedicineRecord::new("Sample");
  record.chemical_composition.ingredients.insert("Methane".into(), Ingredient::from_smiles("C"));
  record.chemical_composition.ingredients.insert("Junk".into(), Ingredient::from_smiles("not_a_smiles"));
  let summary = stats::chemical_summary(&[record], &engine);
  assert_eq!(summary.total_compounds, 2);
  assert_eq!(summary.valid_smiles, 1);
  assert_eq!(summary.invalid_smiles, 1);
}

#[test]
fn summary_without_weights_is_none_not_zero() {
  let engine = BuiltinEngine::new();
  let record = MedicineRecord::new("Empty");
  let summary = stats::chemical_summary(&[record], &engine);
  assert_eq!(summary.total_compounds, 0);
  assert_eq!(summary.avg_molecular_weight, None);
}

#[test]
fn disabled_engine_counts_everything_unverifiable_as_invalid() {
  let summary = stats::chemical_summary(&collection(), &DisabledEngine::new());
  assert_eq!(summary.total_compounds, 3);
  assert_eq!(summary.valid_smiles, 0);
  assert_eq!(summary.invalid_smiles, 3);
  assert_eq!(summary.avg_molecular_weight, None);
}

#[test]
fn overview_aggregates_the_whole_store() {
  let records = collection();
  let view = stats::overview(&records);
  assert_eq!(view.total_medicines, 4);
  assert_eq!(stats::total_count(&records), 4);
  assert_eq!(view.distinct_systems, 2);
  assert_eq!(view.distinct_ingredients, 3);
  assert!((view.avg_ingredients_per_medicine - 0.75).abs() < f64::EPSILON);

  let empty = stats::overview(&[]);
  assert_eq!(empty.total_medicines, 0);
  assert_eq!(empty.avg_ingredients_per_medicine, 0.0);
}
