// search.rs
//
// Filtrado por recorrido lineal sobre la colección. Todas las funciones
// devuelven referencias en orden de inserción: un `limit` trunca, nunca
// reordena.
use crate::errors::StoreError;
use std::str::FromStr;
use tradchem_domain::MedicineRecord;

/// Modo de búsqueda. Un modo desconocido falla rápido en `from_str` con
/// `StoreError::InvalidArgument`; una vez construido el enum no hay modo
/// inválido posible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Name,
    Benefit,
    Disease,
    Ingredient,
    Smiles,
    Any,
}

impl FromStr for SearchMode {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SearchMode::Name),
            "benefit" => Ok(SearchMode::Benefit),
            "disease" => Ok(SearchMode::Disease),
            "ingredient" => Ok(SearchMode::Ingredient),
            "smiles" => Ok(SearchMode::Smiles),
            "any" => Ok(SearchMode::Any),
            other => Err(StoreError::InvalidArgument(format!("modo de búsqueda desconocido: '{}'", other))),
        }
    }
}

/// Búsqueda por subcadena, insensible a mayúsculas, sobre el campo del modo.
/// `limit` acota el número de resultados; `Some(0)` significa "sin
/// resultados" (ilimitado es la ausencia del parámetro, no cero).
pub fn search<'a>(records: &'a [MedicineRecord],
                  query: &str,
                  mode: SearchMode,
                  limit: Option<usize>)
                  -> Vec<&'a MedicineRecord> {
    let needle = query.trim().to_lowercase();
    records.iter()
           .filter(|record| matches(record, &needle, mode))
           .take(limit.unwrap_or(usize::MAX))
           .collect()
}

fn matches(record: &MedicineRecord, needle: &str, mode: SearchMode) -> bool {
    let contains = |haystack: &str| haystack.to_lowercase().contains(needle);
    let in_name = |r: &MedicineRecord| contains(&r.product_name);
    let in_benefits = |r: &MedicineRecord| r.benefits.iter().any(|b| contains(b));
    let in_diseases = |r: &MedicineRecord| r.diseases.iter().any(|d| contains(d));
    let in_ingredients = |r: &MedicineRecord| r.ingredient_names().any(contains);
    let in_smiles = |r: &MedicineRecord| {
        r.chemical_composition.ingredients.values().filter_map(|i| i.smiles.as_deref()).any(contains)
    };
    match mode {
        SearchMode::Name => in_name(record),
        SearchMode::Benefit => in_benefits(record),
        SearchMode::Disease => in_diseases(record),
        SearchMode::Ingredient => in_ingredients(record),
        SearchMode::Smiles => in_smiles(record),
        SearchMode::Any => {
            in_name(record) || in_benefits(record) || in_diseases(record) || in_ingredients(record)
        }
    }
}

/// Primer registro cuyo nombre coincide. Regla de desempate documentada:
/// gana la primera coincidencia *exacta* (insensible a mayúsculas) en orden
/// de inserción; si no hay ninguna, la primera coincidencia por subcadena.
pub fn get_by_name<'a>(records: &'a [MedicineRecord], name: &str) -> Option<&'a MedicineRecord> {
    let wanted = name.trim().to_lowercase();
    records.iter()
           .find(|r| r.product_name.to_lowercase() == wanted)
           .or_else(|| records.iter().find(|r| r.product_name.to_lowercase().contains(&wanted)))
}

/// Filtro genérico por igualdad de campo (insensible a mayúsculas).
#[derive(Debug, Clone)]
pub enum FieldFilter {
    TraditionalSystem(String),
    Source(String),
    GeographicOrigin(String),
}

pub fn filter<'a>(records: &'a [MedicineRecord], spec: &FieldFilter) -> Vec<&'a MedicineRecord> {
    let equals = |field: Option<&str>, wanted: &str| {
        field.is_some_and(|v| v.eq_ignore_ascii_case(wanted.trim()))
    };
    records.iter()
           .filter(|r| match spec {
               FieldFilter::TraditionalSystem(v) => equals(r.traditional_system.as_deref(), v),
               FieldFilter::Source(v) => equals(r.source.as_deref(), v),
               FieldFilter::GeographicOrigin(v) => equals(r.geographic_origin.as_deref(), v),
           })
           .collect()
}
