// elements.rs
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Masas atómicas estándar (IUPAC 2021, redondeadas) para los elementos que
/// aparecen en las notaciones SMILES de la base de datos.
pub(crate) static ATOMIC_MASSES: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
  HashMap::from([("H", 1.008),
                 ("Li", 6.94),
                 ("B", 10.811),
                 ("C", 12.011),
                 ("N", 14.007),
                 ("O", 15.999),
                 ("F", 18.998),
                 ("Na", 22.990),
                 ("Mg", 24.305),
                 ("Al", 26.982),
                 ("Si", 28.086),
                 ("P", 30.974),
                 ("S", 32.06),
                 ("Cl", 35.453),
                 ("K", 39.098),
                 ("Ca", 40.078),
                 ("Ti", 47.867),
                 ("Cr", 51.996),
                 ("Mn", 54.938),
                 ("Fe", 55.845),
                 ("Co", 58.933),
                 ("Ni", 58.693),
                 ("Cu", 63.546),
                 ("Zn", 65.38),
                 ("As", 74.922),
                 ("Se", 78.971),
                 ("Br", 79.904),
                 ("Sn", 118.71),
                 ("I", 126.904),
                 ("Hg", 200.59),
                 ("Pb", 207.2)])
});

/// Valencias normales de los átomos del subconjunto orgánico, en orden
/// creciente. Para el conteo de hidrógenos implícitos se toma la menor
/// valencia que cubra los enlaces ya presentes.
pub(crate) fn normal_valences(symbol: &str) -> &'static [u32] {
  match symbol {
    "B" => &[3],
    "C" => &[4],
    "N" => &[3, 5],
    "O" => &[2],
    "P" => &[3, 5],
    "S" => &[2, 4, 6],
    "F" | "Cl" | "Br" | "I" => &[1],
    _ => &[],
  }
}

pub(crate) fn mass_of(symbol: &str) -> Option<f64> {
  ATOMIC_MASSES.get(symbol).copied()
}
