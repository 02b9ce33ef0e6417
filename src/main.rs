use std::error::Error;
use std::io::{self, Write};
use std::str::FromStr;

use tradchem_chem::BuiltinEngine;
use tradchem_domain::validate_batch;
use tradchem_store::{search, stats, LoadPolicy, MedicineStore, SearchMode};

/// Pequeño menú interactivo para consultar la base de datos de medicinas
/// tradicionales cargada desde un archivo JSON o CSV.
///
/// Opciones soportadas:
/// 1) Cargar base de datos desde archivo
/// 2) Listar medicinas
/// 3) Buscar (nombre, beneficio, enfermedad, ingrediente, smiles, any)
/// 4) Estadísticas y resumen químico
/// 5) Validar la base de datos
/// 6) Exportar a archivo (JSON o CSV según la extensión)
/// 7) Salir
fn main() -> Result<(), Box<dyn Error>> {
    let mut store = MedicineStore::new();
    let engine = BuiltinEngine::new();

    loop {
        println!("\n== TradChem ==");
        println!("1) Cargar base de datos desde archivo");
        println!("2) Listar medicinas");
        println!("3) Buscar");
        println!("4) Estadísticas");
        println!("5) Validar");
        println!("6) Exportar");
        println!("7) Salir");
        print!("Elige una opción: ");
        io::stdout().flush().ok();

        let mut choice = String::new();
        io::stdin().read_line(&mut choice)?;
        match choice.trim() {
            "1" => {
                let path = prompt("Ruta del archivo (.json / .csv): ")?;
                match store.load(path.trim(), LoadPolicy::SkipAndReport) {
                    Ok(report) => {
                        println!("Cargados {} registros.", report.loaded);
                        for e in &report.row_errors {
                            eprintln!("  fila {} saltada: {}", e.row, e.message);
                        }
                    }
                    Err(e) => eprintln!("Error cargando: {}", e),
                }
            }
            "2" => {
                if store.is_empty() {
                    println!("(base de datos vacía)");
                }
                for (i, name) in store.list_names().iter().enumerate() {
                    println!("{:>3}. {}", i + 1, name);
                }
            }
            "3" => {
                let query = prompt("Consulta: ")?;
                let mode_s = prompt("Modo [name/benefit/disease/ingredient/smiles/any]: ")?;
                let mode = match SearchMode::from_str(mode_s.trim()) {
                    Ok(m) => m,
                    Err(e) => {
                        eprintln!("{}", e);
                        continue;
                    }
                };
                let results = search::search(store.records(), query.trim(), mode, Some(10));
                if results.is_empty() {
                    println!("Sin resultados.");
                }
                for record in results {
                    println!("- {}", record);
                    if !record.benefits.is_empty() {
                        println!("    beneficios: {}", record.benefits.join(", "));
                    }
                }
            }
            "4" => {
                let view = stats::overview(store.records());
                println!("{}", serde_json::to_string_pretty(&view)?);
                let summary = stats::chemical_summary(store.records(), &engine);
                println!("{}", serde_json::to_string_pretty(&summary)?);
                let by_system = stats::distribution_by(store.records(), stats::DistributionField::TraditionalSystem);
                for (system, count) in &by_system {
                    println!("  {}: {} medicinas", system, count);
                }
            }
            "5" => {
                let report = validate_batch(store.records(), &engine);
                println!("{} de {} registros válidos (calidad {:.2})",
                         report.valid, report.total, report.data_quality_score);
                for (record, result) in store.records().iter().zip(&report.per_record) {
                    if !result.is_valid || !result.defects.is_empty() {
                        println!("- {}: faltan {:?}, defectos {:?}",
                                 record.product_name, result.missing_fields, result.defects);
                    }
                }
            }
            "6" => {
                let path = prompt("Archivo destino (.json / .csv): ")?;
                match store.export_to_file(path.trim()) {
                    Ok(()) => println!("Exportado a {}.", path.trim()),
                    Err(e) => eprintln!("Error exportando: {}", e),
                }
            }
            "7" => break,
            other => println!("Opción no reconocida: {}", other),
        }
    }
    Ok(())
}

fn prompt(message: &str) -> Result<String, Box<dyn Error>> {
    print!("{}", message);
    io::stdout().flush().ok();
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line)
}
