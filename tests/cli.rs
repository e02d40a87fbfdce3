use std::fs;
use std::io::Write;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;

const SMALL_DATASET: &str = r#"[
    {
        "Línea": "Calidad",
        "Indicador": "Acreditaciones internacionales",
        "Fuente": "Avance",
        "Año": 2025,
        "Meta": 4.0,
        "Ejecución": 4.0,
        "Sentido": "Creciente"
    },
    {
        "Línea": "Expansión",
        "Indicador": "Nuevos programas virtuales",
        "Fuente": "Avance",
        "Año": 2025,
        "Meta": 10.0,
        "Ejecución": 8.0,
        "Sentido": "Creciente"
    }
]"#;

#[test]
fn renders_bundled_example_data() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let output = dir.path().join("informe.pdf");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("render-report"));
    cmd.arg("-o").arg(&output);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Informe generado"));

    let bytes = fs::read(&output)?;
    assert!(bytes.starts_with(b"%PDF"));
    Ok(())
}

#[test]
fn renders_dataset_from_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut dataset = tempfile::NamedTempFile::new()?;
    dataset.write_all(SMALL_DATASET.as_bytes())?;
    dataset.flush()?;

    let dir = tempfile::tempdir()?;
    let output = dir.path().join("informe.pdf");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("render-report"));
    cmd.arg(dataset.path());
    cmd.arg("-o").arg(&output);
    cmd.arg("--year").arg("2025");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Informe generado"));

    let bytes = fs::read(&output)?;
    assert!(bytes.starts_with(b"%PDF"));
    Ok(())
}

#[test]
fn fails_on_missing_dataset_file() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("render-report"));
    cmd.arg("/no/such/dataset.json");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn fails_on_malformed_dataset() -> Result<(), Box<dyn std::error::Error>> {
    let mut dataset = tempfile::NamedTempFile::new()?;
    dataset.write_all(b"{ not json")?;
    dataset.flush()?;

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("render-report"));
    cmd.arg(dataset.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
    Ok(())
}
