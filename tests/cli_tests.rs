use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn debtors_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("debtors"));
    cmd.env_remove("RUST_LOG").env_remove("DEBTORS_API_TOKEN");
    cmd
}

const SALES: &str = r#"[
  {
    "id_venta": 1,
    "id_cliente": 7,
    "cliente": {"id_cliente": 7, "persona": {"nombre": "Ana", "apellido": "Gomez"}},
    "fecha": "2026-03-01",
    "total": 1000,
    "metodo_pago": "CUOTAS",
    "plan_pago": {
      "monto_total": 1000,
      "estado": "ACTIVO",
      "pagos": [{"monto": 400, "fecha": "2026-03-15"}]
    }
  },
  {
    "id_venta": 2,
    "id_cliente": 3,
    "cliente": {"nombre": "Carniceria Sur"},
    "total": 900,
    "metodo_pago": "CUOTAS",
    "plan_pago": {"monto_total": "900", "estado": "ACTIVO", "pagos": []}
  },
  {
    "id_venta": 3,
    "id_cliente": 5,
    "cliente": {"nombre": "Paid Up"},
    "plan_pago": {"monto_total": 300, "estado": "PAGADO", "pagos": []}
  },
  {
    "id_venta": 4,
    "id_cliente": null,
    "plan_pago": {"monto_total": 300, "pagos": []}
  },
  {
    "id_venta": 5,
    "id_cliente": 9,
    "metodo_pago": "EFECTIVO",
    "total": 50
  }
]"#;

/// A temp dir holding a sales fixture and a (not yet created) config dir path.
fn setup(sales: &str) -> (TempDir, PathBuf, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("ventas.json");
    fs::write(&input, sales).unwrap();
    let config_path = temp_dir.path().join("debtors-config");
    (temp_dir, input, config_path)
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_help() {
    debtors_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending installment debts per client"));
}

#[test]
fn test_version() {
    debtors_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("debtors"));
}

#[test]
fn test_init_creates_config() {
    let (_temp_dir, _, config_path) = setup("[]");

    debtors_cmd()
        .args(["-C", path_arg(&config_path), "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized debtors config"));

    assert!(config_path.join("config.toml").exists());
}

#[test]
fn test_init_fails_if_exists() {
    let (_temp_dir, _, config_path) = setup("[]");

    debtors_cmd()
        .args(["-C", path_arg(&config_path), "init"])
        .assert()
        .success();

    debtors_cmd()
        .args(["-C", path_arg(&config_path), "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_status_without_init() {
    let (_temp_dir, _, config_path) = setup("[]");

    debtors_cmd()
        .args(["-C", path_arg(&config_path), "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_status() {
    let (_temp_dir, _, config_path) = setup("[]");

    debtors_cmd()
        .args(["-C", path_arg(&config_path), "init"])
        .assert()
        .success();

    debtors_cmd()
        .args(["-C", path_arg(&config_path), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Debtors Status"))
        .stdout(predicate::str::contains("http://localhost:3000/api/ventas"))
        .stdout(predicate::str::contains("http://localhost:3000/api/clientes"))
        .stdout(predicate::str::contains("not set"));
}

#[test]
fn test_status_reports_env_token() {
    let (_temp_dir, _, config_path) = setup("[]");

    debtors_cmd()
        .args(["-C", path_arg(&config_path), "init"])
        .assert()
        .success();

    debtors_cmd()
        .args(["-C", path_arg(&config_path), "status"])
        .env("DEBTORS_API_TOKEN", "secret")
        .assert()
        .success()
        .stdout(predicate::str::contains("Token:            set"));
}

#[test]
fn test_list_from_file() {
    let (_temp_dir, input, config_path) = setup(SALES);

    let output = debtors_cmd()
        .args(["-C", path_arg(&config_path), "list", "--input", path_arg(&input)])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();

    assert!(stdout.contains("Carniceria Sur"));
    assert!(stdout.contains("Ana Gomez"));
    assert!(stdout.contains("$900.00"));
    assert!(stdout.contains("$600.00"));
    assert!(stdout.contains("$1,500.00"));
    assert!(stdout.contains("TOTAL"));
    assert!(!stdout.contains("Paid Up"));

    // largest debt first
    let sur = stdout.find("Carniceria Sur").unwrap();
    let ana = stdout.find("Ana Gomez").unwrap();
    assert!(sur < ana);
}

#[test]
fn test_list_limit() {
    let (_temp_dir, input, config_path) = setup(SALES);

    debtors_cmd()
        .args([
            "-C",
            path_arg(&config_path),
            "list",
            "--input",
            path_arg(&input),
            "--limit",
            "1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Carniceria Sur"))
        .stdout(predicate::str::contains("Ana Gomez").not());
}

#[test]
fn test_list_json() {
    let (_temp_dir, input, config_path) = setup(SALES);

    let output = debtors_cmd()
        .args([
            "-C",
            path_arg(&config_path),
            "list",
            "--input",
            path_arg(&input),
            "--json",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(report["client_count"], 2);
    assert_eq!(report["sale_count"], 2);
    assert_eq!(report["total_debt"], 1500.0);
    assert_eq!(report["clients"][0]["client_id"], 3);
    assert_eq!(report["clients"][1]["client_id"], 7);
    assert_eq!(report["clients"][1]["sales"][0]["pending"], 600.0);
}

#[test]
fn test_list_empty() {
    let (_temp_dir, input, config_path) = setup("[]");

    debtors_cmd()
        .args(["-C", path_arg(&config_path), "list", "--input", path_arg(&input)])
        .assert()
        .success()
        .stdout(predicate::str::contains("No pending debts found."));
}

#[test]
fn test_list_unreadable_input_degrades_to_empty() {
    let (temp_dir, _, config_path) = setup("[]");
    let missing = temp_dir.path().join("missing.json");

    debtors_cmd()
        .args(["-C", path_arg(&config_path), "list", "--input", path_arg(&missing)])
        .assert()
        .success()
        .stdout(predicate::str::contains("No pending debts found."))
        .stderr(predicate::str::contains("could not load pending debts"));
}

#[test]
fn test_list_without_config_needs_init() {
    let (_temp_dir, _, config_path) = setup("[]");

    debtors_cmd()
        .args(["-C", path_arg(&config_path), "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("debtors init"));
}

#[test]
fn test_list_uses_configured_currency_and_tolerance() {
    let (_temp_dir, input, config_path) = setup(
        r#"[
          {"id_cliente": 1, "plan_pago": {"monto_total": 100, "pagos": [{"monto": 99.5}]}},
          {"id_cliente": 2, "plan_pago": {"monto_total": 100, "pagos": [{"monto": 20}]}}
        ]"#,
    );
    fs::create_dir_all(&config_path).unwrap();
    fs::write(
        config_path.join("config.toml"),
        "[report]\ncurrency_symbol = \"ARS \"\nepsilon = 1.0\n",
    )
    .unwrap();

    debtors_cmd()
        .args(["-C", path_arg(&config_path), "list", "--input", path_arg(&input)])
        .assert()
        .success()
        .stdout(predicate::str::contains("ARS 80.00"))
        .stdout(predicate::str::contains("Client 2"))
        .stdout(predicate::str::contains("Client 1").not());
}

#[test]
fn test_invalid_config_is_an_error() {
    let (_temp_dir, input, config_path) = setup("[]");
    fs::create_dir_all(&config_path).unwrap();
    fs::write(config_path.join("config.toml"), "[report\nepsilon = ").unwrap();

    debtors_cmd()
        .args(["-C", path_arg(&config_path), "list", "--input", path_arg(&input)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn test_show_client() {
    let (_temp_dir, input, config_path) = setup(SALES);

    debtors_cmd()
        .args([
            "-C",
            path_arg(&config_path),
            "show",
            "7",
            "--input",
            path_arg(&input),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ana Gomez (client 7)"))
        .stdout(predicate::str::contains("2026-03-15"))
        .stdout(predicate::str::contains("$1,000.00"))
        .stdout(predicate::str::contains("$400.00"))
        .stdout(predicate::str::contains("TOTAL PENDING"))
        .stdout(predicate::str::contains("$600.00"));
}

#[test]
fn test_show_client_json() {
    let (_temp_dir, input, config_path) = setup(SALES);

    let output = debtors_cmd()
        .args([
            "-C",
            path_arg(&config_path),
            "show",
            "3",
            "--input",
            path_arg(&input),
            "--json",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let debt: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(debt["name"], "Carniceria Sur");
    assert_eq!(debt["total_debt"], 900.0);
    assert_eq!(debt["sales"][0]["sale_id"], 2);
}

#[test]
fn test_show_client_without_debt() {
    let (_temp_dir, input, config_path) = setup(SALES);

    for client in ["5", "9", "99"] {
        debtors_cmd()
            .args([
                "-C",
                path_arg(&config_path),
                "show",
                client,
                "--input",
                path_arg(&input),
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains(format!(
                "Client {client} has no pending debt"
            )));
    }
}
