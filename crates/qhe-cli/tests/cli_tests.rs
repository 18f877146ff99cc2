//! CLI argument parsing and end-to-end binary tests.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use qhe_ir::{Circuit, QubitId};

fn qhe(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_qhe"))
        .args(args)
        .env_remove("QHE_SHOTS")
        .env("QHE_GRIDSYNTH", "/nonexistent/qhe/gridsynth")
        .output()
        .unwrap()
}

fn write_circuit(dir: &Path, name: &str, circuit: &Circuit) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, circuit.to_json().unwrap()).unwrap();
    path
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

// ============================================================================
// Clap argument parsing (mirrors the binary's definitions)
// ============================================================================

mod clap_parsing {
    use clap::{Parser, Subcommand};

    #[derive(Parser)]
    #[command(name = "qhe")]
    struct TestCli {
        #[arg(short, long, action = clap::ArgAction::Count, global = true)]
        verbose: u8,

        #[command(subcommand)]
        command: TestCommands,
    }

    #[derive(Subcommand)]
    enum TestCommands {
        Synth {
            #[arg(allow_hyphen_values = true)]
            angle: f64,
            #[arg(short = 'e', long)]
            tolerance: Option<f64>,
            #[arg(short = 'r', long, default_value = "32")]
            seed: u64,
            #[arg(long)]
            no_collapse: bool,
        },
        Compile {
            #[arg(short, long)]
            input: String,
            #[arg(long, conflicts_with = "error_gate")]
            error_circuit: Option<f64>,
            #[arg(long)]
            error_gate: Option<f64>,
        },
        Run {
            #[arg(long)]
            main: String,
            #[arg(long, value_delimiter = ',')]
            measure: Vec<u32>,
            #[arg(short, long, default_value = "1024")]
            shots: u32,
        },
    }

    #[test]
    fn test_synth_negative_angle() {
        let cli = TestCli::try_parse_from(["qhe", "synth", "-0.785", "-e", "1e-4"]).unwrap();
        match cli.command {
            TestCommands::Synth {
                angle,
                tolerance,
                seed,
                no_collapse,
            } => {
                assert!((angle + 0.785).abs() < 1e-12);
                assert_eq!(tolerance, Some(1e-4));
                assert_eq!(seed, 32);
                assert!(!no_collapse);
            }
            _ => panic!("Expected Synth command"),
        }
    }

    #[test]
    fn test_compile_budgets_conflict() {
        let result = TestCli::try_parse_from([
            "qhe",
            "compile",
            "-i",
            "c.json",
            "--error-circuit",
            "1e-3",
            "--error-gate",
            "1e-4",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_run_measure_list() {
        let cli = TestCli::try_parse_from([
            "qhe", "-vv", "run", "--main", "m.json", "--measure", "2,0,1",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            TestCommands::Run {
                main,
                measure,
                shots,
            } => {
                assert_eq!(main, "m.json");
                assert_eq!(measure, vec![2, 0, 1]);
                assert_eq!(shots, 1024);
            }
            _ => panic!("Expected Run command"),
        }
    }
}

// ============================================================================
// Binary
// ============================================================================

#[test]
fn test_compile_writes_fixed_basis_circuit() {
    let dir = tempfile::tempdir().unwrap();
    let mut circuit = Circuit::with_size("mixed", 2, 0);
    circuit
        .swap(QubitId(0), QubitId(1))
        .unwrap()
        .cz(QubitId(0), QubitId(1))
        .unwrap();
    let input = write_circuit(dir.path(), "mixed.json", &circuit);

    let out = qhe(&["compile", "-i", arg(&input), "--no-rotations"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let compiled_path = dir.path().join("mixed_compiled.json");
    let compiled = Circuit::from_json(&std::fs::read_to_string(compiled_path).unwrap()).unwrap();
    assert_eq!(compiled.count_gates(&["swap", "cz"]), 0);
    assert_eq!(compiled.count_gates(&["cx"]), 4);
}

#[test]
fn test_run_json_report() {
    let dir = tempfile::tempdir().unwrap();
    let mut init = Circuit::with_size("init", 2, 0);
    init.x(QubitId(0)).unwrap();
    let mut main = Circuit::with_size("main", 2, 0);
    main.h(QubitId(1))
        .unwrap()
        .t(QubitId(1))
        .unwrap()
        .tdg(QubitId(1))
        .unwrap()
        .h(QubitId(1))
        .unwrap()
        .cx(QubitId(0), QubitId(1))
        .unwrap();
    let init_path = write_circuit(dir.path(), "init.json", &init);
    let main_path = write_circuit(dir.path(), "main.json", &main);

    for policy in ["shared", "fresh"] {
        let out = qhe(&[
            "run",
            "--init",
            arg(&init_path),
            "--main",
            arg(&main_path),
            "--measure",
            "0,1",
            "--shots",
            "64",
            "--policy",
            policy,
            "--seed",
            "9",
            "--json",
        ]);
        assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

        let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
        assert_eq!(report["policy"], policy);
        assert_eq!(report["counts"]["11"], 64);
        assert_eq!(report["layout"]["t_count"], 2);
        assert_eq!(report["distribution"][3], 1.0);
    }
}

#[test]
fn test_run_rejects_unknown_policy() {
    let out = qhe(&["run", "--main", "m.json", "--measure", "0", "--policy", "pooled"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("unknown policy"));
}

#[test]
fn test_run_missing_file() {
    let out = qhe(&["run", "--main", "/nonexistent/main.json", "--measure", "0"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("File not found"));
}

#[test]
fn test_oracle_check_reports_missing_binary() {
    let out = qhe(&["oracle", "check"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("/nonexistent/qhe/gridsynth"));
    assert!(stdout.contains("qhe oracle install"));
}

#[test]
fn test_synth_without_oracle_fails() {
    let out = qhe(&["synth", "0.5"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("No rotation oracle"));
}
