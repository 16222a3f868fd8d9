//! CLI end-to-end tests: run the built `tupa` binary against a script and
//! check stdout, the way the pack's compiler-driver tests shell out to
//! their own binary rather than calling library functions directly.

use assert_cmd::Command;
use predicates::prelude::*;

fn demo(name: &str) -> std::path::PathBuf {
    std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("demos")
        .join(name)
}

#[test]
fn cli_help_shows_usage() {
    let mut cmd = Command::cargo_bin("tupa").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Tupã").or(predicate::str::contains("Usage")));
}

#[test]
fn runs_if_else_scenario() {
    let mut cmd = Command::cargo_bin("tupa").unwrap();
    cmd.arg(demo("condicional.tupa"));

    cmd.assert().success().stdout("grande\n");
}

#[test]
fn runs_while_loop_scenario() {
    let mut cmd = Command::cargo_bin("tupa").unwrap();
    cmd.arg(demo("enquanto.tupa"));

    cmd.assert().success().stdout("0\n1\n2\n");
}

#[test]
fn runs_inclusive_for_range_scenario() {
    let mut cmd = Command::cargo_bin("tupa").unwrap();
    cmd.arg(demo("para_intervalo.tupa"));

    cmd.assert().success().stdout("1\n2\n3\n");
}

#[test]
fn runs_for_each_over_list_scenario() {
    let mut cmd = Command::cargo_bin("tupa").unwrap();
    cmd.arg(demo("para_lista.tupa"));

    cmd.assert().success().stdout("10\n20\n30\n");
}

#[test]
fn runs_function_call_scenario() {
    let mut cmd = Command::cargo_bin("tupa").unwrap();
    cmd.arg(demo("funcao.tupa"));

    cmd.assert().success().stdout("42\n");
}

#[test]
fn runs_math_module_scenario() {
    let mut cmd = Command::cargo_bin("tupa").unwrap();
    cmd.arg(demo("modulo_matematica.tupa"));

    cmd.assert().success().stdout("4\n");
}

#[test]
fn runs_class_with_bound_method_scenario() {
    let mut cmd = Command::cargo_bin("tupa").unwrap();
    cmd.arg(demo("classe.tupa"));

    cmd.assert().success().stdout("2\n");
}

#[test]
fn runs_try_catch_scenario() {
    let mut cmd = Command::cargo_bin("tupa").unwrap();
    cmd.arg(demo("tentar_pegar.tupa"));

    cmd.assert().success().stdout("capturado\n");
}

#[test]
fn pegar_coerces_numeric_stdin_input() {
    // Input is attempted as an integer first (spec.md §4.4), so an
    // arithmetic use of the bound name works without an explicit
    // conversion call.
    let mut cmd = Command::cargo_bin("tupa").unwrap();
    cmd.arg(demo("pegar_entrada.tupa")).write_stdin("17\n");

    cmd.assert().success().stdout("18\n");
}

#[test]
fn missing_file_exits_nonzero() {
    let mut cmd = Command::cargo_bin("tupa").unwrap();
    cmd.arg("./demos/nao_existe.tupa");

    cmd.assert().failure();
}

#[test]
fn syntax_error_exits_zero_but_prints_diagnostic() {
    // Language-level errors (here: a missing 'fim') print a diagnostic but
    // do not change the process exit status (spec.md §6, §7).
    let mut cmd = Command::cargo_bin("tupa").unwrap();
    let script = std::env::temp_dir().join("tupa_missing_fim_test.tupa");
    std::fs::write(&script, "se verdadeiro então\nmostrar 1\n").unwrap();
    cmd.arg(&script);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Erro"));

    std::fs::remove_file(&script).ok();
}
