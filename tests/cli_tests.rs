//! Integration tests for CLI

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cli() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("classic-retrieval"));
    // keep the host environment out of the configuration
    cmd.env_remove("CLASSIC_RETRIEVAL_SEARCH__K");
    cmd
}

fn write_corpus(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("corpus.json");
    fs::write(
        &path,
        r#"[
            {"question": "q0", "answer": "Diabetes affects blood sugar."},
            {"question": "q1", "answer": "Lung cancer is a common cancer."},
            {"question": "q2", "answer": "Exercise keeps the heart healthy."},
            {"question": "q3", "answer": "Skin cancer treatment varies."},
            {"question": "q4", "answer": "Genes can cause rare disorders."}
        ]"#,
    )
    .expect("write corpus");
    path
}

fn fit(dir: &Path, kind: &str) -> std::path::PathBuf {
    let corpus = write_corpus(dir);
    let out = dir.join(format!("{kind}.cbor"));
    cli()
        .args(["fit", "--model", kind, "--corpus"])
        .arg(&corpus)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("5 documents"));
    out
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("fit"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("eval"));
}

#[test]
fn test_cli_version() {
    cli().arg("--version").assert().success().stdout(predicate::str::contains("classic-retrieval"));
}

#[test]
fn test_fit_rejects_unknown_model() {
    let dir = TempDir::new().expect("temp dir");
    let corpus = write_corpus(dir.path());
    cli()
        .args(["fit", "--model", "lsi", "--corpus"])
        .arg(&corpus)
        .args(["--out", "x.cbor"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_bm25_search_prints_scores() {
    let dir = TempDir::new().expect("temp dir");
    let model = fit(dir.path(), "bm25");
    cli()
        .args(["search", "--model-file"])
        .arg(&model)
        .args(["--query", "cancer treatment", "-k", "2"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Doc 3 — score:"))
        .stdout(predicate::str::contains("Doc 1 — score:"));
}

#[test]
fn test_boolean_search_with_preview() {
    let dir = TempDir::new().expect("temp dir");
    let model = fit(dir.path(), "boolean");
    let corpus = dir.path().join("corpus.json");
    cli()
        .args(["search", "--model-file"])
        .arg(&model)
        .args(["--query", "cancer"])
        .arg("--corpus")
        .arg(&corpus)
        .assert()
        .success()
        .stdout(predicate::str::contains("Doc 1 | Lung cancer"))
        .stdout(predicate::str::contains("Doc 3 | Skin cancer"));
}

#[test]
fn test_search_without_matches() {
    let dir = TempDir::new().expect("temp dir");
    let model = fit(dir.path(), "tfidf");
    cli()
        .args(["search", "--model-file"])
        .arg(&model)
        .args(["--query", "unicorns"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No results"));
}

#[test]
fn test_eval_prints_map() {
    let dir = TempDir::new().expect("temp dir");
    let model = fit(dir.path(), "tfidf");
    let qrels = dir.path().join("qrels.json");
    fs::write(&qrels, r#"{"cancer": [1, 3], "diabetes": [0]}"#).expect("write qrels");
    cli()
        .args(["eval", "--model-file"])
        .arg(&model)
        .arg("--qrels")
        .arg(&qrels)
        .args(["-k", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cancer: P@2=1.0000 R@2=1.0000 AP=1.0000"))
        .stdout(predicate::str::contains("MAP: 1.0000"));
}

#[test]
fn test_eval_json_report() {
    let dir = TempDir::new().expect("temp dir");
    let model = fit(dir.path(), "boolean");
    let qrels = dir.path().join("qrels.json");
    fs::write(&qrels, r#"{"diabetes": [0]}"#).expect("write qrels");
    cli()
        .args(["eval", "--json", "--model-file"])
        .arg(&model)
        .arg("--qrels")
        .arg(&qrels)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"map\": 1.0"));
}

#[test]
fn test_qrels_lists_sorted_queries() {
    let dir = TempDir::new().expect("temp dir");
    let qrels = dir.path().join("qrels.json");
    fs::write(&qrels, r#"{"zeta": [1], "alpha": [2, 3]}"#).expect("write qrels");
    cli()
        .args(["qrels", "--qrels"])
        .arg(&qrels)
        .assert()
        .success()
        .stdout("alpha\t2\nzeta\t1\n");
}

#[test]
fn test_show_document() {
    let dir = TempDir::new().expect("temp dir");
    let corpus = write_corpus(dir.path());
    cli()
        .args(["show", "--id", "2", "--corpus"])
        .arg(&corpus)
        .assert()
        .success()
        .stdout(predicate::str::contains("Document 2"))
        .stdout(predicate::str::contains("[question]: q2"))
        .stdout(predicate::str::contains("[answer]: Exercise keeps the heart healthy."));
    cli()
        .args(["show", "--id", "9", "--corpus"])
        .arg(&corpus)
        .assert()
        .failure()
        .stderr(predicate::str::contains("document 9 not found"));
}

#[test]
fn test_csv_corpus_fit_search_and_show() {
    let dir = TempDir::new().expect("temp dir");
    let corpus = dir.path().join("CancerQA.csv");
    fs::write(
        &corpus,
        "Question,Answer\n\
         What is melanoma?,\"Melanoma is a skin cancer, often caused by sunlight.\"\n\
         What is insulin?,Insulin controls blood sugar.\n\
         Who gets asthma?,Asthma narrows the airways.\n",
    )
    .expect("write corpus");
    let model = dir.path().join("bm25.cbor");
    cli()
        .args(["fit", "--model", "bm25", "--corpus"])
        .arg(&corpus)
        .arg("--out")
        .arg(&model)
        .assert()
        .success()
        .stdout(predicate::str::contains("3 documents"));
    cli()
        .args(["search", "--model-file"])
        .arg(&model)
        .args(["--query", "melanoma", "--corpus"])
        .arg(&corpus)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Doc 0"))
        .stdout(predicate::str::contains("Melanoma is a skin cancer"));
    cli()
        .args(["show", "--id", "1", "--corpus"])
        .arg(&corpus)
        .assert()
        .success()
        .stdout(predicate::str::contains("[Question]: What is insulin?"))
        .stdout(predicate::str::contains("[Answer]: Insulin controls blood sugar."));
}

#[test]
fn test_config_file_changes_default_k() {
    let dir = TempDir::new().expect("temp dir");
    let model = fit(dir.path(), "boolean");
    let config = dir.path().join("retrieval.toml");
    fs::write(&config, "[search]\nk = 1\n").expect("write config");
    cli()
        .arg("--config")
        .arg(&config)
        .args(["search", "--model-file"])
        .arg(&model)
        .args(["--query", "cancer"])
        .assert()
        .success()
        .stdout("Doc 1\n");
}

#[test]
fn test_missing_model_file_fails() {
    cli()
        .args(["search", "--model-file", "/no/such/model.cbor", "--query", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load model"));
}
