//! Integration tests for the merge-scaled and merge-seq workflows.

use mezclar::adapter::{AdapterWeights, TensorData, TensorDtype, ADAPTER_CONFIG_FILE};
use mezclar::cli::run_command;
use mezclar::config::parse_args;
use mezclar::merge::MODEL_WEIGHTS_FILE;
use std::path::Path;
use tempfile::TempDir;

const Q_PROJ_A: &str = "base_model.model.layers.0.self_attn.q_proj.lora_A.weight";
const Q_PROJ_B: &str = "base_model.model.layers.0.self_attn.q_proj.lora_B.weight";
const Q_PROJ_TARGET: &str = "layers.0.self_attn.q_proj.weight";

/// Write a rank-1 adapter on q_proj with the given factor matrices.
fn write_adapter(dir: &Path, lora_a: Vec<f32>, lora_b: Vec<f32>, alpha: f32) {
    let mut w = AdapterWeights::new();
    w.insert(Q_PROJ_A, TensorData::new(TensorDtype::F32, vec![1, 2], lora_a));
    w.insert(Q_PROJ_B, TensorData::new(TensorDtype::F32, vec![2, 1], lora_b));
    w.save_dir(dir).expect("fixture adapter should save");

    let config = serde_json::json!({"peft_type": "LORA", "r": 1, "lora_alpha": alpha});
    std::fs::write(dir.join(ADAPTER_CONFIG_FILE), serde_json::to_string(&config).unwrap())
        .expect("fixture config should save");
}

fn write_base_model(dir: &Path, q_proj: Vec<f32>) {
    let mut w = AdapterWeights::new();
    w.insert(Q_PROJ_TARGET, TensorData::new(TensorDtype::F32, vec![2, 2], q_proj));
    w.save(dir.join(MODEL_WEIGHTS_FILE)).expect("fixture model should save");
    std::fs::write(dir.join("config.json"), r#"{"model_type": "llama"}"#).unwrap();
    std::fs::write(dir.join("tokenizer.json"), r#"{"version": "1.0"}"#).unwrap();
}

#[test]
fn test_merge_scaled_folds_both_adapters() {
    let adapter_a = TempDir::new().unwrap();
    let adapter_b = TempDir::new().unwrap();
    let base = TempDir::new().unwrap();
    let export = TempDir::new().unwrap();
    let export_dir = export.path().join("merged");

    // A: delta = B @ A = [[1, 0], [2, 0]] (alpha/r = 1)
    write_adapter(adapter_a.path(), vec![1.0, 0.0], vec![1.0, 2.0], 1.0);
    // B: delta = [[0, 3], [0, 4]]
    write_adapter(adapter_b.path(), vec![0.0, 1.0], vec![3.0, 4.0], 1.0);
    write_base_model(base.path(), vec![0.0, 0.0, 0.0, 0.0]);

    // alpha_attn_b = 2.0 scales both of B's q_proj factors, so B's delta
    // picks up a factor of 4; A passes through at alpha_a = 1.0
    let cli = parse_args([
        "mezclar",
        "merge-scaled",
        "--base-model",
        base.path().to_str().unwrap(),
        "--adapter-a",
        adapter_a.path().to_str().unwrap(),
        "--adapter-b",
        adapter_b.path().to_str().unwrap(),
        "--export-dir",
        export_dir.to_str().unwrap(),
        "--alpha-a",
        "1.0",
        "--alpha-b",
        "1.0",
        "--alpha-attn-b",
        "2.0",
        "--dtype",
        "f32",
        "--quiet",
    ])
    .unwrap();
    run_command(cli).expect("merge-scaled should succeed");

    let merged = AdapterWeights::load(export_dir.join(MODEL_WEIGHTS_FILE))
        .expect("merged model should load");
    assert_eq!(merged.get(Q_PROJ_TARGET).unwrap().values.to_vec(), vec![1.0, 12.0, 2.0, 16.0]);
}

#[test]
fn test_merge_scaled_leaves_tmp_adapters_in_place() {
    let adapter_a = TempDir::new().unwrap();
    let adapter_b = TempDir::new().unwrap();
    let base = TempDir::new().unwrap();
    let export = TempDir::new().unwrap();
    let export_dir = export.path().join("merged");

    write_adapter(adapter_a.path(), vec![1.0, 0.0], vec![1.0, 2.0], 1.0);
    write_adapter(adapter_b.path(), vec![0.0, 1.0], vec![3.0, 4.0], 1.0);
    // Tokenizer files in the source adapter travel into the scaled copy
    std::fs::write(adapter_a.path().join("tokenizer.json"), "{}").unwrap();
    write_base_model(base.path(), vec![0.0; 4]);

    let cli = parse_args([
        "mezclar",
        "merge-scaled",
        "--base-model",
        base.path().to_str().unwrap(),
        "--adapter-a",
        adapter_a.path().to_str().unwrap(),
        "--adapter-b",
        adapter_b.path().to_str().unwrap(),
        "--export-dir",
        export_dir.to_str().unwrap(),
        "--alpha-a",
        "0.5",
        "--quiet",
    ])
    .unwrap();
    run_command(cli).expect("merge-scaled should succeed");

    let tmp_a = export_dir.join("_tmp_adapter_a");
    let tmp_b = export_dir.join("_tmp_adapter_b");
    assert!(tmp_a.join("adapter_model.safetensors").is_file());
    assert!(tmp_a.join(ADAPTER_CONFIG_FILE).is_file());
    assert!(tmp_a.join("tokenizer.json").is_file());
    assert!(tmp_b.join("adapter_model.safetensors").is_file());

    // The scaled copy holds the scaled values
    let scaled_a = AdapterWeights::load_dir(&tmp_a).unwrap();
    assert_eq!(scaled_a.get(Q_PROJ_A).unwrap().values.to_vec(), vec![0.5, 0.0]);
}

#[test]
fn test_merge_seq_applies_adapters_in_order() {
    let pt = TempDir::new().unwrap();
    let sft = TempDir::new().unwrap();
    let base = TempDir::new().unwrap();
    let export = TempDir::new().unwrap();
    let export_dir = export.path().join("merged");

    // PT delta = [[1, 0], [2, 0]]; SFT delta = 2 * [[1, 1], [1, 1]]
    write_adapter(pt.path(), vec![1.0, 0.0], vec![1.0, 2.0], 1.0);
    write_adapter(sft.path(), vec![1.0, 1.0], vec![1.0, 1.0], 2.0);
    write_base_model(base.path(), vec![1.0, 1.0, 1.0, 1.0]);

    let cli = parse_args([
        "mezclar",
        "merge-seq",
        "--base-model",
        base.path().to_str().unwrap(),
        "--pt-adapter",
        pt.path().to_str().unwrap(),
        "--sft-adapter",
        sft.path().to_str().unwrap(),
        "--export-dir",
        export_dir.to_str().unwrap(),
        "--dtype",
        "f32",
        "--quiet",
    ])
    .unwrap();
    run_command(cli).expect("merge-seq should succeed");

    let merged = AdapterWeights::load(export_dir.join(MODEL_WEIGHTS_FILE))
        .expect("merged model should load");
    assert_eq!(merged.get(Q_PROJ_TARGET).unwrap().values.to_vec(), vec![4.0, 3.0, 5.0, 3.0]);

    assert!(export_dir.join("config.json").is_file());
    assert!(export_dir.join("tokenizer.json").is_file());
}

#[test]
fn test_merge_seq_default_precision_exports_bf16() {
    let pt = TempDir::new().unwrap();
    let sft = TempDir::new().unwrap();
    let base = TempDir::new().unwrap();
    let export = TempDir::new().unwrap();
    let export_dir = export.path().join("merged");

    // Values chosen to be exactly representable in bf16
    write_adapter(pt.path(), vec![1.0, 0.0], vec![1.0, 2.0], 1.0);
    write_adapter(sft.path(), vec![0.0, 0.0], vec![0.0, 0.0], 1.0);
    write_base_model(base.path(), vec![1.0, 1.0, 1.0, 1.0]);

    let cli = parse_args([
        "mezclar",
        "merge-seq",
        "--base-model",
        base.path().to_str().unwrap(),
        "--pt-adapter",
        pt.path().to_str().unwrap(),
        "--sft-adapter",
        sft.path().to_str().unwrap(),
        "--export-dir",
        export_dir.to_str().unwrap(),
        "--quiet",
    ])
    .unwrap();
    run_command(cli).expect("merge-seq should succeed");

    let merged = AdapterWeights::load(export_dir.join(MODEL_WEIGHTS_FILE)).unwrap();
    let q = merged.get(Q_PROJ_TARGET).unwrap();
    assert_eq!(q.dtype, TensorDtype::Bf16);
    assert_eq!(q.values.to_vec(), vec![2.0, 1.0, 3.0, 1.0]);
}

#[test]
fn test_merge_seq_missing_base_model_fails_with_path() {
    let pt = TempDir::new().unwrap();
    let sft = TempDir::new().unwrap();
    let export = TempDir::new().unwrap();

    write_adapter(pt.path(), vec![1.0, 0.0], vec![1.0, 2.0], 1.0);
    write_adapter(sft.path(), vec![0.0, 0.0], vec![0.0, 0.0], 1.0);

    let cli = parse_args([
        "mezclar",
        "merge-seq",
        "--base-model",
        "/nonexistent/base",
        "--pt-adapter",
        pt.path().to_str().unwrap(),
        "--sft-adapter",
        sft.path().to_str().unwrap(),
        "--export-dir",
        export.path().join("merged").to_str().unwrap(),
        "--quiet",
    ])
    .unwrap();

    let err = run_command(cli).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/base"));
}
