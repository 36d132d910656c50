use dischex::config::GeneratorConfig;
use dischex::golden::{fixed_reference, float_reference, generate, make_rng, Decision, GoldenBundle, GoldenReport};
use dischex::hex::{decode_hex_token, quantize, read_hex_tokens};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

#[test]
fn two_input_scenario() {
    let b = GoldenBundle { weights: vec![0.25, 0.25], bias: 0.1, inputs: vec![1.0, 1.0] };
    let f = float_reference(&b);
    assert!((f.score - 0.6).abs() < 1e-12);
    assert_eq!(f.decision, Decision::Real);
    // bias 0.1 -> 25.6 truncates to 25; weights 64; inputs 256
    let q = fixed_reference(&b, 8);
    assert_eq!(q.accumulator, 25 * 256 + 64 * 256 + 64 * 256);
    assert_eq!(q.score, 153);
    assert_eq!(q.hex, "0099");
    assert_eq!(q.decision(), Decision::Real);
}

#[test]
fn seeded_bundles_are_deterministic() {
    let cfg = GeneratorConfig { seed: Some(42), ..GeneratorConfig::default() };
    let a = GoldenBundle::random(&cfg, &mut make_rng(&cfg)).unwrap();
    let b = GoldenBundle::random(&cfg, &mut make_rng(&cfg)).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.weights.len(), 256);
    assert!(a.weights.iter().chain(std::iter::once(&a.bias)).all(|w| (-0.5..0.5).contains(w)));
    assert!(a.inputs.iter().all(|x| (-1.0..1.0).contains(x)));
}

#[test]
fn fixed_and_float_agree_away_from_zero() {
    for seed in 0..64u64 {
        let cfg = GeneratorConfig { seed: Some(seed), ..GeneratorConfig::default() };
        let b = GoldenBundle::random(&cfg, &mut make_rng(&cfg)).unwrap();
        let r = GoldenReport::new(&b, cfg.frac_bits);
        assert!((r.fixed_score_real() - r.float.score).abs() < 0.5, "seed {} drifted: {:?}", seed, r);
        if r.float.score.abs() > 1.0 {
            assert!(r.decisions_agree(), "seed {} disagrees: {:?}", seed, r);
        }
    }
}

#[test]
fn generate_writes_matching_hex_files() {
    let out_dir = PathBuf::from("target/golden_generate");
    std::fs::create_dir_all(&out_dir).unwrap();
    let cfg = GeneratorConfig { seed: Some(7), input_size: 16, out_dir, ..GeneratorConfig::default() };
    let (bundle, report) = generate(&cfg).unwrap();

    let weights = read_hex_tokens(cfg.weights_path()).unwrap();
    let bias = read_hex_tokens(cfg.bias_path()).unwrap();
    let inputs = read_hex_tokens(cfg.input_path()).unwrap();
    assert_eq!((weights.len(), bias.len(), inputs.len()), (16, 1, 16));
    for (tok, w) in weights.iter().zip(&bundle.weights) {
        assert_eq!(decode_hex_token(tok).unwrap() as i64, quantize(*w, 8));
    }
    assert_eq!(decode_hex_token(&bias[0]).unwrap() as i64, quantize(bundle.bias, 8));

    let json_path = cfg.out_dir.join("golden.json");
    report.write_json(&json_path).unwrap();
    let v: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(v["fixed"]["hex"], report.fixed.hex);
    assert_eq!(v["float"]["decision"], report.float.decision.to_string());
}

#[cfg(target_os = "linux")]
#[test]
fn json_write_errors_surface() {
    if !std::path::Path::new("/dev/full").exists() { return; }
    let b = GoldenBundle { weights: vec![0.25], bias: 0.0, inputs: vec![0.5] };
    let r = GoldenReport::new(&b, 8);
    let err = r.write_json("/dev/full").unwrap_err();
    assert!(matches!(err, dischex::HexError::Io { .. }), "got {:?}", err);
}
