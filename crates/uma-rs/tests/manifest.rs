use anyhow::Result;
use uma_rs::artifact::ARTIFACT_MANIFEST_VERSION;
use uma_rs::{ArtifactManifest, BufferRoles, CodegenError, CompilationArtifact, ZeroPoints};

fn sample_manifest() -> ArtifactManifest {
    let artifact = CompilationArtifact::new(
        "tvmgen-default-uma-main-0",
        vec![65537, 65538, 16, 32],
        ZeroPoints::new(-123, -123),
        0.0625,
        BufferRoles::new("placeholder", "placeholder_1", "compute"),
    )
    .expect("valid artifact");
    ArtifactManifest::new(vec![artifact])
}

#[test]
fn manifest_survives_json_file() -> Result<()> {
    let manifest = sample_manifest();
    let mut path = std::env::temp_dir();
    path.push(format!("uma_rs_manifest_{}.json", std::process::id()));
    manifest.save_json(&path)?;
    let loaded = ArtifactManifest::load_json(&path)?;
    std::fs::remove_file(&path)?;
    assert_eq!(loaded, manifest);
    Ok(())
}

#[test]
fn manifest_without_version_defaults_to_current() -> Result<()> {
    let json = r#"{
        "artifacts": [{
            "function_name": "f",
            "command_stream": [16],
            "zero_points": { "input": 1, "weight": 2 },
            "buffers": { "input": "a", "weight": "b", "output": "c" }
        }]
    }"#;
    let manifest = ArtifactManifest::from_json_str(json)?;
    assert_eq!(manifest.manifest_version, ARTIFACT_MANIFEST_VERSION);
    let artifact = &manifest.artifacts[0];
    assert_eq!(artifact.scale(), 0.0);
    assert_eq!(artifact.zero_points(), ZeroPoints::new(1, 2));
    Ok(())
}

#[test]
fn empty_command_stream_in_json_is_rejected() {
    let json = r#"{
        "manifest_version": 1,
        "artifacts": [{
            "function_name": "f",
            "command_stream": [],
            "zero_points": { "input": 0, "weight": 0 },
            "scale": 1.0,
            "buffers": { "input": "a", "weight": "b", "output": "c" }
        }]
    }"#;
    let err = ArtifactManifest::from_json_str(json).unwrap_err();
    assert!(matches!(err, CodegenError::Json(_)));
    assert!(err.to_string().contains("empty command stream"));
}

#[test]
fn future_manifest_version_is_rejected() {
    let json = r#"{ "manifest_version": 99, "artifacts": [] }"#;
    assert!(matches!(
        ArtifactManifest::from_json_str(json),
        Err(CodegenError::ManifestVersionMismatch { found: 99, .. })
    ));
}

#[test]
fn non_finite_scale_is_rejected_before_serialization() {
    for scale in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let err = CompilationArtifact::new(
            "f",
            vec![16],
            ZeroPoints::default(),
            scale,
            BufferRoles::new("a", "b", "c"),
        )
        .unwrap_err();
        assert!(matches!(err, CodegenError::NonFiniteScale { .. }), "{err}");
    }
}

#[test]
fn signed_and_large_scales_round_trip() -> Result<()> {
    let artifacts = [-0.5, 1048576.0, 0.0]
        .into_iter()
        .enumerate()
        .map(|(idx, scale)| {
            CompilationArtifact::new(
                format!("f{idx}"),
                vec![16],
                ZeroPoints::default(),
                scale,
                BufferRoles::new("a", "b", "c"),
            )
        })
        .collect::<Result<Vec<_>, _>>()?;
    let manifest = ArtifactManifest::new(artifacts);
    let loaded = ArtifactManifest::from_json_str(&manifest.to_json_string()?)?;
    assert_eq!(loaded, manifest);
    Ok(())
}

#[test]
fn null_scale_in_json_is_rejected() {
    let json = r#"{
        "artifacts": [{
            "function_name": "f",
            "command_stream": [16],
            "zero_points": { "input": 0, "weight": 0 },
            "scale": null,
            "buffers": { "input": "a", "weight": "b", "output": "c" }
        }]
    }"#;
    assert!(matches!(
        ArtifactManifest::from_json_str(json),
        Err(CodegenError::Json(_))
    ));
}
