//! Generated WGSL must parse and validate with naga.

use coffee_smoke::params::SmokeParams;
use coffee_smoke::shader::{smoke_shader, MODEL_SHADER};

/// Validates WGSL code using naga.
fn validate_wgsl(code: &str) -> Result<naga::Module, String> {
    let module = naga::front::wgsl::parse_str(code)
        .map_err(|e| format!("WGSL parse error: {}", e.emit_to_string(code)))?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(&module)
        .map_err(|e| format!("WGSL validation error: {:?}", e))?;

    Ok(module)
}

fn entry_points(module: &naga::Module) -> Vec<(&str, naga::ShaderStage)> {
    module
        .entry_points
        .iter()
        .map(|ep| (ep.name.as_str(), ep.stage))
        .collect()
}

#[test]
fn test_default_smoke_shader_validates() {
    let wgsl = smoke_shader(&SmokeParams::default());
    let module = validate_wgsl(&wgsl).unwrap();
    let eps = entry_points(&module);
    assert!(eps.contains(&("vs_main", naga::ShaderStage::Vertex)));
    assert!(eps.contains(&("fs_main", naga::ShaderStage::Fragment)));
}

#[test]
fn test_custom_smoke_shader_validates() {
    let params = SmokeParams::default()
        .with_twist(-3.0)
        .with_wind(-0.02, 25.0)
        .with_density_speed(1.0)
        .with_density_range(0.0, 1.0)
        .with_shadow_strength(0.0)
        .with_pointer(1.0, 0.0);
    validate_wgsl(&smoke_shader(&params)).unwrap();
}

#[test]
fn test_smoke_shader_from_json_validates() {
    let params = SmokeParams::from_json_str(
        r#"{ "twist": 10, "density_scale": [2, 1], "edge_fade": 0.5, "top_fade_start": 0 }"#,
    )
    .unwrap();
    validate_wgsl(&smoke_shader(&params)).unwrap();
}

#[test]
fn test_model_shader_validates() {
    let module = validate_wgsl(MODEL_SHADER).unwrap();
    let eps = entry_points(&module);
    assert!(eps.contains(&("vs_main", naga::ShaderStage::Vertex)));
    assert!(eps.contains(&("fs_main", naga::ShaderStage::Fragment)));
}
