//! Shader source validation.
//!
//! Parses and validates the WGSL sources the pipelines embed, and checks the
//! entry-point contract the pipeline cache relies on by name.

const TESS_FACTORS_WGSL: &str = include_str!("../shaders/tess_factors.wgsl");
const PATCH_WGSL: &str = include_str!("../shaders/patch.wgsl");

fn parse_wgsl(label: &str, source: &str) -> naga::Module {
    let module = naga::front::wgsl::parse_str(source).unwrap_or_else(|error| {
        panic!(
            "WGSL parse failed for {label}: {}",
            error.emit_to_string(source)
        )
    });

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::default(),
    )
    .validate(&module)
    .unwrap_or_else(|error| panic!("WGSL validation failed for {label}: {error:?}"));

    module
}

fn entry_point_names(module: &naga::Module) -> Vec<&str> {
    module
        .entry_points
        .iter()
        .map(|entry| entry.name.as_str())
        .collect()
}

#[test]
fn shader_sources_parse_and_validate() {
    parse_wgsl("tess_factors.wgsl", TESS_FACTORS_WGSL);
    parse_wgsl("patch.wgsl", PATCH_WGSL);
}

#[test]
fn factor_kernels_expose_one_entry_point_per_topology() {
    let module = parse_wgsl("tess_factors.wgsl", TESS_FACTORS_WGSL);
    let names = entry_point_names(&module);

    assert_eq!(names, ["tess_factors_triangle", "tess_factors_quad"]);
    for entry in &module.entry_points {
        assert_eq!(entry.stage, naga::ShaderStage::Compute);
        // One thread derives all factor values for the single patch.
        assert_eq!(entry.workgroup_size, [1, 1, 1]);
    }
}

#[test]
fn patch_shaders_expose_two_vertex_stages_and_a_shared_fragment() {
    let module = parse_wgsl("patch.wgsl", PATCH_WGSL);
    let names = entry_point_names(&module);

    assert_eq!(names, ["vs_patch_triangle", "vs_patch_quad", "fs_patch"]);
    assert_eq!(module.entry_points[0].stage, naga::ShaderStage::Vertex);
    assert_eq!(module.entry_points[1].stage, naga::ShaderStage::Vertex);
    assert_eq!(module.entry_points[2].stage, naga::ShaderStage::Fragment);
}
