use uma_rs::codegen::ir::Item;
use uma_rs::codegen::{command_stream_symbol, extract_command_stream, lower_artifact};
use uma_rs::command_stream::CommandStreamBuilder;
use uma_rs::{generate_source, BufferRoles, CodegenError, CompilationArtifact, ZeroPoints};

fn dense_stream() -> Vec<i32> {
    CommandStreamBuilder::new()
        .load_input(0)
        .load_weight(0)
        .gemm()
        .store(0)
        .finish()
}

fn artifact(name: &str, stream: Vec<i32>) -> CompilationArtifact {
    CompilationArtifact::new(
        name,
        stream,
        ZeroPoints::new(-123, -123),
        0.015,
        BufferRoles::new("placeholder", "placeholder_1", "compute"),
    )
    .expect("valid artifact")
}

#[test]
fn generation_is_deterministic() {
    let artifact = artifact("tvmgen-default-uma-main-0", dense_stream());
    let first = generate_source(&artifact).expect("generates");
    let second = generate_source(&artifact).expect("generates");
    assert_eq!(first, second);
}

#[test]
fn sanitized_name_defines_the_function() {
    let artifact = artifact("tvmgen-default-uma-main-0", dense_stream());
    let source = generate_source(&artifact).expect("generates");
    assert!(source.contains(
        "int32_t tvmgen_default_uma_main_0(int8_t* placeholder, int8_t* placeholder_1, int32_t* compute) {"
    ));
    assert!(!source.contains("tvmgen-default"));
}

#[test]
fn array_is_placed_in_accelerator_section() {
    let artifact = artifact("f", vec![5, 6, 7]);
    let source = generate_source(&artifact).expect("generates");
    assert!(source.contains(
        "__attribute__((section(\".rodata.tvm\"))) static int32_t f_cms_data_data[3] = {5, 6, 7};"
    ));
    assert!(source.contains("const size_t cms_data_size = 3;"));
}

#[test]
fn single_word_stream_has_no_trailing_separator() {
    let source = generate_source(&artifact("f", vec![16])).expect("generates");
    assert!(source.contains("f_cms_data_data[1] = {16};"));
}

#[test]
fn negative_words_are_emitted_verbatim() {
    let stream = vec![i32::MIN, -1, 0, i32::MAX];
    let source = generate_source(&artifact("f", stream.clone())).expect("generates");
    assert_eq!(extract_command_stream(&source, "f").expect("extracts"), stream);
}

#[test]
fn command_stream_survives_extraction() {
    let stream = dense_stream();
    let artifact = artifact("qnn-dense-0", stream.clone());
    let source = generate_source(&artifact).expect("generates");
    let extracted = extract_command_stream(&source, "qnn-dense-0").expect("extracts");
    assert_eq!(extracted, stream);
}

#[test]
fn device_calls_follow_the_calling_convention() {
    let artifact = CompilationArtifact::new(
        "f",
        vec![1, 2],
        ZeroPoints::new(3, -4),
        1.0,
        BufferRoles::new("x", "w", "y"),
    )
    .expect("valid artifact");
    let source = generate_source(&artifact).expect("generates");
    let cfg = source
        .find("DeviceCfg(x, w, y, 3, -4, cms_data, cms_data_size);")
        .expect("configure call present");
    let run = source
        .find("int32_t result = DeviceRun();")
        .expect("run call present");
    let check = source
        .find("if (result != 0) { return -1; }")
        .expect("status check present");
    let ret = source.find("return result;").expect("return present");
    assert!(cfg < run && run < check && check < ret);
}

#[test]
fn lowering_exposes_declarations_in_order() {
    let items = lower_artifact(&artifact("f", vec![1])).expect("lowers");
    assert!(matches!(items[0], Item::Comment(_)));
    match &items[1] {
        Item::StaticArray { name, values, .. } => {
            assert_eq!(name, &command_stream_symbol("f"));
            assert_eq!(values, &vec![1]);
        }
        other => panic!("expected command stream array, got {other:?}"),
    }
    match &items[2] {
        Item::ExternC(inner) => assert!(matches!(inner[0], Item::Function { .. })),
        other => panic!("expected extern \"C\" block, got {other:?}"),
    }
}

#[test]
fn positional_artifact_with_two_buffers_fails_fast() {
    let err = CompilationArtifact::from_parts(
        "f",
        vec![1],
        vec![0, 0],
        1.0,
        vec!["a".to_string(), "b".to_string()],
    )
    .unwrap_err();
    assert!(matches!(err, CodegenError::BaseAddressCount { found: 2, .. }));
}

#[test]
fn extraction_rejects_truncated_initializer() {
    let source = "static int32_t f_cms_data_data[3] = {1, 2};";
    assert!(matches!(
        extract_command_stream(source, "f"),
        Err(CodegenError::MalformedCommandStream { .. })
    ));
}
