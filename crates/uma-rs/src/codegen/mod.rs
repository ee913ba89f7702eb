//! Host-side C generation for offloaded subgraphs.
//!
//! Every artifact becomes a command-stream array placed in `.rodata.tvm` and
//! a C-linkage function `int32_t f(int8_t*, int8_t*, int32_t*)` that hands the
//! buffers, zero points and stream to `DeviceCfg` and then calls `DeviceRun`.

pub mod ir;
pub mod render;
mod utils;

use log::trace;

use crate::artifact::CompilationArtifact;
use crate::error::{CodegenError, CodegenResult};

use ir::{CType, Expr, Item, Param, Stmt};

pub use render::{render_items, Printer};
pub use utils::{is_c_identifier, is_reserved_word, sanitize_symbol};

pub const RODATA_SECTION: &str = ".rodata.tvm";
pub const DEVICE_CFG: &str = "DeviceCfg";
pub const DEVICE_RUN: &str = "DeviceRun";
/// Status returned by generated functions when the device reports any error.
pub const FAILURE_STATUS: i32 = -1;

const LINKER_NOTE: &str =
    "Update linker script to place .rodata.tvm in memory that can be accessed by the NPU";
const CMS_DATA: &str = "cms_data";
const CMS_DATA_SIZE: &str = "cms_data_size";
const RESULT: &str = "result";
const DEFAULT_INCLUDES: [&str; 2] = ["stdint.h", "stddef.h"];

pub fn command_stream_symbol(function_name: &str) -> String {
    let base = sanitize_symbol(function_name);
    format!("{base}_cms_data_data")
}

/// Lowers one artifact to the declarations making up its block of source.
pub fn lower_artifact(artifact: &CompilationArtifact) -> CodegenResult<Vec<Item>> {
    let function = sanitize_symbol(artifact.function_name());
    let stream = artifact.command_stream();
    if stream.is_empty() {
        return Err(CodegenError::EmptyCommandStream {
            function: artifact.function_name().to_string(),
        });
    }
    let buffers = artifact.buffers();
    let [input, weight, output] = buffers.as_array();
    check_buffer_names(artifact.function_name(), &function, &buffers.as_array())?;

    let array = command_stream_symbol(artifact.function_name());
    let zero_points = artifact.zero_points();

    let body = vec![
        Stmt::Let {
            constant: false,
            ty: CType::VoidPtr,
            name: CMS_DATA.to_string(),
            init: Expr::cast(CType::VoidPtr, Expr::ident(&array)),
        },
        Stmt::Let {
            constant: true,
            ty: CType::SizeT,
            name: CMS_DATA_SIZE.to_string(),
            init: Expr::Int(stream.len() as i64),
        },
        Stmt::Blank,
        Stmt::Expr(Expr::call(
            DEVICE_CFG,
            vec![
                Expr::ident(input),
                Expr::ident(weight),
                Expr::ident(output),
                Expr::Int(zero_points.input as i64),
                Expr::Int(zero_points.weight as i64),
                Expr::ident(CMS_DATA),
                Expr::ident(CMS_DATA_SIZE),
            ],
        )),
        Stmt::Let {
            constant: false,
            ty: CType::Int32,
            name: RESULT.to_string(),
            init: Expr::call(DEVICE_RUN, Vec::new()),
        },
        Stmt::ReturnIf {
            cond: Expr::not_equal(Expr::ident(RESULT), Expr::Int(0)),
            value: Expr::Int(i64::from(FAILURE_STATUS)),
        },
        Stmt::Blank,
        Stmt::Return(Expr::ident(RESULT)),
    ];

    Ok(vec![
        Item::Comment(LINKER_NOTE.to_string()),
        Item::StaticArray {
            section: Some(RODATA_SECTION.to_string()),
            elem: CType::Int32,
            name: array,
            values: stream.to_vec(),
        },
        Item::ExternC(vec![Item::Function {
            ret: CType::Int32,
            name: function,
            params: vec![
                Param::new(CType::Int8Ptr, input),
                Param::new(CType::Int8Ptr, weight),
                Param::new(CType::Int32Ptr, output),
            ],
            body,
        }]),
    ])
}

/// Renders the block of C for one artifact. Output depends only on the
/// artifact, so repeated calls are byte-identical.
pub fn generate_source(artifact: &CompilationArtifact) -> CodegenResult<String> {
    let items = lower_artifact(artifact)?;
    let source = render_items(&items);
    trace!(
        "generated {} bytes of C for '{}'",
        source.len(),
        artifact.function_name()
    );
    Ok(source)
}

/// Includes plus the C-linkage prototypes of the device entry points, so the
/// unit compiles without a vendor header.
pub fn module_prelude(extra_includes: &[String]) -> String {
    let mut items: Vec<Item> = DEFAULT_INCLUDES
        .iter()
        .map(|header| Item::Include(header.to_string()))
        .collect();
    items.extend(
        extra_includes
            .iter()
            .map(|header| Item::Include(header.clone())),
    );
    items.push(Item::Blank);
    items.push(Item::ExternC(vec![
        Item::Prototype {
            ret: CType::Void,
            name: DEVICE_CFG.to_string(),
            params: vec![
                Param::new(CType::Int8Ptr, "input"),
                Param::new(CType::Int8Ptr, "weight"),
                Param::new(CType::Int32Ptr, "output"),
                Param::new(CType::Int32, "input_zp"),
                Param::new(CType::Int32, "weight_zp"),
                Param::new(CType::VoidPtr, CMS_DATA),
                Param::new(CType::SizeT, CMS_DATA_SIZE),
            ],
        },
        Item::Prototype {
            ret: CType::Int32,
            name: DEVICE_RUN.to_string(),
            params: Vec::new(),
        },
    ]));
    render_items(&items)
}

/// Parses the command-stream initializer emitted for `function_name` back out
/// of generated source.
pub fn extract_command_stream(source: &str, function_name: &str) -> CodegenResult<Vec<i32>> {
    let symbol = command_stream_symbol(function_name);
    let malformed = |reason: &str| CodegenError::MalformedCommandStream {
        function: function_name.to_string(),
        reason: reason.to_string(),
    };

    let needle = format!(" {symbol}[");
    let start = source
        .find(&needle)
        .ok_or_else(|| CodegenError::MissingCommandStream {
            function: function_name.to_string(),
        })?;
    let rest = &source[start + needle.len()..];
    let close = rest.find(']').ok_or_else(|| malformed("unterminated length"))?;
    let declared: usize = rest[..close]
        .trim()
        .parse()
        .map_err(|_| malformed("array length is not an integer"))?;
    let rest = &rest[close..];
    let open = rest.find('{').ok_or_else(|| malformed("missing initializer"))?;
    let end = rest[open..]
        .find('}')
        .ok_or_else(|| malformed("unterminated initializer"))?;
    let values = rest[open + 1..open + end]
        .split(',')
        .map(|word| word.trim().parse::<i32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| malformed("initializer value is not an int32"))?;
    if values.len() != declared {
        return Err(malformed("initializer length differs from declared length"));
    }
    Ok(values)
}

fn check_buffer_names(original: &str, function: &str, names: &[&str; 3]) -> CodegenResult<()> {
    let array = command_stream_symbol(original);
    utils::require_identifier(function)?;
    if [DEVICE_CFG, DEVICE_RUN].contains(&function) {
        return Err(CodegenError::SymbolCollision {
            function: original.to_string(),
            symbol: function.to_string(),
        });
    }
    let reserved = [CMS_DATA, CMS_DATA_SIZE, RESULT, DEVICE_CFG, DEVICE_RUN];
    for (idx, name) in names.iter().enumerate() {
        utils::require_identifier(name)?;
        let collides = reserved.contains(name)
            || *name == function
            || *name == array
            || names[..idx].contains(name);
        if collides {
            return Err(CodegenError::SymbolCollision {
                function: original.to_string(),
                symbol: name.to_string(),
            });
        }
    }
    Ok(())
}
