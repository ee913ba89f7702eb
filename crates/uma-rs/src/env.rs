use std::env;
use std::sync::OnceLock;

static UMA_DUMP_SOURCE: OnceLock<bool> = OnceLock::new();

fn parse_bool(value: &str) -> bool {
    let normalized = value.trim().to_ascii_lowercase();
    matches!(normalized.as_str(), "1" | "true" | "yes" | "on")
}

/// `UMA_DUMP_SOURCE` makes module construction log the full generated source.
pub(crate) fn dump_source_enabled() -> bool {
    *UMA_DUMP_SOURCE.get_or_init(|| match env::var("UMA_DUMP_SOURCE") {
        Ok(value) if !value.trim().is_empty() => parse_bool(&value),
        _ => false,
    })
}
