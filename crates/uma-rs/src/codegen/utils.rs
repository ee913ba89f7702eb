use crate::error::{CodegenError, CodegenResult};

/// Rewrites `value` into a C identifier: anything outside `[A-Za-z0-9_]`
/// becomes `_`, and a leading digit gets a `_` prefix.
pub fn sanitize_symbol(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for (idx, ch) in value.chars().enumerate() {
        let is_valid = ch.is_ascii_alphanumeric() || ch == '_';
        if idx == 0 && ch.is_ascii_digit() {
            out.push('_');
        }
        out.push(if is_valid { ch } else { '_' });
    }
    out
}

/// C11 keywords plus the fixed-width typedefs the generated code relies on.
const RESERVED_WORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
    "union", "unsigned", "void", "volatile", "while", "_Alignas", "_Alignof", "_Atomic",
    "_Bool", "_Complex", "_Generic", "_Imaginary", "_Noreturn", "_Static_assert",
    "_Thread_local", "int8_t", "int32_t", "size_t",
];

pub fn is_reserved_word(value: &str) -> bool {
    RESERVED_WORDS.contains(&value)
}

/// True for names usable as a C declarator: identifier syntax and not a
/// keyword or one of the reserved typedefs.
pub fn is_c_identifier(value: &str) -> bool {
    if is_reserved_word(value) {
        return false;
    }
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

pub(super) fn require_identifier(value: &str) -> CodegenResult<()> {
    if is_c_identifier(value) {
        Ok(())
    } else {
        Err(CodegenError::InvalidSymbol {
            symbol: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyphens_become_underscores() {
        assert_eq!(
            sanitize_symbol("tvmgen-default-uma-main-0"),
            "tvmgen_default_uma_main_0"
        );
    }

    #[test]
    fn leading_digit_is_prefixed() {
        assert_eq!(sanitize_symbol("0dense"), "_0dense");
        assert!(is_c_identifier(&sanitize_symbol("0dense")));
    }

    #[test]
    fn identifier_check_rejects_separators() {
        assert!(is_c_identifier("placeholder_1"));
        assert!(!is_c_identifier("placeholder-1"));
        assert!(!is_c_identifier(""));
        assert!(!is_c_identifier("9x"));
    }

    #[test]
    fn keywords_are_not_identifiers() {
        for word in ["int", "return", "void", "if", "_Bool", "int32_t", "size_t"] {
            assert!(!is_c_identifier(word), "{word}");
            assert!(require_identifier(word).is_err(), "{word}");
        }
        assert!(is_c_identifier("interval"));
        assert!(is_c_identifier("int8"));
    }
}
