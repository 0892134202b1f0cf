use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Lowercases `text`, decomposes it (NFD) and strips all combining marks,
/// yielding ASCII-range lowercase output for accent-insensitive matching.
///
/// The result is identical for any Unicode-equivalent input form (NFC vs NFD),
/// and the function is idempotent.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_and_accent_stripping() {
        assert_eq!(normalize("Ção"), "cao");
        assert_eq!(normalize("Depreciação"), "depreciacao");
        assert_eq!(normalize("PATRIMÔNIO LÍQUIDO"), "patrimonio liquido");
        assert_eq!(normalize("Empréstimos"), "emprestimos");
    }

    #[test]
    fn test_unicode_equivalent_forms() {
        // "ã" precomposed (U+00E3) vs "a" + combining tilde (U+0303)
        let nfc = "provis\u{00e3}o";
        let nfd = "provisa\u{0303}o";
        assert_eq!(normalize(nfc), normalize(nfd));
        assert_eq!(normalize(nfc), "provisao");
    }

    #[test]
    fn test_idempotent() {
        let once = normalize("Caixa e Equivalentes de Caixa");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_empty_and_plain_ascii() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("fornecedores"), "fornecedores");
    }
}
