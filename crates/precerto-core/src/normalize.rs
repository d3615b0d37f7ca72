//! Text normalization applied to catalog descriptions and AI-provider output.
//!
//! Both resolution paths funnel through these helpers so the caller sees one
//! uniform shape no matter which upstream produced the data.

use std::sync::LazyLock;

use regex::Regex;

/// Quantity immediately followed by a recognized unit, e.g. `1KG`, `2,5L`,
/// `350 ml`. Bare numbers (catalog codes, EANs) must not match.
static SIZE_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+(?:[.,]\d+)?\s*(?:KG|G|L|ML|MM|M))\b").expect("valid size regex")
});

/// Normalizes arbitrary-case free text to Title Case, word by word.
///
/// Words are split on whitespace and rejoined with single spaces, so the
/// function is idempotent. Empty input yields the empty string.
#[must_use]
pub fn title_case(input: &str) -> String {
    input
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extracts the first size/weight token from a product description.
///
/// Recognized units are `KG`, `G`, `L`, `ML`, `MM`, and `M`, matched
/// case-insensitively with an optional `.` or `,` decimal separator and
/// optional whitespace between the number and the unit. The first
/// left-to-right match wins and is returned uppercased.
#[must_use]
pub fn extract_size_token(description: &str) -> Option<String> {
    SIZE_TOKEN_RE
        .captures(description)
        .map(|caps| caps[1].to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // title_case
    // -----------------------------------------------------------------------

    #[test]
    fn title_case_lowercase_input() {
        assert_eq!(title_case("leite integral 1l"), "Leite Integral 1l");
    }

    #[test]
    fn title_case_shouting_input() {
        assert_eq!(title_case("ARROZ BRANCO TIPO 1"), "Arroz Branco Tipo 1");
    }

    #[test]
    fn title_case_is_idempotent() {
        let inputs = ["leite integral 1l", "ARROZ BRANCO", "Já Normalizado", ""];
        for input in inputs {
            let once = title_case(input);
            assert_eq!(title_case(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn title_case_empty_is_empty() {
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn title_case_collapses_interior_whitespace() {
        assert_eq!(title_case("  cafe   torrado "), "Cafe Torrado");
    }

    #[test]
    fn title_case_handles_accented_words() {
        assert_eq!(title_case("AÇÚCAR cristal"), "Açúcar Cristal");
    }

    // -----------------------------------------------------------------------
    // extract_size_token
    // -----------------------------------------------------------------------

    #[test]
    fn size_litre_no_space() {
        assert_eq!(extract_size_token("Leite 1L Integral"), Some("1L".to_owned()));
    }

    #[test]
    fn size_decimal_comma() {
        assert_eq!(extract_size_token("Refrigerante 2,5L"), Some("2,5L".to_owned()));
    }

    #[test]
    fn size_decimal_dot() {
        assert_eq!(extract_size_token("Vinho 1.5l"), Some("1.5L".to_owned()));
    }

    #[test]
    fn size_lowercase_unit_is_uppercased() {
        assert_eq!(extract_size_token("leite integral 1l"), Some("1L".to_owned()));
    }

    #[test]
    fn size_with_internal_whitespace() {
        assert_eq!(extract_size_token("Cerveja 350 ml lata"), Some("350 ML".to_owned()));
    }

    #[test]
    fn size_kilograms() {
        assert_eq!(extract_size_token("Arroz Tipo 1 5KG"), Some("5KG".to_owned()));
    }

    #[test]
    fn size_millimetres_before_metres() {
        assert_eq!(extract_size_token("Prego 10mm"), Some("10MM".to_owned()));
    }

    #[test]
    fn size_bare_number_does_not_match() {
        assert_eq!(extract_size_token("Produto Sem Unidade 123"), None);
    }

    #[test]
    fn size_first_match_wins() {
        assert_eq!(
            extract_size_token("Kit 2L + refil 500ml"),
            Some("2L".to_owned())
        );
    }

    #[test]
    fn size_absent_in_plain_text() {
        assert_eq!(extract_size_token("Sabonete Neutro"), None);
    }
}
