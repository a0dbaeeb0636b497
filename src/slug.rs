//! Store naming helpers: URL slugs and WhatsApp numbers.

/// Lower-case, ASCII-only, hyphen-separated slug.
///
/// `"Sorveteria do João"` becomes `"sorveteria-do-joao"`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        let c = fold_accent(c);
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

/// Digits-only WhatsApp number with the Brazilian country code.
///
/// Local numbers (10 or 11 digits) gain the `55` prefix. Anything outside
/// 10..=13 digits is rejected.
pub fn normalize_whatsapp(phone: &str) -> Option<String> {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    match digits.len() {
        10 | 11 => Some(format!("55{digits}")),
        12 | 13 => Some(digits),
        _ => None,
    }
}

pub fn whatsapp_link(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    format!("https://wa.me/{digits}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_folds_accents_and_collapses_separators() {
        assert_eq!(slugify("Sorveteria do João"), "sorveteria-do-joao");
        assert_eq!(slugify("  Açaí & Smoothies!! "), "acai-smoothies");
        assert_eq!(slugify("Joe's Shop"), "joe-s-shop");
        assert_eq!(slugify("Café 24h"), "cafe-24h");
    }

    #[test]
    fn slugify_of_symbols_only_is_empty() {
        assert_eq!(slugify("--- !!"), "");
    }

    #[test]
    fn local_numbers_gain_country_code() {
        assert_eq!(
            normalize_whatsapp("(11) 99999-9999").as_deref(),
            Some("5511999999999")
        );
        assert_eq!(normalize_whatsapp("1133334444").as_deref(), Some("551133334444"));
    }

    #[test]
    fn full_numbers_are_kept() {
        assert_eq!(
            normalize_whatsapp("+55 11 99999-9999").as_deref(),
            Some("5511999999999")
        );
    }

    #[test]
    fn out_of_range_numbers_are_rejected() {
        assert_eq!(normalize_whatsapp("12345"), None);
        assert_eq!(normalize_whatsapp("12345678901234"), None);
    }

    #[test]
    fn link_uses_digits_only() {
        assert_eq!(whatsapp_link("+55 (11) 99999-9999"), "https://wa.me/5511999999999");
    }
}
