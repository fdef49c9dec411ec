//! Query normalization: lowercase, strip diacritics, collapse
//! whitespace. Independent of the similarly-shaped normalizers in
//! `clinrag-diarize` and `clinrag-vector` — each crate's normalization
//! serves a distinct closed set of downstream patterns.

use unicode_normalization::UnicodeNormalization;

pub fn normalize(raw: &str) -> String {
    let decomposed: String = raw.nfd().filter(|c| !is_combining_mark(*c)).collect();
    let lower = decomposed.to_lowercase();
    lower.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_combining_mark(c: char) -> bool {
    matches!(c, '\u{0300}'..='\u{036F}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_diacritics_and_case() {
        assert_eq!(normalize("¿Qué enfermedad tiene Pepito Gómez?"), "¿que enfermedad tiene pepito gomez?");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(normalize(" hola mundo "), "hola mundo");
    }
}
