//! Closed medical and query-support lexicons (Glossary: "Closed set").
//! Extending these at runtime is not supported.

pub const CONDITIONS: &[&str] = &[
    "diabetes", "hipertension", "asma", "migrana", "artritis", "obesidad", "anemia", "bronquitis",
    "gastritis", "depresion", "ansiedad", "epilepsia", "neumonia", "dermatitis", "insomnio",
];

pub const SYMPTOMS: &[&str] = &[
    "dolor de cabeza", "dolor abdominal", "fiebre", "tos", "fatiga", "mareo", "nausea", "vomito",
    "dolor de espalda", "dificultad para respirar", "dolor en el pecho", "perdida de apetito",
    "insomnio", "dolor muscular",
];

pub const MEDICATIONS: &[&str] = &[
    "metformina", "paracetamol", "ibuprofeno", "losartan", "amoxicilina", "omeprazol",
    "salbutamol", "insulina", "aspirina", "atorvastatina",
];

/// Stopwords dropped from the residual token set once entities are
/// extracted.
pub const STOPWORDS: &[&str] = &[
    "el", "la", "los", "las", "un", "una", "unos", "unas", "de", "del", "al", "a", "en", "y", "o",
    "que", "con", "por", "para", "es", "son", "tiene", "tienen", "mi", "su", "sus", "este", "esta",
    "que", "¿", "?", "se", "como",
];

pub fn contains_token(haystack: &str, token: &str) -> bool {
    haystack.split_whitespace().any(|w| w.trim_matches(|c: char| !c.is_alphanumeric()) == token)
    || token.contains(' ') && haystack.contains(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_multi_word_symptom() {
        assert!(contains_token("tiene dolor de cabeza hace dias", "dolor de cabeza"));
    }

    #[test]
    fn finds_single_word_condition() {
        assert!(contains_token("le diagnosticaron diabetes", "diabetes"));
    }
}
