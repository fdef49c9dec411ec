//! Excerpt builder: a window of up to 300 characters centered on
//! the first entity-token hit in `payload_text`, else the head of the
//! text.

use clinrag_core::Entities;

const EXCERPT_CHARS: usize = 300;

fn first_hit_char_index(payload_text: &str, entities: &Entities) -> Option<usize> {
    let lower = payload_text.to_lowercase();
    entities
        .patients
        .iter()
        .chain(&entities.conditions)
        .chain(&entities.symptoms)
        .chain(&entities.medications)
        .filter_map(|token| lower.find(&token.to_lowercase()))
        .min()
}

/// Build the excerpt, truncating at UTF-8 character boundaries.
pub fn build_excerpt(payload_text: &str, entities: &Entities) -> String {
    let chars: Vec<char> = payload_text.chars().collect();
    if chars.len() <= EXCERPT_CHARS {
        return payload_text.to_string();
    }

    let center_byte = first_hit_char_index(payload_text, entities);
    let center_char = match center_byte {
        Some(byte_idx) => payload_text[..byte_idx].chars().count(),
        None => 0,
    };

    let half = EXCERPT_CHARS / 2;
    let start = center_char.saturating_sub(half);
    let end = (start + EXCERPT_CHARS).min(chars.len());
    let start = end.saturating_sub(EXCERPT_CHARS).max(0).min(start);
    chars[start..end].iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_returned_whole() {
        let text = "paciente con dolor de cabeza";
        assert_eq!(build_excerpt(text, &Entities::default()), text);
    }

    #[test]
    fn centers_on_entity_hit() {
        let filler = "x".repeat(400);
        let text = format!("{filler} diabetes {filler}");
        let entities = Entities { conditions: vec!["diabetes".into()],..Default::default() };
        let excerpt = build_excerpt(&text, &entities);
        assert!(excerpt.contains("diabetes"));
        assert!(excerpt.chars().count() <= 300);
    }

    #[test]
    fn falls_back_to_head_without_hit() {
        let filler = "y".repeat(400);
        let excerpt = build_excerpt(&filler, &Entities::default());
        assert_eq!(excerpt.chars().count(), 300);
        assert!(filler.starts_with(&excerpt));
    }
}
