//! Plural detection for edge-label inference.
//!
//! A vertex collection getter without an explicit label is linked by its
//! derived name; when the last word of that name reads as a plural noun, it
//! is singularised (`get_friends` follows `friend` edges, `get_knows_people`
//! follows `knows_person` edges).

use inflector::Inflector;

/// Returns `true` if `word` singularises to something else.
pub fn is_plural(word: &str) -> bool {
    !word.is_empty() && word.to_singular() != word
}

pub fn singularize(word: &str) -> String {
    word.to_singular()
}

/// The edge label inferred from a derived name, and whether it was changed.
///
/// Only the last `_`-separated word is singularised.
pub fn infer_edge_label(name: &str) -> (String, bool) {
    let (head, last) = match name.rsplit_once('_') {
        Some((head, last)) => (Some(head), last),
        None => (None, name),
    };
    if !is_plural(last) {
        return (name.to_string(), false);
    }
    let last = singularize(last);
    match head {
        Some(head) => (format!("{head}_{last}"), true),
        None => (last, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plural_names_are_singularised() {
        assert!(is_plural("friends"));
        assert_eq!(infer_edge_label("friends"), ("friend".to_string(), true));
        assert_eq!(infer_edge_label("categories"), ("category".to_string(), true));
    }

    #[test]
    fn singular_names_are_kept() {
        assert!(!is_plural("friend"));
        assert_eq!(infer_edge_label("friend"), ("friend".to_string(), false));
        assert!(!is_plural(""));
    }

    #[test]
    fn only_the_last_word_is_singularised() {
        assert_eq!(
            infer_edge_label("knows_people"),
            ("knows_person".to_string(), true)
        );
        assert_eq!(
            infer_edge_label("best_friends"),
            ("best_friend".to_string(), true)
        );
        assert_eq!(
            infer_edge_label("friends_list"),
            ("friends_list".to_string(), false)
        );
        assert_eq!(infer_edge_label("knows"), ("know".to_string(), true));
    }
}
