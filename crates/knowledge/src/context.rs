//! Merging retrieved passages into the answer prompt's reference text.

use crate::passage::{Passage, PassageSet};
use faqbot_prompt::AssembledContext;

/// Merge per-query hit lists into one deduplicated set.
///
/// Lists are consumed in the order given and passages within a list keep the
/// index's ranking, so the first occurrence of each text wins.
pub fn merge_passages<L>(lists: L) -> PassageSet
where
    L: IntoIterator,
    L::Item: IntoIterator<Item = Passage>,
{
    lists.into_iter().flatten().collect()
}

/// Render passages as one `Passage: <text>` line each.
pub fn format_passages(passages: &PassageSet) -> String {
    passages
        .iter()
        .map(|p| format!("Passage: {}\n", p.text))
        .collect()
}

/// Merge and render `lists` as reference context.
///
/// No surviving passages yields an empty reference, not the skip marker.
pub fn assemble<L>(lists: L) -> AssembledContext
where
    L: IntoIterator,
    L::Item: IntoIterator<Item = Passage>,
{
    AssembledContext::Reference(format_passages(&merge_passages(lists)))
}

/// Context for a question that needs no retrieval.
pub fn not_required() -> AssembledContext {
    AssembledContext::NotRequired
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passage(id: &str, text: &str, score: f32) -> Passage {
        Passage::new(id, text, None, Some(score)).unwrap()
    }

    #[test]
    fn test_format() {
        let set: PassageSet = vec![passage("1", "A", 0.9), passage("2", "B", 0.8)]
            .into_iter()
            .collect();
        assert_eq!(format_passages(&set), "Passage: A\nPassage: B\n");
    }

    #[test]
    fn test_merge_dedupes_across_lists() {
        let lists = vec![
            vec![passage("1", "A", 0.9), passage("2", "B", 0.8)],
            vec![passage("3", "B", 0.99), passage("4", "C", 0.75)],
            vec![passage("5", "A", 0.95)],
        ];

        let merged = merge_passages(lists);
        let ids: Vec<&str> = merged.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "4"]);
    }

    #[test]
    fn test_assemble_keeps_list_order() {
        let lists = vec![vec![passage("1", "A", 0.9)], vec![passage("2", "B", 0.8)]];
        assert_eq!(
            assemble(lists),
            AssembledContext::Reference("Passage: A\nPassage: B\n".to_string())
        );
    }

    #[test]
    fn test_assemble_empty_is_not_marker() {
        let lists: Vec<Vec<Passage>> = vec![vec![], vec![]];
        let context = assemble(lists);

        assert!(!context.is_not_required());
        assert_eq!(context.text(), "");
    }

    #[test]
    fn test_not_required_marker() {
        assert!(not_required().is_not_required());
    }
}
