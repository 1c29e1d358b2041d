//! Answer template selection.

use crate::types::{AssembledContext, PromptChoice};

/// Pick the answer template for `context`.
///
/// The "no context needed" marker selects the plain template; anything else,
/// including reference text that ended up empty, selects the grounded one so
/// the model is still told to refuse rather than improvise.
pub fn select(context: &AssembledContext) -> PromptChoice {
    if context.is_not_required() {
        PromptChoice::Plain
    } else {
        PromptChoice::Grounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_selects_plain() {
        assert_eq!(select(&AssembledContext::NotRequired), PromptChoice::Plain);
    }

    #[test]
    fn test_reference_selects_grounded() {
        let context = AssembledContext::Reference("Passage: x\n".to_string());
        assert_eq!(select(&context), PromptChoice::Grounded);
    }

    #[test]
    fn test_empty_reference_still_grounded() {
        let context = AssembledContext::Reference(String::new());
        assert_eq!(select(&context), PromptChoice::Grounded);
    }

    #[test]
    fn test_selection_is_deterministic() {
        let contexts = [
            AssembledContext::NotRequired,
            AssembledContext::Reference("Passage: a\n".to_string()),
        ];
        for context in &contexts {
            let first = select(context);
            for _ in 0..10 {
                assert_eq!(select(context), first);
            }
        }
    }
}
