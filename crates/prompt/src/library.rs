//! Built-in prompts and workspace overrides.
//!
//! The library holds one definition per call-site. Defaults carry the
//! school chatbot's texts; any of them can be replaced by dropping
//! `<id>.yml` into `.faqbot/prompts/`.

use crate::builder::build_prompt;
use crate::loader::load_override;
use crate::selector::select;
use crate::types::{AssembledContext, BuiltPrompt, PromptChoice, PromptDefinition};
use faqbot_core::{AppError, AppResult};
use std::collections::HashMap;
use std::path::Path;

pub const CLASSIFY_PROMPT_ID: &str = "faqbot.classify";
pub const REWRITE_PROMPT_ID: &str = "faqbot.rewrite";
pub const HYDE_PROMPT_ID: &str = "faqbot.hyde";
pub const GROUNDED_PROMPT_ID: &str = "faqbot.answer.grounded";
pub const PLAIN_PROMPT_ID: &str = "faqbot.answer.plain";

/// Every prompt id the pipeline renders.
pub const PROMPT_IDS: [&str; 5] = [
    CLASSIFY_PROMPT_ID,
    REWRITE_PROMPT_ID,
    HYDE_PROMPT_ID,
    GROUNDED_PROMPT_ID,
    PLAIN_PROMPT_ID,
];

/// Reply the grounded prompt asks for when the reference material has no answer.
pub const REFUSAL_MESSAGE: &str = "申し訳ありませんが、その質問にお答えできる情報がありません。";

const CLASSIFY_SYSTEM: &str = "You are an AI assistant tasked with classifying questions into two categories: 'general' or 'specific'.

1. General: The question asks for common knowledge, general definitions, or broad explanations.
Examples
    - What is artificial intelligence?
    - How does a neural network work?

2. Specific: The question requires information from a specific domain, dataset, or context.
    - Questions that require specific data or examples.
    - Questions related to schools, education, or academic topics.
Examples
    - How many students are enrolled?
    - How many years does the school have?

Classify the following question:
**Answer only with 'general' or 'specific'.**";

const REWRITE_TEMPLATE: &str = "あなたは、検索エンジンの精度を向上させるAIアシスタントです。
ユーザーが入力したクエリをもとに、より効果的な検索を行うためのバリエーションを作成してください。
質問には答えず、バリエーションを作ることに専念してください。

質問: {{question}}

- 言い換え（3つ）
- シンプルな要約表現
- より一般的な表現（1つ）
- より専門的な表現（1つ）
- 詳細化したバージョン（1つ）

出力はカンマ区切りの1行で記述してください。
例: 要約, 言い換え1, 言い換え2, 言い換え3, 一般向け, 専門的, 詳細版";

const HYDE_TEMPLATE: &str = "以下の質問の回答を書いてください。
質問: {{question}}
回答: ";

const GROUNDED_SYSTEM: &str = "あなたは東京デザインテクノロジーセンター専門学校（通称TECH.C.）の公式チャットbotです。以下の【参考情報】を基に、ユーザーからの【質問】に対して正確で簡潔な回答を行ってください。

- 【参考情報】以外の情報には基づかずに回答してください。
- 【参考情報】に該当がない場合や不明確な場合は、「申し訳ありませんが、その質問にお答えできる情報がありません。」と答えてください。
- 必要に応じて、ユーザーが質問を明確化できるように助言を行ってください。

回答の語調はフレンドリーかつ丁寧に保ち、ユーザーが気軽に質問できる雰囲気を大切にしてください。";

const GROUNDED_TEMPLATE: &str = "【参考情報】
{{context}}

【質問】
{{question}}";

const PLAIN_SYSTEM: &str = "ユーザーからの質問に答えてください。";

const PLAIN_TEMPLATE: &str = "【質問】
{{question}}";

fn builtin(id: &str, title: &str, system: Option<&str>, template: &str) -> PromptDefinition {
    PromptDefinition {
        id: id.to_string(),
        title: title.to_string(),
        api_version: "1.0".to_string(),
        created_by: "faqbot".to_string(),
        system: system.map(str::to_string),
        template: template.to_string(),
    }
}

/// The set of prompt definitions one pipeline renders from.
#[derive(Debug, Clone)]
pub struct PromptLibrary {
    definitions: HashMap<String, PromptDefinition>,
}

impl Default for PromptLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PromptLibrary {
    /// The built-in definitions.
    pub fn builtin() -> Self {
        let definitions = [
            builtin(
                CLASSIFY_PROMPT_ID,
                "Question classification",
                Some(CLASSIFY_SYSTEM),
                "Question: {{question}}",
            ),
            builtin(REWRITE_PROMPT_ID, "Query rewriting", None, REWRITE_TEMPLATE),
            builtin(HYDE_PROMPT_ID, "Hypothetical answer", None, HYDE_TEMPLATE),
            builtin(
                GROUNDED_PROMPT_ID,
                "Grounded answer",
                Some(GROUNDED_SYSTEM),
                GROUNDED_TEMPLATE,
            ),
            builtin(
                PLAIN_PROMPT_ID,
                "Plain answer",
                Some(PLAIN_SYSTEM),
                PLAIN_TEMPLATE,
            ),
        ]
        .into_iter()
        .map(|def| (def.id.clone(), def))
        .collect();

        Self { definitions }
    }

    /// Built-in definitions with any workspace overrides applied.
    pub fn load(workspace_path: &Path) -> AppResult<Self> {
        let mut library = Self::builtin();

        for id in PROMPT_IDS {
            if let Some(definition) = load_override(workspace_path, id)? {
                tracing::info!("Using workspace override for prompt '{}'", id);
                library.insert(definition);
            }
        }

        Ok(library)
    }

    /// Add or replace a definition.
    pub fn insert(&mut self, definition: PromptDefinition) {
        self.definitions.insert(definition.id.clone(), definition);
    }

    /// Look up a definition by id.
    pub fn get(&self, id: &str) -> AppResult<&PromptDefinition> {
        self.definitions
            .get(id)
            .ok_or_else(|| AppError::Prompt(format!("Unknown prompt: {}", id)))
    }

    fn render(&self, id: &str, variables: &[(&str, &str)]) -> AppResult<BuiltPrompt> {
        let variables = variables
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        build_prompt(self.get(id)?, variables)
    }

    /// Prompt asking whether `question` is general or specific.
    pub fn classification(&self, question: &str) -> AppResult<BuiltPrompt> {
        self.render(CLASSIFY_PROMPT_ID, &[("question", question)])
    }

    /// Prompt asking for comma-separated search variants of `question`.
    pub fn rewrite(&self, question: &str) -> AppResult<BuiltPrompt> {
        self.render(REWRITE_PROMPT_ID, &[("question", question)])
    }

    /// Prompt asking the model to write a plausible answer to `question`.
    pub fn hyde(&self, question: &str) -> AppResult<BuiltPrompt> {
        self.render(HYDE_PROMPT_ID, &[("question", question)])
    }

    /// Answer prompt chosen from `context`, along with the choice made.
    pub fn answer(
        &self,
        context: &AssembledContext,
        question: &str,
    ) -> AppResult<(PromptChoice, BuiltPrompt)> {
        let choice = select(context);
        let built = match choice {
            PromptChoice::Grounded => self.render(
                GROUNDED_PROMPT_ID,
                &[("context", context.text()), ("question", question)],
            )?,
            PromptChoice::Plain => self.render(PLAIN_PROMPT_ID, &[("question", question)])?,
        };
        Ok((choice, built))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_has_every_prompt() {
        let library = PromptLibrary::builtin();
        for id in PROMPT_IDS {
            assert!(library.get(id).is_ok(), "missing {}", id);
        }
        assert!(library.get("faqbot.unknown").is_err());
    }

    #[test]
    fn test_grounded_system_carries_refusal() {
        let library = PromptLibrary::builtin();
        let def = library.get(GROUNDED_PROMPT_ID).unwrap();
        assert!(def.system.as_deref().unwrap().contains(REFUSAL_MESSAGE));
    }

    #[test]
    fn test_classification_prompt() {
        let built = PromptLibrary::builtin()
            .classification("What is AI?")
            .unwrap();
        assert!(built.system.unwrap().contains("'general' or 'specific'"));
        assert_eq!(built.user, "Question: What is AI?");
    }

    #[test]
    fn test_rewrite_and_hyde_embed_question() {
        let library = PromptLibrary::builtin();
        let rewrite = library.rewrite("学費はいくら?").unwrap();
        assert!(rewrite.user.contains("質問: 学費はいくら?"));
        assert!(rewrite.system.is_none());

        let hyde = library.hyde("学費はいくら?").unwrap();
        assert!(hyde.user.starts_with("以下の質問の回答を書いてください。"));
        assert!(hyde.user.contains("質問: 学費はいくら?"));
    }

    #[test]
    fn test_answer_grounded() {
        let context = AssembledContext::Reference("Passage: 1コマ90分です。\n".to_string());
        let (choice, built) = PromptLibrary::builtin()
            .answer(&context, "授業時間は?")
            .unwrap();

        assert_eq!(choice, PromptChoice::Grounded);
        assert_eq!(built.metadata.source_prompt_id, GROUNDED_PROMPT_ID);
        assert!(built.user.contains("【参考情報】\nPassage: 1コマ90分です。\n"));
        assert!(built.user.ends_with("【質問】\n授業時間は?"));
    }

    #[test]
    fn test_answer_plain() {
        let (choice, built) = PromptLibrary::builtin()
            .answer(&AssembledContext::NotRequired, "こんにちは")
            .unwrap();

        assert_eq!(choice, PromptChoice::Plain);
        assert_eq!(built.user, "【質問】\nこんにちは");
        assert!(!built.user.contains("【参考情報】"));
    }

    #[test]
    fn test_load_applies_override() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".faqbot/prompts");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("faqbot.answer.plain.yml"),
            r#"
id: faqbot.answer.plain
title: Custom plain
apiVersion: "1.1"
system: "Reply in English."
template: "Q: {{question}}"
"#,
        )
        .unwrap();

        let library = PromptLibrary::load(temp.path()).unwrap();
        let (_, built) = library
            .answer(&AssembledContext::NotRequired, "hello")
            .unwrap();
        assert_eq!(built.user, "Q: hello");
        assert_eq!(built.system.as_deref(), Some("Reply in English."));

        // untouched prompts keep their defaults
        let hyde = library.hyde("q").unwrap();
        assert!(hyde.user.contains("以下の質問の回答を書いてください。"));
    }
}
