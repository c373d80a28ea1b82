//! Prompt construction
//!
//! Turns a keyword into the user message of an encyclopedia request. The
//! generated text is Chinese because the entries are rendered for a Chinese
//! audience; the opening-line format each mode mandates is what the UI uses
//! as the entry title.

/// How the keyword passed to the client should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptMode {
    /// An English label produced by the image-identification model
    /// (e.g. `"Chow Chow"`). The reply must start with the Chinese name.
    ModelLabel,
    /// A free-text topic picked from the discovery list (e.g. `"树袋熊"`).
    /// The reply must start with the keyword itself.
    #[default]
    Topic,
}

impl PromptMode {
    /// Map the boolean "is this a model result" flag used by callers.
    pub fn from_model_result(is_model_result: bool) -> Self {
        if is_model_result {
            Self::ModelLabel
        } else {
            Self::Topic
        }
    }
}

/// Build the user message for `keyword` in the given mode.
pub fn build_user_prompt(keyword: &str, mode: PromptMode) -> String {
    match mode {
        PromptMode::ModelLabel => format!(
            "我通过AI识别到了一个物体，英文标签是 \"{keyword}\"。请帮我：\n\
             1. 给出它的中文学名。\n\
             2. 详细介绍分类、特征和习性。\n\
             内容在300字以内，使用Markdown，确保第一行是“# [中文名]”。"
        ),
        PromptMode::Topic => format!(
            "请为“{keyword}”写一段科普介绍。\n\
             注意：请直接使用“{keyword}”作为标题。\n\
             包含分类、形态特征、生活习性和主要价值。\n\
             300字以内，Markdown格式，确保第一行是“# {keyword}”。"
        ),
    }
}
