//! Prompt definitions compiled into the binary.

/// Built-in prompt sources keyed by prompt ID.
pub(crate) const BUILTIN_PROMPTS: &[(&str, &str)] = &[
    (
        crate::CODE_GENERATE,
        include_str!("../prompts/code.generate.yml"),
    ),
    (crate::CODE_REVIEW, include_str!("../prompts/code.review.yml")),
    (
        crate::DOCS_HANDBOOK,
        include_str!("../prompts/docs.handbook.yml"),
    ),
    (crate::DOCS_HLD, include_str!("../prompts/docs.hld.yml")),
    (crate::DOCS_LLD, include_str!("../prompts/docs.lld.yml")),
    (
        crate::DOCS_SUMMARY,
        include_str!("../prompts/docs.summary.yml"),
    ),
    (crate::REPO_ASK, include_str!("../prompts/repo.ask.yml")),
];

pub(crate) fn builtin_source(prompt_id: &str) -> Option<&'static str> {
    BUILTIN_PROMPTS
        .iter()
        .find(|(id, _)| *id == prompt_id)
        .map(|(_, source)| *source)
}
