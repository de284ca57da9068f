pub mod analysis_llm;
pub mod db;
pub mod plan_llm;
pub mod session_file;

pub use analysis_llm::OpenAiAnalysisAdapter;
pub use db::SqliteStore;
pub use plan_llm::OpenAiPlanAdapter;
pub use session_file::FileSessionRegistry;

/// Models like to wrap JSON answers in a markdown fence; returns the inner text.
pub(crate) fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::strip_code_fence;

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("  [1, 2] "), "[1, 2]");
        assert_eq!(strip_code_fence("```json\n[1, 2]\n```"), "[1, 2]");
        assert_eq!(strip_code_fence("```\n{}\n```\n"), "{}");
        assert_eq!(strip_code_fence("```"), "");
    }
}
