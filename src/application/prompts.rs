//! System prompts and opening messages for each analysis mode.

use crate::domain::foundation::AnalysisMode;
use crate::domain::tools::definitions::names;

/// Sent back when the model answers with text instead of a tool call.
pub const TOOL_NUDGE: &str = "Continue the analysis by calling one of the available tools. \
     When you have enough evidence, call the completion tool with your final answer.";

const REPORT_NAVIGATION: &str = "The crash report is large. Navigate it with report_get: \
     start at \"metadata\" and \"summary\", page arrays with limit and nextCursor, narrow \
     with select and where, and follow suggestedSubPaths when a result is too large.";

/// Returns the system prompt for a mode.
pub fn system_prompt(mode: AnalysisMode) -> String {
    let role = match mode {
        AnalysisMode::RootCause => format!(
            "You are an expert crash dump analyst. Determine the root cause of the crash \
             using the debugger and the structured crash report. Record verified facts with \
             {evidence}, track competing explanations with {register} and {score}, and cite \
             evidence ids in your conclusion. Finish by calling {complete}.",
            evidence = names::EVIDENCE_ADD,
            register = names::HYPOTHESIS_REGISTER,
            score = names::HYPOTHESIS_SCORE,
            complete = names::ANALYSIS_COMPLETE,
        ),
        AnalysisMode::SummaryRewrite => format!(
            "You are an expert crash dump analyst. Rewrite the crash report's summary so an \
             engineer can act on it: a precise description of what failed and concrete \
             recommendations. Verify claims against the report and the debugger before \
             stating them. Finish by calling {}.",
            names::SUMMARY_REWRITE_COMPLETE
        ),
        AnalysisMode::ThreadNarrative => format!(
            "You are an expert crash dump analyst. Explain in plain language what the given \
             thread was doing when the dump was taken, based on its stack and the objects it \
             references. Finish by calling {}.",
            names::THREAD_NARRATIVE_COMPLETE
        ),
    };
    format!("{}\n\n{}", role, REPORT_NAVIGATION)
}

/// Returns the opening user message, including caller context if any.
pub fn initial_message(mode: AnalysisMode, context: Option<&str>) -> String {
    let context = context.map(str::trim).filter(|c| !c.is_empty());
    match (mode, context) {
        (AnalysisMode::RootCause, None) => {
            "Analyze the open dump and determine the root cause of the crash.".to_string()
        }
        (AnalysisMode::RootCause, Some(context)) => format!(
            "Analyze the open dump and determine the root cause of the crash.\n\n\
             Additional context from the user:\n{}",
            context
        ),
        (AnalysisMode::SummaryRewrite, None) => {
            "Rewrite the summary of the crash report for the open dump.".to_string()
        }
        (AnalysisMode::SummaryRewrite, Some(context)) => format!(
            "Rewrite the summary of the crash report for the open dump.\n\n\
             Current summary:\n{}",
            context
        ),
        (AnalysisMode::ThreadNarrative, None) => {
            "Describe what the faulting thread was doing when the dump was taken.".to_string()
        }
        (AnalysisMode::ThreadNarrative, Some(context)) => format!(
            "Describe what thread {} was doing when the dump was taken.",
            context
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_names_the_mode_completion_tool() {
        for mode in AnalysisMode::all() {
            assert!(system_prompt(*mode).contains(mode.completion_tool_name()));
        }
    }

    #[test]
    fn only_root_cause_mentions_ledger_tools() {
        assert!(system_prompt(AnalysisMode::RootCause).contains(names::EVIDENCE_ADD));
        assert!(!system_prompt(AnalysisMode::ThreadNarrative).contains(names::EVIDENCE_ADD));
    }

    #[test]
    fn context_is_included_when_present() {
        let message = initial_message(AnalysisMode::SummaryRewrite, Some("App crashed on start"));
        assert!(message.ends_with("App crashed on start"));

        let message = initial_message(AnalysisMode::ThreadNarrative, Some("12"));
        assert!(message.contains("thread 12"));
    }

    #[test]
    fn blank_context_is_ignored() {
        assert_eq!(
            initial_message(AnalysisMode::RootCause, Some("  ")),
            initial_message(AnalysisMode::RootCause, None)
        );
    }
}
