/// Opening half of the instruction delimiter.
pub const INST_OPEN: &str = "[INST]";
/// Closing half of the instruction delimiter. Runners echo the prompt, so the
/// answer follows this marker in their output.
pub const INST_CLOSE: &str = "[/INST]";

const BUG_CHECK_INSTRUCTION: &str =
    "Analyze this code for bugs, vulnerabilities, or bad practices. Explain any issues found:";
const SUMMARY_INSTRUCTION: &str =
    "Summarize this code in English, explaining its purpose and main functions:";
const DEFAULT_INSTRUCTION: &str = "Explain what this code does:";

/// What the model is asked to do with a file when no custom instruction is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Default,
    Summary,
    BugCheck,
}

impl Mode {
    /// Pick a mode from the CLI switches. Bug-check wins when both are set.
    pub fn from_flags(summary: bool, bug_check: bool) -> Self {
        if bug_check {
            Mode::BugCheck
        } else if summary {
            Mode::Summary
        } else {
            Mode::Default
        }
    }

    /// Fixed instruction text for this mode, colon included.
    pub fn instruction(self) -> &'static str {
        match self {
            Mode::BugCheck => BUG_CHECK_INSTRUCTION,
            Mode::Summary => SUMMARY_INSTRUCTION,
            Mode::Default => DEFAULT_INSTRUCTION,
        }
    }
}

/// One file's worth of prompt input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest<'a> {
    pub source_text: &'a str,
    pub custom_instruction: &'a str,
    pub mode: Mode,
}

impl<'a> PromptRequest<'a> {
    pub fn new(source_text: &'a str, custom_instruction: &'a str, mode: Mode) -> Self {
        Self {
            source_text,
            custom_instruction,
            mode,
        }
    }

    /// The instruction that will lead the prompt. A non-empty custom
    /// instruction overrides the mode.
    pub fn instruction(&self) -> &str {
        if self.custom_instruction.is_empty() {
            self.mode.instruction()
        } else {
            self.custom_instruction
        }
    }

    pub fn build(&self) -> String {
        format!(
            "{INST_OPEN} {}\n\n{}\n\n{INST_CLOSE}",
            self.instruction(),
            self.source_text
        )
    }
}

/// Wrap source text and an instruction in the `[INST] … [/INST]` template.
pub fn build_prompt(source_text: &str, custom_instruction: &str, mode: Mode) -> String {
    PromptRequest::new(source_text, custom_instruction, mode).build()
}
