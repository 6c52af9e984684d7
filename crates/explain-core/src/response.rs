use crate::errors::CoreError;
use crate::prompt::INST_CLOSE;

/// Markers the runner emits at end of generation or end of turn. Everything
/// from the earliest match onward is dropped.
pub const CUTOFF_MARKERS: &[&str] = &["> EOF by user", "> EOF", "<|endoftext|>"];

/// Pull the model's answer out of the runner's captured stdout.
///
/// The runner echoes the prompt, so the answer is whatever follows the last
/// `[/INST]`. Splitting on the last occurrence also means no stray delimiter
/// survives into the answer, even when generation restates it.
pub fn extract(raw_output: &str) -> Result<String, CoreError> {
    let Some(idx) = raw_output.rfind(INST_CLOSE) else {
        return Err(CoreError::NoDelimiterFound {
            raw: raw_output.to_string(),
        });
    };

    let tail = raw_output[idx + INST_CLOSE.len()..].trim();
    let answer = truncate_at_cutoff(tail).trim();

    if answer.is_empty() {
        return Err(CoreError::EmptyAnswer);
    }
    Ok(answer.to_string())
}

/// Cut `text` at the earliest cutoff marker, if any.
fn truncate_at_cutoff(text: &str) -> &str {
    let cut = CUTOFF_MARKERS
        .iter()
        .filter_map(|marker| text.find(marker))
        .min();
    match cut {
        Some(pos) => &text[..pos],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{Mode, build_prompt};

    #[test]
    fn test_extract_basic() {
        let got = extract("[INST] Some prompt [/INST] This is the answer > EOF by user").unwrap();
        assert_eq!(got, "This is the answer");
    }

    #[test]
    fn test_extract_without_prompt_echo() {
        let got = extract("some output [/INST] This is the answer > EOF by user").unwrap();
        assert_eq!(got, "This is the answer");
    }

    #[test]
    fn test_extract_plain_eof() {
        let answer = "It sorts the list in place.";
        let raw = format!("[INST] prompt [/INST] {answer} > EOF");
        assert_eq!(extract(&raw).unwrap(), answer);
    }

    #[test]
    fn test_extract_endoftext() {
        let got = extract("[INST] p [/INST]\nReturns a sum.\n<|endoftext|> trailing junk").unwrap();
        assert_eq!(got, "Returns a sum.");
    }

    #[test]
    fn test_extract_earliest_marker_wins() {
        let got = extract("[/INST] answer <|endoftext|> more > EOF by user").unwrap();
        assert_eq!(got, "answer");
    }

    #[test]
    fn test_extract_long_marker_leaves_no_fragment() {
        let got = extract("... [/INST] answer text > EOF by user").unwrap();
        assert_eq!(got, "answer text");
    }

    #[test]
    fn test_extract_no_delimiter() {
        let err = extract("no markers here").unwrap_err();
        assert!(matches!(err, CoreError::NoDelimiterFound { .. }));
        assert_eq!(err.raw_output(), Some("no markers here"));
    }

    #[test]
    fn test_extract_empty_answer() {
        let err = extract("... [/INST]   ").unwrap_err();
        assert!(matches!(err, CoreError::EmptyAnswer));
    }

    #[test]
    fn test_extract_only_marker_is_empty() {
        let err = extract("[INST] x [/INST]  > EOF by user\n").unwrap_err();
        assert!(matches!(err, CoreError::EmptyAnswer));
    }

    #[test]
    fn test_extract_uses_last_delimiter() {
        let raw = "[INST] explain [/INST] first draft [INST] again [/INST] final answer > EOF";
        let got = extract(raw).unwrap();
        assert_eq!(got, "final answer");
        assert!(!got.contains(INST_CLOSE));
    }

    #[test]
    fn test_extract_multiline_answer_kept() {
        let raw = "[/INST]\n  line one\n  line two\n\n> EOF";
        assert_eq!(extract(raw).unwrap(), "line one\n  line two");
    }

    #[test]
    fn test_build_then_extract_scenario() {
        let prompt = build_prompt("func add(a,b) int { return a+b }", "", Mode::Default);
        assert_eq!(
            prompt,
            "[INST] Explain what this code does:\n\nfunc add(a,b) int { return a+b }\n\n[/INST]"
        );
        let raw = format!("{prompt} This adds two integers. > EOF by user");
        assert_eq!(extract(&raw).unwrap(), "This adds two integers.");
    }
}
