//! Emergency detection before and after generation.
//!
//! The pre-generation check is a deterministic phrase scan over the raw
//! user input; when it fires, no model is called at all. The
//! post-generation check inspects model output for the EMERGENCY prefix
//! the answering prompt asks for.

/// Phrases that short-circuit the pipeline before any model call.
/// Matching is case-insensitive substring containment.
pub const EMERGENCY_PHRASES: &[&str] = &[
    "chest pain",
    "choking",
    "stroke",
    "bleeding",
    "unconscious",
    "difficulty breathing",
    "can't breathe",
    "shortness of breath",
];

/// Fixed response returned when the pre-generation check fires. The
/// client treats this literal as a signal to render its emergency UI.
pub const TRIGGER_EMERGENCY: &str = "TRIGGER_EMERGENCY";

/// True when `input` contains any emergency phrase, case-insensitively.
pub fn matches_emergency_phrase(input: &str) -> bool {
    let lowered = input.to_lowercase();
    EMERGENCY_PHRASES.iter().any(|p| lowered.contains(p))
}

/// Post-generation classification of model output.
pub trait PostGenerationSafetyCheck: Send + Sync {
    /// True when the generated text should be flagged as an emergency.
    fn is_emergency(&self, generated: &str) -> bool;
}

/// Reference check: flags output whose lowercased form starts with
/// "emergency". Leading whitespace defeats the match; models that obey
/// the prompt put the marker first, and a marker buried mid-text is
/// treated as prose about emergencies rather than a flag.
pub struct EmergencyPrefixCheck;

impl PostGenerationSafetyCheck for EmergencyPrefixCheck {
    fn is_emergency(&self, generated: &str) -> bool {
        generated.to_lowercase().starts_with("emergency")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phrase_scan_is_case_insensitive_substring() {
        assert!(matches_emergency_phrase("I have CHEST PAIN right now"));
        assert!(matches_emergency_phrase("my father is unconscious"));
        assert!(matches_emergency_phrase("shortness of breath after climbing stairs"));
        assert!(!matches_emergency_phrase("I have a mild headache"));
    }

    #[test]
    fn phrase_must_appear_whole() {
        assert!(!matches_emergency_phrase("chest discomfort and some pain"));
        assert!(matches_emergency_phrase("sudden chest pain"));
    }

    #[test]
    fn prefix_check_fires_on_leading_emergency() {
        let check = EmergencyPrefixCheck;
        assert!(check.is_emergency("EMERGENCY: call 911 immediately."));
        assert!(check.is_emergency("Emergency services should be contacted."));
    }

    #[test]
    fn prefix_check_ignores_mid_text_and_leading_whitespace() {
        let check = EmergencyPrefixCheck;
        assert!(!check.is_emergency("This is not an emergency."));
        assert!(!check.is_emergency("  EMERGENCY: call 911."));
    }
}
