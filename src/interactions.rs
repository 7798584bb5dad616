//! Drug interaction checking from typed text, an image, or both.

use crate::llm::{FailoverChain, ImageAttachment, Prompt};
use crate::rag::RagError;

const INTERACTION_SYSTEM_PROMPT: &str = "You are a Clinical Pharmacologist. Your task is to \
analyze a list of medications and identify potential drug-drug interactions, contraindications, \
or safety warnings.\n\n\
### INSTRUCTIONS:\n\
1. Identify each medication provided in the text or image.\n\
2. Check for known interactions between these drugs.\n\
3. Categorize the risks:\n\
   - 🔴 **HIGH RISK**: Dangerous interaction; consult a doctor immediately.\n\
   - 🟡 **MODERATE RISK**: Possible side effects; monitor closely.\n\
   - 🟢 **LOW/NO RISK**: Generally safe to take together.\n\
4. Provide a \"Safety Summary\" with clear, non-technical advice.\n\
5. **DISCLAIMER**: Always include: \"This is an AI-generated safety check and not a substitute \
for professional medical advice.\"";

/// Run the pharmacologist prompt over the medication list. At least one
/// of `text` or `image` must carry content; the handler validates that
/// before calling.
pub fn check_interactions(
    chain: &FailoverChain,
    text: &str,
    image: Option<ImageAttachment>,
) -> Result<String, RagError> {
    let user_text = if text.trim().is_empty() {
        "Identify the medications in this image and check for interactions."
    } else {
        text
    };

    let mut prompt = Prompt::new(INTERACTION_SYSTEM_PROMPT, user_text);
    if let Some(image) = image {
        prompt = prompt.with_image(image);
    }

    Ok(chain.generate(&prompt)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockChatModel;

    #[test]
    fn text_only_check_dispatches_medication_list() {
        let model = MockChatModel::succeeding("m", "🟢 LOW/NO RISK");
        let chain = FailoverChain::new(vec![Box::new(model)]);

        let out = check_interactions(&chain, "aspirin, ibuprofen", None).unwrap();
        assert_eq!(out, "🟢 LOW/NO RISK");
    }

    #[test]
    fn image_only_check_uses_default_instruction() {
        let model = MockChatModel::succeeding("vision", "🟡 MODERATE RISK");
        let chain = FailoverChain::new(vec![Box::new(model)]);

        let out = check_interactions(
            &chain,
            "  ",
            Some(ImageAttachment::from_bytes("image/jpeg", &[0xFF])),
        )
        .unwrap();
        assert_eq!(out, "🟡 MODERATE RISK");
    }
}
