//! Lab report analysis over an uploaded image.

use crate::llm::{FailoverChain, ImageAttachment, Prompt};
use crate::rag::RagError;

const LAB_SYSTEM_PROMPT: &str = "You are a Senior Laboratory Pathologist AI.\n\
1. Extract every test name, value, and reference range.\n\
2. Mark abnormal values with ⚠️ ABNORMAL.\n\
3. Explain each test in one simple sentence.\n\
4. Give a 3-sentence health summary.\n\
5. End with: 'Note: This is an AI analysis. Please confirm results with your doctor.'";

/// Run the pathologist prompt against an uploaded report image. This is
/// a stateless, single-shot dispatch: no retrieval, no history.
pub fn analyze_lab_report(
    chain: &FailoverChain,
    image: ImageAttachment,
) -> Result<String, RagError> {
    let prompt = Prompt::new(LAB_SYSTEM_PROMPT, "Analyze this lab report.").with_image(image);
    Ok(chain.generate(&prompt)?)
}
