//! Cardiovascular risk scoring with a model-written interpretation.
//!
//! The score itself is fixed arithmetic; only the narrative around it
//! comes from a model.

use serde::{Deserialize, Serialize};

use crate::llm::{FailoverChain, Prompt};
use crate::rag::RagError;

#[derive(Debug, Clone, Deserialize)]
pub struct RiskFactors {
    pub age: u32,
    pub bp: u32,
    pub chol: u32,
    pub smoker: bool,
}

#[derive(Debug, Serialize)]
pub struct RiskAssessment {
    pub score: u32,
    pub insight: String,
}

/// Deterministic 10-year cardiovascular risk score. Capped at 35.
pub fn risk_score(factors: &RiskFactors) -> u32 {
    let mut base = 0;
    if factors.age > 50 {
        base += 5;
    }
    if factors.bp > 140 {
        base += 7;
    }
    if factors.chol > 240 {
        base += 5;
    }
    if factors.smoker {
        base += 8;
    }
    (base + 2).min(35)
}

fn build_risk_prompt(factors: &RiskFactors, score: u32) -> String {
    let smoker = if factors.smoker { "yes" } else { "no" };
    format!(
        "The patient has a 10-year cardiovascular risk score of {score}%. \
Age: {}, BP: {}, Cholesterol: {}, Smoker: {smoker}. \
Provide a professional clinical interpretation. \
Format as follows:\n\
## Risk Interpretation\n(Briefly explain what the score means)\n\n\
**Lifestyle Recommendation:** (Provide one specific tip)\n\n\
Do NOT include long disclaimers.",
        factors.age, factors.bp, factors.chol
    )
}

/// Score the factors and ask the chain for a clinical interpretation.
pub fn assess_risk(chain: &FailoverChain, factors: &RiskFactors) -> Result<RiskAssessment, RagError> {
    let score = risk_score(factors);
    let prompt = Prompt::new("", &build_risk_prompt(factors, score));
    let insight = chain.generate(&prompt)?;
    Ok(RiskAssessment { score, insight })
}
