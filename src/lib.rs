//! MedExa: a retrieval-augmented medical assistant service.
//!
//! Grounded question answering over a medical corpus with emergency
//! safety gates, plus lab-report analysis, cardiovascular risk scoring,
//! drug-interaction checks, and structured PDF report generation. All
//! generation goes through a prioritized failover chain of
//! chat-completion backends.

pub mod api;
pub mod chat;
pub mod config;
pub mod conversation;
pub mod interactions;
pub mod labs;
pub mod llm;
pub mod rag;
pub mod report;
pub mod risk;
pub mod safety;
