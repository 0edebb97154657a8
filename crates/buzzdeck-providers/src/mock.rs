//! Mock provider for tests and offline demos.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use buzzdeck_core::model::QaPair;
use buzzdeck_core::traits::{GenerateRequest, QuestionGenerator, SimilarityJudge};

/// Deterministic provider: returns canned pairs and a fixed verdict,
/// optionally failing every call, and counts invocations.
pub struct MockProvider {
    pairs: Vec<QaPair>,
    verdict: bool,
    fail: bool,
    generate_calls: AtomicUsize,
    judge_calls: AtomicUsize,
}

impl MockProvider {
    pub fn new(pairs: Vec<QaPair>) -> Self {
        Self {
            pairs,
            verdict: true,
            fail: false,
            generate_calls: AtomicUsize::new(0),
            judge_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_verdict(mut self, verdict: bool) -> Self {
        self.verdict = verdict;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    pub fn judge_calls(&self) -> usize {
        self.judge_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new(vec![
            QaPair::new("What is the powerhouse of the cell?", "mitochondria"),
            QaPair::new("What gas do plants absorb during photosynthesis?", "carbon dioxide"),
        ])
    }
}

#[async_trait]
impl QuestionGenerator for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate_questions(&self, _request: &GenerateRequest) -> anyhow::Result<Vec<QaPair>> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            anyhow::bail!("mock provider failure");
        }
        Ok(self.pairs.clone())
    }
}

#[async_trait]
impl SimilarityJudge for MockProvider {
    async fn judge(&self, _user_answer: &str, _correct_answer: &str) -> anyhow::Result<bool> {
        self.judge_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            anyhow::bail!("mock provider failure");
        }
        Ok(self.verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buzzdeck_core::traits::SourceType;

    fn request() -> GenerateRequest {
        GenerateRequest {
            source: "cells".into(),
            source_type: SourceType::Topic,
            model: "mock".into(),
            temperature: 0.7,
        }
    }

    #[tokio::test]
    async fn returns_canned_pairs_and_counts_calls() {
        let provider = MockProvider::default();
        let pairs = provider.generate_questions(&request()).await.unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(provider.generate_calls(), 1);

        assert!(provider.judge("a", "b").await.unwrap());
        assert_eq!(provider.judge_calls(), 1);
    }

    #[tokio::test]
    async fn failure_injection() {
        let provider = MockProvider::default().failing();
        assert!(provider.generate_questions(&request()).await.is_err());
        assert!(provider.judge("a", "b").await.is_err());
    }

    #[tokio::test]
    async fn verdict_is_configurable() {
        let provider = MockProvider::default().with_verdict(false);
        assert!(!provider.judge("a", "b").await.unwrap());
    }
}
