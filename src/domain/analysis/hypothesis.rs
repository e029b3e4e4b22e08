//! Hypothesis tracker - bounded set of competing explanations.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ErrorCode, EvidenceId, HypothesisId};

use super::evidence::require_text;
use super::{EvidenceLedger, LedgerError};

/// How strongly a hypothesis is believed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
    #[default]
    Unknown,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
            Confidence::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A hypothesis as submitted by the model.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HypothesisDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub hypothesis: String,
    #[serde(default)]
    pub confidence: Confidence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unknowns: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests_to_run: Option<Vec<String>>,
}

impl HypothesisDraft {
    pub fn new(hypothesis: impl Into<String>, confidence: Confidence) -> Self {
        Self {
            hypothesis: hypothesis.into(),
            confidence,
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// A tracked hypothesis.
///
/// `id` and `statement` are fixed at registration; confidence, evidence
/// links and notes change through scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hypothesis {
    id: HypothesisId,
    statement: String,
    confidence: Confidence,
    unknowns: Vec<String>,
    tests_to_run: Vec<String>,
    supporting_evidence_ids: Vec<EvidenceId>,
    contradicting_evidence_ids: Vec<EvidenceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
}

impl Hypothesis {
    pub fn id(&self) -> &HypothesisId {
        &self.id
    }

    pub fn statement(&self) -> &str {
        &self.statement
    }

    pub fn confidence(&self) -> Confidence {
        self.confidence
    }

    pub fn unknowns(&self) -> &[String] {
        &self.unknowns
    }

    pub fn tests_to_run(&self) -> &[String] {
        &self.tests_to_run
    }

    pub fn supporting_evidence_ids(&self) -> &[EvidenceId] {
        &self.supporting_evidence_ids
    }

    pub fn contradicting_evidence_ids(&self) -> &[EvidenceId] {
        &self.contradicting_evidence_ids
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    fn apply(&mut self, update: ResolvedUpdate) {
        if let Some(confidence) = update.confidence {
            self.confidence = confidence;
        }
        append_unique(&mut self.supporting_evidence_ids, update.supports);
        append_unique(&mut self.contradicting_evidence_ids, update.contradicts);
        if let Some(notes) = update.notes {
            self.notes = Some(notes);
        }
    }
}

fn append_unique(target: &mut Vec<EvidenceId>, ids: Vec<EvidenceId>) {
    for id in ids {
        if !target.contains(&id) {
            target.push(id);
        }
    }
}

/// A scoring update as submitted by the model.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HypothesisUpdate {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supports_evidence_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contradicts_evidence_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl HypothesisUpdate {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn supported_by<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supports_evidence_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn contradicted_by<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contradicts_evidence_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// An update whose references have all been checked.
struct ResolvedUpdate {
    confidence: Option<Confidence>,
    supports: Vec<EvidenceId>,
    contradicts: Vec<EvidenceId>,
    notes: Option<String>,
}

/// One update that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreFailure {
    /// Position of the update in the submitted list.
    pub index: usize,
    pub id: String,
    pub code: ErrorCode,
    pub message: String,
}

/// Result of a scoring batch. Failures never block the other updates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    pub updated: Vec<HypothesisId>,
    pub failures: Vec<ScoreFailure>,
}

/// Bounded set of hypotheses for one session.
#[derive(Debug, Clone)]
pub struct HypothesisTracker {
    hypotheses: Vec<Hypothesis>,
    next_seq: u32,
    capacity: usize,
}

impl HypothesisTracker {
    pub fn new(capacity: usize) -> Self {
        Self {
            hypotheses: Vec::new(),
            next_seq: 0,
            capacity,
        }
    }

    /// Registers a batch of hypotheses, returning ids in input order.
    ///
    /// Same discipline as [`EvidenceLedger::add`]: all or nothing.
    pub fn register(
        &mut self,
        drafts: Vec<HypothesisDraft>,
    ) -> Result<Vec<HypothesisId>, LedgerError> {
        if drafts.is_empty() {
            return Err(LedgerError::EmptyBatch);
        }
        if self.hypotheses.len() + drafts.len() > self.capacity {
            return Err(LedgerError::Full {
                registry: "hypothesis tracker",
                capacity: self.capacity,
                current: self.hypotheses.len(),
                requested: drafts.len(),
            });
        }

        let mut taken: HashSet<HypothesisId> =
            self.hypotheses.iter().map(|h| h.id.clone()).collect();
        let mut explicit = Vec::with_capacity(drafts.len());
        for (index, draft) in drafts.iter().enumerate() {
            require_text(index, "hypothesis", &draft.hypothesis)?;
            let id = match &draft.id {
                Some(raw) => {
                    let id = HypothesisId::new(raw.as_str())
                        .map_err(|source| LedgerError::InvalidEntry { index, source })?;
                    if !taken.insert(id.clone()) {
                        return Err(LedgerError::DuplicateId(id.to_string()));
                    }
                    Some(id)
                }
                None => None,
            };
            explicit.push(id);
        }

        let mut next_seq = self.next_seq;
        let mut staged = Vec::with_capacity(drafts.len());
        for (draft, id) in drafts.into_iter().zip(explicit) {
            let id = match id {
                Some(id) => id,
                None => loop {
                    next_seq += 1;
                    let candidate = HypothesisId::sequential(next_seq);
                    if taken.insert(candidate.clone()) {
                        break candidate;
                    }
                },
            };
            staged.push(Hypothesis {
                id,
                statement: draft.hypothesis.trim().to_string(),
                confidence: draft.confidence,
                unknowns: draft.unknowns.unwrap_or_default(),
                tests_to_run: draft.tests_to_run.unwrap_or_default(),
                supporting_evidence_ids: Vec::new(),
                contradicting_evidence_ids: Vec::new(),
                notes: None,
            });
        }

        self.next_seq = next_seq;
        let ids = staged.iter().map(|h| h.id.clone()).collect();
        self.hypotheses.extend(staged);
        Ok(ids)
    }

    /// Applies updates one by one.
    ///
    /// An update naming an unknown hypothesis or unknown evidence fails on
    /// its own; every other update is still applied.
    pub fn score(
        &mut self,
        updates: Vec<HypothesisUpdate>,
        ledger: &EvidenceLedger,
    ) -> ScoreReport {
        let mut report = ScoreReport::default();
        for (index, update) in updates.into_iter().enumerate() {
            let raw_id = update.id.clone();
            match self.score_one(update, ledger) {
                Ok(id) => report.updated.push(id),
                Err(err) => report.failures.push(ScoreFailure {
                    index,
                    id: raw_id,
                    code: err.code(),
                    message: err.to_string(),
                }),
            }
        }
        report
    }

    fn score_one(
        &mut self,
        update: HypothesisUpdate,
        ledger: &EvidenceLedger,
    ) -> Result<HypothesisId, LedgerError> {
        let id = HypothesisId::new(update.id.as_str())
            .map_err(|_| LedgerError::HypothesisNotFound(update.id.clone()))?;
        let position = self
            .hypotheses
            .iter()
            .position(|h| h.id == id)
            .ok_or_else(|| LedgerError::HypothesisNotFound(id.to_string()))?;

        let resolved = ResolvedUpdate {
            confidence: update.confidence,
            supports: resolve_evidence(update.supports_evidence_ids, ledger)?,
            contradicts: resolve_evidence(update.contradicts_evidence_ids, ledger)?,
            notes: update.notes,
        };
        self.hypotheses[position].apply(resolved);
        Ok(id)
    }

    pub fn get(&self, id: &HypothesisId) -> Option<&Hypothesis> {
        self.hypotheses.iter().find(|h| &h.id == id)
    }

    pub fn hypotheses(&self) -> &[Hypothesis] {
        &self.hypotheses
    }

    pub fn len(&self) -> usize {
        self.hypotheses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hypotheses.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.hypotheses.len())
    }
}

fn resolve_evidence(
    raw: Option<Vec<String>>,
    ledger: &EvidenceLedger,
) -> Result<Vec<EvidenceId>, LedgerError> {
    raw.unwrap_or_default()
        .into_iter()
        .map(|raw| {
            EvidenceId::new(raw.as_str())
                .ok()
                .filter(|id| ledger.contains(id))
                .ok_or(LedgerError::UnknownEvidence(raw))
        })
        .collect()
}
