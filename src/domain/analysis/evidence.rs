//! Evidence ledger - bounded, append-only record of observed facts.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EvidenceId, ValidationError};

use super::LedgerError;

/// An evidence item as submitted by the model.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Where the fact came from, e.g. a command or report path.
    pub source: String,
    pub finding: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why_it_matters: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl EvidenceDraft {
    pub fn new(source: impl Into<String>, finding: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            finding: finding.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// A recorded evidence item. Never modified once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceItem {
    pub id: EvidenceId,
    pub source: String,
    pub finding: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub why_it_matters: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Bounded, append-only collection of evidence for one session.
///
/// # Invariants
///
/// - ids are unique and never reused
/// - items are never removed or overwritten
/// - `items.len() <= capacity`
#[derive(Debug, Clone)]
pub struct EvidenceLedger {
    items: Vec<EvidenceItem>,
    next_seq: u32,
    capacity: usize,
}

impl EvidenceLedger {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            next_seq: 0,
            capacity,
        }
    }

    /// Appends a batch of evidence, returning the ids in input order.
    ///
    /// The batch is applied atomically: any invalid entry, duplicate id or
    /// capacity overflow rejects the whole batch.
    pub fn add(&mut self, drafts: Vec<EvidenceDraft>) -> Result<Vec<EvidenceId>, LedgerError> {
        if drafts.is_empty() {
            return Err(LedgerError::EmptyBatch);
        }
        if self.items.len() + drafts.len() > self.capacity {
            return Err(LedgerError::Full {
                registry: "evidence ledger",
                capacity: self.capacity,
                current: self.items.len(),
                requested: drafts.len(),
            });
        }

        let mut taken: HashSet<EvidenceId> = self.items.iter().map(|i| i.id.clone()).collect();
        let mut explicit = Vec::with_capacity(drafts.len());
        for (index, draft) in drafts.iter().enumerate() {
            require_text(index, "source", &draft.source)?;
            require_text(index, "finding", &draft.finding)?;
            let id = match &draft.id {
                Some(raw) => {
                    let id = EvidenceId::new(raw.as_str())
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
                    let candidate = EvidenceId::sequential(next_seq);
                    if taken.insert(candidate.clone()) {
                        break candidate;
                    }
                },
            };
            staged.push(EvidenceItem {
                id,
                source: draft.source.trim().to_string(),
                finding: draft.finding.trim().to_string(),
                why_it_matters: draft.why_it_matters.filter(|w| !w.trim().is_empty()),
                tags: draft.tags.unwrap_or_default(),
            });
        }

        self.next_seq = next_seq;
        let ids = staged.iter().map(|item| item.id.clone()).collect();
        self.items.extend(staged);
        Ok(ids)
    }

    pub fn get(&self, id: &EvidenceId) -> Option<&EvidenceItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn contains(&self, id: &EvidenceId) -> bool {
        self.get(id).is_some()
    }

    pub fn items(&self) -> &[EvidenceItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.items.len())
    }
}

pub(super) fn require_text(index: usize, field: &str, value: &str) -> Result<(), LedgerError> {
    if value.trim().is_empty() {
        return Err(LedgerError::InvalidEntry {
            index,
            source: ValidationError::empty_field(field),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(finding: &str) -> EvidenceDraft {
        EvidenceDraft::new("!threads", finding)
    }

    #[test]
    fn assigns_sequential_ids_in_input_order() {
        let mut ledger = EvidenceLedger::new(10);
        let ids = ledger.add(vec![draft("a"), draft("b")]).unwrap();
        assert_eq!(ids, vec![EvidenceId::sequential(1), EvidenceId::sequential(2)]);

        let more = ledger.add(vec![draft("c")]).unwrap();
        assert_eq!(more, vec![EvidenceId::sequential(3)]);
        assert_eq!(ledger.items()[2].finding, "c");
    }

    #[test]
    fn generated_ids_skip_explicit_ones() {
        let mut ledger = EvidenceLedger::new(10);
        ledger.add(vec![draft("a").with_id("E1")]).unwrap();
        let ids = ledger.add(vec![draft("b")]).unwrap();
        assert_eq!(ids, vec![EvidenceId::sequential(2)]);
    }

    #[test]
    fn batch_over_capacity_is_rejected_whole() {
        let mut ledger = EvidenceLedger::new(2);
        ledger.add(vec![draft("a")]).unwrap();

        let err = ledger.add(vec![draft("b"), draft("c")]).unwrap_err();
        assert!(matches!(err, LedgerError::Full { current: 1, requested: 2, .. }));
        assert_eq!(ledger.len(), 1);

        ledger.add(vec![draft("b")]).unwrap();
        assert_eq!(ledger.remaining(), 0);
    }

    #[test]
    fn existing_explicit_id_rejects_batch() {
        let mut ledger = EvidenceLedger::new(10);
        ledger.add(vec![draft("a").with_id("heap")]).unwrap();

        let err = ledger
            .add(vec![draft("b"), draft("c").with_id("heap")])
            .unwrap_err();
        assert_eq!(err, LedgerError::DuplicateId("heap".into()));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.items()[0].finding, "a");
    }

    #[test]
    fn repeated_id_within_batch_rejects_batch() {
        let mut ledger = EvidenceLedger::new(10);
        let err = ledger
            .add(vec![draft("a").with_id("x"), draft("b").with_id("x")])
            .unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateId(_)));
        assert!(ledger.is_empty());
    }

    #[test]
    fn rejected_batch_does_not_consume_sequence() {
        let mut ledger = EvidenceLedger::new(10);
        let _ = ledger.add(vec![draft("a"), draft("")]);
        let ids = ledger.add(vec![draft("a")]).unwrap();
        assert_eq!(ids, vec![EvidenceId::sequential(1)]);
    }

    #[test]
    fn blank_finding_is_invalid() {
        let mut ledger = EvidenceLedger::new(10);
        let err = ledger.add(vec![draft("ok"), draft("  ")]).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidEntry { index: 1, .. }));
    }

    #[test]
    fn empty_batch_is_rejected() {
        let mut ledger = EvidenceLedger::new(10);
        assert_eq!(ledger.add(Vec::new()).unwrap_err(), LedgerError::EmptyBatch);
    }

    #[test]
    fn draft_deserializes_from_tool_arguments() {
        let draft: EvidenceDraft = serde_json::from_value(serde_json::json!({
            "source": "report_get analysis.exception",
            "finding": "NullReferenceException in OrderService.Submit",
            "whyItMatters": "Faulting frame",
            "tags": ["exception"]
        }))
        .unwrap();
        assert_eq!(draft.why_it_matters.as_deref(), Some("Faulting frame"));
        assert!(draft.id.is_none());
    }
}
