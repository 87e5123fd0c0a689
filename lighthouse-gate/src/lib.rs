#![deny(missing_docs)]
//! The citation gate — a pure, textual validation pass over a synthesized
//! answer (`spec.md` §4.6).
//!
//! No I/O, no LM call: [`run_gate`] operates on the answer text and the
//! set of paths in collected evidence. Kept as its own crate (no
//! dependency on the agent loop or any provider) so its properties —
//! grounding, the functional-claim check, and citation extraction — can
//! be unit tested in isolation, the way the teacher isolates
//! `neuron-turn::context::NoCompaction` from any concrete provider.
//!
//! Regex patterns are compiled once via `once_cell::sync::Lazy`, the same
//! construct-once-reuse-many shape the teacher's `neuron-hook-security`
//! uses for its redaction patterns, adapted here to free functions rather
//! than a struct field since the gate carries no state between calls.

use lighthouse_types::rewrite_to_path;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// Functional verbs whose presence in an uncited answer is treated as an
/// overclaim (`spec.md` §4.6). Union of the verb list the spec states
/// plus the three emphatic tokens (`automatically`, `always`, `never`)
/// it calls out separately — resolved as one flat, case-insensitive
/// token set rather than two parallel checks, since the gate's only use
/// of either is "does any of these appear."
pub const FUNCTIONAL_TOKENS: &[&str] = &[
    "does",
    "happens",
    "writes",
    "reads",
    "emits",
    "triggers",
    "calls",
    "sends",
    "creates",
    "deletes",
    "updates",
    "retries",
    "processes",
    "stores",
    "persists",
    "syncs",
    "synchronizes",
    "validates",
    "calculates",
    "automatically",
    "always",
    "never",
];

static CITATION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[(\d+)\]\]\(([^)]+)\)").expect("valid citation regex"));

static FUNCTIONAL_TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let alternation = FUNCTIONAL_TOKENS.join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("valid functional-token regex")
});

/// One inline citation extracted from answer text: `[[n]](ref)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    /// The integer marker, e.g. `2` in `[[2]](...)`.
    pub marker: u32,
    /// The raw `ref` string as written (URL or path), before rewrite.
    pub raw_ref: String,
}

/// Extract every `[[n]](ref)` citation from `text`, in order of
/// appearance. Malformed markers (non-numeric) are skipped rather than
/// erroring — the gate only needs what parses.
pub fn extract_citations(text: &str) -> Vec<Citation> {
    CITATION_PATTERN
        .captures_iter(text)
        .filter_map(|caps| {
            let marker: u32 = caps.get(1)?.as_str().parse().ok()?;
            let raw_ref = caps.get(2)?.as_str().to_string();
            Some(Citation { marker, raw_ref })
        })
        .collect()
}

/// Whether `text` contains a case-insensitive functional-verb token.
pub fn contains_functional_claim(text: &str) -> bool {
    FUNCTIONAL_TOKEN_PATTERN.is_match(text)
}

/// Why the gate rejected an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateFailure {
    /// The answer used functional language but no evidence was
    /// collected for this request.
    NoEvidenceForFunctionalClaim,
    /// At least one citation's `ref` did not resolve to a path in
    /// collected evidence.
    InvalidCitation {
        /// The offending `ref` values, in order of appearance.
        bad_refs: Vec<String>,
    },
}

impl GateFailure {
    /// Stable machine-readable reason string for logs and audit records.
    pub fn reason(&self) -> &'static str {
        match self {
            GateFailure::NoEvidenceForFunctionalClaim => "no_evidence_for_functional_claim",
            GateFailure::InvalidCitation { .. } => "invalid_citation",
        }
    }
}

/// Outcome of running the gate over a synthesized answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateResult {
    /// The answer passed. `confirmed` iff collected evidence was
    /// non-empty, else `needs_clarification`.
    Pass {
        /// Whether collected evidence was non-empty.
        confirmed: bool,
    },
    /// The answer failed and must not be shown to the user.
    Fail(GateFailure),
}

/// Run the citation gate over synthesized text `text` against the set of
/// paths `evidence_paths` present in collected evidence for this request.
///
/// Procedure (`spec.md` §4.6):
/// 1. Extract every `[[n]](ref)` citation.
/// 2. Rewrite each `ref` the same way `fetch_articles` rewrites URLs, and
///    check membership in `evidence_paths`.
/// 3. If `text` contains a functional-verb token and `evidence_paths` is
///    empty, fail regardless of citations.
/// 4. Otherwise, fail if any citation was invalid; else pass.
pub fn run_gate(text: &str, evidence_paths: &BTreeSet<String>) -> GateResult {
    let citations = extract_citations(text);

    if contains_functional_claim(text) && evidence_paths.is_empty() {
        return GateResult::Fail(GateFailure::NoEvidenceForFunctionalClaim);
    }

    let bad_refs: Vec<String> = citations
        .iter()
        .filter(|c| !evidence_paths.contains(&rewrite_to_path(&c.raw_ref)))
        .map(|c| c.raw_ref.clone())
        .collect();

    if !bad_refs.is_empty() {
        return GateResult::Fail(GateFailure::InvalidCitation { bad_refs });
    }

    GateResult::Pass {
        confirmed: !evidence_paths.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(entries: &[&str]) -> BTreeSet<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn extracts_multiple_citations_in_order() {
        let text = "See [[1]](billing/a.md) and also [[2]](billing/b.md).";
        let citations = extract_citations(text);
        assert_eq!(citations.len(), 2);
        assert_eq!(citations[0].marker, 1);
        assert_eq!(citations[0].raw_ref, "billing/a.md");
        assert_eq!(citations[1].marker, 2);
    }

    #[test]
    fn no_citations_returns_empty() {
        assert!(extract_citations("no citations here").is_empty());
    }

    #[test]
    fn functional_claim_is_case_insensitive() {
        assert!(contains_functional_claim("The system AUTOMATICALLY retries failed jobs."));
        assert!(contains_functional_claim("it always validates input"));
        assert!(!contains_functional_claim("Here is some general information."));
    }

    #[test]
    fn functional_claim_does_not_match_substrings_of_other_words() {
        // "creates" should not fire on "recreates" via a non-word-boundary
        // match... but "recreates" legitimately contains "creates" as a
        // suffix after a word boundary is NOT present, so this must not
        // match since \b requires a true word boundary before "creates".
        assert!(!contains_functional_claim("spreadsheet formulas"));
    }

    #[test]
    fn passes_confirmed_when_citation_is_in_evidence() {
        let result = run_gate(
            "Set your currency in Settings [[1]](billing/multi-currency.md).",
            &paths(&["billing/multi-currency.md"]),
        );
        assert_eq!(result, GateResult::Pass { confirmed: true });
    }

    #[test]
    fn passes_needs_clarification_when_no_evidence_and_no_functional_claim() {
        let result = run_gate("I don't have information on that.", &paths(&[]));
        assert_eq!(result, GateResult::Pass { confirmed: false });
    }

    #[test]
    fn fails_on_functional_claim_with_no_evidence() {
        let result = run_gate("This automatically syncs your data.", &paths(&[]));
        assert_eq!(
            result,
            GateResult::Fail(GateFailure::NoEvidenceForFunctionalClaim)
        );
    }

    #[test]
    fn fails_on_citation_outside_evidence() {
        let result = run_gate(
            "See [[1]](billing/other.md) for details.",
            &paths(&["billing/multi-currency.md"]),
        );
        match result {
            GateResult::Fail(GateFailure::InvalidCitation { bad_refs }) => {
                assert_eq!(bad_refs, vec!["billing/other.md".to_string()]);
            }
            other => panic!("expected InvalidCitation, got {other:?}"),
        }
    }

    #[test]
    fn citation_ref_is_rewritten_before_membership_check() {
        let result = run_gate(
            "See [[1]](https://github.com/acme/help-docs/blob/main/billing/multi-currency.md).",
            &paths(&["billing/multi-currency.md"]),
        );
        assert_eq!(result, GateResult::Pass { confirmed: true });
    }

    #[test]
    fn functional_claim_check_runs_before_citation_validity() {
        // Both conditions are present; spec says functional-claim-with-no-
        // evidence takes priority.
        let result = run_gate(
            "This automatically [[1]](nowhere.md) processes your request.",
            &paths(&[]),
        );
        assert_eq!(
            result,
            GateResult::Fail(GateFailure::NoEvidenceForFunctionalClaim)
        );
    }

    #[test]
    fn gate_failure_reason_strings_are_stable() {
        assert_eq!(
            GateFailure::NoEvidenceForFunctionalClaim.reason(),
            "no_evidence_for_functional_claim"
        );
        assert_eq!(
            GateFailure::InvalidCitation { bad_refs: vec![] }.reason(),
            "invalid_citation"
        );
    }
}
