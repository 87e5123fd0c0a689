//! Deterministic URL → corpus path rewrite.
//!
//! Shared by `fetch_articles` (which accepts GitHub-blob or raw URLs) and
//! the citation gate (which validates that a cited `ref` resolves to a
//! path in the collected evidence) so both sides of the "ref must be in
//! evidence" check use byte-identical normalization (`spec.md` §6).

/// Known GitHub blob URL prefixes stripped before treating the remainder
/// as the corpus path, e.g.
/// `https://github.com/acme/help-docs/blob/main/billing/multi-currency.md`
/// → `billing/multi-currency.md`.
const BLOB_MARKERS: &[&str] = &["/blob/main/", "/blob/master/", "/raw/main/", "/raw/master/"];

/// Rewrite a URL or bare path into a corpus path.
///
/// If `ref_or_url` looks like a GitHub blob/raw URL, strip everything up
/// to and including the branch segment. Otherwise, strip a leading `/`
/// and return it unchanged — it is already a corpus path.
pub fn rewrite_to_path(ref_or_url: &str) -> String {
    for marker in BLOB_MARKERS {
        if let Some(idx) = ref_or_url.find(marker) {
            return ref_or_url[idx + marker.len()..].to_string();
        }
    }
    ref_or_url.trim_start_matches('/').to_string()
}
