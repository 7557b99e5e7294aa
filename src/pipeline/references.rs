//! Citation normalization into the fixed two-line shape
//! (`claim` line, then an em-dash-prefixed `source` line).

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

use crate::answer::REFERENCE_MARKER;

/// Separators a model uses to put claim and source on one line.
const INLINE_SEPARATORS: &[&str] = &["--", " — ", " – "];

const CLAIM_KEYS: &[&str] = &["claim", "title", "text"];

// Source segments that carry a locator or an identifier rather than a publication.
static FORBIDDEN_SEGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        https?:// | www\. | /
        | \b[\w-]+\.(?:com|org|gov|net|edu|io|int|info|co|kr|uk)\b
        | \bdoi\b | \b10\.\d{4,}/ | \bpmc?id\b | \bisbn\b | \barxiv\b
        | \bet\ al\b | \burl\b
        | \b[a-z]+\d{4,}\b | \b\d{6,}\b
        ",
    )
    .expect("source filter regex should compile")
});

// A lone author segment such as `Smith J` or `Kim JH.`.
static AUTHOR_SEGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\p{Lu}\p{Ll}+ \p{Lu}{1,2}\.?$").expect("author regex should compile")
});

fn is_forbidden(segment: &str) -> bool {
    FORBIDDEN_SEGMENT_RE.is_match(segment) || AUTHOR_SEGMENT_RE.is_match(segment)
}

fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep only the publication-name and year segments of a source label.
pub fn clean_source(source: &str) -> String {
    let line = one_line(source.trim().trim_start_matches('—').trim());
    line.split(',')
        .map(str::trim)
        .filter(|seg| !seg.is_empty() && !is_forbidden(seg))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Compose the two-line form, or `None` if either half is empty after cleaning.
pub fn compose(claim: &str, source: &str) -> Option<String> {
    let claim = one_line(claim);
    let source = clean_source(source);
    if claim.is_empty() || source.is_empty() {
        return None;
    }
    Some(format!("{claim}{REFERENCE_MARKER}{source}"))
}

fn from_text(entry: &str) -> Option<String> {
    // Already two-line; re-composing leaves a clean entry byte-identical.
    if let Some((claim, source)) = entry.split_once(REFERENCE_MARKER.trim_end()) {
        return compose(claim, source);
    }
    INLINE_SEPARATORS
        .iter()
        .find_map(|sep| entry.split_once(*sep))
        .and_then(|(claim, source)| compose(claim, source))
}

fn from_object(obj: &Map<String, Value>) -> Option<String> {
    let claim = CLAIM_KEYS
        .iter()
        .filter_map(|key| obj.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())?;
    let source = obj.get("source").and_then(Value::as_str)?;
    compose(claim, source)
}

fn format_entry(entry: &Value) -> Option<String> {
    match entry {
        Value::String(s) => from_text(s),
        Value::Object(obj) => from_object(obj),
        _ => None,
    }
}

/// Normalize whatever shape `references` arrived in, keeping at most `max`.
pub fn format_references(value: Option<&Value>, max: usize) -> Vec<String> {
    let entries: &[Value] = match value {
        Some(Value::Array(items)) => items.as_slice(),
        Some(single @ (Value::String(_) | Value::Object(_))) => std::slice::from_ref(single),
        _ => &[],
    };
    entries.iter().filter_map(format_entry).take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn title_and_source_pair_is_composed() {
        let input = json!([{
            "title": "Caffeine raises cortisol briefly.",
            "source": "Endocrine Journal, 2021"
        }]);
        assert_eq!(
            format_references(Some(&input), 2),
            vec!["Caffeine raises cortisol briefly.\n— Endocrine Journal, 2021"]
        );
    }

    #[test]
    fn two_line_entries_pass_through_unchanged() {
        let entry = "Sleep loss raises appetite.\n— Sleep Medicine Reviews, 2019";
        assert_eq!(format_references(Some(&json!([entry])), 2), vec![entry]);
    }

    #[test]
    fn inline_double_hyphen_is_split_on_first_occurrence() {
        let input = json!("Walking lowers glucose -- Diabetes Care, 2016 -- extra");
        assert_eq!(
            format_references(Some(&input), 2),
            vec!["Walking lowers glucose\n— Diabetes Care, 2016 -- extra"]
        );
    }

    #[test]
    fn entries_without_a_source_are_dropped() {
        let refs = format_references(
            Some(&json!([
                "Just a claim with no source.",
                {"claim": "No source here"},
                {"claim": "", "source": "WHO, 2020"},
                42
            ])),
            2,
        );
        assert!(refs.is_empty());
    }

    #[test]
    fn locators_and_authors_are_removed_from_sources() {
        let refs = format_references(
            Some(&json!([
                {"claim": "A", "source": "Smith et al., Lancet, 2020, https://doi.org/10.1000/x"},
                {"claim": "B", "source": "doi:10.1234/abcd"}
            ])),
            2,
        );
        assert_eq!(refs, vec!["A\n— Lancet, 2020"]);

        let refs = format_references(
            Some(&json!([
                {"claim": "C", "source": "Lancet, 2020, pubmed.ncbi.nlm.nih.gov/12345678"},
                {"claim": "D", "source": "PMC1234567, BMJ, 2019"}
            ])),
            2,
        );
        assert_eq!(refs, vec!["C\n— Lancet, 2020", "D\n— BMJ, 2019"]);

        assert_eq!(clean_source("Smith J, Lancet, 2020"), "Lancet, 2020");
        assert_eq!(clean_source("Kim JH., lancet.com, 2021"), "2021");
        assert_eq!(clean_source("PMID 31234567, Sleep, 2018"), "Sleep, 2018");
    }

    #[test]
    fn publication_names_survive_cleaning() {
        for source in [
            "Diabetes Care, 2016",
            "Sleep Medicine Reviews, 2019",
            "WHO Guideline, 2020",
            "The Lancet, 2020",
        ] {
            assert_eq!(clean_source(source), source);
        }
    }

    #[test]
    fn keeps_first_two_valid_entries_in_order() {
        let refs = format_references(
            Some(&json!([
                "bad",
                "One -- Source Alpha, 2001",
                {"claim": "Two", "source": "Source Beta, 2002"},
                "Three -- Source Gamma, 2003"
            ])),
            2,
        );
        assert_eq!(refs, vec!["One\n— Source Alpha, 2001", "Two\n— Source Beta, 2002"]);
    }

    #[test]
    fn absent_or_odd_shapes_yield_nothing() {
        assert!(format_references(None, 2).is_empty());
        assert!(format_references(Some(&json!(null)), 2).is_empty());
        assert!(format_references(Some(&json!(7)), 2).is_empty());
    }

    #[test]
    fn multi_line_claims_collapse_to_one_line() {
        let input = json!([{"claim": "Line one\nline two", "source": "WHO, 2022"}]);
        assert_eq!(
            format_references(Some(&input), 2),
            vec!["Line one line two\n— WHO, 2022"]
        );
    }
}
