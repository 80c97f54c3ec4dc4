//! Regiment option resolution
//!
//! A regiment option phrase ("1-2 Daemons or Humans", "Any non-Monster",
//! "Lord-Celestant (required)") is consumed left to right against the
//! corpora gathered from every ingested document.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::LazyLock;

use indexmap::{IndexMap, IndexSet};
use muster_domain::{collapse_whitespace, normalize_text, RegimentOption};
use regex::Regex;

use crate::diagnostics::{DiagnosticKind, Diagnostics};

static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)-(\d+)").unwrap());

const ANY_PREFIX: &str = "Any";
const REQUIRED_SUFFIX: &str = "(required)";
const ALTERNATIVE_SEPARATOR: &str = " or ";

/// Reference data options are resolved against
#[derive(Debug, Clone, Default)]
pub struct Corpora {
    keywords: Vec<String>,
    unit_names: IndexSet<String>,
    subhero_categories: IndexSet<String>,
    titled_units: IndexMap<String, String>,
}

/// Longest first, then case-insensitive alphabetical, then byte order
fn keyword_order(a: &String, b: &String) -> Ordering {
    b.len()
        .cmp(&a.len())
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

impl Corpora {
    /// Build deduplicated corpora; the keyword list is sorted for greedy
    /// longest-first matching and titled units are derived from the names.
    pub fn new<K, U, S>(keywords: K, unit_names: U, subhero_categories: S) -> Self
    where
        K: IntoIterator<Item = String>,
        U: IntoIterator<Item = String>,
        S: IntoIterator<Item = String>,
    {
        let mut keywords: Vec<String> = keywords
            .into_iter()
            .filter(|k| !k.trim().is_empty())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        keywords.sort_by(keyword_order);

        let unit_names: IndexSet<String> = unit_names.into_iter().collect();
        let titled_units = unit_names
            .iter()
            .filter_map(|name| {
                let (title, _) = name.split_once(',')?;
                Some((title.trim().to_string(), name.clone()))
            })
            .collect();

        Self {
            keywords,
            unit_names,
            subhero_categories: subhero_categories.into_iter().collect(),
            titled_units,
        }
    }

    /// Keywords in matching order
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Short title → full name for comma-titled units
    pub fn titled_units(&self) -> &IndexMap<String, String> {
        &self.titled_units
    }

    fn has_keyword(&self, text: &str) -> bool {
        self.keywords.iter().any(|k| k.eq_ignore_ascii_case(text))
    }

    /// Category matching `text` exactly or as its plural
    fn subhero_category(&self, text: &str) -> Option<&String> {
        self.subhero_categories.iter().find(|category| {
            category.eq_ignore_ascii_case(text)
                || format!("{}s", category).eq_ignore_ascii_case(text)
        })
    }

    fn unit_name(&self, text: &str) -> Option<&String> {
        self.unit_names
            .iter()
            .find(|name| name.eq_ignore_ascii_case(text))
            .or_else(|| {
                self.titled_units
                    .iter()
                    .find(|(title, _)| title.eq_ignore_ascii_case(text))
                    .map(|(_, full)| full)
            })
    }
}

/// A resolved option and whatever text resolution could not account for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedOption {
    /// The resolved option (possibly invalid)
    pub option: RegimentOption,
    /// Lower-cased leftover text; empty when the phrase was fully consumed
    pub residue: String,
}

/// Resolve one option phrase against `corpora`
pub fn parse(phrase: &str, corpora: &Corpora) -> ParsedOption {
    let line = normalize_text(&collapse_whitespace(phrase));
    if line.eq_ignore_ascii_case("none") {
        return ParsedOption {
            option: RegimentOption::none_marker(),
            residue: String::new(),
        };
    }

    let mut option = RegimentOption::default();
    let mut rest = line.as_str();

    if let Some(after) = rest.strip_prefix(ANY_PREFIX) {
        option.max = RegimentOption::UNBOUNDED;
        rest = after.trim();
    }

    if let Some(caps) = RANGE_RE.captures(rest) {
        if let (Ok(min), Ok(max)) = (caps[1].parse(), caps[2].parse()) {
            option.min = min;
            option.max = max;
            rest = rest[caps[0].len()..].trim();
        }
    }

    if let Some(before) = rest.strip_suffix(REQUIRED_SUFFIX) {
        option.min = 1;
        option.max = 1;
        rest = before.trim();
    }

    for alternative in rest.split(ALTERNATIVE_SEPARATOR) {
        resolve_alternative(alternative.trim(), corpora, &mut option);
    }

    let residue = residue(&rest.replace(ALTERNATIVE_SEPARATOR, " "), &option, corpora);
    ParsedOption { option, residue }
}

fn resolve_alternative(part: &str, corpora: &Corpora, option: &mut RegimentOption) {
    if part.is_empty() {
        return;
    }
    if let Some(category) = corpora.subhero_category(part) {
        option.subhero_categories.push(category.clone());
        return;
    }
    if corpora.has_keyword(part) {
        option.keywords.push(part.to_string());
        return;
    }

    let mut remaining = part.to_string();
    let mut negated = Vec::new();
    let mut positive = Vec::new();
    for keyword in corpora.keywords() {
        if let Some(stripped) = strip_ignore_case(&remaining, &format!("non-{}", keyword)) {
            remaining = stripped;
            negated.push(keyword.clone());
        }
        if let Some(stripped) = strip_ignore_case(&remaining, keyword) {
            remaining = stripped;
            positive.push(keyword.clone());
        }
    }
    if remaining.is_empty() {
        option.keywords.extend(positive);
        option.non_keywords.extend(negated);
        return;
    }

    if let Some(name) = corpora.unit_name(part) {
        option.unit_names.push(name.clone());
    }
}

/// Lower-cased `line` with every accepted token removed
fn residue(line: &str, option: &RegimentOption, corpora: &Corpora) -> String {
    let mut text = line.to_ascii_lowercase();
    let mut remove = |token: &str| {
        text = text.replace(&token.to_ascii_lowercase(), " ");
    };

    for keyword in &option.non_keywords {
        remove(&format!("non-{}", keyword));
    }
    for keyword in &option.keywords {
        remove(keyword);
    }
    for category in &option.subhero_categories {
        remove(&format!("{}s", category));
        remove(category);
    }
    for name in &option.unit_names {
        remove(name);
        for (title, full) in corpora.titled_units() {
            if full.eq_ignore_ascii_case(name) {
                remove(title);
            }
        }
    }
    collapse_whitespace(&text)
}

/// Remove every case-insensitive occurrence of `needle`; `None` if absent
fn strip_ignore_case(haystack: &str, needle: &str) -> Option<String> {
    if needle.is_empty() {
        return None;
    }
    let lower_haystack = haystack.to_ascii_lowercase();
    let lower_needle = needle.to_ascii_lowercase();
    if !lower_haystack.contains(&lower_needle) {
        return None;
    }

    let mut result = String::with_capacity(haystack.len());
    let mut last = 0;
    for (start, _) in lower_haystack.match_indices(&lower_needle) {
        result.push_str(&haystack[last..start]);
        last = start + lower_needle.len();
    }
    result.push_str(&haystack[last..]);
    Some(result.trim().to_string())
}

/// Resolve every phrase of one unit, keeping only valid options.
///
/// Residue and invalid options are recorded against `unit`.
pub fn resolve_options(
    unit: &str,
    phrases: &[String],
    corpora: &Corpora,
    diagnostics: &mut Diagnostics,
) -> Vec<RegimentOption> {
    let mut options = Vec::new();
    for phrase in phrases {
        let parsed = parse(phrase, corpora);
        if !parsed.residue.is_empty() {
            diagnostics.record(
                DiagnosticKind::OptionResidue,
                unit,
                format!("unparsed '{}' in option '{}'", parsed.residue, phrase),
            );
        }
        if parsed.option.is_valid() {
            options.push(parsed.option);
        } else {
            diagnostics.record(
                DiagnosticKind::InvalidOption,
                unit,
                format!("dropped option '{}'", phrase),
            );
        }
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn corpora() -> Corpora {
        Corpora::new(
            strings(&["Daemons", "Humans", "Monster", "Infantry", "Stormcast Eternals", "Cavalry"]),
            strings(&["Callis and Toll", "Cado Ezechiar, the Hollow King", "Lord-Celestant"]),
            strings(&["Officer", "Priest"]),
        )
    }

    #[test]
    fn test_range_with_alternatives() {
        let corpora = Corpora::new(strings(&["Daemons", "Humans"]), Vec::new(), Vec::new());
        let parsed = parse("1-2 Daemons or Humans", &corpora);

        assert_eq!(parsed.option.min, 1);
        assert_eq!(parsed.option.max, 2);
        assert_eq!(parsed.option.keywords, strings(&["Daemons", "Humans"]));
        assert_eq!(parsed.residue, "");
    }

    #[test]
    fn test_any_negated_keyword() {
        let corpora = Corpora::new(strings(&["Monster"]), Vec::new(), Vec::new());
        let parsed = parse("Any non-Monster", &corpora);

        assert_eq!(parsed.option.max, RegimentOption::UNBOUNDED);
        assert_eq!(parsed.option.non_keywords, strings(&["Monster"]));
        assert!(parsed.option.keywords.is_empty());
        assert_eq!(parsed.residue, "");
    }

    #[test]
    fn test_none_marker() {
        let parsed = parse("None", &corpora());
        assert!(parsed.option.none);
        assert!(parsed.option.is_valid());
        assert_eq!(parsed.residue, "");
    }

    #[test]
    fn test_required_overrides_range() {
        let parsed = parse("0-3 Lord-Celestant (required)", &corpora());
        assert_eq!((parsed.option.min, parsed.option.max), (1, 1));
        assert_eq!(parsed.option.unit_names, strings(&["Lord-Celestant"]));
        assert_eq!(parsed.residue, "");
    }

    #[test]
    fn test_compound_keywords() {
        let parsed = parse("0-1 non-Monster Stormcast Eternals Infantry", &corpora());
        assert_eq!(
            parsed.option.keywords,
            strings(&["Stormcast Eternals", "Infantry"])
        );
        assert_eq!(parsed.option.non_keywords, strings(&["Monster"]));
        assert_eq!(parsed.residue, "");
    }

    #[test]
    fn test_subhero_plural_and_titled_unit() {
        let parsed = parse("Any Officers or Cado Ezechiar", &corpora());
        assert_eq!(parsed.option.subhero_categories, strings(&["Officer"]));
        assert_eq!(
            parsed.option.unit_names,
            strings(&["Cado Ezechiar, the Hollow King"])
        );
        assert_eq!(parsed.residue, "");
    }

    #[test]
    fn test_unresolved_text_is_residue() {
        let parsed = parse("0-1 Gryph-hounds", &corpora());
        assert!(!parsed.option.has_references());
        assert_eq!(parsed.residue, "gryph-hounds");
    }

    #[test]
    fn test_exact_keyword_keeps_phrase_spelling() {
        let corpora = Corpora::new(
            strings(&["STORMCAST ETERNALS", "Stormcast Eternals"]),
            Vec::new(),
            Vec::new(),
        );
        let parsed = parse("Any Stormcast Eternals", &corpora);
        assert_eq!(parsed.option.keywords, strings(&["Stormcast Eternals"]));

        let parsed = parse("Any STORMCAST ETERNALS", &corpora);
        assert_eq!(parsed.option.keywords, strings(&["STORMCAST ETERNALS"]));
        assert_eq!(parsed.residue, "");
    }

    #[test]
    fn test_keyword_order() {
        let corpora = Corpora::new(
            strings(&["Hero", "Monster", "hero", "Stormcast Eternals", "Cavalry", "Hero"]),
            Vec::new(),
            Vec::new(),
        );
        assert_eq!(
            corpora.keywords(),
            strings(&["Stormcast Eternals", "Cavalry", "Monster", "Hero", "hero"]).as_slice()
        );
    }

    #[test]
    fn test_resolve_options_diagnostics() {
        let mut diagnostics = Diagnostics::new();
        let options = resolve_options(
            "Lord-Commander",
            &strings(&["Any Infantry", "0-1 Gryph-hounds", "None"]),
            &corpora(),
            &mut diagnostics,
        );

        assert_eq!(options.len(), 2);
        assert_eq!(diagnostics.count(DiagnosticKind::OptionResidue), 1);
        assert_eq!(diagnostics.count(DiagnosticKind::InvalidOption), 1);
    }

    proptest! {
        #[test]
        fn prop_residue_xor_diagnostic(
            quantity in prop::sample::select(vec!["", "Any ", "1-2 ", "0-3 "]),
            words in prop::collection::vec(
                prop::sample::select(vec!["Daemons", "Humans", "non-Monster", "Priests", "Lord-Celestant", "Gribbles", "wibble"]),
                1..4,
            ),
        ) {
            let phrase = format!("{}{}", quantity, words.join(" or "));
            let corpora = corpora();
            let parsed = parse(&phrase, &corpora);

            let mut diagnostics = Diagnostics::new();
            resolve_options("Unit", &[phrase], &corpora, &mut diagnostics);

            let reported = diagnostics.count(DiagnosticKind::OptionResidue) == 1;
            prop_assert_eq!(parsed.residue.is_empty(), !reported);
        }
    }
}
