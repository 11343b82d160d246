//! Compilation of structured filters into Scryfall search syntax.

use cardvault_core::filter::{FormatLegality, NumericRange, SearchFilterSpec};
use cardvault_core::types::ColorSet;

/// Compile a filter spec into a Scryfall query string.
///
/// Each non-empty field contributes one clause; clauses are joined by single
/// spaces, which Scryfall reads as AND. Multi-valued fields become a
/// parenthesised OR group. An empty spec compiles to an empty string.
///
/// # Example
///
/// ```
/// use cardvault_core::{NumericRange, SearchFilterSpec, SetCode};
/// use cardvault_scryfall::compile_query;
///
/// let spec = SearchFilterSpec {
///     types: vec!["creature".to_string()],
///     cmc: NumericRange { min: None, max: Some(3.0) },
///     sets: vec![SetCode::new("dom").unwrap(), SetCode::new("war").unwrap()],
///     ..Default::default()
/// };
/// assert_eq!(compile_query(&spec), "(t:creature) cmc<=3 (s:dom OR s:war)");
/// ```
pub fn compile_query(spec: &SearchFilterSpec) -> String {
    let mut clauses: Vec<String> = Vec::new();

    if let Some(name) = non_blank(spec.name.as_deref()) {
        clauses.push(format!("name:{}", term(name)));
    }

    let colors: ColorSet = spec.colors.iter().collect();
    if !colors.is_empty() {
        clauses.push(format!("c:{}", colors.letters()));
    }

    let identity: ColorSet = spec.color_identity.iter().collect();
    if !identity.is_empty() {
        clauses.push(format!("id:{}", identity.letters()));
    }

    if let Some(group) = any_of("t", spec.types.iter().map(String::as_str)) {
        clauses.push(group);
    }

    if let Some(text) = non_blank(spec.oracle_text.as_deref()) {
        clauses.push(format!("o:\"{}\"", strip_quotes(text)));
    }

    push_range(&mut clauses, "cmc", &spec.cmc);
    push_range(&mut clauses, "pow", &spec.power);
    push_range(&mut clauses, "tou", &spec.toughness);

    if let Some(group) = any_of("s", spec.sets.iter().map(|s| s.as_str())) {
        clauses.push(group);
    }

    if let Some(group) = any_of("r", spec.rarities.iter().map(|r| r.as_str())) {
        clauses.push(group);
    }

    if let Some(legality) = &spec.legality {
        let format = legality.format().trim().to_lowercase();
        if !format.is_empty() {
            clauses.push(match legality {
                FormatLegality::Legal(_) => format!("f:{}", format),
                FormatLegality::Banned(_) => format!("banned:{}", format),
            });
        }
    }

    clauses.join(" ")
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn strip_quotes(value: &str) -> String {
    value.replace('"', "")
}

/// A search term, quoted when it contains whitespace.
fn term(value: &str) -> String {
    let value = strip_quotes(value);
    if value.chars().any(char::is_whitespace) {
        format!("\"{}\"", value)
    } else {
        value
    }
}

/// `(key:a OR key:b ...)`, or `None` when no value is non-blank.
fn any_of<'a>(key: &str, values: impl Iterator<Item = &'a str>) -> Option<String> {
    let terms: Vec<String> = values
        .filter_map(|v| non_blank(Some(v)))
        .map(|v| format!("{}:{}", key, term(v)))
        .collect();
    if terms.is_empty() {
        None
    } else {
        Some(format!("({})", terms.join(" OR ")))
    }
}

fn push_range(clauses: &mut Vec<String>, key: &str, range: &NumericRange) {
    if let Some(min) = range.min {
        clauses.push(format!("{}>={}", key, min));
    }
    if let Some(max) = range.max {
        clauses.push(format!("{}<={}", key, max));
    }
}
