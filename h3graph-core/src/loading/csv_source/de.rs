//! Field deserializers for list-shaped and nullable CSV attributes.
//!
//! Edge lists exported by dataframe tooling carry either a scalar or a
//! bracketed list (`[1, 2]`, `['primary', 'secondary']`); OSM tags use
//! `;`-separated lists. Missing values show up as empty cells or `nan`.

use serde::{Deserialize, Deserializer, de::Error as _};

use crate::model::WaySet;

const MISSING: [&str; 3] = ["nan", "none", "null"];

fn clean(text: &str) -> Option<&str> {
    let text = text.trim();
    let missing = text.is_empty() || MISSING.iter().any(|m| text.eq_ignore_ascii_case(m));
    (!missing).then_some(text)
}

fn split_list(text: &str) -> Vec<&str> {
    let parts: Vec<&str> = match text.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
        Some(inner) => inner.split(',').collect(),
        None => text.split(';').collect(),
    };

    parts
        .into_iter()
        .map(|part| part.trim().trim_matches(|c| c == '\'' || c == '"').trim())
        .filter(|part| !part.is_empty())
        .collect()
}

/// Integer id, tolerating a float rendering such as `123.0`
#[allow(clippy::cast_possible_truncation)]
fn parse_id(text: &str) -> Option<i64> {
    text.parse::<i64>().ok().or_else(|| {
        let value: f64 = text.parse().ok()?;
        (value.is_finite() && value.fract() == 0.0).then_some(value as i64)
    })
}

pub(super) fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = Option::<String>::deserialize(deserializer)?;
    Ok(text.as_deref().and_then(clean).map(str::to_owned))
}

pub(super) fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = Option::<String>::deserialize(deserializer)?;
    Ok(text
        .as_deref()
        .and_then(clean)
        .map(|text| split_list(text).into_iter().map(str::to_owned).collect())
        .unwrap_or_default())
}

pub(super) fn way_set<'de, D>(deserializer: D) -> Result<WaySet, D::Error>
where
    D: Deserializer<'de>,
{
    let text = Option::<String>::deserialize(deserializer)?;
    let Some(text) = text.as_deref().and_then(clean) else {
        return Ok(WaySet::default());
    };

    split_list(text)
        .into_iter()
        .map(|item| {
            parse_id(item).ok_or_else(|| D::Error::custom(format!("invalid way id '{item}'")))
        })
        .collect()
}

pub(super) fn optional_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = Option::<String>::deserialize(deserializer)?;
    text.as_deref()
        .and_then(clean)
        .map(|item| parse_id(item).ok_or_else(|| D::Error::custom(format!("invalid id '{item}'"))))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_shapes() {
        assert_eq!(split_list("residential"), vec!["residential"]);
        assert_eq!(
            split_list("['primary', 'secondary']"),
            vec!["primary", "secondary"]
        );
        assert_eq!(split_list("[1, 2]"), vec!["1", "2"]);
        assert_eq!(split_list("primary;secondary"), vec!["primary", "secondary"]);
        assert!(split_list("[]").is_empty());
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("123"), Some(123));
        assert_eq!(parse_id("-5"), Some(-5));
        assert_eq!(parse_id("123.0"), Some(123));
        assert_eq!(parse_id("12.5"), None);
        assert_eq!(parse_id("way"), None);
    }

    #[test]
    fn test_missing_markers() {
        assert_eq!(clean(" NaN "), None);
        assert_eq!(clean("None"), None);
        assert_eq!(clean(""), None);
        assert_eq!(clean(" 50 mph "), Some("50 mph"));
    }
}
