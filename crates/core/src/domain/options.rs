// Dynamic Option Parser - schema-free nested board options
//
// BULL_BOARD_UI_CONFIG__BOARD_LOGO__WIDTH=200 => { uiConfig: { boardLogo: { width: 200 } } }

use serde::Serialize;
use std::collections::btree_map::{self, BTreeMap};
use tracing::{debug, warn};

/// Delimiter between nested path segments in a compound key
pub const PATH_DELIMITER: &str = "__";

/// A single node of the options tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Integer(i64),
    Float(f64),
    Bool(bool),
    String(String),
    Tree(OptionsTree),
}

impl OptionValue {
    /// Coerce a raw string: number first, then boolean, else the string unchanged.
    pub fn coerce(raw: &str) -> Self {
        let trimmed = raw.trim();

        if let Some(number) = parse_number(trimmed) {
            return number;
        }

        if trimmed.eq_ignore_ascii_case("true") {
            return OptionValue::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return OptionValue::Bool(false);
        }

        OptionValue::String(raw.to_string())
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            OptionValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            OptionValue::Integer(i) => Some(*i as f64),
            OptionValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&OptionsTree> {
        match self {
            OptionValue::Tree(t) => Some(t),
            _ => None,
        }
    }
}

/// Untyped mapping from camel-cased option name to value or nested tree
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OptionsTree(BTreeMap<String, OptionValue>);

impl OptionsTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.0.get(key)
    }

    /// Look up a value by its camel-cased path, e.g. `["uiConfig", "boardLogo", "width"]`
    pub fn get_path(&self, path: &[&str]) -> Option<&OptionValue> {
        let (last, parents) = path.split_last()?;
        let mut node = self;
        for segment in parents {
            node = node.get(segment)?.as_tree()?;
        }
        node.get(last)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, OptionValue> {
        self.0.iter()
    }

    /// Plain JSON rendering for the presentation layer
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Write `value` at `path`, creating intermediate trees as needed.
    ///
    /// An intermediate scalar is replaced by a fresh tree. A leaf overwrites
    /// whatever was there before, including a whole subtree.
    pub fn insert_path(&mut self, path: &[String], value: OptionValue) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };

        let mut node = self;
        for segment in parents {
            let slot = node
                .0
                .entry(segment.clone())
                .or_insert_with(|| OptionValue::Tree(OptionsTree::new()));

            if !matches!(slot, OptionValue::Tree(_)) {
                debug!(segment = %segment, "Replacing scalar option with nested options");
                *slot = OptionValue::Tree(OptionsTree::new());
            }

            let OptionValue::Tree(tree) = slot else {
                return;
            };
            node = tree;
        }

        node.0.insert(last.clone(), value);
    }
}

/// Build the options tree from `(key, raw value)` pairs.
///
/// Only keys starting with `prefix` are considered. Input order decides the
/// winner when two keys resolve to the same path.
pub fn parse<I, K, V>(prefix: &str, entries: I) -> OptionsTree
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    entries
        .into_iter()
        .fold(OptionsTree::new(), |mut tree, (key, raw)| {
            let key = key.as_ref();
            let Some(stripped) = key.strip_prefix(prefix) else {
                return tree;
            };

            let path = key_path(stripped);
            if path.is_empty() {
                warn!(key = %key, "Ignoring option key without a name after the prefix");
                return tree;
            }

            tree.insert_path(&path, OptionValue::coerce(raw.as_ref()));
            tree
        })
}

/// `UI_CONFIG__BOARD_LOGO` => `["uiConfig", "boardLogo"]`
pub fn key_path(compound: &str) -> Vec<String> {
    compound
        .split(PATH_DELIMITER)
        .filter(|segment| !segment.is_empty())
        .map(camel_case)
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// `BOARD_LOGO` => `boardLogo`
pub fn camel_case(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());

    for word in segment.split('_').filter(|w| !w.is_empty()) {
        let lower = word.to_lowercase();
        if out.is_empty() {
            out.push_str(&lower);
            continue;
        }

        let mut chars = lower.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }

    out
}

fn parse_number(s: &str) -> Option<OptionValue> {
    if s.is_empty() {
        return None;
    }

    if let Ok(i) = s.parse::<i64>() {
        return Some(OptionValue::Integer(i));
    }

    if let Some(i) = parse_radix_integer(s) {
        return Some(OptionValue::Integer(i));
    }

    // f64::from_str also accepts "inf"/"nan", which are not numeric literals here
    let looks_numeric = s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !looks_numeric {
        return None;
    }

    s.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(OptionValue::Float)
}

fn parse_radix_integer(s: &str) -> Option<i64> {
    let lower = s.to_ascii_lowercase();
    let (radix, digits) = if let Some(d) = lower.strip_prefix("0x") {
        (16, d)
    } else if let Some(d) = lower.strip_prefix("0o") {
        (8, d)
    } else if let Some(d) = lower.strip_prefix("0b") {
        (2, d)
    } else {
        return None;
    };

    if digits.is_empty() {
        return None;
    }
    i64::from_str_radix(digits, radix).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PREFIX: &str = "BULL_BOARD_";

    fn build(entries: &[(&str, &str)]) -> OptionsTree {
        parse(PREFIX, entries.iter().copied())
    }

    #[test]
    fn test_basic_ui_configuration() {
        let tree = build(&[
            ("BULL_BOARD_UI_CONFIG__BOARD_TITLE", "Test Dashboard"),
            ("BULL_BOARD_UI_BASE_PATH", "/admin"),
        ]);

        assert_eq!(
            tree.get_path(&["uiConfig", "boardTitle"]).and_then(|v| v.as_str()),
            Some("Test Dashboard")
        );
        assert_eq!(
            tree.get("uiBasePath").and_then(|v| v.as_str()),
            Some("/admin")
        );
    }

    #[test]
    fn test_numbers_and_booleans_are_coerced() {
        let tree = build(&[
            ("BULL_BOARD_UI_CONFIG__POLLING_INTERVAL__SHOW_SETTING", "true"),
            ("BULL_BOARD_UI_CONFIG__POLLING_INTERVAL__FORCE_INTERVAL", "3000"),
            ("BULL_BOARD_UI_CONFIG__BOARD_LOGO__WIDTH", "200"),
            ("BULL_BOARD_UI_CONFIG__BOARD_LOGO__HEIGHT", "FALSE"),
        ]);

        assert_eq!(
            tree.get_path(&["uiConfig", "pollingInterval", "showSetting"]),
            Some(&OptionValue::Bool(true))
        );
        assert_eq!(
            tree.get_path(&["uiConfig", "pollingInterval", "forceInterval"]),
            Some(&OptionValue::Integer(3000))
        );
        assert_eq!(
            tree.get_path(&["uiConfig", "boardLogo", "width"]),
            Some(&OptionValue::Integer(200))
        );
        assert_eq!(
            tree.get_path(&["uiConfig", "boardLogo", "height"]),
            Some(&OptionValue::Bool(false))
        );
    }

    #[test]
    fn test_non_numeric_strings_are_preserved() {
        let tree = build(&[
            ("BULL_BOARD_UI_CONFIG__MENU__WIDTH", "300px"),
            ("BULL_BOARD_UI_CONFIG__DATE_FORMATS__SHORT", "HH:mm:ss"),
            ("BULL_BOARD_UI_CONFIG__BOARD_TITLE", "My Custom Dashboard"),
            ("BULL_BOARD_UI_CONFIG__NOT_A_NUMBER", "inf"),
        ]);

        assert_eq!(
            tree.get_path(&["uiConfig", "menu", "width"]).and_then(|v| v.as_str()),
            Some("300px")
        );
        assert_eq!(
            tree.get_path(&["uiConfig", "dateFormats", "short"])
                .and_then(|v| v.as_str()),
            Some("HH:mm:ss")
        );
        assert_eq!(
            tree.get_path(&["uiConfig", "notANumber"]).and_then(|v| v.as_str()),
            Some("inf")
        );
    }

    #[test]
    fn test_numeric_literal_forms() {
        assert_eq!(OptionValue::coerce(" 42 "), OptionValue::Integer(42));
        assert_eq!(OptionValue::coerce("-7"), OptionValue::Integer(-7));
        assert_eq!(OptionValue::coerce("1.5"), OptionValue::Float(1.5));
        assert_eq!(OptionValue::coerce("1e3"), OptionValue::Float(1000.0));
        assert_eq!(OptionValue::coerce("0x1F"), OptionValue::Integer(31));
        assert_eq!(OptionValue::coerce(""), OptionValue::String(String::new()));
        assert_eq!(OptionValue::coerce("NaN"), OptionValue::String("NaN".into()));
    }

    #[test]
    fn test_keys_without_prefix_are_ignored() {
        let tree = build(&[("REDIS_HOST", "localhost"), ("PORT", "3000")]);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_empty_input_gives_empty_tree() {
        let tree = build(&[]);
        assert_eq!(tree.to_json(), json!({}));
    }

    #[test]
    fn test_unknown_options_are_accepted() {
        let tree = build(&[
            ("BULL_BOARD_UI_CONFIG__NEW_FEATURE__ENABLED", "true"),
            ("BULL_BOARD_UI_CONFIG__NEW_FEATURE__SETTINGS__DEPTH", "5"),
        ]);

        assert_eq!(
            tree.to_json(),
            json!({ "uiConfig": { "newFeature": { "enabled": true, "settings": { "depth": 5 } } } })
        );
    }

    #[test]
    fn test_last_write_wins() {
        let tree = build(&[
            ("BULL_BOARD_UI_CONFIG__BOARD_TITLE", "first"),
            ("bull_board_ui_config__board_title", "ignored: prefix is case sensitive"),
            ("BULL_BOARD_ui_config__BOARD_TITLE", "second"),
        ]);

        assert_eq!(
            tree.get_path(&["uiConfig", "boardTitle"]).and_then(|v| v.as_str()),
            Some("second")
        );
    }

    #[test]
    fn test_scalar_replaced_by_nested_tree() {
        let tree = build(&[
            ("BULL_BOARD_UI_CONFIG__BOARD_LOGO", "/logo.png"),
            ("BULL_BOARD_UI_CONFIG__BOARD_LOGO__WIDTH", "200"),
        ]);

        assert_eq!(
            tree.to_json(),
            json!({ "uiConfig": { "boardLogo": { "width": 200 } } })
        );
    }

    #[test]
    fn test_leaf_replaces_subtree() {
        let tree = build(&[
            ("BULL_BOARD_UI_CONFIG__BOARD_LOGO__WIDTH", "200"),
            ("BULL_BOARD_UI_CONFIG__BOARD_LOGO", "/logo.png"),
        ]);

        assert_eq!(
            tree.to_json(),
            json!({ "uiConfig": { "boardLogo": "/logo.png" } })
        );
    }

    #[test]
    fn test_empty_segments_are_dropped() {
        let tree = build(&[
            ("BULL_BOARD_", "nothing"),
            ("BULL_BOARD_UI_CONFIG____LOCALE__LNG__", "en"),
        ]);

        assert_eq!(tree.to_json(), json!({ "uiConfig": { "locale": { "lng": "en" } } }));
    }

    #[test]
    fn test_parse_is_idempotent() {
        let entries = [
            ("BULL_BOARD_UI_CONFIG__BOARD_LOGO__PATH", "/logo.png"),
            ("BULL_BOARD_UI_CONFIG__LOCALE__LNG", "en"),
            ("BULL_BOARD_UI_CONFIG__POLLING_INTERVAL__FORCE_INTERVAL", "3000"),
        ];

        assert_eq!(build(&entries), build(&entries));
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("UI_CONFIG"), "uiConfig");
        assert_eq!(camel_case("LNG"), "lng");
        assert_eq!(camel_case("POLLING_INTERVAL"), "pollingInterval");
        assert_eq!(camel_case("_LEADING__DOUBLE_"), "leadingDouble");
    }
}
