//! Decomposition policy
//!
//! All the language-specific data the planner consults: trigger keywords per
//! task category, per-tool keyword tables, extraction patterns, and the order
//! in which next-step rules fire. The planner itself is language-agnostic;
//! adding a locale means adding a [`LocaleKeywords`] table here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Kind of action a task asks for.
///
/// Variant order is the fixed order steps are emitted in a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Read,
    Write,
    Search,
    Execute,
}

impl TaskCategory {
    pub const ALL: [TaskCategory; 4] = [
        TaskCategory::Read,
        TaskCategory::Write,
        TaskCategory::Search,
        TaskCategory::Execute,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Read => "read",
            TaskCategory::Write => "write",
            TaskCategory::Search => "search",
            TaskCategory::Execute => "execute",
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Supported natural languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Ja,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ja => "ja",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(Locale::En),
            "ja" | "japanese" => Ok(Locale::Ja),
            other => Err(format!("Unknown locale: {}", other)),
        }
    }
}

/// Where a trigger's object sits relative to the trigger keyword.
///
/// English puts the object after the verb ("read config.json"); Japanese
/// puts it before ("config.jsonを読んで").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectPosition {
    AfterTrigger,
    BeforeTrigger,
}

/// Regex patterns for pulling parameter values out of task text.
///
/// Each list is tried in order; the first capture group of the first
/// matching pattern wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionPatterns {
    pub path: Vec<String>,
    pub query: Vec<String>,
    pub command: Vec<String>,
}

/// Keyword tables for one locale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleKeywords {
    pub locale: Locale,
    pub object_position: ObjectPosition,
    pub triggers: BTreeMap<TaskCategory, Vec<String>>,
    /// Extra keywords per tool name, on top of the tool's own description
    pub tool_keywords: BTreeMap<String, Vec<String>>,
    pub patterns: ExtractionPatterns,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

const QUOTED_PATH: &str = r#"["'`「]([^"'`「」\s]+)["'`」]"#;
const BARE_PATH: &str =
    r"(?:^|[^A-Za-z0-9_\-./])((?:\.{1,2}/|/)?(?:[A-Za-z0-9_\-.]+/)*[A-Za-z0-9_\-]+\.[A-Za-z0-9]+)";

impl LocaleKeywords {
    pub fn english() -> Self {
        let triggers = BTreeMap::from([
            (
                TaskCategory::Read,
                words(&["read", "reads", "reading", "view", "show", "open", "display", "inspect"]),
            ),
            (
                TaskCategory::Write,
                words(&["write", "writes", "writing", "create", "save", "overwrite"]),
            ),
            (
                TaskCategory::Search,
                words(&["search", "find", "grep", "locate", "look for"]),
            ),
            (
                TaskCategory::Execute,
                words(&["run", "execute", "exec", "launch", "invoke"]),
            ),
        ]);

        let tool_keywords = BTreeMap::from([
            ("read_file".to_string(), words(&["read", "view", "open", "show", "contents"])),
            ("write_file".to_string(), words(&["write", "save", "create"])),
            ("search_files".to_string(), words(&["search", "find", "grep", "pattern"])),
            ("run_command".to_string(), words(&["run", "execute", "command", "shell"])),
            ("echo".to_string(), words(&["echo", "repeat", "say"])),
        ]);

        Self {
            locale: Locale::En,
            object_position: ObjectPosition::AfterTrigger,
            triggers,
            tool_keywords,
            patterns: ExtractionPatterns {
                path: words(&[QUOTED_PATH, BARE_PATH]),
                query: words(&[
                    r#"["'`「]([^"'`「」]+)["'`」]"#,
                    r"^(?:look\s+)?\S+\s+(?:(?:for|all|the|every)\s+)*([^\s,;]+?)[.,;]?(?:\s|$)",
                ]),
                command: words(&[r"`([^`]+)`", r#"["']([^"']+)["']"#, r"^\S+\s+(.+?)\s*$"]),
            },
        }
    }

    pub fn japanese() -> Self {
        let triggers = BTreeMap::from([
            (TaskCategory::Read, words(&["読", "見", "表示", "開"])),
            (TaskCategory::Write, words(&["書", "作成", "保存"])),
            (TaskCategory::Search, words(&["検索", "探", "調べ", "見つけ"])),
            (TaskCategory::Execute, words(&["実行", "起動"])),
        ]);

        let tool_keywords = BTreeMap::from([
            ("read_file".to_string(), words(&["読", "表示", "内容"])),
            ("write_file".to_string(), words(&["書", "保存", "作成"])),
            ("search_files".to_string(), words(&["検索", "探", "調べ", "見つけ"])),
            ("run_command".to_string(), words(&["実行", "コマンド"])),
            ("echo".to_string(), words(&["エコー", "繰り返"])),
        ]);

        Self {
            locale: Locale::Ja,
            object_position: ObjectPosition::BeforeTrigger,
            triggers,
            tool_keywords,
            patterns: ExtractionPatterns {
                path: words(&[QUOTED_PATH, BARE_PATH]),
                query: words(&[r#"["'`「]([^"'`「」]+)["'`」]"#, r"([^\s、。]+?)を\s*$"]),
                command: words(&[r"`([^`]+)`", r"「([^」]+)」", r"([^\s、。]+?)を\s*$"]),
            },
        }
    }

    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::En => Self::english(),
            Locale::Ja => Self::japanese(),
        }
    }

    pub fn triggers_for(&self, category: TaskCategory) -> &[String] {
        self.triggers.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// A next-step rule: suggest the category's tool when the task has that
/// intent, the tool has not run yet, and the prerequisite (if any) succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionRule {
    pub category: TaskCategory,
    pub requires: Option<TaskCategory>,
}

/// Complete, replaceable decomposition policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecompositionPolicy {
    pub locales: Vec<LocaleKeywords>,
    pub category_tools: BTreeMap<TaskCategory, String>,
    /// First rule that fires wins
    pub suggestion_rules: Vec<SuggestionRule>,
}

impl Default for DecompositionPolicy {
    fn default() -> Self {
        Self::for_locales(&[Locale::En, Locale::Ja])
    }
}

impl DecompositionPolicy {
    pub fn for_locales(locales: &[Locale]) -> Self {
        let mut tables: Vec<LocaleKeywords> = Vec::new();
        for locale in locales {
            if !tables.iter().any(|t| t.locale == *locale) {
                tables.push(LocaleKeywords::for_locale(*locale));
            }
        }

        Self {
            locales: tables,
            category_tools: BTreeMap::from([
                (TaskCategory::Read, "read_file".to_string()),
                (TaskCategory::Write, "write_file".to_string()),
                (TaskCategory::Search, "search_files".to_string()),
                (TaskCategory::Execute, "run_command".to_string()),
            ]),
            suggestion_rules: vec![
                SuggestionRule {
                    category: TaskCategory::Read,
                    requires: None,
                },
                SuggestionRule {
                    category: TaskCategory::Search,
                    requires: None,
                },
                SuggestionRule {
                    category: TaskCategory::Write,
                    requires: Some(TaskCategory::Read),
                },
            ],
        }
    }

    pub fn tool_for(&self, category: TaskCategory) -> Option<&str> {
        self.category_tools.get(&category).map(String::as_str)
    }

    pub fn category_of(&self, tool: &str) -> Option<TaskCategory> {
        self.category_tools
            .iter()
            .find(|(_, name)| name.as_str() == tool)
            .map(|(category, _)| *category)
    }

    /// Static keywords for a tool across all configured locales
    pub fn tool_keywords<'a>(&'a self, tool: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.locales
            .iter()
            .filter_map(move |l| l.tool_keywords.get(tool))
            .flatten()
            .map(String::as_str)
    }

    pub fn locale(&self, locale: Locale) -> Option<&LocaleKeywords> {
        self.locales.iter().find(|l| l.locale == locale)
    }
}

/// Find the first occurrence of `keyword` in `text`.
///
/// ASCII keywords match case-insensitively on word boundaries; anything
/// else matches as a plain substring. Returns the byte range in `text`.
pub fn find_keyword(text: &str, keyword: &str) -> Option<(usize, usize)> {
    find_keyword_from(text, keyword, 0)
}

/// Like [`find_keyword`], but only reports matches starting at or after
/// byte `from`. Word boundaries are still judged against the full text.
pub fn find_keyword_from(text: &str, keyword: &str, from: usize) -> Option<(usize, usize)> {
    if keyword.is_empty() || from > text.len() {
        return None;
    }
    let mut from = from;
    while !text.is_char_boundary(from) {
        from += 1;
    }

    if !keyword.is_ascii() {
        return text[from..]
            .find(keyword)
            .map(|offset| (from + offset, from + offset + keyword.len()));
    }

    // ASCII lowercasing keeps byte offsets stable
    let haystack = text.to_ascii_lowercase();
    let needle = keyword.to_ascii_lowercase();
    let bytes = haystack.as_bytes();

    while let Some(offset) = haystack[from..].find(&needle) {
        let start = from + offset;
        let end = start + needle.len();
        let before_ok = start == 0 || !is_word_byte(bytes[start - 1]);
        let after_ok = end == bytes.len() || !is_word_byte(bytes[end]);
        if before_ok && after_ok {
            return Some((start, end));
        }
        from = start + 1;
        while !haystack.is_char_boundary(from) {
            from += 1;
        }
    }
    None
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_keyword_word_boundary() {
        assert_eq!(find_keyword("Read config.json", "read"), Some((0, 4)));
        assert_eq!(find_keyword("thread safety", "read"), None);
        assert_eq!(find_keyword("please rerun it, then run", "run"), Some((22, 25)));
        assert_eq!(find_keyword("look for TODO", "look for"), Some((0, 8)));
    }

    #[test]
    fn test_find_keyword_from_offset() {
        assert_eq!(find_keyword_from("read it, then read more", "read", 1), Some((14, 18)));
        // Mid-word offsets do not create a boundary
        assert_eq!(find_keyword_from("thread", "read", 2), None);
        let text = "見て、見つけて";
        let (start, _) = find_keyword_from(text, "見", 1).unwrap();
        assert_eq!(&text[start..], "見つけて");
        assert_eq!(find_keyword_from("abc", "a", 10), None);
    }

    #[test]
    fn test_find_keyword_non_ascii_substring() {
        let text = "config.jsonを読んで";
        let (start, end) = find_keyword(text, "読").unwrap();
        assert_eq!(&text[start..end], "読");
        assert!(find_keyword(text, "書").is_none());
    }

    #[test]
    fn test_find_keyword_after_multibyte_prefix() {
        let text = "「a」 read it";
        let (start, _) = find_keyword(text, "read").unwrap();
        assert_eq!(&text[start..start + 4], "read");
    }

    #[test]
    fn test_category_order() {
        let mut categories = TaskCategory::ALL.to_vec();
        categories.reverse();
        categories.sort();
        assert_eq!(categories, TaskCategory::ALL.to_vec());
    }

    #[test]
    fn test_locale_from_str() {
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!("japanese".parse::<Locale>().unwrap(), Locale::Ja);
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn test_default_policy() {
        let policy = DecompositionPolicy::default();
        assert_eq!(policy.locales.len(), 2);
        assert_eq!(policy.tool_for(TaskCategory::Search), Some("search_files"));
        assert_eq!(policy.category_of("write_file"), Some(TaskCategory::Write));
        assert!(policy.tool_keywords("read_file").any(|k| k == "読"));
        assert_eq!(policy.suggestion_rules[2].requires, Some(TaskCategory::Read));
    }

    #[test]
    fn test_for_locales_dedupes() {
        let policy = DecompositionPolicy::for_locales(&[Locale::En, Locale::En]);
        assert_eq!(policy.locales.len(), 1);
        assert!(policy.locale(Locale::Ja).is_none());
    }
}
