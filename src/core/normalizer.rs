use std::collections::BTreeMap;

/// Static, read-only mapping from colloquial token to canonical disease
/// terms. Built once at startup and shared by reference across requests.
///
/// BTreeMap keeps iteration deterministic, so the same query always expands
/// to the same token sequence.
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    entries: BTreeMap<String, String>,
}

impl SynonymTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table seeded with the colloquialisms users actually type.
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for (key, canonical) in [
            ("结节", "甲状腺结节 肺结节"),
            ("甲状腺", "甲状腺结节"),
            ("肺部阴影", "肺结节"),
            ("乙肝", "乙肝 肝炎"),
            ("大三阳", "乙肝"),
            ("小三阳", "乙肝"),
            ("血糖高", "糖尿病"),
            ("血压高", "高血压"),
            ("乳腺", "乳腺结节 乳腺增生"),
            ("nodule", "thyroid-nodule lung-nodule"),
            ("thyroid", "thyroid-nodule"),
            ("sugar", "diabetes"),
            ("hepatitis", "hepatitis-b"),
        ] {
            table.insert(key, canonical);
        }
        table
    }

    /// Insert a mapping; keys are stored lower-cased to match the
    /// lower-cased query.
    pub fn insert(&mut self, key: &str, canonical: &str) {
        self.entries
            .insert(key.trim().to_lowercase(), canonical.trim().to_string());
    }

    /// Merge extra mappings (e.g. from the `[synonyms]` config section) over
    /// the existing ones.
    pub fn extend<'a, I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (key, canonical) in pairs {
            self.insert(key, canonical);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A query after synonym expansion and tokenization.
#[derive(Debug, Clone)]
pub struct NormalizedQuery {
    pub original: String,
    pub expanded: String,
    /// Split on whitespace / comma / plus runs. The first token is the
    /// primary token used for broad repository retrieval.
    pub tokens: Vec<String>,
}

impl NormalizedQuery {
    pub fn primary_token(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }
}

/// Expand a raw query against the synonym table.
///
/// The query is lower-cased; every table key contained in it as a substring
/// appends its canonical value to the expanded query. Duplicates are not
/// removed — downstream matching uses substring containment, so repeats are
/// harmless. An empty or whitespace-only query yields an empty token list,
/// which the orchestrator treats as a terminal empty result.
pub fn normalize(query: &str, table: &SynonymTable) -> NormalizedQuery {
    let original = query.trim().to_string();
    let lowered = original.to_lowercase();
    let mut expanded = lowered.clone();

    // Keys are matched against the query itself, not the growing expansion,
    // so canonical terms never trigger further expansion.
    for (key, canonical) in table.iter() {
        if lowered.contains(key) {
            expanded.push(' ');
            expanded.push_str(canonical);
        }
    }

    let tokens: Vec<String> = expanded
        .split(|c: char| c.is_whitespace() || c == ',' || c == '，' || c == '+')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    NormalizedQuery {
        original,
        expanded,
        tokens,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SynonymTable {
        let mut t = SynonymTable::new();
        t.insert("nodule", "thyroid-nodule lung-nodule");
        t.insert("sugar", "diabetes");
        t
    }

    #[test]
    fn test_primary_token_is_first_word_of_query() {
        let n = normalize("thyroid nodule 3mm", &table());
        assert_eq!(n.primary_token(), Some("thyroid"));
    }

    #[test]
    fn test_expansion_appends_canonical_terms() {
        let n = normalize("lung nodule", &table());
        assert!(n.tokens.contains(&"thyroid-nodule".to_string()));
        assert!(n.tokens.contains(&"lung-nodule".to_string()));
    }

    #[test]
    fn test_no_expansion_without_key_match() {
        let n = normalize("hypertension", &table());
        assert_eq!(n.tokens, vec!["hypertension".to_string()]);
    }

    #[test]
    fn test_empty_query_yields_no_tokens() {
        let n = normalize("   ", &table());
        assert!(n.tokens.is_empty());
        assert!(n.primary_token().is_none());
    }

    #[test]
    fn test_tokenizes_on_comma_and_plus() {
        let n = normalize("sugar,high+bp", &table());
        assert!(n.tokens.contains(&"sugar".to_string()));
        assert!(n.tokens.contains(&"high".to_string()));
        assert!(n.tokens.contains(&"bp".to_string()));
        // "sugar" key matched, so its canonical term was appended
        assert!(n.tokens.contains(&"diabetes".to_string()));
    }

    #[test]
    fn test_normalization_idempotent() {
        // Re-normalizing the expanded query never loses tokens.
        let first = normalize("lung nodule", &table());
        let second = normalize(&first.expanded, &table());
        for token in &first.tokens {
            assert!(
                second.tokens.contains(token),
                "token {} lost on re-normalization",
                token
            );
        }
    }

    #[test]
    fn test_builtin_table_matches_chinese_colloquialisms() {
        let builtin = SynonymTable::builtin();
        let n = normalize("体检查出结节", &builtin);
        assert!(n.tokens.contains(&"甲状腺结节".to_string()));
        assert!(n.tokens.contains(&"肺结节".to_string()));
    }
}
