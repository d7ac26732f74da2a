use std::sync::LazyLock;

use regex::Regex;

static SINGULAR_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)(ss)$", "$1"),
        (r"(?i)(x|ch|ss|sh)es$", "$1"),
        (r"(?i)([^aeiouy]|qu)ies$", "${1}y"),
        (r"(?i)(octop|vir)i$", "${1}us"),
        (r"(?i)(alias|status)(es)?$", "$1"),
        (r"(?i)([lr])ves$", "${1}f"),
        (r"(?i)(m)en$", "${1}an"),
        (r"(?i)(p)eople$", "${1}erson"),
        (r"(?i)s$", ""),
    ]
    .into_iter()
    .filter_map(|(pattern, replacement)| Some((Regex::new(pattern).ok()?, replacement)))
    .collect()
});

/// `first_name` becomes `First name`; a trailing `_id` is dropped.
pub(crate) fn humanize(word: &str) -> String {
    let word = word.strip_suffix("_id").unwrap_or(word);
    let spaced = word.replace('_', " ");
    let trimmed = spaced.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// English singular of a plural noun, using the first matching rule.
pub(crate) fn singularize(word: &str) -> String {
    for (rule, replacement) in SINGULAR_RULES.iter() {
        if rule.is_match(word) {
            return rule.replace(word, *replacement).into_owned();
        }
    }
    word.to_string()
}

/// `BlogPost` becomes `blog_post`; dashes become underscores.
pub(crate) fn underscore(word: &str) -> String {
    let mut out = String::with_capacity(word.len() + 4);
    let mut previous: Option<char> = None;
    for c in word.chars() {
        if c.is_uppercase() && previous.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
            out.push('_');
        }
        out.extend(c.to_lowercase());
        previous = Some(c);
    }
    out.replace('-', "_")
}
