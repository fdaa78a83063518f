//! Rewrite rule table - Fluent Assertions to xUnit.
//!
//! A rule is a regex plus a replacement template. A [`RuleSet`] applies its
//! rules strictly in order, each one rewriting the whole text produced by the
//! previous rule. Specific rules must therefore come before general ones that
//! would otherwise consume their matches (`foo.Id` + `NotBeEmpty` before the
//! plain `NotBeEmpty`).
//!
//! Matchers that no rule recognises pass through untouched.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::diff::generate_unified_diff;
use crate::error::MigrateError;
use crate::types::{MigrationResult, RuleHit};

/// Prefix every fluent pattern shares: the subject expression (group 1)
/// followed by `.Should().`.
macro_rules! fluent {
    ($tail:literal) => {
        fluent!("", $tail)
    };
    ($prefix:literal, $tail:literal) => {
        concat!($prefix, r"([\w\.\(\)\?]+)\.Should\(\)\.", $tail)
    };
}

/// Built-in catalogue: `(name, pattern, replacement)` in application order.
const BUILTIN_RULES: &[(&str, &str, &str)] = &[
    ("Be", fluent!(r"Be\((.*?)\);"), "Assert.Equal(${2}, ${1});"),
    ("BeTrue", fluent!(r"BeTrue\(\);"), "Assert.True(${1});"),
    ("BeFalse", fluent!(r"BeFalse\(\);"), "Assert.False(${1});"),
    ("BeNull", fluent!(r"BeNull\(\);"), "Assert.Null(${1});"),
    ("NotBeNull", fluent!(r"NotBeNull\(\);"), "Assert.NotNull(${1});"),
    (
        "NotBeEmptyId",
        r"([\w\.]+\.Id)\.Should\(\)\.NotBeEmpty\(\);",
        "Assert.NotEqual(Guid.Empty, ${1});",
    ),
    ("NotBeEmpty", fluent!(r"NotBeEmpty\(\);"), "Assert.NotEmpty(${1});"),
    ("Contain", fluent!(r"Contain\((.*?)\);"), "Assert.Contains(${2}, ${1});"),
    (
        "NotContain",
        fluent!(r"NotContain\((.*?)\);"),
        "Assert.DoesNotContain(${2}, ${1});",
    ),
    ("Throw", fluent!(r"Throw<(.+?)>\(\);"), "Assert.Throws<${2}>(() => ${1});"),
    ("StartWith", fluent!(r"StartWith\((.*?)\);"), "Assert.StartsWith(${2}, ${1});"),
    ("EndWith", fluent!(r"EndWith\((.*?)\);"), "Assert.EndsWith(${2}, ${1});"),
    (
        "Be200Ok",
        fluent!(r"Be200Ok\(\);"),
        "Assert.Equal(HttpStatusCode.OK, ${1}.StatusCode);",
    ),
    (
        "Be400BadRequest",
        fluent!(r"Be400BadRequest\(\);"),
        "Assert.Equal(HttpStatusCode.BadRequest, ${1}.StatusCode);",
    ),
    (
        "Be201Created",
        fluent!(r"Be201Created\(\);"),
        "Assert.Equal(HttpStatusCode.Created, ${1}.StatusCode);",
    ),
    (
        "Be500InternalServerError",
        fluent!(r"Be500InternalServerError\(\);"),
        "Assert.Equal(HttpStatusCode.InternalServerError, ${1}.StatusCode);",
    ),
    (
        "Be401Unauthorized",
        fluent!(r"Be401Unauthorized\(\);"),
        "Assert.Equal(HttpStatusCode.Unauthorized, ${1}.StatusCode);",
    ),
    (
        "Be403Forbidden",
        fluent!(r"Be403Forbidden\(\);"),
        "Assert.Equal(HttpStatusCode.Forbidden, ${1}.StatusCode);",
    ),
    (
        "Be404NotFound",
        fluent!(r"Be404NotFound\(\);"),
        "Assert.Equal(HttpStatusCode.NotFound, ${1}.StatusCode);",
    ),
    (
        "SatisfyRespectively",
        fluent!(r"SatisfyRespectively\((.*?)\);"),
        "Assert.Collection(${1}, ${2});",
    ),
    (
        "BeGreaterThanOrEqualTo",
        fluent!(r"BeGreaterThanOrEqualTo\((.*?)\);"),
        "Assert.True(${1} >= ${2});",
    ),
    ("BeEquivalentTo", fluent!(r"BeEquivalentTo\((.*?)\);"), "Assert.Equal(${2}, ${1});"),
    // The chain may break before `.WithMessage`; a leading `await` belongs to
    // the rewritten statement, not to the subject.
    (
        "ThrowAsyncWithMessage",
        fluent!(
            r"(?:await\s+)?",
            r"ThrowAsync<(.+?)>\(\)\s*\.WithMessage\((.*?)\);"
        ),
        "var exception = await Assert.ThrowsAsync<${2}>(${1});\nAssert.Equal(${3}, exception.Message);",
    ),
    (
        "BeNullOrEmpty",
        fluent!(r"BeNullOrEmpty\(\);"),
        "Assert.True(${1} == null || !${1}.Any());",
    ),
];

static BUILTIN: LazyLock<RuleSet> = LazyLock::new(|| {
    RuleSet::new(
        BUILTIN_RULES
            .iter()
            .map(|&(name, pattern, replacement)| {
                Rule::new(name, pattern, replacement)
                    .unwrap_or_else(|err| panic!("invalid built-in rule {name}: {err}"))
            })
            .collect(),
    )
});

/// `$$` escapes, `${name}` and `$name` references in a replacement template.
static GROUP_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\$|\$\{([^}]*)\}|\$([0-9A-Za-z_]+)")
        .unwrap_or_else(|err| panic!("invalid GROUP_REF regex: {err}"))
});

/// A single rewrite rule.
#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    regex: Regex,
    replacement: String,
}

impl Rule {
    /// Compile a rule.
    ///
    /// The replacement uses `regex` template syntax (`$1`, `${1}`, `${name}`,
    /// `$$` for a literal dollar). Every capture group of the pattern must be
    /// referenced by the template and every reference must name an existing
    /// group.
    ///
    /// # Errors
    /// - `MigrateError::Pattern` when the regex does not compile.
    /// - `MigrateError::Template` when template and groups disagree.
    pub fn new(
        name: impl Into<String>,
        pattern: &str,
        replacement: impl Into<String>,
    ) -> Result<Self, MigrateError> {
        let name = name.into();
        let replacement = replacement.into();
        let regex = Regex::new(pattern)
            .map_err(|err| MigrateError::Pattern(format!("rule '{name}': {err}")))?;

        check_template(&name, &regex, &replacement)?;

        Ok(Self {
            name,
            regex,
            replacement,
        })
    }

    /// Rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source of the compiled pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Replacement template.
    #[must_use]
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Replace every match in `text`, returning the new text and match count.
    ///
    /// Text without a match comes back borrowed. Line breaks written by a
    /// multi-line template follow `text`: CRLF when `text` contains any.
    #[must_use]
    pub fn apply<'t>(&self, text: &'t str) -> (Cow<'t, str>, usize) {
        let crlf = text.contains("\r\n");
        let mut count = 0;
        let rewritten = self.regex.replace_all(text, |caps: &Captures<'_>| {
            count += 1;
            let mut expanded = String::new();
            caps.expand(&self.replacement, &mut expanded);
            if crlf && self.replacement.contains('\n') {
                expanded = to_crlf(&expanded);
            }
            expanded
        });
        (rewritten, count)
    }
}

/// Normalize bare `\n` to `\r\n`, leaving existing CRLF pairs alone.
fn to_crlf(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut prev = None;
    for ch in text.chars() {
        if ch == '\n' && prev != Some('\r') {
            out.push('\r');
        }
        out.push(ch);
        prev = Some(ch);
    }
    out
}

fn check_template(name: &str, regex: &Regex, replacement: &str) -> Result<(), MigrateError> {
    let invalid = |detail: String| MigrateError::Template {
        rule: name.to_string(),
        detail,
    };

    let mut referenced = BTreeSet::new();
    for caps in GROUP_REF.captures_iter(replacement) {
        let Some(group) = caps.get(1).or_else(|| caps.get(2)) else {
            continue;
        };
        let group = group.as_str();
        let index = match group.parse::<usize>() {
            Ok(index) if index < regex.captures_len() => index,
            Ok(_) => return Err(invalid(format!("unknown capture group '{group}'"))),
            Err(_) => regex
                .capture_names()
                .position(|candidate| candidate == Some(group))
                .ok_or_else(|| invalid(format!("unknown capture group '{group}'")))?,
        };
        referenced.insert(index);
    }

    match (1..regex.captures_len()).find(|index| !referenced.contains(index)) {
        Some(unused) => Err(invalid(format!("capture group {unused} is never referenced"))),
        None => Ok(()),
    }
}

/// Ordered collection of rules.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Build a rule set from rules in application order.
    #[must_use]
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The built-in Fluent Assertions to xUnit catalogue.
    #[must_use]
    pub fn builtin() -> &'static RuleSet {
        &BUILTIN
    }

    /// Built-in rules followed by `extra`.
    ///
    /// Extra rules run last, so they never shadow a built-in rewrite.
    #[must_use]
    pub fn with_rules(extra: Vec<Rule>) -> Self {
        let mut set = BUILTIN.clone();
        set.rules.extend(extra);
        set
    }

    /// Append a rule at the end of the chain.
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in application order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Run every rule over `text` in order.
    #[must_use]
    pub fn apply(&self, text: &str) -> MigrationResult {
        self.apply_labelled(text, "source")
    }

    /// Like [`RuleSet::apply`], naming the diff header after `label`.
    pub(crate) fn apply_labelled(&self, text: &str, label: &str) -> MigrationResult {
        let mut current = text.to_string();
        let mut hits = Vec::new();

        for rule in &self.rules {
            let (rewritten, count) = rule.apply(&current);
            if count == 0 {
                continue;
            }
            debug!(rule = rule.name(), count, "rule matched");
            current = rewritten.into_owned();
            hits.push(RuleHit {
                rule: rule.name.clone(),
                count,
            });
        }

        let diff = generate_unified_diff(text, &current, label);

        MigrationResult {
            original: text.to_string(),
            count: hits.iter().map(|hit| hit.count).sum(),
            modified: current,
            diff,
            hits,
        }
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn migrate(text: &str) -> String {
        RuleSet::builtin().apply(text).modified
    }

    #[test]
    fn test_builtin_rules_compile() {
        assert_eq!(RuleSet::builtin().len(), BUILTIN_RULES.len());
    }

    #[test]
    fn test_builtin_names_unique() {
        let names: BTreeSet<_> = RuleSet::builtin().iter().map(Rule::name).collect();
        assert_eq!(names.len(), BUILTIN_RULES.len());
    }

    #[test]
    fn test_id_rule_precedes_generic_not_empty() {
        let names: Vec<_> = RuleSet::builtin().iter().map(Rule::name).collect();
        let specific = names.iter().position(|n| *n == "NotBeEmptyId");
        let generic = names.iter().position(|n| *n == "NotBeEmpty");
        assert!(specific < generic);
        assert_eq!(
            migrate("order.Id.Should().NotBeEmpty();"),
            "Assert.NotEqual(Guid.Empty, order.Id);"
        );
    }

    #[test]
    fn test_lazy_argument_does_not_merge_statements() {
        assert_eq!(
            migrate("a.Should().Be(1); b.Should().Be(2);"),
            "Assert.Equal(1, a); Assert.Equal(2, b);"
        );
    }

    #[test]
    fn test_apply_counts_matches() {
        let rule = Rule::new("BeTrue", fluent!(r"BeTrue\(\);"), "Assert.True(${1});").unwrap();
        let (text, count) = rule.apply("a.Should().BeTrue();\nb.Should().BeTrue();\n");
        assert_eq!(count, 2);
        assert_eq!(text, "Assert.True(a);\nAssert.True(b);\n");
    }

    #[test]
    fn test_apply_without_match_borrows() {
        let rule = Rule::new("BeTrue", fluent!(r"BeTrue\(\);"), "Assert.True(${1});").unwrap();
        let (text, count) = rule.apply("Assert.True(a);");
        assert_eq!(count, 0);
        assert!(matches!(text, Cow::Borrowed(_)));
    }

    #[test]
    fn test_to_crlf_keeps_existing_pairs() {
        assert_eq!(to_crlf("a\nb\r\nc"), "a\r\nb\r\nc");
        assert_eq!(to_crlf("no breaks"), "no breaks");
    }

    #[test]
    fn test_template_unknown_group_rejected() {
        let result = Rule::new("bad", r"(\w+)\.Should\(\)\.Pass\(\);", "Assert.True(${2});");
        assert!(matches!(
            result,
            Err(MigrateError::Template { ref detail, .. }) if detail.contains("'2'")
        ));
    }

    #[test]
    fn test_template_unused_group_rejected() {
        let result = Rule::new("bad", r"(\w+)\.Should\(\)\.Be\((.*?)\);", "Assert.True(${1});");
        assert!(matches!(result, Err(MigrateError::Template { .. })));
    }

    #[test]
    fn test_template_named_groups_and_escape() {
        let rule = Rule::new(
            "named",
            r"(?P<subject>\w+)\.Should\(\)\.Cost\((?P<amount>\d+)\);",
            "Assert.Equal(\"$$${amount}\", ${subject}.Price);",
        )
        .unwrap();
        let (text, _) = rule.apply("item.Should().Cost(5);");
        assert_eq!(text, "Assert.Equal(\"$5\", item.Price);");
    }

    #[test]
    fn test_bare_dollar_name_is_one_reference() {
        // `$1a` names the group "1a", not group 1 followed by "a".
        let result = Rule::new("bad", r"(\w+)\.Should\(\)\.Ok\(\);", "Assert.True($1a);");
        assert!(matches!(result, Err(MigrateError::Template { .. })));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let result = Rule::new("bad", r"(\w+", "${1}");
        assert!(matches!(result, Err(MigrateError::Pattern(_))));
    }

    #[test]
    fn test_with_rules_appends_after_builtin() {
        let extra = Rule::new(
            "BeLessThan",
            fluent!(r"BeLessThan\((.*?)\);"),
            "Assert.True(${1} < ${2});",
        )
        .unwrap();
        let set = RuleSet::with_rules(vec![extra]);
        assert_eq!(set.len(), BUILTIN_RULES.len() + 1);
        assert_eq!(set.iter().last().map(Rule::name), Some("BeLessThan"));
    }
}
