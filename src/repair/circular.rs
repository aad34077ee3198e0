//! Circular static initializer repair
//!
//! Generated theme classes often declare a static value whose initializer reads
//! properties of the value being declared, e.g.
//! `static final ColorScheme scheme = ColorScheme(primary: scheme.primary, ...)`.
//! [`CircularReferenceRule`] hoists the color literals of such a declaration into
//! seed constants declared just above it and points the self-references at them.
//! [`SeedReferenceRule`] then rewrites the remaining references to the repaired
//! value elsewhere in the file.

use super::rule::FixRule;
use super::scan::{matching_close, statement_end};
use regex::Regex;
use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::OnceLock;

/// Seed used when a circular declaration carries no color literal of its own
const DEFAULT_SEED_COLOR: &str = "0xFF2196F3";

fn declaration_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^([ \t]*)static\s+(?:final|const)\s+(?:[\w<>?]+\s+)?(\w+)\s*=\s*")
            .expect("Invalid declaration regex")
    })
}

fn color_literal_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\w+)\s*:\s*((?:const\s+)?Color\((0[xX][0-9a-fA-F]{8})\))")
            .expect("Invalid color literal regex")
    })
}

fn class_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bclass\s+(\w+)[^{;]*\{").expect("Invalid class regex"))
}

/// Name of the innermost class whose body contains `offset`
fn enclosing_class(content: &str, offset: usize) -> Option<String> {
    class_regex()
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let open = whole.end() - 1;
            let close = matching_close(content, open)?;
            (open < offset && offset < close).then(|| (open, caps[1].to_string()))
        })
        .max_by_key(|(open, _)| *open)
        .map(|(_, name)| name)
}

fn seed_declaration_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"static\s+const\s+Color\s+(\w+Seed)\s*=").expect("Invalid seed regex")
    })
}

#[derive(Debug, Clone, PartialEq)]
struct Seed {
    /// Property the literal was assigned to; empty for the default seed
    property: String,
    name: String,
    value: String,
}

impl Seed {
    fn new(base: &str, property: &str, value: &str) -> Self {
        Self {
            property: property.to_string(),
            name: format!("{}{}Seed", base, capitalize(property)),
            value: value.to_string(),
        }
    }

    fn matches(&self, segment: &str) -> bool {
        !self.property.is_empty()
            && (self.property == segment
                || self.property == format!("{}Color", segment)
                || segment == format!("{}Color", self.property))
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn decapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A `name.a.b` or `Class.name.a.b` property access
#[derive(Debug)]
struct ChainRef {
    start: usize,
    prefix: String,
    /// Segment names with the end offset of each
    segments: Vec<(String, usize)>,
}

/// Accesses of `name` itself, or of `Owner.name` where `Owner` is the class
/// declaring it. Members of the same name on other receivers are skipped.
fn chain_references(text: &str, name: &str, owner: Option<&str>) -> Vec<ChainRef> {
    let pattern = format!(r"(\b\w+\.)?\b{}((?:\.\w+)+)", regex::escape(name));
    let Ok(re) = Regex::new(&pattern) else {
        return Vec::new();
    };

    let mut refs = Vec::new();
    for caps in re.captures_iter(text) {
        let (Some(whole), Some(chain)) = (caps.get(0), caps.get(2)) else {
            continue;
        };

        let prefix = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let foreign_prefix = !prefix.is_empty() && owner != Some(prefix.trim_end_matches('.'));
        if foreign_prefix || text[..whole.start()].ends_with('.') {
            continue;
        }

        let mut segments = Vec::new();
        let mut offset = chain.start();
        for part in chain.as_str().split('.').skip(1) {
            offset += 1 + part.len();
            segments.push((part.to_string(), offset));
        }

        // A trailing method call stays on whatever the chain resolves to
        if text[chain.end()..].trim_start().starts_with('(') {
            segments.pop();
        }
        if segments.is_empty() {
            continue;
        }

        refs.push(ChainRef {
            start: whole.start(),
            prefix: prefix.to_string(),
            segments,
        });
    }
    refs
}

/// Picks the seed for a chain: the first segment naming a seeded property, else
/// the first seed. Returns the end offset of the consumed chain and the seed name.
fn resolve<'a>(seeds: &'a [Seed], chain: &ChainRef) -> Option<(usize, &'a str)> {
    for (segment, end) in &chain.segments {
        if let Some(seed) = seeds.iter().find(|s| s.matches(segment)) {
            return Some((*end, &seed.name));
        }
    }
    let (_, end) = chain.segments.last()?;
    seeds.first().map(|seed| (*end, seed.name.as_str()))
}

fn chain_edits(
    text: &str,
    name: &str,
    owner: Option<&str>,
    seeds: &[Seed],
) -> Vec<(Range<usize>, String)> {
    chain_references(text, name, owner)
        .into_iter()
        .filter_map(|chain| {
            let (end, seed) = resolve(seeds, &chain)?;
            Some((chain.start..end, format!("{}{}", chain.prefix, seed)))
        })
        .collect()
}

/// Applies non-overlapping edits, last first so earlier ranges stay valid
fn apply_edits(text: &str, mut edits: Vec<(Range<usize>, String)>) -> String {
    edits.sort_by(|a, b| b.0.start.cmp(&a.0.start));
    let mut out = text.to_string();
    let mut floor = usize::MAX;
    for (range, replacement) in edits {
        if range.end > floor {
            continue;
        }
        out.replace_range(range.clone(), &replacement);
        floor = range.start;
    }
    out
}

fn is_bare_reference(initializer: &str, name: &str, owner: Option<&str>) -> bool {
    initializer == name
        || initializer
            .rsplit_once('.')
            .is_some_and(|(class, field)| field == name && owner == Some(class))
}

#[derive(Debug)]
struct Declaration {
    start: usize,
    initializer: Range<usize>,
    indent: String,
    name: String,
}

fn declarations(content: &str) -> Vec<Declaration> {
    declaration_regex()
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let end = statement_end(content, whole.end())?;
            Some(Declaration {
                start: whole.start(),
                initializer: whole.end()..end,
                indent: caps[1].to_string(),
                name: caps[2].to_string(),
            })
        })
        .collect()
}

/// Replaces a self-referencing declaration with seed constants plus the original
/// declaration rewritten to use them. `None` when the declaration is not circular.
fn repair_declaration(content: &str, decl: &Declaration) -> Option<String> {
    let body = &content[decl.initializer.clone()];
    let owner = enclosing_class(content, decl.start);
    let owner = owner.as_deref();
    let self_refs = chain_references(body, &decl.name, owner);
    let bare = is_bare_reference(body.trim(), &decl.name, owner);
    if self_refs.is_empty() && !bare {
        return None;
    }

    let mut seeds: Vec<Seed> = Vec::new();
    let mut edits = Vec::new();
    for caps in color_literal_regex().captures_iter(body) {
        let Some(literal) = caps.get(2) else {
            continue;
        };
        let property = &caps[1];
        let seed = match seeds.iter().find(|s| s.property == property) {
            Some(existing) => existing.clone(),
            None => {
                let seed = Seed::new(&decl.name, property, &caps[3]);
                seeds.push(seed.clone());
                seed
            }
        };
        edits.push((literal.range(), seed.name));
    }
    if seeds.is_empty() {
        seeds.push(Seed::new(&decl.name, "", DEFAULT_SEED_COLOR));
    }

    edits.extend(chain_edits(body, &decl.name, owner, &seeds));
    if bare {
        let leading = body.len() - body.trim_start().len();
        let trimmed = body.trim();
        edits.push((leading..leading + trimmed.len(), seeds[0].name.clone()));
    }
    let new_body = apply_edits(body, edits);

    let mut seed_lines = String::new();
    for seed in &seeds {
        if seed_declaration_regex()
            .captures_iter(content)
            .any(|caps| caps[1] == seed.name)
        {
            continue;
        }
        seed_lines.push_str(&format!(
            "{}static const Color {} = Color({});\n",
            decl.indent, seed.name, seed.value
        ));
    }

    let mut out = String::with_capacity(content.len() + seed_lines.len());
    out.push_str(&content[..decl.start]);
    out.push_str(&seed_lines);
    out.push_str(&content[decl.start..decl.initializer.start]);
    out.push_str(&new_body);
    out.push_str(&content[decl.initializer.end..]);
    Some(out)
}

/// Breaks static declarations whose initializer reads the value being declared
pub struct CircularReferenceRule;

impl FixRule for CircularReferenceRule {
    fn name(&self) -> &'static str {
        "circular_reference"
    }

    fn apply(&self, content: &str, _path: &str) -> String {
        let mut out = content.to_string();
        for decl in declarations(content).iter().rev() {
            if let Some(repaired) = repair_declaration(&out, decl) {
                out = repaired;
            }
        }
        out
    }
}

/// Points leftover `name.prop` accesses of a repaired declaration at its seeds
///
/// Only fires when seed constants are present, i.e. after
/// [`CircularReferenceRule`] has rewritten a declaration in this file.
pub struct SeedReferenceRule;

/// Seeds introduced for one repaired declaration
#[derive(Debug, Default)]
struct SeedGroup {
    owner: Option<String>,
    seeds: Vec<Seed>,
}

impl SeedReferenceRule {
    /// Groups declared seeds under the longest declaration name prefixing them
    fn seeds_by_base(content: &str) -> BTreeMap<String, SeedGroup> {
        let seed_names: Vec<String> = seed_declaration_regex()
            .captures_iter(content)
            .map(|caps| caps[1].to_string())
            .collect();
        let bases: Vec<(String, usize)> = declaration_regex()
            .captures_iter(content)
            .filter_map(|caps| Some((caps[2].to_string(), caps.get(0)?.start())))
            .filter(|(name, _)| !name.ends_with("Seed"))
            .collect();

        let mut grouped: BTreeMap<String, SeedGroup> = BTreeMap::new();
        for seed_name in seed_names {
            let Some((base, middle, start)) = bases
                .iter()
                .filter_map(|(base, start)| {
                    let middle = seed_name.strip_prefix(base.as_str())?.strip_suffix("Seed")?;
                    Some((base, middle, *start))
                })
                .max_by_key(|(base, _, _)| base.len())
            else {
                continue;
            };
            let group = grouped.entry(base.clone()).or_insert_with(|| SeedGroup {
                owner: enclosing_class(content, start),
                seeds: Vec::new(),
            });
            group.seeds.push(Seed {
                property: decapitalize(middle),
                name: seed_name.clone(),
                value: String::new(),
            });
        }
        grouped
    }
}

impl FixRule for SeedReferenceRule {
    fn name(&self) -> &'static str {
        "seed_reference"
    }

    fn apply(&self, content: &str, _path: &str) -> String {
        let mut out = content.to_string();
        for (base, group) in Self::seeds_by_base(content) {
            let edits = chain_edits(&out, &base, group.owner.as_deref(), &group.seeds);
            if !edits.is_empty() {
                out = apply_edits(&out, edits);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CIRCULAR_THEME: &str = r#"class AppTheme {
  static final ColorScheme lightScheme = ColorScheme.fromSeed(
    seedColor: lightScheme.primary,
    primary: const Color(0xFF6200EE),
    secondary: Color(0xFF03DAC6),
  );

  static ThemeData get theme => ThemeData(
        colorScheme: lightScheme,
        appBarTheme: AppBarTheme(backgroundColor: AppTheme.lightScheme.secondary),
      );
}
"#;

    #[test]
    fn test_hoists_literals_into_seeds() {
        let out = CircularReferenceRule.apply(CIRCULAR_THEME, "lib/theme/app_theme.dart");
        assert!(out.contains("  static const Color lightSchemePrimarySeed = Color(0xFF6200EE);\n"));
        assert!(out.contains("  static const Color lightSchemeSecondarySeed = Color(0xFF03DAC6);\n"));
        assert!(out.contains("seedColor: lightSchemePrimarySeed,"));
        assert!(out.contains("primary: lightSchemePrimarySeed,"));
        assert!(out.contains("secondary: lightSchemeSecondarySeed,"));
        assert!(!out.contains("seedColor: lightScheme.primary"));

        let seed_at = out.find("lightSchemePrimarySeed =").unwrap();
        let decl_at = out.find("static final ColorScheme lightScheme").unwrap();
        assert!(seed_at < decl_at);
    }

    #[test]
    fn test_leaves_other_references_for_follow_on() {
        let out = CircularReferenceRule.apply(CIRCULAR_THEME, "lib/theme/app_theme.dart");
        assert!(out.contains("AppTheme.lightScheme.secondary"));
        assert!(out.contains("colorScheme: lightScheme,"));
    }

    #[test]
    fn test_seed_reference_rewrites_remaining_accesses() {
        let repaired = CircularReferenceRule.apply(CIRCULAR_THEME, "lib/theme/app_theme.dart");
        let out = SeedReferenceRule.apply(&repaired, "lib/theme/app_theme.dart");
        assert!(out.contains("backgroundColor: AppTheme.lightSchemeSecondarySeed"));
        assert!(out.contains("colorScheme: lightScheme,"));
    }

    #[test]
    fn test_default_seed_without_literals() {
        let input = "class T {\n  static final Color accent = T.accent;\n}\n";
        let out = CircularReferenceRule.apply(input, "lib/t.dart");
        assert_eq!(
            out,
            "class T {\n  static const Color accentSeed = Color(0xFF2196F3);\n  static final Color accent = accentSeed;\n}\n"
        );
    }

    #[test]
    fn test_method_call_keeps_receiver_chain() {
        let input = "static final ColorScheme s = ColorScheme(primary: Color(0xFF000000), surface: s.primary.withValues(alpha: 0.2));";
        let out = CircularReferenceRule.apply(input, "lib/t.dart");
        assert!(out.contains("surface: sPrimarySeed.withValues(alpha: 0.2)"));
    }

    #[test]
    fn test_non_circular_untouched() {
        let input = "class T {\n  static const Color primary = Color(0xFF6200EE);\n  static final ColorScheme scheme = ColorScheme.fromSeed(seedColor: primary);\n}\n";
        assert_eq!(CircularReferenceRule.apply(input, "lib/t.dart"), input);
        assert_eq!(SeedReferenceRule.apply(input, "lib/t.dart"), input);
    }

    #[test]
    fn test_declaration_prefixing_a_seed_name() {
        let input = "class C {\n  static const Color mainSeed = Color(0xFF000000);\n  static final int mainS = 1;\n  static final int mainSee = 2;\n}\n";
        assert_eq!(SeedReferenceRule.apply(input, "lib/c.dart"), input);
        assert_eq!(CircularReferenceRule.apply(input, "lib/c.dart"), input);
    }

    #[test]
    fn test_same_member_on_other_receiver_not_circular() {
        let input = "class AppTheme {\n  static final TextTheme textTheme = base.textTheme.copyWith(titleLarge: base.textTheme.titleLarge);\n}\n";
        assert_eq!(CircularReferenceRule.apply(input, "lib/theme/app_theme.dart"), input);
    }

    #[test]
    fn test_foreign_class_prefix_not_circular() {
        let input = "class AppTheme {\n  static final Color accent = Palette.accent;\n  static final ColorScheme scheme = Other.scheme.copyWith(primary: Color(0xFF000000));\n}\n";
        assert_eq!(CircularReferenceRule.apply(input, "lib/theme/app_theme.dart"), input);
    }

    #[test]
    fn test_idempotent() {
        let once = SeedReferenceRule.apply(
            &CircularReferenceRule.apply(CIRCULAR_THEME, "lib/a.dart"),
            "lib/a.dart",
        );
        let twice = SeedReferenceRule.apply(
            &CircularReferenceRule.apply(&once, "lib/a.dart"),
            "lib/a.dart",
        );
        assert_eq!(once, twice);
    }
}
