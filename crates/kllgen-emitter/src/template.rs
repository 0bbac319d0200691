//! `<|Name|>` template parsing and substitution.

use std::collections::BTreeSet;

use kllgen_errors::TemplateError;
use tracing::warn;

use crate::assembly::Assembly;
use crate::placeholder::Placeholder;

const OPEN: &str = "<|";
const CLOSE: &str = "|>";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Slot(Placeholder),
}

/// A parsed template: literal text interleaved with placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    name: String,
    segments: Vec<Segment>,
}

fn line_of(text: &str, offset: usize) -> usize {
    text.get(..offset)
        .map_or(0, |head| head.matches('\n').count())
        .saturating_add(1)
}

impl Template {
    /// Parse `text`; `name` identifies the template in errors.
    ///
    /// # Errors
    ///
    /// Returns a [`TemplateError`] for an unknown placeholder name, a `<|`
    /// without a closing `|>`, or a `<|` inside another placeholder.
    pub fn parse(name: impl Into<String>, text: &str) -> Result<Self, TemplateError> {
        let name = name.into();
        let mut segments = Vec::new();
        let mut rest = text;
        let mut consumed = 0usize;
        while let Some(open) = rest.find(OPEN) {
            let (literal, tail) = rest.split_at(open);
            if !literal.is_empty() {
                segments.push(Segment::Text(literal.to_owned()));
            }
            let token_start = consumed.saturating_add(open);
            let body = tail.get(OPEN.len()..).unwrap_or_default();
            let line = line_of(text, token_start);
            let Some(close) = body.find(CLOSE) else {
                return Err(TemplateError::Unterminated {
                    template: name,
                    line,
                });
            };
            let token = body.get(..close).unwrap_or_default();
            if token.contains(OPEN) {
                return Err(TemplateError::Nested {
                    template: name,
                    line,
                });
            }
            let Some(placeholder) = Placeholder::from_name(token) else {
                return Err(TemplateError::unknown(name, token, line));
            };
            segments.push(Segment::Slot(placeholder));

            let advance = open.saturating_add(OPEN.len()).saturating_add(close).saturating_add(CLOSE.len());
            rest = rest.get(advance..).unwrap_or_default();
            consumed = consumed.saturating_add(advance);
        }
        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_owned()));
        }
        Ok(Self { name, segments })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Placeholders in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = Placeholder> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Slot(p) => Some(*p),
            Segment::Text(_) => None,
        })
    }

    /// Substitute every placeholder from `assembly`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::NoGenerator`] for a placeholder the
    /// configuration has no text for.
    pub fn render(&self, assembly: &Assembly<'_>) -> Result<String, TemplateError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Slot(placeholder) => {
                    let text = placeholder
                        .generate(assembly)
                        .ok_or_else(|| TemplateError::no_generator(&self.name, placeholder.name()))?;
                    out.push_str(&text);
                }
            }
        }
        Ok(out)
    }
}

/// The three templates of one generation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Templates {
    pub keymap: Template,
    pub pixelmap: Template,
    pub defines: Template,
}

impl Templates {
    /// Templates shipped with the crate.
    ///
    /// # Errors
    ///
    /// Only fails if a shipped template is malformed.
    pub fn builtin() -> Result<Self, TemplateError> {
        Ok(Self {
            keymap: Template::parse(
                "kiibohdKeymap.h",
                include_str!("../templates/kiibohdKeymap.h"),
            )?,
            pixelmap: Template::parse(
                "kiibohdPixelmap.c",
                include_str!("../templates/kiibohdPixelmap.c"),
            )?,
            defines: Template::parse("kiibohdDefs.h", include_str!("../templates/kiibohdDefs.h"))?,
        })
    }

    /// Placeholders that no template uses.
    pub fn unused(&self) -> Vec<Placeholder> {
        let used: BTreeSet<Placeholder> = [&self.keymap, &self.pixelmap, &self.defines]
            .into_iter()
            .flat_map(Template::placeholders)
            .collect();
        Placeholder::ALL
            .into_iter()
            .filter(|p| !used.contains(p))
            .collect()
    }

    /// Warn about generators whose output no template consumes.
    pub fn warn_unused(&self, assembly: &Assembly<'_>) {
        for placeholder in self.unused() {
            if placeholder.generate(assembly).is_some_and(|text| !text.is_empty()) {
                warn!(placeholder = placeholder.name(), "generated table is not used by any template");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kllgen_test_helpers::prelude::*;

    #[test]
    fn test_parse_and_render() {
        let template = must(Template::parse("t.h", "#define MaxScanCode <|MaxScanCode|>\n"));
        let config = single_trigger_keymap();
        let a = Assembly::build(&config);
        assert_eq!(must(template.render(&a)), "#define MaxScanCode 0x8\n");
    }

    #[test]
    fn test_unknown_placeholder_line() {
        let err = must_err(Template::parse("t.h", "a\nb\n<|Bogus|>\n"));
        assert_eq!(err, TemplateError::unknown("t.h", "Bogus", 3));
    }

    #[test]
    fn test_unterminated_placeholder() {
        let err = must_err(Template::parse("t.h", "x <|MaxScanCode\n"));
        assert!(matches!(err, TemplateError::Unterminated { line: 1, .. }));
    }

    #[test]
    fn test_nested_placeholder() {
        let err = must_err(Template::parse("t.h", "<|Max<|ScanCode|>|>"));
        assert!(matches!(err, TemplateError::Nested { .. }));
    }

    #[test]
    fn test_pixel_placeholder_without_pixels() {
        let template = must(Template::parse("k.h", "<|PixelMapping|>"));
        let config = single_trigger_keymap();
        let a = Assembly::build(&config);
        let err = must_err(template.render(&a));
        assert_eq!(err, TemplateError::no_generator("k.h", "PixelMapping"));
    }

    #[test]
    fn test_builtin_templates_cover_every_placeholder() {
        let templates = must(Templates::builtin());
        assert!(templates.unused().is_empty());
    }

    #[test]
    fn test_text_without_placeholders_is_kept() {
        let template = must(Template::parse("t.h", "plain | text < here"));
        assert_eq!(template.placeholders().count(), 0);
    }
}
