/// Recipe templates
///
/// Templates are Makefile text with `{NAME}` placeholders. `{{` and `}}`
/// produce literal braces. Templates are parsed once when the catalog is
/// loaded, so malformed placeholders never reach resolution.
use crate::error::TemplateError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' if chars.peek().map(|&(_, n)| n) == Some('{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek().map(|&(_, n)| n) == Some('}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, n) in chars.by_ref() {
                        if n == '}' {
                            closed = true;
                            break;
                        }
                        if n == '{' {
                            return Err(TemplateError::Unclosed(pos));
                        }
                        name.push(n);
                    }
                    if !closed {
                        return Err(TemplateError::Unclosed(pos));
                    }
                    if name.trim().is_empty() {
                        return Err(TemplateError::Empty(pos));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(name));
                }
                '}' => return Err(TemplateError::UnmatchedClose(pos)),
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(Self { segments })
    }

    /// Placeholder names in order of appearance
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Literal text after the last placeholder, if any
    pub fn literal_suffix(&self) -> Option<&str> {
        match self.segments.last() {
            Some(Segment::Literal(text)) => Some(text),
            _ => None,
        }
    }

    /// Substitute every placeholder through `lookup`
    pub fn render<F>(&self, lookup: F) -> Result<String, TemplateError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    let value =
                        lookup(name).ok_or_else(|| TemplateError::MissingSetting(name.clone()))?;
                    out.push_str(&value);
                }
            }
        }
        Ok(out)
    }
}
