//! Minimal CSS selector matching for the in-memory document.
//!
//! Supports selector lists of compound selectors built from a tag name, `#id`,
//! `.class` and `[attribute]` parts, e.g. `a, button.primary, [data-cursor]`.
//! Combinators and pseudo-classes are not supported and never match.

/// What a selector needs to know about a node
pub trait SelectorSubject {
    fn tag_name(&self) -> &str;
    fn id(&self) -> Option<&str>;
    fn has_class(&self, class: &str) -> bool;
    fn has_attribute(&self, name: &str) -> bool;
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<String>,
}

impl Compound {
    fn parse(source: &str) -> Option<Self> {
        let source = source.trim();
        if source.is_empty() || source.contains(char::is_whitespace) {
            return None;
        }

        let mut compound = Compound::default();
        let mut rest = source;

        let tag_len = rest
            .find(|c: char| c == '.' || c == '#' || c == '[')
            .unwrap_or(rest.len());
        if tag_len > 0 {
            let tag = &rest[..tag_len];
            if tag != "*" {
                compound.tag = Some(tag.to_ascii_lowercase());
            }
            rest = &rest[tag_len..];
        }

        while let Some(marker) = rest.chars().next() {
            let body = &rest[marker.len_utf8()..];
            match marker {
                '[' => {
                    let end = body.find(']')?;
                    compound.attributes.push(body[..end].trim().to_string());
                    rest = &body[end + 1..];
                }
                '.' | '#' => {
                    let end = body
                        .find(|c: char| c == '.' || c == '#' || c == '[')
                        .unwrap_or(body.len());
                    if end == 0 {
                        return None;
                    }
                    let name = body[..end].to_string();
                    if marker == '.' {
                        compound.classes.push(name);
                    } else {
                        compound.id = Some(name);
                    }
                    rest = &body[end..];
                }
                _ => return None,
            }
        }

        Some(compound)
    }

    fn matches<S: SelectorSubject + ?Sized>(&self, subject: &S) -> bool {
        if let Some(tag) = &self.tag {
            if !subject.tag_name().eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if subject.id() != Some(id.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|class| subject.has_class(class))
            && self
                .attributes
                .iter()
                .all(|attribute| subject.has_attribute(attribute))
    }
}

/// A parsed selector list
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    alternatives: Vec<Compound>,
}

impl Selector {
    /// Parse a selector list. Unsupported alternatives are dropped.
    pub fn parse(source: &str) -> Self {
        let alternatives = source.split(',').filter_map(Compound::parse).collect();
        Self { alternatives }
    }

    pub fn matches<S: SelectorSubject + ?Sized>(&self, subject: &S) -> bool {
        self.alternatives
            .iter()
            .any(|compound| compound.matches(subject))
    }

    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }
}
