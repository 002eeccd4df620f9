//! Per-recipient placeholder substitution.
//!
//! Template text may contain `{{ name }}` tokens. The recognized names are
//! `first_name`, `last_name`, `full_name`, `email`, `company` and
//! `custom.<key>`; missing contact data renders as an empty string. Any other
//! token is copied through untouched. Rendering never fails.

use crate::domain::{Contact, EmailTemplate};
use serde::{Deserialize, Serialize};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";
const CUSTOM_PREFIX: &str = "custom.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder<'a> {
    FirstName,
    LastName,
    FullName,
    Email,
    Company,
    Custom(&'a str),
}

impl<'a> Placeholder<'a> {
    /// Parses the text between the braces. Surrounding whitespace is ignored.
    pub fn parse(raw: &'a str) -> Option<Self> {
        let name = raw.trim();
        match name {
            "first_name" => Some(Placeholder::FirstName),
            "last_name" => Some(Placeholder::LastName),
            "full_name" => Some(Placeholder::FullName),
            "email" => Some(Placeholder::Email),
            "company" => Some(Placeholder::Company),
            _ => {
                let key = name.strip_prefix(CUSTOM_PREFIX)?.trim();
                if key.is_empty() {
                    None
                } else {
                    Some(Placeholder::Custom(key))
                }
            }
        }
    }

    pub fn resolve(&self, contact: &Contact) -> String {
        match self {
            Placeholder::FirstName => contact.first_name.clone().unwrap_or_default(),
            Placeholder::LastName => contact.last_name.clone().unwrap_or_default(),
            Placeholder::FullName => contact.full_name(),
            Placeholder::Email => contact.email.clone(),
            Placeholder::Company => contact.company.clone().unwrap_or_default(),
            Placeholder::Custom(key) => contact.custom_fields.get(*key).cloned().unwrap_or_default(),
        }
    }
}

pub fn render(text: &str, contact: &Contact) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(mut start) = rest.find(OPEN) {
        // In a run like `{{{name}}` the token starts at the last pair of braces.
        while rest[start + OPEN.len()..].starts_with('{') {
            start += 1;
        }
        let inner_start = start + OPEN.len();
        let Some(close) = rest[inner_start..].find(CLOSE) else {
            break;
        };
        let mut inner_start = inner_start;
        let mut inner = &rest[inner_start..inner_start + close];
        // `{{ stray {{name}}`: only the innermost opener belongs to the token.
        if let Some(nested) = inner.rfind(OPEN) {
            start = inner_start + nested;
            inner_start = start + OPEN.len();
            inner = &rest[inner_start..inner_start + close - nested - OPEN.len()];
        }
        let token_end = inner_start + inner.len() + CLOSE.len();

        out.push_str(&rest[..start]);
        match Placeholder::parse(inner) {
            Some(placeholder) => out.push_str(&placeholder.resolve(contact)),
            None => out.push_str(&rest[start..token_end]),
        }
        rest = &rest[token_end..];
    }

    out.push_str(rest);
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedMessage {
    pub subject: String,
    pub body: String,
    pub html_body: Option<String>,
}

/// Renders each template field independently for one contact.
pub fn render_template(template: &EmailTemplate, contact: &Contact) -> RenderedMessage {
    RenderedMessage {
        subject: render(&template.subject, contact),
        body: render(&template.body, contact),
        html_body: template
            .html_body
            .as_deref()
            .filter(|html| !html.is_empty())
            .map(|html| render(html, contact)),
    }
}

#[cfg(test)]
mod tests {
    use super::{render, render_template, Placeholder};
    use crate::domain::{Contact, ContactId, CustomFields, EmailTemplate, TemplateId};

    fn ada() -> Contact {
        let mut custom_fields = CustomFields::new();
        custom_fields.insert("department".to_string(), "Engineering".to_string());
        custom_fields.insert("city".to_string(), "London".to_string());
        Contact {
            id: ContactId::new(),
            email: "ada@example.com".to_string(),
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            company: Some("Analytical Engines".to_string()),
            custom_fields,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn bare() -> Contact {
        Contact {
            id: ContactId::new(),
            email: "anon@example.com".to_string(),
            first_name: None,
            last_name: None,
            company: None,
            custom_fields: CustomFields::new(),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn render_substitutes_standard_fields() {
        let out = render(
            "Hi {{first_name}} {{last_name}} ({{full_name}}) <{{email}}> at {{company}}",
            &ada(),
        );
        assert_eq!(
            out,
            "Hi Ada Lovelace (Ada Lovelace) <ada@example.com> at Analytical Engines"
        );
    }

    #[test]
    fn render_substitutes_custom_fields() {
        let out = render("{{custom.department}} in {{ custom.city }}", &ada());
        assert_eq!(out, "Engineering in London");
    }

    #[test]
    fn render_missing_data_becomes_empty() {
        let out = render(
            "[{{first_name}}][{{last_name}}][{{full_name}}][{{company}}][{{custom.city}}]",
            &bare(),
        );
        assert_eq!(out, "[][][][][]");
    }

    #[test]
    fn render_full_name_with_one_part() {
        let mut contact = bare();
        contact.last_name = Some("Hopper".to_string());
        assert_eq!(render("{{full_name}}", &contact), "Hopper");
    }

    #[test]
    fn render_leaves_unknown_tokens_verbatim() {
        let text = "{{unknown_thing}} {{ custom. }} {{}} {not} {{first_name";
        assert_eq!(render(text, &ada()), text);
    }

    #[test]
    fn render_ignores_whitespace_inside_braces() {
        assert_eq!(render("{{  first_name\t}}", &ada()), "Ada");
    }

    #[test]
    fn render_handles_extra_braces() {
        assert_eq!(render("{{{first_name}}}", &ada()), "{Ada}");
        assert_eq!(render("{{ stray {{email}}", &ada()), "{{ stray ada@example.com");
    }

    #[test]
    fn render_does_not_rescan_substituted_values() {
        let mut contact = ada();
        contact.first_name = Some("{{email}}".to_string());
        assert_eq!(render("{{first_name}}", &contact), "{{email}}");
    }

    #[test]
    fn render_is_repeatable() {
        let contact = ada();
        let text = "Dear {{full_name}}, {{custom.city}} {{mystery}}";
        assert_eq!(render(text, &contact), render(text, &contact));
    }

    #[test]
    fn placeholder_parse_recognizes_names() {
        assert_eq!(Placeholder::parse(" email "), Some(Placeholder::Email));
        assert_eq!(
            Placeholder::parse("custom.team"),
            Some(Placeholder::Custom("team"))
        );
        assert_eq!(Placeholder::parse("Email"), None);
    }

    #[test]
    fn render_template_renders_each_field() {
        let template = EmailTemplate {
            id: TemplateId::new(),
            name: "welcome".to_string(),
            subject: "Welcome {{first_name}}".to_string(),
            body: "Hello {{full_name}}".to_string(),
            html_body: Some("<p>{{company}}</p>".to_string()),
            created_at: 0,
            updated_at: 0,
        };
        let rendered = render_template(&template, &ada());
        assert_eq!(rendered.subject, "Welcome Ada");
        assert_eq!(rendered.body, "Hello Ada Lovelace");
        assert_eq!(
            rendered.html_body.as_deref(),
            Some("<p>Analytical Engines</p>")
        );

        let plain = EmailTemplate {
            html_body: Some(String::new()),
            ..template
        };
        assert!(render_template(&plain, &ada()).html_body.is_none());
    }
}
