use crate::shared::localized::LocalizedText;
use itertools::Itertools;
use std::collections::BTreeMap;

pub const EVENT: &str = "event";
pub const ORDER: &str = "order";
pub const POSITION_OR_ADDRESS: &str = "position_or_address";

/// Placeholders available in subjects and messages sent to orders and attendees
pub const MAIL_PLACEHOLDERS: &[&str] = &[EVENT, ORDER, POSITION_OR_ADDRESS];

pub type MailContext = BTreeMap<String, String>;

enum Token<'a> {
    Text(&'a str),
    Placeholder(&'a str),
}

/// Splits a template into literal text and `{name}` placeholders.
/// `{{` and `}}` are escaped braces, an unterminated `{` is literal text.
fn tokenize(template: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = template;
    while !rest.is_empty() {
        let next = match rest.find(|c: char| c == '{' || c == '}') {
            Some(idx) => idx,
            None => {
                tokens.push(Token::Text(rest));
                break;
            }
        };
        if next > 0 {
            tokens.push(Token::Text(&rest[..next]));
            rest = &rest[next..];
        }
        if rest.starts_with("{{") {
            tokens.push(Token::Text("{"));
            rest = &rest[2..];
        } else if rest.starts_with("}}") {
            tokens.push(Token::Text("}"));
            rest = &rest[2..];
        } else if rest.starts_with('{') {
            match rest.find('}') {
                Some(end) => {
                    tokens.push(Token::Placeholder(&rest[1..end]));
                    rest = &rest[end + 1..];
                }
                None => {
                    tokens.push(Token::Text(rest));
                    break;
                }
            }
        } else {
            tokens.push(Token::Text("}"));
            rest = &rest[1..];
        }
    }
    tokens
}

/// Substitutes `{name}` placeholders with values from `context`.
/// Unknown placeholders are replaced by their bare name.
pub fn render(template: &str, context: &MailContext) -> String {
    let mut out = String::with_capacity(template.len());
    for token in tokenize(template) {
        match token {
            Token::Text(text) => out.push_str(text),
            Token::Placeholder(name) => match context.get(name) {
                Some(value) => out.push_str(value),
                None => out.push_str(name),
            },
        }
    }
    out
}

/// Names of all placeholders used in `template`, in order of appearance
pub fn find_placeholders(template: &str) -> Vec<String> {
    tokenize(template)
        .into_iter()
        .filter_map(|token| match token {
            Token::Placeholder(name) => Some(name.to_string()),
            Token::Text(_) => None,
        })
        .collect()
}

/// Returns the sorted, deduplicated placeholders in any translation of
/// `text` that are not in `allowed`.
pub fn invalid_placeholders(text: &LocalizedText, allowed: &[&str]) -> Vec<String> {
    text.texts()
        .flat_map(find_placeholders)
        .filter(|name| !allowed.contains(&name.as_str()))
        .sorted()
        .dedup()
        .collect()
}

/// Human readable list of placeholders, e.g. `{event}, {order}`
pub fn describe(placeholders: &[&str]) -> String {
    placeholders
        .iter()
        .map(|p| format!("{{{}}}", p))
        .sorted()
        .join(", ")
}

#[cfg(test)]
mod test {
    use super::*;

    fn context() -> MailContext {
        let mut ctx = MailContext::new();
        ctx.insert(EVENT.into(), "Rust Conf".into());
        ctx.insert(ORDER.into(), "ABC12".into());
        ctx
    }

    #[test]
    fn renders_known_placeholders() {
        assert_eq!(
            render("Your order {order} for {event}", &context()),
            "Your order ABC12 for Rust Conf"
        );
    }

    #[test]
    fn unknown_placeholders_render_their_name() {
        assert_eq!(render("Hi {name}!", &context()), "Hi name!");
    }

    #[test]
    fn escaped_and_unbalanced_braces() {
        assert_eq!(render("{{event}} {event}", &context()), "{event} Rust Conf");
        assert_eq!(render("a } b", &context()), "a } b");
        assert_eq!(render("open {event", &context()), "open {event");
    }

    #[test]
    fn finds_placeholders() {
        assert_eq!(
            find_placeholders("{event} {{literal}} {order}"),
            vec!["event".to_string(), "order".to_string()]
        );
        assert!(find_placeholders("no placeholders").is_empty());
    }

    #[test]
    fn reports_invalid_placeholders() {
        let text = LocalizedText::new()
            .with("en", "Hello {foo} {event}")
            .with("de", "Hallo {foo} {bar}");
        assert_eq!(
            invalid_placeholders(&text, MAIL_PLACEHOLDERS),
            vec!["bar".to_string(), "foo".to_string()]
        );
        assert!(invalid_placeholders(&"Hi {order}".into(), MAIL_PLACEHOLDERS).is_empty());
    }

    #[test]
    fn describes_placeholders() {
        assert_eq!(
            describe(MAIL_PLACEHOLDERS),
            "{event}, {order}, {position_or_address}"
        );
    }
}
