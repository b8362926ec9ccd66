//! Structural checks on a [`Template`], independent of any bindings.
use crate::{
    compile::{
        is_identifier,
        lex::{Lexer, Token},
        path,
        tree::Kind,
    },
    region::Region,
    syntax::{Marker, Syntax},
    template::Template,
};

/// Check the [`Template`] for structural defects.
///
/// Returns one human readable message per defect, in a fixed order: name,
/// source, placeholder names in source order, and finally delimiter counts.
/// Block pairing is not checked here; it fails the render instead.
pub fn validate(template: &Template, syntax: &Syntax) -> Vec<String> {
    let mut errors = vec![];

    if template.name().trim().is_empty() {
        errors.push("template name is empty".to_string());
    }
    if template.source().is_empty() {
        errors.push("template source is empty".to_string());
        return errors;
    }

    let source = template.source();
    for (token, _) in Lexer::new(source, syntax) {
        if let Token::Tag(inner) = token {
            if let Some(error) = check_tag(source, inner) {
                errors.push(error);
            }
        }
    }

    let (begin, end) = count_delimiters(source, syntax);
    if begin != end {
        errors.push(format!(
            "mismatched delimiters: found {begin} `{}` and {end} `{}`",
            syntax.begin(),
            syntax.end()
        ));
    }

    errors
}

/// Return a message if the tag holds neither a name, a known block, nor one
/// of the exempt forms.
fn check_tag(source: &str, inner: Region) -> Option<String> {
    let region = inner.trim(source);
    let text = &source[region];

    if let Some(rest) = text.strip_prefix('#') {
        let length = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let keyword = &rest[..length];
        if Kind::from_keyword(keyword).is_none() {
            return Some(format!("unknown block `#{keyword}`"));
        }

        let subject = Region::new(region.begin + 1 + length..region.end).trim(source);
        if subject.is_empty() {
            return Some(format!("missing parameter name in `{text}`"));
        }
        if path(source, subject).is_none() {
            return Some(format!(
                "invalid parameter name `{}` in `{text}`",
                &source[subject]
            ));
        }
        return None;
    }

    if let Some(rest) = text.strip_prefix('/') {
        let keyword = rest.trim();
        return match Kind::from_keyword(keyword) {
            Some(_) => None,
            None => Some(format!("unknown block `/{keyword}`")),
        };
    }

    let exempt = text.contains(':')
        || text.contains('.')
        || text.chars().filter(|c| !c.is_whitespace()).eq("index+1".chars());
    if exempt || is_identifier(text) {
        return None;
    }

    Some(format!("invalid parameter name `{text}`"))
}

/// Count the opening and closing delimiters in the source.
fn count_delimiters(source: &str, syntax: &Syntax) -> (usize, usize) {
    let (mut begin, mut end) = (0, 0);
    let mut from = 0;

    while from < source.len() {
        let Some((marker, at)) = syntax.find(source, from) else {
            break;
        };
        match marker {
            Marker::Begin => begin += 1,
            Marker::End => end += 1,
        }
        from = at + syntax.len_of(marker);
    }

    (begin, end)
}

#[cfg(test)]
mod tests {
    use super::validate;
    use crate::{syntax::Syntax, template::Template};

    fn check(name: &str, source: &str) -> Vec<String> {
        validate(&Template::new(name, source), &Syntax::default())
    }

    #[test]
    fn test_valid() {
        let source = "{{#if ok}}{{name}} {{upper:name}} {{a.b}}{{/if}}\
                      {{#each items}}{{.}} {{this}} {{index}} {{index + 1}}{{/each}}";

        assert!(check("t", source).is_empty());
    }

    #[test]
    fn test_empty_name_and_source() {
        assert_eq!(
            check(" ", ""),
            vec!["template name is empty", "template source is empty"]
        );
    }

    #[test]
    fn test_invalid_names() {
        assert_eq!(
            check("t", "{{first name}} {{ 1st }} {{#if a b}}x{{/if}}"),
            vec![
                "invalid parameter name `first name`",
                "invalid parameter name `1st`",
                "invalid parameter name `a b` in `#if a b`",
            ]
        );
    }

    #[test]
    fn test_unknown_blocks() {
        assert_eq!(
            check("t", "{{#unless x}}ok{{/unless}}"),
            vec!["unknown block `#unless`", "unknown block `/unless`"]
        );
        assert_eq!(
            check("t", "{{#each}}x{{ /each }}"),
            vec!["missing parameter name in `#each`"]
        );
    }

    #[test]
    fn test_delimiter_counts() {
        let errors = check("t", "{{a}} {{b}} }}");

        assert_eq!(errors, vec!["mismatched delimiters: found 2 `{{` and 3 `}}`"]);
    }

    #[test]
    fn test_deterministic() {
        let template = Template::new("t", "{{ bad-name }} {{");

        assert_eq!(
            validate(&template, &Syntax::default()),
            validate(&template, &Syntax::default())
        );
    }

    #[test]
    fn test_block_pairing_not_checked() {
        assert!(check("t", "{{#if a}}").is_empty());
    }
}
