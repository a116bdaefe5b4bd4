//! Substitution templates for human-oriented identifier rendering.
//!
//! Templates contain literal text and named placeholders such as `{kind}`.
//! `{{` and `}}` produce literal braces.

use crate::error::IdentError;

/// Render `pattern`, substituting each `{name}` from `values`.
///
/// `required` lists placeholders the template must use at least once.
pub(crate) fn render(
    pattern: Option<&str>,
    values: &[(&str, &str)],
    required: &[&str],
) -> Result<String, IdentError> {
    let pattern = pattern.ok_or_else(|| {
        IdentError::InvalidArgument("a formatting pattern is required".to_owned())
    })?;

    let mut out = String::with_capacity(pattern.len());
    let mut used = Vec::new();
    let mut rest = pattern;
    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if let Some(after) = tail.strip_prefix("{{") {
            out.push('{');
            rest = after;
        } else if let Some(after) = tail.strip_prefix("}}") {
            out.push('}');
            rest = after;
        } else if let Some(open) = tail.strip_prefix('{') {
            let end = open.find('}').ok_or_else(|| {
                IdentError::InvalidArgument(format!("unclosed placeholder in {pattern:?}"))
            })?;
            let name = &open[..end];
            let (_, value) = values.iter().find(|(key, _)| *key == name).ok_or_else(|| {
                IdentError::InvalidArgument(format!("unknown placeholder {{{name}}} in {pattern:?}"))
            })?;
            out.push_str(value);
            used.push(name);
            rest = &open[end + 1..];
        } else {
            return Err(IdentError::InvalidArgument(format!(
                "unmatched '}}' in {pattern:?}"
            )));
        }
    }
    out.push_str(rest);

    if let Some(missing) = required.iter().find(|name| !used.contains(*name)) {
        return Err(IdentError::InvalidArgument(format!(
            "pattern {pattern:?} must use {{{missing}}}"
        )));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALUES: &[(&str, &str)] = &[("kind", "site"), ("payload", "classic")];

    #[test]
    fn test_substitution() {
        assert_eq!(
            render(Some("{kind}:{payload}"), VALUES, &["payload"]).unwrap(),
            "site:classic"
        );
        assert_eq!(
            render(Some("Site[{payload}]"), VALUES, &["payload"]).unwrap(),
            "Site[classic]"
        );
    }

    #[test]
    fn test_escaped_braces() {
        assert_eq!(
            render(Some("{{{payload}}}"), VALUES, &[]).unwrap(),
            "{classic}"
        );
    }

    #[test]
    fn test_missing_pattern() {
        assert!(matches!(
            render(None, VALUES, &[]),
            Err(IdentError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_invalid_patterns() {
        for pattern in ["{kind", "{owner}", "kind}", "{kind}"] {
            assert!(
                matches!(
                    render(Some(pattern), VALUES, &["payload"]),
                    Err(IdentError::InvalidArgument(_))
                ),
                "expected {pattern:?} to be rejected"
            );
        }
    }
}
