//! URL template placeholder substitution.
//!
//! Placeholders are `{n}` tokens bound to regex capture groups and a literal
//! `{text}` token bound to the whole input. Substitution is single-pass per
//! token: a repeated placeholder is replaced at its first occurrence only.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Captures;

/// Characters left intact by standard URI component encoding: alphanumerics
/// plus `- _ . ! ~ * ' ( )`. Everything else is percent-escaped.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a string as a URI component.
pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, COMPONENT).to_string()
}

/// Build a target URL from a template and a successful match.
pub(crate) fn substitute(template: &str, caps: &Captures<'_>, input: &str) -> String {
    let mut target = template.to_string();

    for i in 1..caps.len() {
        let value = caps.get(i).map(|m| m.as_str()).unwrap_or("");
        target = target.replacen(&format!("{{{i}}}"), &encode_component(value), 1);
    }

    // A pattern without capture groups binds the whole match to {0} and {1},
    // covering templates written either way.
    if caps.len() == 1 {
        let whole = encode_component(&caps[0]);
        target = target.replacen("{0}", &whole, 1);
        target = target.replacen("{1}", &whole, 1);
    }

    target.replacen("{text}", &encode_component(input), 1)
}
