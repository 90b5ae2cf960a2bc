//! `%{name}` template expansion.

/// Replace every `%{name}` reference in `template` with `resolve(name)`.
///
/// References that resolve to `None`, and unterminated `%{` openers, are copied through
/// verbatim.
///
/// # Example
/// ```rust
/// use event_grep::event::expand_template;
///
/// let expanded = expand_template("%{host} says %{missing}", |name| {
///     (name == "host").then(|| "web1".to_string())
/// });
/// assert_eq!(expanded, "web1 says %{missing}");
/// ```
pub fn expand_template<F>(template: &str, resolve: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut expanded = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("%{") {
        expanded.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        let Some(end) = after_open.find('}') else {
            expanded.push_str(&rest[start..]);
            return expanded;
        };

        let name = &after_open[..end];
        match resolve(name) {
            Some(value) => expanded.push_str(&value),
            None => expanded.push_str(&rest[start..start + 2 + end + 1]),
        }
        rest = &after_open[end + 1..];
    }

    expanded.push_str(rest);
    expanded
}
