use crate::domain::models::request::RequestContext;

/// Resolves a `:name` path template against `base_url`.
///
/// Only whole path segments are substituted, values are percent-encoded,
/// and placeholders with no value in `context` are left as written.
pub fn create_endpoint_url(base_url: &str, template: &str, context: &RequestContext) -> String {
    let path = template
        .split('/')
        .map(|segment| {
            match segment
                .strip_prefix(':')
                .and_then(|name| context.get(name))
            {
                Some(value) => urlencoding::encode(value).into_owned(),
                None => segment.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("/");

    format!("{}{}", base_url.trim_end_matches('/'), path)
}
