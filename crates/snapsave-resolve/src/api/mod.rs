pub mod http;
pub mod snapsave;
pub mod snaptik;
pub mod twitter;

use snapsave_extract::Document;

const TOKEN_FIELD: &str = "input[name='token']";

/// Reads the anti-automation token from a proxy's home page, if it has one.
pub fn extract_token(home_html: &str) -> Option<String> {
    Document::parse(home_html)
        .first(TOKEN_FIELD)
        .and_then(|field| field.value())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// The form every proxy action endpoint accepts: the target URL and, when the
/// home page handed one out, the token.
pub fn action_form(url: &str, token: Option<String>) -> Vec<(&'static str, String)> {
    let mut form = vec![("url", url.to_string())];
    if let Some(token) = token {
        form.push(("token", token));
    }
    form
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_token_field() {
        let html = r#"<form><input name="url"><input type="hidden" name="token" value="eyJ0"></form>"#;
        assert_eq!(extract_token(html), Some("eyJ0".to_string()));
    }

    #[test]
    fn missing_or_empty_token_is_none() {
        assert_eq!(extract_token("<form><input name='url'></form>"), None);
        assert_eq!(extract_token("<input name='token' value=''>"), None);
    }

    #[test]
    fn form_omits_absent_token() {
        assert_eq!(action_form("https://a", None), vec![("url", "https://a".to_string())]);
        assert_eq!(
            action_form("https://a", Some("t".into())),
            vec![("url", "https://a".to_string()), ("token", "t".to_string())]
        );
    }
}
