//! Parsing of the URL fragment the hosted login page redirects back with.

use std::collections::HashMap;

/// Parse `a=1&b=2` fragment parameters. A leading `#` is ignored, malformed
/// pairs are skipped and values are percent-decoded when possible.
pub fn parse_fragment(fragment: &str) -> HashMap<String, String> {
    fragment
        .trim_start_matches('#')
        .split('&')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            if key.is_empty() {
                return None;
            }
            let value = urlencoding::decode(value)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| value.to_string());
            Some((key.to_string(), value))
        })
        .collect()
}

/// Extract the ID token from a login redirect fragment.
pub fn token_from_fragment(fragment: &str) -> Option<String> {
    parse_fragment(fragment)
        .remove("id_token")
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fragment() {
        let params = parse_fragment("#id_token=abc.def&token_type=Bearer&expires_in=3600");
        assert_eq!(params.get("id_token").map(String::as_str), Some("abc.def"));
        assert_eq!(params.get("expires_in").map(String::as_str), Some("3600"));
    }

    #[test]
    fn test_malformed_pairs_skipped() {
        let params = parse_fragment("garbage&=x&ok=1&&state=a%20b");
        assert_eq!(params.len(), 2);
        assert_eq!(params["ok"], "1");
        assert_eq!(params["state"], "a b");
    }

    #[test]
    fn test_token_from_fragment() {
        assert_eq!(
            token_from_fragment("access_token=a&id_token=b").as_deref(),
            Some("b")
        );
        assert_eq!(token_from_fragment("access_token=a"), None);
        assert_eq!(token_from_fragment("id_token="), None);
        assert_eq!(token_from_fragment(""), None);
    }
}
