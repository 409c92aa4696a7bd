//! Startup query handling.
//!
//! The page may be opened as `index.html?code=...` (an OAuth-style redirect).
//! The code is read once, then the query string is removed from the address
//! bar by replacing the current history entry, so a reload or a shared link
//! does not carry it along.

use log::debug;

use crate::error::LaunchError;

/// Values captured from the page address at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchParams {
    pub code: Option<String>,
}

/// Read/replace access to the page address.
pub trait AddressBar {
    /// Full current URL.
    fn href(&self) -> Result<String, LaunchError>;

    /// Query part of the URL including the leading `?`, or empty.
    fn search(&self) -> Result<String, LaunchError>;

    /// Show `url` in place of the current history entry. Must not push.
    fn replace_url(&self, url: &str) -> Result<(), LaunchError>;
}

/// Capture `param_name` from the query string, then drop the query string from
/// the visible URL. A page without a query string is left untouched.
pub fn capture_launch_params(
    bar: &impl AddressBar,
    param_name: &str,
) -> Result<LaunchParams, LaunchError> {
    let search = bar.search()?;
    let code = query_param(&search, param_name);

    if !search.is_empty() {
        let href = bar.href()?;
        let stripped = strip_query(&href, &search);
        debug!("rewriting page address to {stripped}");
        bar.replace_url(&stripped)?;
    }

    Ok(LaunchParams { code })
}

/// First value for `name` in `search`, with `URLSearchParams` decoding.
pub fn query_param(search: &str, name: &str) -> Option<String> {
    let query = search.strip_prefix('?').unwrap_or(search);
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k, v),
            None => (pair, ""),
        })
        .find(|(k, _)| form_decode(k) == name)
        .map(|(_, v)| form_decode(v))
}

/// Remove the first occurrence of `search` from `href`.
pub fn strip_query(href: &str, search: &str) -> String {
    if search.is_empty() {
        return href.to_string();
    }
    href.replacen(search, "", 1)
}

/// `application/x-www-form-urlencoded` decoding: `+` is a space, `%XX` is a
/// byte, malformed escapes pass through as-is, invalid UTF-8 is replaced.
fn form_decode(raw: &str) -> String {
    percent_decode(raw, true)
}

/// Decode `%XX` escapes; malformed escapes are kept as written. With
/// `plus_as_space`, `+` decodes to a space as in form data.
pub(crate) fn percent_decode(raw: &str, plus_as_space: bool) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' if plus_as_space => {
                out.push(b' ');
                i += 1;
            }
            b'%' => {
                let decoded = match (bytes.get(i + 1), bytes.get(i + 2)) {
                    (Some(&hi), Some(&lo)) => hex_pair(hi, lo),
                    _ => None,
                };
                match decoded {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                    }
                    None => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_pair(hi: u8, lo: u8) -> Option<u8> {
    let hi = (hi as char).to_digit(16)?;
    let lo = (lo as char).to_digit(16)?;
    Some((hi * 16 + lo) as u8)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    /// Address bar double with a history stack.
    struct FakeAddressBar {
        history: RefCell<Vec<String>>,
    }

    impl FakeAddressBar {
        fn at(url: &str) -> Self {
            Self {
                history: RefCell::new(vec![url.to_string()]),
            }
        }

        fn current(&self) -> String {
            self.history.borrow().last().cloned().unwrap_or_default()
        }

        fn history_len(&self) -> usize {
            self.history.borrow().len()
        }
    }

    impl AddressBar for FakeAddressBar {
        fn href(&self) -> Result<String, LaunchError> {
            Ok(self.current())
        }

        fn search(&self) -> Result<String, LaunchError> {
            let href = self.current();
            let without_fragment = href.split('#').next().unwrap_or("");
            Ok(without_fragment
                .find('?')
                .map(|i| without_fragment[i..].to_string())
                .filter(|s| s.len() > 1)
                .unwrap_or_default())
        }

        fn replace_url(&self, url: &str) -> Result<(), LaunchError> {
            if let Some(last) = self.history.borrow_mut().last_mut() {
                *last = url.to_string();
            }
            Ok(())
        }
    }

    #[test]
    fn code_is_captured_and_query_removed() {
        let bar = FakeAddressBar::at("https://play.example/?code=abc123");
        let params = capture_launch_params(&bar, "code").unwrap();

        assert_eq!(params.code.as_deref(), Some("abc123"));
        assert_eq!(bar.current(), "https://play.example/");
        assert_eq!(bar.history_len(), 1);
    }

    #[test]
    fn no_query_leaves_address_alone() {
        let bar = FakeAddressBar::at("https://play.example/index.html");
        let params = capture_launch_params(&bar, "code").unwrap();

        assert_eq!(params, LaunchParams::default());
        assert_eq!(bar.current(), "https://play.example/index.html");
        assert_eq!(bar.history_len(), 1);
    }

    #[test]
    fn fragment_survives_query_removal() {
        let bar = FakeAddressBar::at("https://play.example/?state=x&code=a%2Fb#map");
        let params = capture_launch_params(&bar, "code").unwrap();

        assert_eq!(params.code.as_deref(), Some("a/b"));
        assert_eq!(bar.current(), "https://play.example/#map");
    }

    #[test]
    fn other_params_do_not_produce_a_code() {
        let bar = FakeAddressBar::at("https://play.example/?lang=en");
        let params = capture_launch_params(&bar, "code").unwrap();

        assert_eq!(params.code, None);
        assert_eq!(bar.current(), "https://play.example/");
    }

    #[test]
    fn query_param_decoding() {
        assert_eq!(query_param("?code=abc123", "code").as_deref(), Some("abc123"));
        assert_eq!(query_param("code=a+b%20c", "code").as_deref(), Some("a b c"));
        assert_eq!(query_param("?code=1&code=2", "code").as_deref(), Some("1"));
        assert_eq!(query_param("?code", "code").as_deref(), Some(""));
        assert_eq!(query_param("?code=%zz%4", "code").as_deref(), Some("%zz%4"));
        assert_eq!(query_param("?c%6Fde=x", "code").as_deref(), Some("x"));
        assert_eq!(query_param("", "code"), None);
        assert_eq!(query_param("?&&", "code"), None);
    }

    #[test]
    fn strip_query_only_touches_first_match() {
        assert_eq!(strip_query("http://h/p?x=1", "?x=1"), "http://h/p");
        assert_eq!(strip_query("http://h/p", ""), "http://h/p");
    }
}
