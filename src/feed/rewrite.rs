//! Absolute-URL rewriting for `src` and `href` attributes in item bodies.
//!
//! Feed readers render item content outside the site, so relative
//! references have to be resolved against the site root first.
//!
//! ```text
//! <img src="/img/a.png">   ->  <img src="https://example.com/img/a.png">
//! <a href='../x/'>         ->  <a href='https://example.com/x/'>
//! <a href="https://b.c/">  ->  unchanged
//! ```

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use url::Url;

use crate::core::LinkKind;

/// `src=` / `href=` with a double-quoted, single-quoted or bare value.
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(src|href)=(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#).unwrap()
});

/// Rewrite every `src`/`href` value in `html` to an absolute URL.
///
/// Quote style and all other markup are preserved. Values that already
/// carry a scheme, or that cannot be joined onto `base`, are left as-is.
pub fn absolutize_links<'a>(html: &'a str, base: &Url) -> Cow<'a, str> {
    ATTR_RE.replace_all(html, |caps: &Captures<'_>| {
        let attr = &caps[1];
        let (value, quote) = if let Some(m) = caps.get(2) {
            (m.as_str(), "\"")
        } else if let Some(m) = caps.get(3) {
            (m.as_str(), "'")
        } else {
            (caps.get(4).map_or("", |m| m.as_str()), "")
        };

        let resolved = resolve(value, base);
        format!("{attr}={quote}{resolved}{quote}")
    })
}

fn resolve<'a>(value: &'a str, base: &Url) -> Cow<'a, str> {
    if value.is_empty() || LinkKind::parse(value).is_absolute() {
        return Cow::Borrowed(value);
    }
    match base.join(value) {
        Ok(url) => Cow::Owned(url.into()),
        Err(_) => Cow::Borrowed(value),
    }
}
