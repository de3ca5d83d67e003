use std::collections::BTreeMap;

use axum_extra::extract::cookie::{Cookie, CookieJar};

const COOKIE_NAME: &str = "flash";

/// Which write operation a status flag reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Save,
    Update,
    Delete,
}

impl FlashKind {
    pub fn key(self) -> &'static str {
        match self {
            FlashKind::Save => "saveStatus",
            FlashKind::Update => "UpdateStatus",
            FlashKind::Delete => "DeleteStatus",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "saveStatus" => Some(FlashKind::Save),
            "UpdateStatus" => Some(FlashKind::Update),
            "DeleteStatus" => Some(FlashKind::Delete),
            _ => None,
        }
    }
}

fn encode(kind: FlashKind, ok: bool) -> String {
    format!("{}.{}", kind.key(), ok)
}

fn decode(value: &str) -> Option<(FlashKind, bool)> {
    let (key, ok) = value.split_once('.')?;
    let kind = FlashKind::from_key(key)?;
    let ok = ok.parse().ok()?;
    Some((kind, ok))
}

/// Adds the status flag for the next rendered view.
pub fn set(jar: CookieJar, kind: FlashKind, ok: bool) -> CookieJar {
    let cookie = Cookie::build((COOKIE_NAME, encode(kind, ok)))
        .path("/")
        .http_only(true);
    jar.add(cookie)
}

/// Consumes the pending status flag, if any. The returned jar removes the
/// cookie so the flag is shown once.
pub fn take(jar: CookieJar) -> (CookieJar, BTreeMap<&'static str, bool>) {
    let mut flags = BTreeMap::new();
    let Some(value) = jar.get(COOKIE_NAME).map(|c| c.value().to_string()) else {
        return (jar, flags);
    };

    if let Some((kind, ok)) = decode(&value) {
        flags.insert(kind.key(), ok);
    }
    let jar = jar.remove(Cookie::build(COOKIE_NAME).path("/"));
    (jar, flags)
}
