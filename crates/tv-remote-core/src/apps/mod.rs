//! Translation tables for app names and remote key names.
//!
//! The TV identifies installed apps by Tizen app ids and remote buttons by
//! `KEY_*` codes.  Humans type `netflix` or `volup`; these helpers bridge the
//! two.  Both lookups are best-effort: anything unknown passes through so new
//! apps and keys work without a table update.

/// Known Tizen app ids for the streaming (OTT) apps used in validation.
///
/// Order matters: the OTT validation sequence launches them in this order.
pub const OTT_APP_IDS: &[(&str, &str)] = &[
    ("netflix", "3201907018807"),
    ("youtube", "111299001912"),
    ("spotify", "3201606009684"),
];

/// Dedicated remote keys that open streaming apps on some models.
pub const OTT_KEYS: &[&str] = &["KEY_NETFLIX", "KEY_YOUTUBE", "KEY_APP_LIST"];

/// Prefix every remote key code carries.
pub const KEY_PREFIX: &str = "KEY_";

/// Looks up the app id for a human app name (case-insensitive).
///
/// Returns `None` for names not in [`OTT_APP_IDS`].
pub fn known_app_id(name: &str) -> Option<&'static str> {
    OTT_APP_IDS
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(name))
        .map(|(_, id)| *id)
}

/// Resolves an app name to an app id, passing unknown input through verbatim.
///
/// # Examples
///
/// ```rust
/// use tv_remote_core::resolve_app_id;
///
/// assert_eq!(resolve_app_id("netflix"), "3201907018807");
/// assert_eq!(resolve_app_id("hulu"), "hulu");
/// ```
pub fn resolve_app_id(name_or_id: &str) -> String {
    known_app_id(name_or_id)
        .map(str::to_string)
        .unwrap_or_else(|| name_or_id.to_string())
}

/// Normalises a free-form key name to a remote key code.
///
/// Upper-cases the input and adds the `KEY_` prefix when it is missing:
/// `volup` → `KEY_VOLUP`, `key_home` → `KEY_HOME`.
pub fn normalize_key_name(raw: &str) -> String {
    let upper = raw.trim().to_ascii_uppercase();
    if upper.starts_with(KEY_PREFIX) {
        upper
    } else {
        format!("{KEY_PREFIX}{upper}")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
