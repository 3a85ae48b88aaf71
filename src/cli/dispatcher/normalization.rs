use std::ffi::OsString;

/// Rewrite the legacy single-dash `-src` flag to `--source`.
///
/// Without this clap would read `-src` as `-s rc`.
pub fn normalize_legacy_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| match arg.to_str() {
            Some("-src") => OsString::from("--source"),
            Some(text) => match text.strip_prefix("-src=") {
                Some(value) => OsString::from(format!("--source={}", value)),
                None => arg,
            },
            None => arg,
        })
        .collect()
}
