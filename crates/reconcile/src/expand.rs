//! Environment-variable and `~` expansion for paths written in lists

use std::borrow::Cow;
use std::convert::Infallible;

/// Expand `~`, `$VAR` and `${VAR}` in `input` (and `%VAR%` on Windows).
///
/// Each reference is resolved on its own: unset variables stay as written
/// while the ones that are set are still substituted.
pub fn expand_vars(input: &str) -> String {
    expand_with(input, |name| std::env::var(name).ok())
}

fn expand_with<F>(input: &str, mut lookup: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let input: Cow<'_, str> = if cfg!(windows) {
        Cow::Owned(expand_percent_vars(input, &mut lookup))
    } else {
        Cow::Borrowed(input)
    };

    let expanded = shellexpand::env_with_context(input.as_ref(), |name| {
        Ok::<_, Infallible>(lookup(name))
    })
    .map_or_else(|_| input.to_string(), Cow::into_owned);

    shellexpand::tilde(&expanded).into_owned()
}

/// Expand `%VAR%` references. `%%` collapses to `%`, an unterminated `%`
/// is kept as is.
fn expand_percent_vars<F>(input: &str, mut lookup: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(len) = after.find('%') else {
            out.push_str(&rest[start..]);
            return out;
        };

        let name = &after[..len];
        if name.is_empty() {
            out.push('%');
        } else if let Some(value) = lookup(name) {
            out.push_str(&value);
        } else {
            out.push('%');
            out.push_str(name);
            out.push('%');
        }
        rest = &after[len + 1..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_env(name: &str) -> Option<String> {
        match name {
            "HOME" => Some("/home/talon".to_string()),
            "APPDATA" => Some(r"C:\Users\talon\AppData\Roaming".to_string()),
            _ => None,
        }
    }

    #[test]
    fn set_variables_expand_next_to_unset_ones() {
        assert_eq!(
            expand_with("$HOME/$TAIP_NOT_SET/git", fake_env),
            "/home/talon/$TAIP_NOT_SET/git"
        );
        assert_eq!(
            expand_with("${HOME}/bin/${TAIP_NOT_SET}", fake_env),
            "/home/talon/bin/${TAIP_NOT_SET}"
        );
    }

    #[test]
    fn plain_values_are_unchanged() {
        assert_eq!(expand_with("code", fake_env), "code");
        assert_eq!(expand_with("/usr/bin/git", fake_env), "/usr/bin/git");
    }

    #[test]
    fn tilde_expands_to_home() {
        let Some(home) = home_dir() else {
            return;
        };
        assert_eq!(expand_with("~/bin/git", fake_env), format!("{}/bin/git", home));
    }

    fn home_dir() -> Option<String> {
        match shellexpand::tilde("~") {
            Cow::Owned(home) => Some(home),
            Cow::Borrowed(_) => None,
        }
    }

    #[test]
    fn percent_variables_expand_individually() {
        assert_eq!(
            expand_percent_vars(r"%APPDATA%\Code\%TAIP_NOT_SET%\code.cmd", fake_env),
            r"C:\Users\talon\AppData\Roaming\Code\%TAIP_NOT_SET%\code.cmd"
        );
    }

    #[test]
    fn percent_edge_cases() {
        assert_eq!(expand_percent_vars("100%% done", fake_env), "100% done");
        assert_eq!(expand_percent_vars("50% off", fake_env), "50% off");
        assert_eq!(expand_percent_vars("no vars", fake_env), "no vars");
    }

    #[cfg(windows)]
    #[test]
    fn percent_variables_apply_on_windows() {
        assert_eq!(
            expand_with(r"%APPDATA%\Code\bin\code.cmd", fake_env),
            r"C:\Users\talon\AppData\Roaming\Code\bin\code.cmd"
        );
    }
}
