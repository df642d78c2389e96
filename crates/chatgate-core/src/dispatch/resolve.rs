//! Text-to-route classification.
//!
//! Pure function of the message body, the prefix and two flags, so every
//! branch of the resolution order can be tested without a registry.

/// Command name that is reachable without the prefix.
pub const PREFIX_COMMAND: &str = "prefix";

/// Where one message body should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// The bare `prefix` token. Words are lowercased, token included.
    PrefixBypass { words: Vec<String> },
    /// A prefixed invocation. `name` is lowercased; `words` keep the
    /// original case and include the invocation token.
    Command { name: String, words: Vec<String> },
    /// Non-command text from an admin. Words keep the original case.
    AdminText { words: Vec<String> },
    /// Non-command text from anyone else.
    Ignore,
}

/// Classify `body`.
///
/// Order matters: the bare `prefix` token is checked before the prefix
/// itself, so it works even when the user does not know the prefix.
pub fn resolve(body: &str, prefix: &str, has_prefix_command: bool, is_admin: bool) -> Route {
    let lowered = body.to_lowercase();
    let words = split_words(&lowered);

    if has_prefix_command && words.first().map(String::as_str) == Some(PREFIX_COMMAND) {
        return Route::PrefixBypass { words };
    }

    if let Some(rest) = lowered.strip_prefix(prefix) {
        let name = rest.split_whitespace().next().unwrap_or_default().to_string();
        return Route::Command {
            name,
            words: split_words(body),
        };
    }

    if is_admin {
        return Route::AdminText {
            words: split_words(body),
        };
    }

    Route::Ignore
}

fn split_words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}
