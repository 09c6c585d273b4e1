//! Display-name resolution.
//!
//! Guild nicknames carry a decorated suffix, e.g. "Ashlynn (Healer)"; the
//! rendered cards want just the bare name in front of it.

/// Extract the display name from a possibly-decorated nickname.
///
/// The substring before the first `(` is taken when the parenthesis appears
/// past the first character; a nickname that *starts* with `(` is kept whole.
/// Either way the result is trimmed. `None` means the name is malformed:
/// empty input, or nothing left after trimming. Command handlers treat `None`
/// as a rejection ("name malformed, cannot register/query").
pub fn resolve_display_name(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }

    let resolved = match raw.find('(') {
        Some(idx) if idx > 0 => raw[..idx].trim(),
        _ => raw.trim(),
    };

    if resolved.is_empty() {
        None
    } else {
        Some(resolved.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::resolve_display_name;

    #[test]
    fn test_resolve_display_name() {
        for (raw, want) in [
            ("Ashlynn (Healer)", Some("Ashlynn")),
            ("Ashlynn", Some("Ashlynn")),
            ("", None),
            ("   ", None),
            ("  Ashlynn  (Tank) (Alt)", Some("Ashlynn")),
            // A leading parenthesis is part of the name, not a suffix.
            ("(Healer)", Some("(Healer)")),
            ("Ash(lynn", Some("Ash")),
            ("名字 (治療)", Some("名字")),
        ] {
            let got = resolve_display_name(raw);
            assert_eq!(want.map(str::to_string), got, "raw: {:?}", raw);
        }
    }
}
