//! Text rendering utilities for human-friendly error messages.
//!
//! Provides helpers to shorten type names into resolver kinds,
//! and to suggest close matches when an identifier is missing.

/// Shortens a fully qualified type name for display.
///
/// ```
/// use tawsil_support::rendering::shorten_type_name;
///
/// let short = shorten_type_name("my_app::services::user::UserService");
/// assert_eq!(short, "UserService");
///
/// let short = shorten_type_name("alloc::sync::Arc<dyn my_app::traits::Logger>");
/// assert_eq!(short, "Arc<dyn Logger>");
/// ```
pub fn shorten_type_name(full_name: &str) -> String {
    let mut result = String::with_capacity(full_name.len());
    let mut chars = full_name.chars().peekable();
    let mut current_segment = String::new();

    while let Some(ch) = chars.next() {
        match ch {
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                current_segment.clear();
            }
            '<' | '>' | ',' | ' ' | '&' => {
                result.push_str(&current_segment);
                result.push(ch);
                current_segment.clear();
            }
            _ => {
                current_segment.push(ch);
            }
        }
    }

    result.push_str(&current_segment);
    result
}

/// Reduces a short type name to the type it points at.
///
/// Drops references, one `Arc<...>` / `Rc<...>` / `Box<...>` wrapper, `dyn`
/// and any `+ Send + Sync` style bounds.
///
/// ```
/// use tawsil_support::rendering::unwrap_pointer_name;
///
/// assert_eq!(unwrap_pointer_name("Arc<SomeType>"), "SomeType");
/// assert_eq!(unwrap_pointer_name("Arc<dyn Logger + Send + Sync>"), "Logger");
/// assert_eq!(unwrap_pointer_name("&dyn Logger"), "Logger");
/// assert_eq!(unwrap_pointer_name("SomeType"), "SomeType");
/// ```
pub fn unwrap_pointer_name(short_name: &str) -> &str {
    let mut name = strip_reference(short_name.trim());
    for wrapper in ["Arc<", "Rc<", "Box<"] {
        if let Some(inner) = name
            .strip_prefix(wrapper)
            .and_then(|rest| rest.strip_suffix('>'))
        {
            name = strip_reference(inner.trim());
            break;
        }
    }

    let name = name.strip_prefix("dyn ").unwrap_or(name);
    match top_level_plus(name) {
        Some(at) => name[..at].trim(),
        None => name.trim(),
    }
}

fn strip_reference(name: &str) -> &str {
    let Some(rest) = name.strip_prefix('&') else {
        return name;
    };
    let rest = rest.trim_start();
    let rest = match rest.strip_prefix('\'') {
        Some(lifetime) => lifetime
            .split_once(' ')
            .map_or(lifetime, |(_, after)| after)
            .trim_start(),
        None => rest,
    };
    rest.strip_prefix("mut ").unwrap_or(rest).trim_start()
}

/// Byte offset of the first `+` outside angle brackets.
fn top_level_plus(name: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (at, ch) in name.char_indices() {
        match ch {
            '<' | '(' => depth += 1,
            '>' | ')' => depth = depth.saturating_sub(1),
            '+' if depth == 0 => return Some(at),
            _ => {}
        }
    }
    None
}

/// Returns `true` for type names that carry no useful "kind" for resolution.
///
/// Scalars, strings and std collections say nothing about *which* service is
/// wanted, so parameters of these types resolve through untyped resolvers.
///
/// ```
/// use tawsil_support::rendering::is_untyped_name;
///
/// assert!(is_untyped_name("String"));
/// assert!(is_untyped_name("Vec<u8>"));
/// assert!(!is_untyped_name("Database"));
/// ```
pub fn is_untyped_name(short_name: &str) -> bool {
    const UNTYPED: &[&str] = &[
        "bool", "char", "str", "String", "&str", "&'static str", "i8", "i16", "i32", "i64",
        "i128", "isize", "u8", "u16", "u32", "u64", "u128", "usize", "f32", "f64", "()",
    ];
    const CONTAINERS: &[&str] = &["Vec<", "Option<", "HashMap<", "BTreeMap<", "HashSet<"];

    UNTYPED.contains(&short_name)
        || CONTAINERS.iter().any(|prefix| short_name.starts_with(prefix))
}

/// Generates a "did you mean?" suggestion based on registered identifiers.
///
/// Compares the requested name against available names
/// and suggests close matches, best first.
pub fn suggest_similar(
    requested: &str,
    available: &[&str],
    max_suggestions: usize,
) -> Vec<String> {
    let requested_lower = requested.to_lowercase();
    let requested_short = shorten_type_name(requested).to_lowercase();

    if requested_lower.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(&str, usize)> = available
        .iter()
        .filter_map(|&name| {
            let name_lower = name.to_lowercase();
            let name_short = shorten_type_name(name).to_lowercase();

            if name_lower == requested_lower {
                return None;
            }

            if name_lower.contains(&requested_lower) || requested_lower.contains(&name_lower) {
                return Some((name, 100));
            }

            if name_short.contains(&requested_short) || requested_short.contains(&name_short) {
                return Some((name, 80));
            }

            let common = name_short
                .chars()
                .zip(requested_short.chars())
                .take_while(|(a, b)| a == b)
                .count();

            if common >= 3 {
                return Some((name, common * 10));
            }

            None
        })
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(name, _)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorten_simple_path() {
        assert_eq!(
            shorten_type_name("my_app::services::UserService"),
            "UserService"
        );
    }

    #[test]
    fn shorten_with_generics() {
        assert_eq!(
            shorten_type_name("alloc::sync::Arc<dyn my_app::traits::Logger>"),
            "Arc<dyn Logger>"
        );
    }

    #[test]
    fn shorten_no_path() {
        assert_eq!(shorten_type_name("String"), "String");
    }

    #[test]
    fn unwrap_box_and_plain() {
        assert_eq!(unwrap_pointer_name("Box<Mailer>"), "Mailer");
        assert_eq!(unwrap_pointer_name("Mailer"), "Mailer");
    }

    #[test]
    fn unwrap_drops_bounds_and_references() {
        assert_eq!(unwrap_pointer_name("Arc<dyn Mailer + Send + Sync>"), "Mailer");
        assert_eq!(unwrap_pointer_name("&dyn Mailer"), "Mailer");
        assert_eq!(unwrap_pointer_name("&'static mut Mailer"), "Mailer");
        assert_eq!(unwrap_pointer_name("&Arc<dyn Mailer + Send>"), "Mailer");
        assert_eq!(unwrap_pointer_name("Box<dyn Handler<Arc<A>, B> + Send>"), "Handler<Arc<A>, B>");
    }

    #[test]
    fn std_types_are_untyped() {
        assert!(is_untyped_name("u64"));
        assert!(is_untyped_name("Option<String>"));
        assert!(!is_untyped_name("UserRepository"));
    }

    #[test]
    fn suggest_similar_ids() {
        let available = vec!["user_service", "user_repository", "logger", "database"];

        let suggestions = suggest_similar("user_servise", &available, 3);
        assert!(!suggestions.is_empty());
        assert_eq!(suggestions[0], "user_service");
    }

    #[test]
    fn suggest_skips_exact_match() {
        let available = vec!["logger"];
        assert!(suggest_similar("logger", &available, 3).is_empty());
    }

    #[test]
    fn suggest_no_match() {
        let available = vec!["database"];
        let suggestions = suggest_similar("xyzabcdef", &available, 3);
        assert!(suggestions.is_empty());
    }
}
