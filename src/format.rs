//! Prose formatting for name lists.

/// Join names as English prose: `A`, `A and B`, `A, B, and C`.
///
/// An empty list yields an empty string.
pub fn format_name_list<S: AsRef<str>>(names: &[S]) -> String {
    match names {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [first, second] => format!("{} and {}", first.as_ref(), second.as_ref()),
        [rest @ .., last] => {
            let head: Vec<&str> = rest.iter().map(|n| n.as_ref()).collect();
            format!("{}, and {}", head.join(", "), last.as_ref())
        }
    }
}

/// Labelled organizer line, singular or plural depending on the count.
pub fn organizer_label<S: AsRef<str>>(names: &[S]) -> String {
    match names.len() {
        0 => String::new(),
        1 => format!("Organizer: {}", format_name_list(names)),
        _ => format!("Organizers: {}", format_name_list(names)),
    }
}
