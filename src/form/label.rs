//! Label derivation

/// Turn a programmatic field name into a display label.
///
/// Splits before every ASCII uppercase letter, lowercases, turns dots into
/// spaces and finally capitalizes the first character only:
/// `numRows` becomes `Num rows` and `a.b.C` becomes `A b  c`.
pub fn make_label_name(name: &str) -> String {
    let mut split = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if i > 0 && ch.is_ascii_uppercase() {
            split.push(' ');
        }
        split.push(ch);
    }

    let lowered = split.to_lowercase().replace('.', " ");

    let mut chars = lowered.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
