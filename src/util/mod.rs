#[inline]
pub fn is_alphabetic(c: char) -> bool {
    ('a'..='z').contains(&c) || ('A'..='Z').contains(&c) || c == '_'
}

#[inline]
pub fn is_numeric(c: char) -> bool {
    ('0'..='9').contains(&c)
}

#[inline]
pub fn is_alphanumeric(c: char) -> bool {
    is_alphabetic(c) || is_numeric(c)
}

/// Joins the `Display` forms of `items` with `separator`.
pub fn join<T: std::fmt::Display>(items: &[T], separator: &str) -> String {
    items.iter().map(|item| item.to_string()).collect::<Vec<String>>().join(separator)
}
