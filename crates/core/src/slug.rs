//! URL slug generation for bootcamp names.

/// Derive a URL-safe slug from a display name.
///
/// Lowercases ASCII alphanumerics and collapses every other run of
/// characters into a single dash; leading and trailing dashes are dropped.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c.to_ascii_lowercase());
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }

    slug
}
