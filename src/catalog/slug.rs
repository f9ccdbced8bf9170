//! URL slugs for products and categories.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Turn a display name into a URL slug.
///
/// "Camiseta Niño Básica" becomes "camiseta-nino-basica".
pub fn slug_from_name(name: &str) -> String {
    let folded: String = name
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    let mut slug = String::with_capacity(folded.len());
    let mut pending_dash = false;
    for c in folded.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '-' {
            pending_dash = true;
        }
        // anything else is dropped without splitting the word
    }
    slug
}

/// Decode percent-escapes. Invalid UTF-8 sequences decode lossily.
pub fn percent_decode(input: &str) -> String {
    let escaped = input.replace('+', "%2B").replace('&', "%26");
    url::form_urlencoded::parse(format!("s={}", escaped).as_bytes())
        .next()
        .map(|(_, value)| value.into_owned())
        .unwrap_or_else(|| input.to_string())
}

/// Candidate identifiers to try when resolving a product by slug, in order:
/// raw, percent-decoded, normalized, decoded then normalized. Duplicates
/// and empty candidates are removed.
pub fn slug_variations(raw: &str) -> Vec<String> {
    let decoded = percent_decode(raw);
    let candidates = [
        raw.to_string(),
        decoded.clone(),
        slug_from_name(raw),
        slug_from_name(&decoded),
    ];

    let mut unique: Vec<String> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !candidate.is_empty() && !unique.contains(&candidate) {
            unique.push(candidate);
        }
    }
    unique
}

/// Detail page path for a product, generating a slug from the name when
/// the product has none.
pub fn product_path(slug: &str, name: &str) -> String {
    if slug.is_empty() {
        format!("/products/{}", slug_from_name(name))
    } else {
        format!("/products/{}", slug)
    }
}
