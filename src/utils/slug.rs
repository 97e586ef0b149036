/// Builds a URL-safe slug from a product title and its row id.
///
/// The title is lowercased, runs of non-alphanumeric characters collapse to a
/// single hyphen, and edge hyphens are trimmed. A short hex rendering of the
/// id is appended so retitled or identically-named products never collide.
pub fn product_slug(title: &str, id: i32) -> String {
    let base = slugify(title);
    if base.is_empty() {
        format!("product-{:06x}", id)
    } else {
        format!("{}-{:06x}", base, id)
    }
}

fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_hyphen = true;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_hyphen = false;
        } else if !last_hyphen {
            slug.push('-');
            last_hyphen = true;
        }
    }

    if slug.ends_with('-') {
        slug.pop();
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(product_slug("Blue Pottery Vase", 255), "blue-pottery-vase-0000ff");
    }

    #[test]
    fn collapses_punctuation_runs() {
        assert_eq!(product_slug("Hand-Woven!! Silk  Saree", 1), "hand-woven-silk-saree-000001");
    }

    #[test]
    fn trims_edge_hyphens() {
        let slug = product_slug("  *Brass Diya*  ", 42);
        assert!(!slug.starts_with('-'));
        assert!(!slug.ends_with('-'));
        assert_eq!(slug, "brass-diya-00002a");
    }

    #[test]
    fn non_ascii_title_falls_back_to_id() {
        assert_eq!(product_slug("मिट्टी का दीया", 7), "product-000007");
    }

    #[test]
    fn same_title_different_ids_stay_unique() {
        assert_ne!(product_slug("Clay Pot", 10), product_slug("Clay Pot", 11));
    }
}
