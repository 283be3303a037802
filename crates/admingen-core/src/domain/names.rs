//! Deterministic identifier derivation for generated parameters and paths.
//!
//! Everything here is a pure function of its inputs: the same navigation
//! property and column names always derive the same identifiers, which is
//! what makes two generation runs byte-identical.
//!
//! Collisions are possible by construction (two differently-named
//! relations can derive the same parameter when property and column names
//! line up badly). They are deliberately **not** resolved here — the plan
//! surfaces them as a detectable condition and the schema author fixes the
//! names. Guessing a disambiguation rule would silently change the wire
//! contract of already-generated consumers.

/// Reserved separator used when composite key components are concatenated
/// into one combined match value.
///
/// A component value that legitimately contains this character collides
/// with the separator; accepted limitation, not special-cased.
pub const COMBINED_SEPARATOR: char = '|';

/// Derives wire names for generated filter parameters and form fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameAllocator;

impl NameAllocator {
    /// Filter/form parameter for a reference relation:
    /// `<property>_<referencedColumn>`.
    ///
    /// For a multi-column reference this is called once per referenced
    /// column, positionally; the first component's name doubles as the
    /// anchor the combined name is displayed next to.
    pub fn filter_name(&self, property: &str, column: &str) -> String {
        format!("{property}_{column}")
    }

    /// Derived combined-match parameter for a multi-column reference:
    /// `<property>_multi`. Never a wire parameter — computed inside the
    /// controller from the component arrays.
    pub fn combined_name(&self, property: &str) -> String {
        format!("{property}_multi")
    }

    /// Association (many-to-many) parameter:
    /// `mn_<property>_<referencedColumn>`.
    pub fn association_name(&self, property: &str, column: &str) -> String {
        format!("mn_{property}_{column}")
    }
}

/// Join ordered component values into one combined key.
pub fn combined_key<I, S>(components: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for (i, part) in components.into_iter().enumerate() {
        if i > 0 {
            out.push(COMBINED_SEPARATOR);
        }
        out.push_str(part.as_ref());
    }
    out
}

/// Convert an entity identifier to snake_case for artifact paths and
/// route segments (`OrderLine` → `order_line`).
///
/// Handles the identifier conventions schema providers actually emit:
/// PascalCase, camelCase, acronym runs (`HTTPLog` → `http_log`), and
/// explicit `-`/`_`/whitespace separators.
pub fn snake_case(input: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        if let Some(next) = chars.peek() {
            // camelCase transition: "orderLine" → "order" + "Line"
            if c.is_lowercase() && next.is_uppercase() {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }

            // Acronym boundary: "HTTPLog" → "HTTP" + "Log"
            // (Upper, next Upper, next-next lower)
            if c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(|n| n.is_lowercase())
            {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words.join("_")
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_name_is_property_underscore_column() {
        let names = NameAllocator;
        assert_eq!(names.filter_name("Customer", "Id"), "Customer_Id");
        assert_eq!(names.filter_name("Parent", "Id"), "Parent_Id");
    }

    #[test]
    fn association_name_carries_mn_prefix() {
        let names = NameAllocator;
        assert_eq!(names.association_name("Tags", "Id"), "mn_Tags_Id");
    }

    #[test]
    fn combined_name_is_property_multi() {
        assert_eq!(NameAllocator.combined_name("Parent"), "Parent_multi");
    }

    #[test]
    fn derivation_is_deterministic() {
        let names = NameAllocator;
        assert_eq!(
            names.filter_name("Customer", "Id"),
            names.filter_name("Customer", "Id")
        );
    }

    #[test]
    fn combined_key_joins_in_order() {
        assert_eq!(combined_key(["1", "2", "3"]), "1|2|3");
        assert_eq!(combined_key(["solo"]), "solo");
        assert_eq!(combined_key(Vec::<&str>::new()), "");
    }

    #[test]
    fn snake_case_pascal() {
        assert_eq!(snake_case("OrderLine"), "order_line");
        assert_eq!(snake_case("Category"), "category");
    }

    #[test]
    fn snake_case_acronyms() {
        assert_eq!(snake_case("HTTPLog"), "http_log");
        assert_eq!(snake_case("XMLHttpRequest"), "xml_http_request");
    }

    #[test]
    fn snake_case_existing_separators() {
        assert_eq!(snake_case("order_line"), "order_line");
        assert_eq!(snake_case("order-line"), "order_line");
    }
}
