use unicode_normalization::UnicodeNormalization;

use super::CharFilter;

/// A char filter that keeps only ASCII characters.
///
/// The input is NFKD-decomposed first, so accented letters keep their base
/// letter (`jalapeño` becomes `jalapeno`) and compatibility characters such as
/// `½` expand to their ASCII parts. Everything else outside ASCII is dropped.
#[derive(Clone, Debug, Default)]
pub struct AsciiFoldingCharFilter;

impl AsciiFoldingCharFilter {
    pub fn new() -> Self {
        AsciiFoldingCharFilter
    }
}

impl CharFilter for AsciiFoldingCharFilter {
    fn filter(&self, input: &str) -> String {
        if input.is_ascii() {
            return input.to_string();
        }
        input.nfkd().filter(char::is_ascii).collect()
    }

    fn name(&self) -> &'static str {
        "ascii_folding"
    }
}
