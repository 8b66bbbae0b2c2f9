use nucleo::{
    pattern::{AtomKind, CaseMatching, Normalization, Pattern},
    Config, Matcher, Utf32Str,
};

use lunchwheel_core::food::FoodOption;

/// Result of fuzzy matching: the original item index and its score.
#[derive(Debug, Clone)]
pub struct FuzzyMatch {
    pub index: usize,
    pub score: u32,
}

/// A fuzzy matcher backed by nucleo.
pub struct FuzzyFilter {
    matcher: Matcher,
}

impl FuzzyFilter {
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(Config::DEFAULT),
        }
    }

    /// Filter a list of strings by a query pattern.
    /// Returns indices and scores, best first. An empty query keeps every item in order.
    pub fn filter(&mut self, query: &str, items: &[String]) -> Vec<FuzzyMatch> {
        let query = query.trim();
        if query.is_empty() {
            return (0..items.len())
                .map(|index| FuzzyMatch { index, score: 0 })
                .collect();
        }

        let pattern = Pattern::new(
            query,
            CaseMatching::Ignore,
            Normalization::Smart,
            AtomKind::Fuzzy,
        );

        let mut buf = Vec::new();
        let mut matches: Vec<FuzzyMatch> = items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| {
                let haystack = Utf32Str::new(item, &mut buf);
                let score = pattern.score(haystack, &mut self.matcher)?;
                Some(FuzzyMatch { index: i, score })
            })
            .collect();

        // Stable sort keeps catalog order among equal scores
        matches.sort_by(|a, b| b.score.cmp(&a.score));
        matches
    }

    /// Catalog indices of options whose label matches `query`.
    pub fn filter_options(&mut self, query: &str, options: &[FoodOption]) -> Vec<usize> {
        let labels: Vec<String> = options.iter().map(|o| o.label.clone()).collect();
        self.filter(query, &labels)
            .into_iter()
            .map(|m| m.index)
            .collect()
    }
}

impl Default for FuzzyFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lunchwheel_core::catalog::Catalog;

    #[test]
    fn test_fuzzy_filter_empty_query() {
        let mut filter = FuzzyFilter::new();
        let items = vec!["Pizza".to_string(), "Ramen".to_string()];
        let matches = filter.filter("  ", &items);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[1].index, 1);
    }

    #[test]
    fn test_fuzzy_filter_matches() {
        let mut filter = FuzzyFilter::new();
        let items = vec![
            "Fried Chicken".to_string(),
            "Sushi".to_string(),
            "Sandwich".to_string(),
        ];
        let matches = filter.filter("sushi", &items);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].index, 1);
    }

    #[test]
    fn test_filter_options_is_case_insensitive() {
        let mut filter = FuzzyFilter::new();
        let catalog = Catalog::builtin();
        let hits = filter.filter_options("DUMP", catalog.options());
        assert_eq!(hits, vec![catalog.find("Dumplings").unwrap()]);
        assert!(filter.filter_options("zzzz", catalog.options()).is_empty());
    }
}
