//! Keyword-based category suggestion for expense descriptions.

/// Proposes a category by case-insensitive keyword containment. The first
/// rule whose keyword appears in the description wins; rules are consulted
/// in insertion order.
pub struct CategorySuggester {
    rules: Vec<(String, Vec<String>)>,
}

impl CategorySuggester {
    pub fn new(rules: Vec<(String, Vec<String>)>) -> Self {
        Self {
            rules: rules
                .into_iter()
                .map(|(category, keywords)| {
                    let keywords = keywords
                        .into_iter()
                        .map(|keyword| keyword.to_lowercase())
                        .collect();
                    (category, keywords)
                })
                .collect(),
        }
    }

    /// The built-in keyword table the dashboard ships with.
    pub fn with_defaults() -> Self {
        let rule = |category: &str, keywords: &[&str]| {
            (
                category.to_string(),
                keywords.iter().map(|k| k.to_string()).collect(),
            )
        };
        Self::new(vec![
            rule(
                "Food",
                &[
                    "pizza",
                    "restaurant",
                    "lunch",
                    "dinner",
                    "coffee",
                    "groceries",
                    "breakfast",
                    "snacks",
                ],
            ),
            rule(
                "Travel",
                &["uber", "taxi", "flight", "train", "bus", "cab", "fuel", "petrol"],
            ),
            rule(
                "Bills",
                &["electricity", "water", "internet", "phone", "gas", "rent"],
            ),
        ])
    }

    pub fn suggest(&self, description: &str) -> Option<&str> {
        let lowered = description.to_lowercase();
        self.rules
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|keyword| lowered.contains(keyword)))
            .map(|(category, _)| category.as_str())
    }
}

impl Default for CategorySuggester {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_are_case_insensitive() {
        let suggester = CategorySuggester::with_defaults();
        assert_eq!(suggester.suggest("PIZZA night"), Some("Food"));
        assert_eq!(suggester.suggest("Uber to airport"), Some("Travel"));
        assert_eq!(suggester.suggest("monthly rent"), Some("Bills"));
    }

    #[test]
    fn unmatched_descriptions_yield_nothing() {
        let suggester = CategorySuggester::with_defaults();
        assert_eq!(suggester.suggest("mystery purchase"), None);
    }

    #[test]
    fn earlier_rules_win_ties() {
        let suggester = CategorySuggester::new(vec![
            ("A".into(), vec!["shared".into()]),
            ("B".into(), vec!["shared".into()]),
        ]);
        assert_eq!(suggester.suggest("shared keyword"), Some("A"));
    }
}
