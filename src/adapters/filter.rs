use std::fmt;

/// PostgREST 風格的過濾條件。只支援等值與集合成員判斷，多個條件以 AND
/// 串接（同一個請求的多組 query pair 即為 AND）。這正是 filtered update
/// 需要的謂詞語言，不多不少。
#[derive(Debug, Clone, Default)]
pub struct Filter {
    pairs: Vec<(String, String)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// `column = value`
    pub fn eq(mut self, column: &str, value: impl fmt::Display) -> Self {
        self.pairs.push((column.to_string(), format!("eq.{}", value)));
        self
    }

    /// `column ∈ values`。呼叫端負責給出確定性的順序（BTreeSet 即可）。
    pub fn in_set<I, T>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: fmt::Display,
    {
        let joined = values
            .into_iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.pairs
            .push((column.to_string(), format!("in.({})", joined)));
        self
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::GiftId;
    use std::collections::BTreeSet;

    #[test]
    fn test_eq_filter_renders_postgrest_pair() {
        let filter = Filter::new().eq("reservado", false);
        assert_eq!(
            filter.pairs(),
            &[("reservado".to_string(), "eq.false".to_string())]
        );
    }

    #[test]
    fn test_in_set_uses_deterministic_order() {
        let ids: BTreeSet<GiftId> = [GiftId::from("b"), GiftId::from("a"), GiftId::from("c")]
            .into_iter()
            .collect();
        let filter = Filter::new().in_set("id", &ids);
        assert_eq!(
            filter.pairs(),
            &[("id".to_string(), "in.(a,b,c)".to_string())]
        );
    }

    #[test]
    fn test_combined_filters_are_anded_as_pairs() {
        let ids: BTreeSet<GiftId> = [GiftId::from("g1"), GiftId::from("g2")]
            .into_iter()
            .collect();
        let filter = Filter::new().in_set("id", &ids).eq("reservado", false);

        assert_eq!(filter.pairs().len(), 2);
        assert_eq!(filter.pairs()[0].1, "in.(g1,g2)");
        assert_eq!(filter.pairs()[1].1, "eq.false");
    }

    #[test]
    fn test_empty_filter() {
        assert!(Filter::new().is_empty());
        assert!(!Filter::new().eq("id", "x").is_empty());
    }
}
