//! Alternate orderings of the derived tables.
//!
//! The transforms return each table in its canonical order. The dashboard also
//! ranks some of them by a different measure (categories by seller breadth or
//! review score, customers by each RFM dimension); those orderings live here so
//! the canonical tables stay untouched.

use crate::tables::{CategorySummary, RfmScore};
use std::cmp::Ordering;

/// The first `n` rows of an already ranked table.
pub fn top_n<T>(rows: &[T], n: usize) -> &[T] {
    &rows[..n.min(rows.len())]
}

pub fn categories_by_seller_count(categories: &[CategorySummary]) -> Vec<CategorySummary> {
    let mut ranked = categories.to_vec();
    ranked.sort_by(|a, b| {
        b.seller_count
            .cmp(&a.seller_count)
            .then_with(|| a.product_category_name_english.cmp(&b.product_category_name_english))
    });
    ranked
}

/// Best rated first. Categories without any review sort last.
pub fn categories_by_review_score(categories: &[CategorySummary]) -> Vec<CategorySummary> {
    let mut ranked = categories.to_vec();
    ranked.sort_by(|a, b| {
        descending_option(&a.review_score, &b.review_score)
            .then_with(|| a.product_category_name_english.cmp(&b.product_category_name_english))
    });
    ranked
}

/// Most recent customers first (smallest recency).
pub fn customers_by_recency(scores: &[RfmScore]) -> Vec<RfmScore> {
    let mut ranked = scores.to_vec();
    ranked.sort_by(|a, b| {
        a.recency
            .cmp(&b.recency)
            .then_with(|| a.customer_unique_id.cmp(&b.customer_unique_id))
    });
    ranked
}

pub fn customers_by_frequency(scores: &[RfmScore]) -> Vec<RfmScore> {
    let mut ranked = scores.to_vec();
    ranked.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then_with(|| a.customer_unique_id.cmp(&b.customer_unique_id))
    });
    ranked
}

pub fn customers_by_monetary(scores: &[RfmScore]) -> Vec<RfmScore> {
    let mut ranked = scores.to_vec();
    ranked.sort_by(|a, b| {
        b.monetary
            .cmp(&a.monetary)
            .then_with(|| a.customer_unique_id.cmp(&b.customer_unique_id))
    });
    ranked
}

fn descending_option<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn category(name: &str, sellers: u64, score: Option<Decimal>) -> CategorySummary {
        CategorySummary {
            product_category_name_english: name.to_string(),
            order_count: 1,
            seller_count: sellers,
            review_score: score,
        }
    }

    fn score(id: &str, frequency: u64, monetary: Decimal, recency: i64) -> RfmScore {
        RfmScore {
            customer_unique_id: id.to_string(),
            frequency,
            monetary,
            recency,
        }
    }

    fn names(categories: &[CategorySummary]) -> Vec<&str> {
        categories
            .iter()
            .map(|c| c.product_category_name_english.as_str())
            .collect()
    }

    fn ids(scores: &[RfmScore]) -> Vec<&str> {
        scores.iter().map(|s| s.customer_unique_id.as_str()).collect()
    }

    #[test]
    fn top_n_clamps_to_table_length() {
        let rows = [1, 2, 3];
        assert_eq!(top_n(&rows, 2), &[1, 2]);
        assert_eq!(top_n(&rows, 10), &[1, 2, 3]);
        assert!(top_n::<u8>(&[], 5).is_empty());
    }

    #[test]
    fn categories_rank_by_sellers_and_by_score() {
        let categories = [
            category("toys", 3, Some(dec!(4.10))),
            category("books", 5, None),
            category("garden", 3, Some(dec!(4.75))),
        ];
        assert_eq!(names(&categories_by_seller_count(&categories)), ["books", "garden", "toys"]);
        assert_eq!(names(&categories_by_review_score(&categories)), ["garden", "toys", "books"]);
    }

    #[test]
    fn customers_rank_by_each_rfm_dimension() {
        let scores = [
            score("a", 1, dec!(99.90), 30),
            score("b", 4, dec!(12.00), 2),
            score("c", 4, dec!(250.00), 2),
        ];
        assert_eq!(ids(&customers_by_recency(&scores)), ["b", "c", "a"]);
        assert_eq!(ids(&customers_by_frequency(&scores)), ["b", "c", "a"]);
        assert_eq!(ids(&customers_by_monetary(&scores)), ["c", "a", "b"]);
    }
}
