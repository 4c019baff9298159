use thiserror::Error;

use crate::models::{Dataset, SkillColumn};

/// A skill cell held a token that does not parse as an integer rating.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{column} row {row}: {token:?} is not an integer rating")]
pub struct RatingParseError {
    pub column: &'static str,
    pub row: usize,
    pub token: String,
}

/// Flatten a skill column of comma-separated rating strings into one
/// sequence of integers, in row-then-position order.
///
/// Every cell must hold at least one rating; surrounding whitespace per
/// token is tolerated, anything else fails the whole column.
pub fn flatten_ratings(
    data: &Dataset,
    skill: SkillColumn,
) -> Result<Vec<i64>, RatingParseError> {
    let mut ratings = Vec::new();

    for (row, record) in data.records().iter().enumerate() {
        for token in skill.cell(record).split(',') {
            let rating = token.trim().parse::<i64>().map_err(|_| RatingParseError {
                column: skill.column_name(),
                row,
                token: token.trim().to_string(),
            })?;
            ratings.push(rating);
        }
    }

    Ok(ratings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_record;

    fn dataset(sk1_cells: &[&str]) -> Dataset {
        Dataset::new(
            sk1_cells
                .iter()
                .map(|cell| sample_record(0.0, "yes", cell))
                .collect(),
        )
    }

    #[test]
    fn output_length_matches_token_count() {
        let data = dataset(&["1,2,3", "4", "5,6"]);
        let ratings = flatten_ratings(&data, SkillColumn::Sk1).unwrap();
        assert_eq!(ratings.len(), 6);
    }

    #[test]
    fn flattens_in_row_then_position_order() {
        let data = dataset(&["1,2", "3"]);
        let ratings = flatten_ratings(&data, SkillColumn::Sk1).unwrap();
        assert_eq!(ratings, vec![1, 2, 3]);
    }

    #[test]
    fn three_row_scenario() {
        let data = dataset(&["3,4", "2", "4,4,1"]);
        let ratings = flatten_ratings(&data, SkillColumn::Sk1).unwrap();
        assert_eq!(ratings.len(), 6);
        let mut sorted = ratings.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![1, 2, 3, 4, 4, 4]);
    }

    #[test]
    fn tolerates_whitespace_around_tokens() {
        let data = dataset(&["3 , 4", " 2"]);
        let ratings = flatten_ratings(&data, SkillColumn::Sk1).unwrap();
        assert_eq!(ratings, vec![3, 4, 2]);
    }

    #[test]
    fn non_integer_token_reports_row_and_token() {
        let data = dataset(&["1,2", "3,x,4"]);
        let err = flatten_ratings(&data, SkillColumn::Sk1).unwrap_err();
        assert_eq!(err.column, "sk1_classroom");
        assert_eq!(err.row, 1);
        assert_eq!(err.token, "x");
    }

    #[test]
    fn empty_cell_is_an_error() {
        let data = dataset(&["1", ""]);
        let err = flatten_ratings(&data, SkillColumn::Sk1).unwrap_err();
        assert_eq!(err.row, 1);
        assert_eq!(err.token, "");
    }
}
