use chrono::NaiveDate;
use serde::Deserialize;

use super::ActivityError;
use crate::models::ActivityDay;

/// Body of `GET /{identity}.json`. Contributions arrive grouped (one inner list per
/// calendar week); only the grouping is dropped, every day is kept.
#[derive(Debug, Deserialize)]
pub struct ContributionsPayload {
    pub contributions: Vec<Vec<ContributionDay>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionDay {
    pub date: NaiveDate,
    pub contribution_count: u64,
}

impl From<ContributionDay> for ActivityDay {
    fn from(day: ContributionDay) -> Self {
        Self {
            date: day.date,
            count: day.contribution_count,
        }
    }
}

/// Decode a contributions body into a flat day series
pub fn parse_activity(body: &[u8]) -> Result<Vec<ActivityDay>, ActivityError> {
    let payload: ContributionsPayload =
        serde_json::from_slice(body).map_err(|e| ActivityError::Malformed(e.to_string()))?;

    Ok(payload
        .contributions
        .into_iter()
        .flatten()
        .map(ActivityDay::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_flattens_weeks_in_order() {
        let body = br##"{
            "contributions": [
                [
                    {"date": "2023-05-28", "contributionCount": 0, "color": "#ebedf0", "contributionLevel": "NONE"},
                    {"date": "2023-05-29", "contributionCount": 4, "color": "#9be9a8", "contributionLevel": "FIRST_QUARTILE"}
                ],
                [
                    {"date": "2023-06-04", "contributionCount": 12, "color": "#40c463", "contributionLevel": "SECOND_QUARTILE"}
                ]
            ],
            "totalContributions": 16
        }"##;

        let days = parse_activity(body).unwrap();

        assert_eq!(
            days,
            vec![
                ActivityDay { date: date(2023, 5, 28), count: 0 },
                ActivityDay { date: date(2023, 5, 29), count: 4 },
                ActivityDay { date: date(2023, 6, 4), count: 12 },
            ]
        );
    }

    #[test]
    fn test_empty_contributions() {
        assert!(parse_activity(br#"{"contributions": []}"#).unwrap().is_empty());
        assert!(parse_activity(br#"{"contributions": [[], []]}"#).unwrap().is_empty());
    }

    #[test]
    fn test_missing_contributions_field() {
        let err = parse_activity(br#"{"totalContributions": 3}"#).unwrap_err();
        assert!(matches!(err, ActivityError::Malformed(_)));
    }

    #[test]
    fn test_bad_date_is_malformed() {
        let body = br#"{"contributions": [[{"date": "06/01/2023", "contributionCount": 1}]]}"#;
        assert!(matches!(parse_activity(body), Err(ActivityError::Malformed(_))));
    }

    #[test]
    fn test_negative_or_fractional_count_is_malformed() {
        let negative = br#"{"contributions": [[{"date": "2023-06-01", "contributionCount": -1}]]}"#;
        let fractional = br#"{"contributions": [[{"date": "2023-06-01", "contributionCount": 1.5}]]}"#;

        assert!(matches!(parse_activity(negative), Err(ActivityError::Malformed(_))));
        assert!(matches!(parse_activity(fractional), Err(ActivityError::Malformed(_))));
    }

    #[test]
    fn test_not_json() {
        assert!(matches!(parse_activity(b"<html>rate limited</html>"), Err(ActivityError::Malformed(_))));
    }
}
