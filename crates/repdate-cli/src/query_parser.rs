use chrono::{DateTime, Utc};
use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;

use repdate_core::dates::parse_date;
use repdate_core::error::CoreError;
use repdate_core::query::DateFilter;

#[derive(Parser)]
#[grammar = "filter.pest"]
pub struct FilterParser;

#[derive(Error, Debug)]
pub enum FilterParseError {
    #[error("Pest parsing error: {0}")]
    Pest(#[from] pest::error::Error<Rule>),
    #[error("Invalid date in filter: {0}")]
    InvalidDate(#[from] CoreError),
    #[error("Empty filter")]
    Empty,
    #[error("Unknown rule: {0:?}")]
    UnknownRule(Rule),
}

/// Parses `"<date> to <date>"` into a range filter and anything else into a
/// single-date filter. Dates are resolved relative to `now`.
pub fn parse_filter(input: &str, now: DateTime<Utc>) -> Result<DateFilter, FilterParseError> {
    let pair = FilterParser::parse(Rule::filter, input)?
        .next()
        .ok_or(FilterParseError::Empty)?;

    match pair.as_rule() {
        Rule::range => {
            let mut dates = pair.into_inner();
            let from = dates.next().ok_or(FilterParseError::Empty)?;
            let to = dates.next().ok_or(FilterParseError::Empty)?;
            Ok(DateFilter::range(
                parse_date(from.as_str().trim(), now)?,
                parse_date(to.as_str().trim(), now)?,
            ))
        }
        Rule::single => Ok(DateFilter::From(parse_date(pair.as_str().trim(), now)?)),
        rule => Err(FilterParseError::UnknownRule(rule)),
    }
}
