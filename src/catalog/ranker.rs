//! Newest-first ordering of model identifiers

use chrono::{Datelike, NaiveDate};
use std::cmp::Ordering;

/// Variant tier, used to break ties between models sharing a base name
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    Unrecognized = 0,
    Mini = 1,
    Solar1 = 2,
    Pro = 3,
    Pro2 = 4,
}

impl Tier {
    pub fn of(identifier: &str) -> Self {
        let id = identifier.to_lowercase();
        if id.contains("pro2") {
            Tier::Pro2
        } else if id.contains("pro") {
            Tier::Pro
        } else if id.contains("solar-1") {
            Tier::Solar1
        } else if id.contains("mini") {
            Tier::Mini
        } else {
            Tier::Unrecognized
        }
    }
}

/// Ranking metadata parsed from a model identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDescriptor {
    pub identifier: String,
    /// From a trailing `YYMMDD` suffix
    pub date: Option<NaiveDate>,
    /// `major * 1000 + minor` from a trailing `v?MAJOR[.MINOR]` suffix
    pub version: Option<u64>,
    /// Identifier with the date or version suffix removed
    pub base_name: String,
    pub tier: Tier,
}

impl ModelDescriptor {
    pub fn parse(identifier: &str) -> Self {
        let tier = Tier::of(identifier);

        if let Some((date, base)) = parse_date_suffix(identifier) {
            return Self {
                identifier: identifier.to_string(),
                date: Some(date),
                version: None,
                base_name: base.to_string(),
                tier,
            };
        }

        if let Some((version, base)) = parse_version_suffix(identifier) {
            return Self {
                identifier: identifier.to_string(),
                date: None,
                version: Some(version),
                base_name: base.to_string(),
                tier,
            };
        }

        Self {
            identifier: identifier.to_string(),
            date: None,
            version: None,
            base_name: identifier.to_string(),
            tier,
        }
    }

    /// Dated identifiers first, then versioned, then plain ones
    fn group(&self) -> u8 {
        match (self.date, self.version) {
            (Some(_), _) => 2,
            (None, Some(_)) => 1,
            (None, None) => 0,
        }
    }

    /// Date as a day number or the version value, whichever applies
    fn recency(&self) -> i64 {
        match (self.date, self.version) {
            (Some(date), _) => date.num_days_from_ce() as i64,
            (None, Some(version)) => i64::try_from(version).unwrap_or(i64::MAX),
            (None, None) => 0,
        }
    }

    /// Ordering where `Less` means `self` ranks ahead of `other`
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .group()
            .cmp(&self.group())
            .then_with(|| other.recency().cmp(&self.recency()))
            .then_with(|| other.base_name.cmp(&self.base_name))
            .then_with(|| other.tier.cmp(&self.tier))
            .then_with(|| other.identifier.cmp(&self.identifier))
    }
}

/// Order identifiers newest and most capable first
pub fn rank<S: AsRef<str>>(identifiers: &[S]) -> Vec<String> {
    let mut descriptors: Vec<ModelDescriptor> = identifiers
        .iter()
        .map(|id| ModelDescriptor::parse(id.as_ref()))
        .collect();
    descriptors.sort_by(|a, b| a.rank_cmp(b));
    descriptors.into_iter().map(|d| d.identifier).collect()
}

/// Trailing `YYMMDD`, read as a date in 2000-2099
fn parse_date_suffix(identifier: &str) -> Option<(NaiveDate, &str)> {
    let split = identifier.len().checked_sub(6)?;
    if !identifier.is_char_boundary(split) {
        return None;
    }
    let (head, digits) = identifier.split_at(split);
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year = 2000 + digits[0..2].parse::<i32>().ok()?;
    let month = digits[2..4].parse::<u32>().ok()?;
    let day = digits[4..6].parse::<u32>().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;

    let base = head.strip_suffix('-').unwrap_or(head);
    Some((date, base))
}

/// Trailing `v?MAJOR[.MINOR]`
fn parse_version_suffix(identifier: &str) -> Option<(u64, &str)> {
    let trailing = trailing_digits(identifier);
    if trailing.is_empty() {
        return None;
    }
    let last: u64 = trailing.parse().ok()?;
    let mut start = identifier.len() - trailing.len();

    let mut version = last.saturating_mul(1000);
    if let Some(before_dot) = identifier[..start].strip_suffix('.') {
        let major_digits = trailing_digits(before_dot);
        if !major_digits.is_empty() {
            let major: u64 = major_digits.parse().ok()?;
            version = major.saturating_mul(1000).saturating_add(last);
            start = before_dot.len() - major_digits.len();
        }
    }

    let base = &identifier[..start];
    let base = base.strip_suffix('v').unwrap_or(base);
    Some((version, base))
}

fn trailing_digits(s: &str) -> &str {
    let start = s
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    &s[start..]
}
