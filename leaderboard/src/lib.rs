mod config;
use log::{debug, info};

use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

pub use crate::config::*;
pub use crate::currency::{format_currency, parse_currency};

pub mod builder;
pub mod cells;
pub mod currency;
pub mod manual;

/// Resolves the current balance of a team from its latest upload.
///
/// - no upload: zero
/// - no closing balance: the opening balance
/// - unchanged balance: the opening balance
/// - otherwise: the closing balance
pub fn resolve_balance(upload: Option<&BalancePair>) -> Decimal {
    match upload {
        None => Decimal::ZERO,
        Some(BalancePair {
            before,
            after: ClosingBalance::NotApplicable,
        }) => *before,
        Some(BalancePair {
            before,
            after: ClosingBalance::Present(after),
        }) if before == after => *before,
        Some(BalancePair {
            after: ClosingBalance::Present(after),
            ..
        }) => *after,
    }
}

/// Computes the leaderboard of a competition.
///
/// Arguments:
/// * `teams` the registered teams, in configured order. This order is used to
/// order teams that end up with the same balance.
/// * `uploads` the latest upload of each team. A team that is missing from the
/// map, or that maps to `None`, has not uploaded anything yet.
///
/// Every registered team gets exactly one row. Rows are returned in
/// leaderboard order, with dense ranks: `[100, 100, 50]` are ranked
/// `[1, 1, 2]`.
pub fn compute_leaderboard(
    teams: &[String],
    uploads: &HashMap<String, Option<BalancePair>>,
) -> Result<Vec<LeaderboardRow>, LeaderboardError> {
    let team_order = check_teams(teams)?;

    let mut unknown: Vec<&String> = uploads
        .keys()
        .filter(|name| !team_order.contains_key(name.as_str()))
        .collect();
    unknown.sort();
    if let Some(name) = unknown.first() {
        return Err(LeaderboardError::UnknownTeam((*name).clone()));
    }

    info!(
        "compute_leaderboard: {:?} teams, {:?} uploads",
        teams.len(),
        uploads.values().filter(|u| u.is_some()).count()
    );

    let mut standings: Vec<(usize, String, Decimal)> = teams
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let upload = uploads.get(name).and_then(|u| u.as_ref());
            let balance = resolve_balance(upload);
            debug!(
                "compute_leaderboard: team {:?} upload {:?} -> balance {}",
                name, upload, balance
            );
            (idx, name.clone(), balance)
        })
        .collect();

    // Highest balance first. Equal balances keep the configured order.
    standings.sort_by(|(idx1, _, b1), (idx2, _, b2)| b2.cmp(b1).then(idx1.cmp(idx2)));

    let rows = assign_dense_ranks(standings);
    for row in rows.iter() {
        debug!(
            "compute_leaderboard: {} {} {}",
            row.rank,
            row.team_name,
            row.formatted_balance()
        );
    }
    Ok(rows)
}

// Invariant: the standings are sorted by decreasing balance.
fn assign_dense_ranks(standings: Vec<(usize, String, Decimal)>) -> Vec<LeaderboardRow> {
    let mut rows: Vec<LeaderboardRow> = Vec::with_capacity(standings.len());
    let mut rank: u32 = 0;
    let mut previous: Option<Decimal> = None;
    for (_, team_name, balance) in standings {
        if previous != Some(balance) {
            rank += 1;
            previous = Some(balance);
        }
        rows.push(LeaderboardRow {
            rank,
            team_name,
            balance,
        });
    }
    rows
}

// Returns the position of each team in the configuration.
pub(crate) fn check_teams(teams: &[String]) -> Result<HashMap<&str, usize>, LeaderboardError> {
    if teams.is_empty() || teams.iter().any(|t| t.trim().is_empty()) {
        return Err(LeaderboardError::EmptyCompetition);
    }
    let mut seen: HashSet<&str> = HashSet::new();
    for t in teams.iter() {
        if !seen.insert(t.as_str()) {
            return Err(LeaderboardError::DuplicateTeam(t.clone()));
        }
    }
    Ok(teams
        .iter()
        .enumerate()
        .map(|(idx, t)| (t.as_str(), idx))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn teams(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn summary(rows: &[LeaderboardRow]) -> Vec<(u32, String, String)> {
        rows.iter()
            .map(|r| (r.rank, r.team_name.clone(), r.formatted_balance()))
            .collect()
    }

    #[test]
    fn resolution_policy() {
        assert_eq!(resolve_balance(None), Decimal::ZERO);
        assert_eq!(
            resolve_balance(Some(&BalancePair::without_closing(dec!(500)))),
            dec!(500)
        );
        assert_eq!(
            resolve_balance(Some(&BalancePair::new(dec!(300), dec!(300)))),
            dec!(300)
        );
        assert_eq!(
            resolve_balance(Some(&BalancePair::new(dec!(1000), dec!(800)))),
            dec!(800)
        );
        assert_eq!(
            resolve_balance(Some(&BalancePair::new(dec!(0), dec!(0)))),
            Decimal::ZERO
        );
    }

    #[test]
    fn sentinel_and_unchanged_balances() {
        init();
        let ts = teams(&["A", "B", "C"]);
        let mut uploads: HashMap<String, Option<BalancePair>> = HashMap::new();
        uploads.insert("A".to_string(), None);
        uploads.insert(
            "B".to_string(),
            Some(BalancePair::without_closing(dec!(500))),
        );
        uploads.insert(
            "C".to_string(),
            Some(BalancePair::new(dec!(300), dec!(300))),
        );
        let rows = compute_leaderboard(&ts, &uploads).unwrap();
        assert_eq!(
            summary(&rows),
            vec![
                (1, "B".to_string(), "$500.00".to_string()),
                (2, "C".to_string(), "$300.00".to_string()),
                (3, "A".to_string(), "$0.00".to_string()),
            ]
        );
    }

    #[test]
    fn ties_share_rank_in_configured_order() {
        init();
        let ts = teams(&["A", "B"]);
        let mut uploads: HashMap<String, Option<BalancePair>> = HashMap::new();
        uploads.insert(
            "A".to_string(),
            Some(BalancePair::new(dec!(1000), dec!(1200))),
        );
        uploads.insert(
            "B".to_string(),
            Some(BalancePair::new(dec!(1000), dec!(1200.00))),
        );
        let rows = compute_leaderboard(&ts, &uploads).unwrap();
        assert_eq!(
            summary(&rows),
            vec![
                (1, "A".to_string(), "$1,200.00".to_string()),
                (1, "B".to_string(), "$1,200.00".to_string()),
            ]
        );
    }

    #[test]
    fn empty_upload_set() {
        init();
        let ts = teams(&["TECH", "ENERGY", "HEALTHCARE"]);
        let rows = compute_leaderboard(&ts, &HashMap::new()).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.rank == 1));
        assert!(rows.iter().all(|r| r.formatted_balance() == "$0.00"));
        let names: Vec<&str> = rows.iter().map(|r| r.team_name.as_str()).collect();
        assert_eq!(names, vec!["TECH", "ENERGY", "HEALTHCARE"]);
    }

    #[test]
    fn dense_ranks_do_not_skip() {
        let ts = teams(&["A", "B", "C", "D"]);
        let mut uploads: HashMap<String, Option<BalancePair>> = HashMap::new();
        uploads.insert("A".to_string(), Some(BalancePair::new(dec!(0), dec!(100))));
        uploads.insert("B".to_string(), Some(BalancePair::new(dec!(0), dec!(100))));
        uploads.insert("C".to_string(), Some(BalancePair::new(dec!(0), dec!(50))));
        uploads.insert("D".to_string(), Some(BalancePair::new(dec!(0), dec!(-20))));
        let rows = compute_leaderboard(&ts, &uploads).unwrap();
        let ranks: Vec<u32> = rows.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 1, 2, 3]);
    }

    #[test]
    fn ranks_follow_numeric_order_not_text() {
        // "$900.00" sorts after "$1,000.00" as text.
        let ts = teams(&["small", "large"]);
        let mut uploads: HashMap<String, Option<BalancePair>> = HashMap::new();
        uploads.insert(
            "small".to_string(),
            Some(BalancePair::without_closing(dec!(900))),
        );
        uploads.insert(
            "large".to_string(),
            Some(BalancePair::without_closing(dec!(1000))),
        );
        let rows = compute_leaderboard(&ts, &uploads).unwrap();
        let formatted: Vec<FormattedRow> = rows.iter().map(|r| r.formatted()).collect();
        assert_eq!(formatted[0].team_name, "large");
        assert_eq!(formatted[0].balance, "$1,000.00");
        assert_eq!(formatted[1].rank, 2);
        assert_eq!(formatted[1].balance, "$900.00");
    }

    #[test]
    fn unknown_team_fails() {
        let ts = teams(&["A"]);
        let mut uploads: HashMap<String, Option<BalancePair>> = HashMap::new();
        uploads.insert("Z".to_string(), None);
        assert_eq!(
            compute_leaderboard(&ts, &uploads),
            Err(LeaderboardError::UnknownTeam("Z".to_string()))
        );
    }

    #[test]
    fn team_registration_checks() {
        assert_eq!(
            compute_leaderboard(&[], &HashMap::new()),
            Err(LeaderboardError::EmptyCompetition)
        );
        assert_eq!(
            compute_leaderboard(&teams(&["A", " "]), &HashMap::new()),
            Err(LeaderboardError::EmptyCompetition)
        );
        assert_eq!(
            compute_leaderboard(&teams(&["A", "B", "A"]), &HashMap::new()),
            Err(LeaderboardError::DuplicateTeam("A".to_string()))
        );
    }
}
