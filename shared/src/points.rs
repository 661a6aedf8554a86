use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};

use crate::models::{Catalog, Dish, DishId, Rank, UserId, VoteTable};

pub type Scores = BTreeMap<DishId, u32>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub position: usize,
    pub dish: Dish,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub standing: Standing,
    pub user_rank: Option<Rank>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollSummary {
    pub total_dishes: usize,
    pub dishes_with_votes: usize,
    pub user_votes: usize,
    pub max_votes: usize,
    pub total_points: u32,
}

pub fn compute_scores(table: &VoteTable) -> Scores {
    table.maps()
        .flat_map(|map| map.iter())
        .fold(Scores::new(), |mut scores, (rank, dish)| {
            *scores.entry(dish).or_default() += rank.points();
            scores
        })
}

/// Orders the whole catalog by descending points. Equal scores keep catalog order.
pub fn rank_dishes(catalog: &Catalog, scores: &Scores) -> Vec<Standing> {
    let mut scored: Vec<(&Dish, u32)> = catalog.dishes().iter()
        .map(|dish| (dish, scores.get(&dish.id).copied().unwrap_or(0)))
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1));

    scored.into_iter()
        .enumerate()
        .map(|(idx, (dish, points))| Standing { position: idx + 1, dish: dish.clone(), points })
        .collect()
}

/// Results as seen by one user: the standings plus the user's own picks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn build(catalog: &Catalog, table: &VoteTable, user: UserId) -> Self {
        let scores = compute_scores(table);
        let user_map = table.get(user);
        let entries = rank_dishes(catalog, &scores).into_iter()
            .map(|standing| LeaderboardEntry {
                user_rank: user_map.and_then(|map| map.rank_of(standing.dish.id)),
                standing,
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn selections(&self) -> Vec<&LeaderboardEntry> {
        let mut picked: Vec<_> = self.entries.iter()
            .filter(|entry| entry.user_rank.is_some())
            .collect();
        picked.sort_by_key(|entry| entry.user_rank);
        picked
    }

    pub fn summary(&self) -> PollSummary {
        PollSummary {
            total_dishes: self.entries.len(),
            dishes_with_votes: self.entries.iter().filter(|e| e.standing.points > 0).count(),
            user_votes: self.entries.iter().filter(|e| e.user_rank.is_some()).count(),
            max_votes: Rank::ALL.len(),
            total_points: self.entries.iter().map(|e| e.standing.points).sum(),
        }
    }
}
