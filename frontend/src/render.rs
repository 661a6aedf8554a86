use std::fmt::Write;

use dishpoll_shared::{Catalog, Leaderboard, LeaderboardEntry, Rank, VoteMap};

const NAME_WIDTH: usize = 28;
const DESCRIPTION_WIDTH: usize = 48;

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        format!("{}...", text.chars().take(limit.saturating_sub(3)).collect::<String>())
    } else {
        text.to_string()
    }
}

fn medal(position: usize) -> String {
    match position {
        1 => "🏆".into(),
        2 => "🥈".into(),
        3 => "🥉".into(),
        n => format!("#{n}"),
    }
}

fn rank_label(rank: Option<Rank>) -> String {
    rank.map(|r| format!("[Rank {r}]")).unwrap_or_default()
}

pub fn render_dishes(catalog: &Catalog, votes: &VoteMap) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Vote for your favourite dishes ({} of {} ranks used)", votes.len(), Rank::ALL.len());

    for dish in catalog.dishes() {
        let _ = writeln!(
            out,
            "{:>4}  {:<name$}  {:<desc$}  {}",
            dish.id,
            truncate(&dish.name, NAME_WIDTH),
            truncate(&dish.description, DESCRIPTION_WIDTH),
            rank_label(votes.rank_of(dish.id)),
            name = NAME_WIDTH,
            desc = DESCRIPTION_WIDTH,
        );
    }

    if catalog.is_empty() {
        let _ = writeln!(out, "No dishes available.");
    }
    out
}

fn render_entry(out: &mut String, entry: &LeaderboardEntry) {
    let standing = &entry.standing;
    let _ = writeln!(
        out,
        "{:>4}  {:<name$}  {:>5} points  {}",
        medal(standing.position),
        truncate(&standing.dish.name, NAME_WIDTH),
        standing.points,
        entry.user_rank.map(|r| format!("(you ranked this #{r})")).unwrap_or_default(),
        name = NAME_WIDTH,
    );
}

pub fn render_results(board: &Leaderboard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Current Rankings");
    board.entries().iter().for_each(|entry| render_entry(&mut out, entry));

    let _ = writeln!(out, "\nYour Selections");
    let selections = board.selections();
    if selections.is_empty() {
        let _ = writeln!(out, "You haven't voted for any dishes yet. Use `dishpoll vote <DISH_ID> <RANK>` to make your selections!");
    }
    for entry in selections {
        let _ = writeln!(
            out,
            "  {}. {} - Overall Rank: #{} ({} points)",
            entry.user_rank.map(Rank::as_u8).unwrap_or_default(),
            entry.standing.dish.name,
            entry.standing.position,
            entry.standing.points,
        );
    }

    let summary = board.summary();
    let _ = writeln!(out, "\nPoll Statistics");
    let _ = writeln!(out, "  Total dishes:             {}", summary.total_dishes);
    let _ = writeln!(out, "  Dishes with votes:        {}", summary.dishes_with_votes);
    let _ = writeln!(out, "  Your votes:               {}/{}", summary.user_votes, summary.max_votes);
    let _ = writeln!(out, "  Total points distributed: {}", summary.total_points);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dishpoll_shared::{Dish, VoteTable};

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Dish { id: 1, name: "Masala Dosa".into(), description: "Rice crepe".into(), image: String::new() },
            Dish { id: 2, name: "Chole Bhature".into(), description: "A very long description that keeps going well past the column width".into(), image: String::new() },
        ])
    }

    #[test]
    fn dishes_show_current_ranks() {
        let votes = VoteMap::new().with_vote(2, Some(Rank::Third));
        let text = render_dishes(&catalog(), &votes);

        assert!(text.starts_with("Vote for your favourite dishes (1 of 3 ranks used)"));
        let chole = text.lines().find(|l| l.contains("Chole Bhature")).unwrap();
        assert!(chole.ends_with("[Rank 3]"));
        assert!(chole.contains("..."));
        assert!(!text.lines().find(|l| l.contains("Masala Dosa")).unwrap().contains("[Rank"));
    }

    #[test]
    fn results_list_standings_and_selections() {
        let table: VoteTable = vec![
            (1, VoteMap::new().with_vote(2, Some(Rank::First)).with_vote(1, Some(Rank::Second))),
            (2, VoteMap::new().with_vote(2, Some(Rank::Third))),
        ].into_iter().collect();
        let text = render_results(&Leaderboard::build(&catalog(), &table, 1));

        let first = text.lines().nth(1).unwrap();
        assert!(first.contains("Chole Bhature") && first.contains("40 points") && first.contains("you ranked this #1"));
        assert!(text.contains("  1. Chole Bhature - Overall Rank: #1 (40 points)"));
        assert!(text.contains("  2. Masala Dosa - Overall Rank: #2 (20 points)"));
        assert!(text.contains("Total dishes:             2"));
        assert!(text.contains("Your votes:               2/3"));
        assert!(text.contains("Total points distributed: 60"));
    }

    #[test]
    fn results_without_votes() {
        let text = render_results(&Leaderboard::build(&catalog(), &VoteTable::new(), 1));
        assert!(text.contains("You haven't voted for any dishes yet."));
        assert!(text.contains("Dishes with votes:        0"));
    }
}
