use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;
use tracing::warn;

use crate::validation::ValidationError;

pub type UserId = u32;
pub type DishId = u32;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dish {
    pub id: DishId,
    #[serde(rename = "dishName")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
}

/// Podium place a voter gives a dish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Rank { First = 1, Second = 2, Third = 3 }

impl Rank {
    pub const ALL: [Rank; 3] = [Rank::First, Rank::Second, Rank::Third];

    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn points(self) -> u32 {
        match self {
            Rank::First => 30,
            Rank::Second => 20,
            Rank::Third => 10,
        }
    }
}

impl TryFrom<u8> for Rank {
    type Error = ValidationError;

    fn try_from(v: u8) -> Result<Self, ValidationError> {
        match v {
            1 => Ok(Rank::First),
            2 => Ok(Rank::Second),
            3 => Ok(Rank::Third),
            n => Err(ValidationError::InvalidRank(n.into())),
        }
    }
}

impl From<Rank> for u8 {
    fn from(rank: Rank) -> u8 {
        rank.as_u8()
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// One user's rank -> dish assignment.
///
/// Holds at most one dish per rank and at most one rank per dish. The only way
/// to change it is [`VoteMap::with_vote`], which keeps both invariants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, DishId>", into = "BTreeMap<String, DishId>")]
pub struct VoteMap {
    ranks: BTreeMap<Rank, DishId>,
}

impl VoteMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the map after placing `dish` at `rank`, or withdrawing it when
    /// `rank` is `None`.
    ///
    /// The dish first loses whatever rank it held, then the target slot is
    /// overwritten, so a previous occupant of `rank` is evicted.
    pub fn with_vote(&self, dish: DishId, rank: Option<Rank>) -> VoteMap {
        let mut ranks = self.ranks.clone();
        ranks.retain(|_, held| *held != dish);
        if let Some(rank) = rank {
            ranks.insert(rank, dish);
        }
        VoteMap { ranks }
    }

    pub fn get(&self, rank: Rank) -> Option<DishId> {
        self.ranks.get(&rank).copied()
    }

    pub fn rank_of(&self, dish: DishId) -> Option<Rank> {
        self.ranks.iter()
            .find(|(_, &held)| held == dish)
            .map(|(&rank, _)| rank)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Rank, DishId)> + '_ {
        self.ranks.iter().map(|(&rank, &dish)| (rank, dish))
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

impl From<BTreeMap<String, DishId>> for VoteMap {
    fn from(raw: BTreeMap<String, DishId>) -> Self {
        let mut map = VoteMap::new();
        for (key, dish) in raw {
            match key.parse::<u8>().ok().and_then(|n| Rank::try_from(n).ok()) {
                Some(rank) => map = map.with_vote(dish, Some(rank)),
                None => warn!("Ignoring stored vote with unknown rank {key:?} for dish {dish}"),
            }
        }
        map
    }
}

impl From<VoteMap> for BTreeMap<String, DishId> {
    fn from(map: VoteMap) -> Self {
        map.ranks.into_iter()
            .map(|(rank, dish)| (rank.to_string(), dish))
            .collect()
    }
}

/// Every user's [`VoteMap`], keyed by user id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoteTable {
    maps: BTreeMap<UserId, VoteMap>,
}

impl VoteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, user: UserId) -> Option<&VoteMap> {
        self.maps.get(&user)
    }

    pub fn insert(&mut self, user: UserId, map: VoteMap) {
        self.maps.insert(user, map);
    }

    pub fn iter(&self) -> impl Iterator<Item = (UserId, &VoteMap)> + '_ {
        self.maps.iter().map(|(&user, map)| (user, map))
    }

    pub fn maps(&self) -> impl Iterator<Item = &VoteMap> + '_ {
        self.maps.values()
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}

impl FromIterator<(UserId, VoteMap)> for VoteTable {
    fn from_iter<I: IntoIterator<Item = (UserId, VoteMap)>>(iter: I) -> Self {
        Self { maps: iter.into_iter().collect() }
    }
}

/// The ordered dish catalog as served by the catalog source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    dishes: Vec<Dish>,
}

impl Catalog {
    pub fn new(dishes: Vec<Dish>) -> Self {
        Self { dishes }
    }

    pub fn dishes(&self) -> &[Dish] {
        &self.dishes
    }

    pub fn find(&self, id: DishId) -> Option<&Dish> {
        self.dishes.iter().find(|dish| dish.id == id)
    }

    pub fn find_str(&self, raw: &str) -> Option<&Dish> {
        raw.trim().parse::<DishId>().ok().and_then(|id| self.find(id))
    }

    pub fn len(&self) -> usize {
        self.dishes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dishes.is_empty()
    }
}
