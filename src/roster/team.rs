//! Teams of derived characters

use crate::character::{Character, Recruit};
use crate::core::types::CharacterId;
use rand::Rng;
use serde::Serialize;

/// A team of fully derived characters and its dominant alignment
#[derive(Debug, Clone, Serialize)]
pub struct Team {
    pub name: String,
    /// Most frequent alignment among the original members
    pub alignment: String,
    members: Vec<Character>,
}

impl Team {
    /// Fix the team alignment from the recruits, then derive every member
    /// against it. Each member rolls its own filiation.
    pub fn from_recruits<R: Rng + ?Sized>(name: String, recruits: Vec<Recruit>, rng: &mut R) -> Self {
        let alignment =
            dominant_alignment(recruits.iter().map(|r| r.alignment.as_str())).unwrap_or_default();
        let members = recruits
            .into_iter()
            .map(|recruit| recruit.derive(&alignment, &mut *rng))
            .collect();
        Self {
            name,
            alignment,
            members,
        }
    }

    /// Build a team from characters that were already derived
    pub fn from_members(name: String, alignment: String, members: Vec<Character>) -> Self {
        Self {
            name,
            alignment,
            members,
        }
    }

    pub fn members(&self) -> &[Character] {
        &self.members
    }

    pub fn member(&self, index: usize) -> Option<&Character> {
        self.members.get(index)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// A team with no members left is eliminated
    pub fn has_members(&self) -> bool {
        !self.members.is_empty()
    }

    pub fn contains(&self, id: CharacterId) -> bool {
        self.members.iter().any(|m| m.id == id)
    }

    /// Index of a uniformly chosen member, `None` when eliminated
    pub fn select_random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        if self.members.is_empty() {
            None
        } else {
            Some(rng.gen_range(0..self.members.len()))
        }
    }

    /// Take a member out of the team for the length of a duel
    pub fn take_member(&mut self, index: usize) -> Option<Character> {
        (index < self.members.len()).then(|| self.members.remove(index))
    }

    /// Put a duel survivor back into its original slot
    pub fn return_member(&mut self, index: usize, character: Character) {
        let index = index.min(self.members.len());
        self.members.insert(index, character);
    }

    pub fn remove_member(&mut self, id: CharacterId) -> Option<Character> {
        match self.members.iter().position(|m| m.id == id) {
            Some(index) => Some(self.members.remove(index)),
            None => {
                tracing::warn!(team = %self.name, character = %id, "Character is not on this team");
                None
            }
        }
    }
}

/// Most frequent alignment; ties go to the alignment seen first
pub fn dominant_alignment<'a>(alignments: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for alignment in alignments {
        match counts.iter_mut().find(|(seen, _)| *seen == alignment) {
            Some((_, count)) => *count += 1,
            None => counts.push((alignment, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (alignment, count) in counts {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((alignment, count));
        }
    }
    best.map(|(alignment, _)| alignment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::AttributeSet;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn recruit(id: u32, alignment: &str) -> Recruit {
        Recruit::with_stamina(
            CharacterId(id),
            format!("Hero {}", id),
            alignment.into(),
            AttributeSet::uniform(40.0),
            4,
        )
    }

    #[test]
    fn test_majority_alignment_wins() {
        let alignment = dominant_alignment(["bad", "good", "good", "neutral", "good"]);
        assert_eq!(alignment.as_deref(), Some("good"));
    }

    #[test]
    fn test_tie_goes_to_first_seen() {
        let alignment = dominant_alignment(["good", "bad", "bad", "good", "neutral"]);
        assert_eq!(alignment.as_deref(), Some("good"));

        let alignment = dominant_alignment(["bad", "good", "good", "bad", "neutral"]);
        assert_eq!(alignment.as_deref(), Some("bad"));
    }

    #[test]
    fn test_no_alignment_for_empty_team() {
        assert_eq!(dominant_alignment(std::iter::empty::<&str>()), None);
    }

    #[test]
    fn test_from_recruits_derives_every_member() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let recruits = vec![
            recruit(1, "good"),
            recruit(2, "good"),
            recruit(3, "bad"),
            recruit(4, "good"),
            recruit(5, "neutral"),
        ];
        let team = Team::from_recruits("TEAM 1".into(), recruits, &mut rng);

        assert_eq!(team.alignment, "good");
        assert_eq!(team.len(), 5);
        for member in team.members() {
            if member.alignment == team.alignment {
                assert!(member.filiation >= 1.0);
            } else {
                assert!(member.filiation <= 1.0);
            }
            assert!(member.hit_points >= 100.0);
        }
    }

    #[test]
    fn test_select_and_remove() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let recruits = (1..=5).map(|id| recruit(id, "good")).collect();
        let mut team = Team::from_recruits("TEAM 2".into(), recruits, &mut rng);

        let index = team.select_random(&mut rng).unwrap();
        let id = team.member(index).unwrap().id;
        assert!(team.remove_member(id).is_some());
        assert!(!team.contains(id));
        assert!(team.remove_member(id).is_none());
        assert_eq!(team.len(), 4);
    }

    #[test]
    fn test_take_and_return_keep_slot() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let recruits = (1..=5).map(|id| recruit(id, "good")).collect();
        let mut team = Team::from_recruits("TEAM 1".into(), recruits, &mut rng);

        let taken = team.take_member(2).unwrap();
        assert_eq!(taken.id, CharacterId(3));
        assert_eq!(team.len(), 4);
        team.return_member(2, taken);
        assert_eq!(team.member(2).unwrap().id, CharacterId(3));
        assert!(team.take_member(5).is_none());
    }

    #[test]
    fn test_empty_team_selects_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let team = Team::from_members("EMPTY".into(), "good".into(), Vec::new());
        assert!(!team.has_members());
        assert_eq!(team.select_random(&mut rng), None);
    }
}
