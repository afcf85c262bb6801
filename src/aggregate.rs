//! Derived views over a celebrity's award list.
//!
//! Everything here is pure: the functions are recomputed on every new award list and hold no
//! state of their own.

use indexmap::IndexMap;

use crate::model::{Award, AwardType};

/// Which of the four awards have been won, at least once
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EgotStatus {
    /// At least one winning Emmy
    pub emmy: bool,
    /// At least one winning Grammy
    pub grammy: bool,
    /// At least one winning Oscar
    pub oscar: bool,
    /// At least one winning Tony
    pub tony: bool,
    /// Number of award types won, 0 to 4
    pub count: u8,
    /// All four have been won
    pub is_egot: bool,
}

impl EgotStatus {
    /// Whether the given type was won
    pub fn has(&self, kind: AwardType) -> bool {
        match kind {
            AwardType::Emmy => self.emmy,
            AwardType::Grammy => self.grammy,
            AwardType::Oscar => self.oscar,
            AwardType::Tony => self.tony,
        }
    }

    /// The won types, in EGOT order
    pub fn won(&self) -> Vec<AwardType> {
        AwardType::EGOT_ORDER.into_iter().filter(|k| self.has(*k)).collect()
    }
}

/// Compute the EGOT status of an award list.
///
/// Only winning records count; year and category are irrelevant.
pub fn compute_egot_status(awards: &[Award]) -> EgotStatus {
    let won = |kind: AwardType| awards.iter().any(|a| a.kind == kind && a.is_winner);
    let mut status = EgotStatus {
        emmy: won(AwardType::Emmy),
        grammy: won(AwardType::Grammy),
        oscar: won(AwardType::Oscar),
        tony: won(AwardType::Tony),
        ..Default::default()
    };
    status.count = [status.emmy, status.grammy, status.oscar, status.tony]
        .into_iter()
        .filter(|w| *w)
        .count() as u8;
    status.is_egot = status.count == 4;
    status
}

/// The award types won in `awards`, in EGOT order and without duplicates
pub fn won_types(awards: &[Award]) -> Vec<AwardType> {
    compute_egot_status(awards).won()
}

/// Awards bucketed by type.
///
/// Buckets iterate in [`AwardType::DISPLAY_ORDER`], each sorted by year, most recent first.
/// Types without any record have no bucket.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AwardGroups {
    groups: IndexMap<AwardType, Vec<Award>>,
}

impl AwardGroups {
    /// The bucket for `kind`, if any record of that type exists
    pub fn get(&self, kind: AwardType) -> Option<&[Award]> {
        self.groups.get(&kind).map(Vec::as_slice)
    }

    /// Iterate over non-empty buckets in display order
    pub fn iter(&self) -> impl Iterator<Item = (AwardType, &[Award])> {
        self.groups.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    /// The award types present, in display order
    pub fn kinds(&self) -> Vec<AwardType> {
        self.groups.keys().copied().collect()
    }

    /// Number of buckets
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether there are no awards at all
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Partition awards by type.
///
/// Within a bucket, awards are sorted by year descending. The sort is stable, so awards sharing a
/// year keep the order they were received in.
pub fn group_awards_by_type(awards: &[Award]) -> AwardGroups {
    let mut partitions: IndexMap<AwardType, Vec<Award>> = IndexMap::new();
    for award in awards {
        partitions.entry(award.kind).or_default().push(award.clone());
    }

    let mut groups = IndexMap::with_capacity(partitions.len());
    for kind in AwardType::DISPLAY_ORDER {
        if let Some(mut bucket) = partitions.swap_remove(&kind) {
            bucket.sort_by(|a, b| b.year.cmp(&a.year));
            groups.insert(kind, bucket);
        }
    }
    AwardGroups { groups }
}

/// The first award type, in EGOT order, absent from `won`.
///
/// Returns `None` when all four are present. When several are missing only the first is
/// reported, so callers should only ask for celebrities with three of the four.
pub fn find_missing_award(won: &[AwardType]) -> Option<AwardType> {
    AwardType::EGOT_ORDER.into_iter().find(|k| !won.contains(k))
}

/// How far a celebrity is from the grand slam
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EgotProgress {
    /// All four won
    Egot,
    /// Three won, one to go
    CloseToEgot {
        /// The award still needed
        missing: AwardType,
    },
    /// One or two types won
    Partial(u8),
    /// No winning record
    NoWins,
}

impl EgotProgress {
    /// Classify a status
    pub fn classify(status: &EgotStatus) -> Self {
        match status.count {
            4 => Self::Egot,
            3 => match find_missing_award(&status.won()) {
                Some(missing) => Self::CloseToEgot { missing },
                None => Self::Egot,
            },
            0 => Self::NoWins,
            n => Self::Partial(n),
        }
    }
}
