// ── Channel selection and tables ──

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use remotedaq_api::{ChannelGroup, ChannelValue};

use crate::error::CoreError;

/// Channel indices chosen for a read. Transient, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelSelection(BTreeSet<u8>);

impl ChannelSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every channel of a group of `size` channels.
    pub fn all(size: usize) -> Self {
        (0..size).filter_map(|i| u8::try_from(i).ok()).collect()
    }

    pub fn insert(&mut self, index: u8) -> bool {
        self.0.insert(index)
    }

    pub fn contains(&self, index: u8) -> bool {
        self.0.contains(&index)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }

    /// Reject empty selections and indices beyond a group of `size` channels.
    pub fn validate(&self, size: usize) -> Result<(), CoreError> {
        if self.is_empty() {
            return Err(CoreError::EmptySelection);
        }
        match self.0.iter().find(|&&i| usize::from(i) >= size) {
            Some(&index) => Err(CoreError::ChannelOutOfRange {
                index,
                available: size,
            }),
            None => Ok(()),
        }
    }
}

impl FromIterator<u8> for ChannelSelection {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Parses `"0,3"`, `"0-3"`, or a mix such as `"0-2,5"`.
impl FromStr for ChannelSelection {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |part: &str| CoreError::ValidationFailed {
            message: format!("invalid channel '{part}', expected an index like 3 or a range like 0-3"),
        };

        let mut selection = Self::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            if let Some((lo, hi)) = part.split_once('-') {
                let lo: u8 = lo.trim().parse().map_err(|_| invalid(part))?;
                let hi: u8 = hi.trim().parse().map_err(|_| invalid(part))?;
                if lo > hi {
                    return Err(invalid(part));
                }
                selection.0.extend(lo..=hi);
            } else {
                selection.insert(part.parse().map_err(|_| invalid(part))?);
            }
        }
        Ok(selection)
    }
}

/// One reconciled channel value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelReading {
    pub index: u8,
    pub value: ChannelValue,
}

/// Fixed-size display table for one channel group.
///
/// Every slot is either a value for a selected channel or explicitly blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelTable {
    pub group: ChannelGroup,
    pub(crate) slots: Vec<Option<ChannelValue>>,
}

impl ChannelTable {
    /// An all-blank table of `size` channels.
    pub fn new(group: ChannelGroup, size: usize) -> Self {
        Self {
            group,
            slots: vec![None; size],
        }
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }

    /// Value of a slot; `None` when blank or out of range.
    pub fn get(&self, index: u8) -> Option<&ChannelValue> {
        self.slots.get(usize::from(index))?.as_ref()
    }

    /// Every slot in index order, blanks included.
    pub fn slots(&self) -> &[Option<ChannelValue>] {
        &self.slots
    }

    /// Populated slots in index order.
    pub fn readings(&self) -> Vec<ChannelReading> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| {
                let index = u8::try_from(i).ok()?;
                slot.clone().map(|value| ChannelReading { index, value })
            })
            .collect()
    }

    /// Populated slots keyed by index.
    pub fn to_map(&self) -> BTreeMap<u8, ChannelValue> {
        self.readings()
            .into_iter()
            .map(|r| (r.index, r.value))
            .collect()
    }

    /// Blank every slot.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_lists_and_ranges() {
        let sel: ChannelSelection = "0-2, 5".parse().unwrap();
        assert_eq!(sel.iter().collect::<Vec<_>>(), vec![0, 1, 2, 5]);

        let sel: ChannelSelection = "3,0,3".parse().unwrap();
        assert_eq!(sel.iter().collect::<Vec<_>>(), vec![0, 3]);
    }

    #[test]
    fn rejects_garbage() {
        assert!("a".parse::<ChannelSelection>().is_err());
        assert!("5-2".parse::<ChannelSelection>().is_err());
        assert!("300".parse::<ChannelSelection>().is_err());
    }

    #[test]
    fn validate_requires_a_channel() {
        let err = ChannelSelection::new().validate(8).unwrap_err();
        assert!(matches!(err, CoreError::EmptySelection));
    }

    #[test]
    fn validate_checks_group_size() {
        let sel: ChannelSelection = [0, 2].into_iter().collect();
        assert!(sel.validate(8).is_ok());
        let err = sel.validate(2).unwrap_err();
        assert!(matches!(
            err,
            CoreError::ChannelOutOfRange {
                index: 2,
                available: 2
            }
        ));
    }

    #[test]
    fn all_covers_the_group() {
        assert_eq!(ChannelSelection::all(8).len(), 8);
        assert!(ChannelSelection::all(2).contains(1));
    }

    #[test]
    fn new_table_is_blank() {
        let table = ChannelTable::new(ChannelGroup::AnalogOutput, 2);
        assert_eq!(table.size(), 2);
        assert!(table.readings().is_empty());
        assert_eq!(table.slots(), &[None, None]);
    }
}
