// ── Result reconciliation ──
//
// Merges a successful read into a fixed-size channel table. Entry `i` of
// the response carries channel `i`; only selected channels are filled and
// every other slot is blanked. The table is left untouched on error.

use remotedaq_api::{ChannelGroup, DaqEntry};

use crate::error::CoreError;
use crate::model::{ChannelSelection, ChannelTable};

impl ChannelTable {
    /// Overwrite the whole table from `entries` for the `selected` channels.
    pub fn reconcile(
        &mut self,
        entries: &[DaqEntry],
        selected: &ChannelSelection,
    ) -> Result<(), CoreError> {
        let mut slots = vec![None; self.size()];

        for index in selected.iter() {
            let i = usize::from(index);
            if i >= slots.len() {
                return Err(CoreError::ChannelOutOfRange {
                    index,
                    available: slots.len(),
                });
            }
            let entry = entries.get(i).ok_or(CoreError::ChannelOutOfRange {
                index,
                available: entries.len(),
            })?;
            let value = entry
                .value()
                .ok_or(CoreError::MalformedReading { index })?;
            slots[i] = Some(value.clone());
        }

        self.slots = slots;
        Ok(())
    }
}

/// Build a fresh table of `size` channels from a successful read.
pub fn reconcile(
    group: ChannelGroup,
    size: usize,
    entries: &[DaqEntry],
    selected: &ChannelSelection,
) -> Result<ChannelTable, CoreError> {
    let mut table = ChannelTable::new(group, size);
    table.reconcile(entries, selected)?;
    Ok(table)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;
    use remotedaq_api::{ChannelValue, DaqResponse};
    use serde_json::json;

    use super::*;

    fn analog_read() -> Vec<DaqEntry> {
        let resp: DaqResponse = serde_json::from_value(json!({
            "success": true,
            "data": [
                { "port": "0", "value": "1.2" },
                { "port": "1", "value": "2.2" },
                { "port": "2", "value": "3.3" },
                { "port": "3", "value": "4.4" },
                { "port": "4", "value": "5.5" },
                { "port": "5", "value": "6.6" },
                { "port": "6", "value": "7.7" },
                { "port": "7", "value": "8.8" },
            ]
        }))
        .unwrap();
        resp.into_result().unwrap()
    }

    #[test]
    fn fills_selected_and_blanks_the_rest() {
        let selected: ChannelSelection = [0, 3].into_iter().collect();
        let table = reconcile(ChannelGroup::AnalogInput, 8, &analog_read(), &selected).unwrap();

        let expected: BTreeMap<u8, ChannelValue> =
            [(0, "1.2".into()), (3, "4.4".into())].into_iter().collect();
        assert_eq!(table.to_map(), expected);
        assert!(table.get(1).is_none());
        assert!(table.get(2).is_none());
        assert_eq!(table.slots().iter().filter(|s| s.is_none()).count(), 6);
    }

    #[test]
    fn overwrites_previous_values() {
        let mut table = ChannelTable::new(ChannelGroup::AnalogInput, 8);
        table
            .reconcile(&analog_read(), &ChannelSelection::all(8))
            .unwrap();
        assert_eq!(table.readings().len(), 8);

        let selected: ChannelSelection = [5].into_iter().collect();
        table.reconcile(&analog_read(), &selected).unwrap();
        assert_eq!(table.readings().len(), 1);
        assert_eq!(table.get(5), Some(&ChannelValue::from("6.6")));
    }

    #[test]
    fn index_past_the_response_is_a_caller_error() {
        let entries = &analog_read()[..2];
        let selected: ChannelSelection = [0, 4].into_iter().collect();
        let err = reconcile(ChannelGroup::AnalogInput, 8, entries, &selected).unwrap_err();
        assert!(matches!(
            err,
            CoreError::ChannelOutOfRange {
                index: 4,
                available: 2
            }
        ));
    }

    #[test]
    fn failed_reconcile_leaves_table_untouched() {
        let mut table = reconcile(
            ChannelGroup::AnalogInput,
            8,
            &analog_read(),
            &ChannelSelection::all(8),
        )
        .unwrap();
        let before = table.clone();

        let selected: ChannelSelection = [0, 9].into_iter().collect();
        assert!(table.reconcile(&analog_read(), &selected).is_err());
        assert_eq!(table, before);
    }

    #[test]
    fn message_entry_is_malformed() {
        let entries = vec![DaqEntry::Message("oops".into())];
        let selected: ChannelSelection = [0].into_iter().collect();
        let err = reconcile(ChannelGroup::DigitalInput, 8, &entries, &selected).unwrap_err();
        assert!(matches!(err, CoreError::MalformedReading { index: 0 }));
    }
}
