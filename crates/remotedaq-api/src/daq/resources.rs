// DAQ node resource table
//
// Maps each channel group to the HTTP method and path the node serves it on.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// A group of channels exposed by a node as one HTTP resource.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "kebab-case")]
pub enum ChannelGroup {
    AnalogInput,
    DigitalInput,
    /// Readback of the digital output latch state.
    DigitalOutputReadback,
    AnalogOutput,
    DigitalOutput,
}

impl ChannelGroup {
    /// Path of the resource relative to the node root.
    pub fn path(self) -> &'static str {
        match self {
            Self::AnalogInput => "analog/input",
            Self::DigitalInput => "digital/input",
            Self::DigitalOutputReadback => "digital_output/input",
            Self::AnalogOutput => "analog/output",
            Self::DigitalOutput => "digital/output",
        }
    }

    /// Output groups are written with PUT; the rest are read with GET.
    pub fn is_writable(self) -> bool {
        matches!(self, Self::AnalogOutput | Self::DigitalOutput)
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::AnalogInput => "Analog input",
            Self::DigitalInput => "Digital input",
            Self::DigitalOutputReadback => "Digital output",
            Self::AnalogOutput => "Analog output",
            Self::DigitalOutput => "Digital output",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn paths_match_node_routes() {
        assert_eq!(ChannelGroup::AnalogInput.path(), "analog/input");
        assert_eq!(
            ChannelGroup::DigitalOutputReadback.path(),
            "digital_output/input"
        );
        assert_eq!(ChannelGroup::DigitalOutput.path(), "digital/output");
    }

    #[test]
    fn only_outputs_are_writable() {
        let writable: Vec<_> = ChannelGroup::iter().filter(|g| g.is_writable()).collect();
        assert_eq!(
            writable,
            vec![ChannelGroup::AnalogOutput, ChannelGroup::DigitalOutput]
        );
    }

    #[test]
    fn parses_kebab_case() {
        assert_eq!(
            ChannelGroup::from_str("digital-output-readback").unwrap(),
            ChannelGroup::DigitalOutputReadback
        );
        assert_eq!(ChannelGroup::AnalogInput.to_string(), "analog-input");
    }
}
