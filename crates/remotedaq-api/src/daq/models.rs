// DAQ node wire types
//
// Every node endpoint answers with the same `{ success, data }` envelope.
// On success `data` holds one `{ port, value }` object per channel; on
// failure its first element is a human-readable message.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Uniform response envelope returned by every DAQ endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaqResponse {
    pub success: bool,
    /// Per-channel entries, or a message as the first element on failure.
    /// A bare string or `null` on the wire is normalised into a list.
    #[serde(default, deserialize_with = "one_or_many")]
    pub data: Vec<DaqEntry>,
}

impl DaqResponse {
    /// Build a failure envelope carrying a single message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: vec![DaqEntry::Message(message.into())],
        }
    }

    /// The first element of `data` when it is a message string.
    pub fn message(&self) -> Option<&str> {
        match self.data.first() {
            Some(DaqEntry::Message(msg)) => Some(msg),
            _ => None,
        }
    }

    /// Split the envelope into its channel entries or its failure message.
    pub fn into_result(self) -> Result<Vec<DaqEntry>, String> {
        if self.success {
            return Ok(self.data);
        }
        let message = self
            .message()
            .map_or_else(|| "node reported failure without a message".to_owned(), str::to_owned);
        Err(message)
    }
}

/// One element of a [`DaqResponse`]'s `data` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DaqEntry {
    Channel(ChannelPayload),
    Message(String),
    Other(serde_json::Value),
}

impl DaqEntry {
    /// The channel value, if this entry is a channel object.
    pub fn value(&self) -> Option<&ChannelValue> {
        match self {
            Self::Channel(payload) => Some(&payload.value),
            _ => None,
        }
    }
}

/// A single channel object: `{ "port": "0", "value": "1.2" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<ChannelValue>,
    pub value: ChannelValue,
}

/// A channel reading as sent by the node: numeric, textual, or boolean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChannelValue {
    Number(serde_json::Number),
    Text(String),
    Bool(bool),
}

impl fmt::Display for ChannelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{}", u8::from(*b)),
        }
    }
}

impl From<&str> for ChannelValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<i64> for ChannelValue {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<DaqEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<DaqEntry>),
        One(DaqEntry),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::Many(entries)) => entries,
        Some(OneOrMany::One(entry)) => vec![entry],
        None => Vec::new(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_channel_list() {
        let resp: DaqResponse = serde_json::from_value(json!({
            "success": true,
            "data": [
                { "port": "0", "value": "1.2" },
                { "port": 1, "value": 0 },
            ]
        }))
        .unwrap();

        assert!(resp.success);
        assert_eq!(resp.data.len(), 2);
        assert_eq!(resp.data[0].value(), Some(&ChannelValue::from("1.2")));
        assert_eq!(resp.data[1].value(), Some(&ChannelValue::from(0)));
    }

    #[test]
    fn failure_message_is_first_element() {
        let resp: DaqResponse = serde_json::from_value(json!({
            "success": false,
            "data": ["Invalid token or network ID, please check again"]
        }))
        .unwrap();

        assert_eq!(
            resp.message(),
            Some("Invalid token or network ID, please check again")
        );
        assert_eq!(
            resp.into_result().unwrap_err(),
            "Invalid token or network ID, please check again"
        );
    }

    #[test]
    fn bare_string_data_is_normalised() {
        let resp: DaqResponse =
            serde_json::from_value(json!({ "success": false, "data": "board offline" })).unwrap();
        assert_eq!(resp.data, vec![DaqEntry::Message("board offline".into())]);
    }

    #[test]
    fn null_or_missing_data_is_empty() {
        let resp: DaqResponse =
            serde_json::from_value(json!({ "success": true, "data": null })).unwrap();
        assert!(resp.data.is_empty());

        let resp: DaqResponse = serde_json::from_value(json!({ "success": true })).unwrap();
        assert!(resp.data.is_empty());
    }

    #[test]
    fn failure_constructor_round_trips_message() {
        let resp = DaqResponse::failure("Connection refused, check connection");
        assert!(!resp.success);
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            json!({ "success": false, "data": ["Connection refused, check connection"] })
        );
    }

    #[test]
    fn value_display_is_plain() {
        assert_eq!(ChannelValue::from("3.3").to_string(), "3.3");
        assert_eq!(ChannelValue::from(1).to_string(), "1");
        assert_eq!(ChannelValue::Bool(true).to_string(), "1");
    }
}
