// ── Wire-to-domain conversion ──

use chrono::DateTime;

use remotedaq_api::Member;

use crate::model::NodeRecord;

impl From<Member> for NodeRecord {
    fn from(m: Member) -> Self {
        Self {
            ip_address: m.config.ip_assignments.into_iter().next(),
            authorized: m.config.authorized,
            online: m.online,
            last_online: m
                .last_online
                .filter(|ms| *ms > 0)
                .and_then(DateTime::from_timestamp_millis),
            description: m.description.filter(|d| !d.is_empty()),
            physical_address: m.physical_address,
            name: m.name,
            id: m.node_id,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use remotedaq_api::MemberConfig;

    use super::*;

    #[test]
    fn takes_first_assigned_address() {
        let member = Member {
            node_id: "a1b2c3d4e5".into(),
            name: "bench-1".into(),
            description: Some(String::new()),
            online: true,
            last_online: Some(1_700_000_000_000),
            physical_address: None,
            config: MemberConfig {
                authorized: true,
                ip_assignments: vec!["10.147.17.5".into(), "10.147.17.6".into()],
            },
        };

        let node = NodeRecord::from(member);
        assert_eq!(node.id, "a1b2c3d4e5");
        assert_eq!(node.ip_address.as_deref(), Some("10.147.17.5"));
        assert!(node.description.is_none());
        assert_eq!(node.last_online.unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn unassigned_member_has_no_address() {
        let member = Member {
            node_id: "ffeeddccbb".into(),
            name: String::new(),
            description: None,
            online: false,
            last_online: Some(0),
            physical_address: None,
            config: MemberConfig::default(),
        };

        let node = NodeRecord::from(member);
        assert!(node.ip_address.is_none());
        assert!(node.last_online.is_none());
    }
}
