use std::collections::HashSet;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

use super::{AgentEdge, AgentGraphData};

/// How long an interaction edge stays on screen, in milliseconds.
pub const EDGE_TTL_MS: i64 = 5000;

/// Parse an edge timestamp. Accepts RFC 3339 and naive ISO-8601, the
/// latter in local time since the backend stamps with its local clock.
/// A naive time that falls in a DST gap does not exist and is rejected.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|ts| ts.with_timezone(&Utc))
}

/// Whether an edge should still be drawn at `now`.
///
/// Untimestamped edges are structural and always live. Unparseable ones
/// never are. Age must be strictly below the TTL.
pub fn is_live(edge: &AgentEdge, now: DateTime<Utc>) -> bool {
    let Some(raw) = edge.timestamp.as_deref() else {
        return true;
    };
    match parse_timestamp(raw) {
        Some(ts) => (now - ts).num_milliseconds() < EDGE_TTL_MS,
        None => {
            tracing::debug!(timestamp = raw, "dropping edge with unparseable timestamp");
            false
        }
    }
}

/// Edges that are still inside the window at `now`.
pub fn prune_edges(edges: &[AgentEdge], now: DateTime<Utc>) -> Vec<&AgentEdge> {
    edges.iter().filter(|e| is_live(e, now)).collect()
}

/// Live edges whose endpoints both exist in the graph.
pub fn visible_edges(graph: &AgentGraphData, now: DateTime<Utc>) -> Vec<&AgentEdge> {
    let ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    prune_edges(&graph.edges, now)
        .into_iter()
        .filter(|e| ids.contains(e.source.as_str()) && ids.contains(e.target.as_str()))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/helpers/mod.rs"]
#[allow(dead_code)]
mod helpers;

#[cfg(test)]
mod tests {
    use super::*;
    use super::helpers::*;
    use chrono::{Duration, SecondsFormat};

    fn at(now: DateTime<Utc>, ms_ago: i64) -> String {
        (now - Duration::milliseconds(ms_ago)).to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    #[test]
    fn window_boundary() {
        let now = Utc::now();
        let fresh = edge("Manager", "coder", Some(&at(now, 4999)));
        let expired = edge("Manager", "coder", Some(&at(now, 5000)));
        let old = edge("Manager", "coder", Some(&at(now, 60_000)));
        assert!(is_live(&fresh, now));
        assert!(!is_live(&expired, now));
        assert!(!is_live(&old, now));
    }

    #[test]
    fn prune_keeps_order_and_drops_stale() {
        let now = Utc::now();
        let edges = vec![
            edge("a", "b", Some(&at(now, 100))),
            edge("b", "c", Some(&at(now, 9000))),
            edge("c", "a", Some(&at(now, 0))),
        ];
        let live: Vec<&str> = prune_edges(&edges, now).iter().map(|e| e.source.as_str()).collect();
        assert_eq!(live, vec!["a", "c"]);
    }

    #[test]
    fn untimestamped_edges_stay() {
        let now = Utc::now();
        assert!(is_live(&edge("a", "b", None), now));
    }

    #[test]
    fn garbage_timestamp_is_dropped() {
        assert!(!is_live(&edge("a", "b", Some("yesterday")), Utc::now()));
    }

    #[test]
    fn future_timestamp_is_live() {
        let now = Utc::now();
        let ts = (now + Duration::seconds(30)).to_rfc3339();
        assert!(is_live(&edge("a", "b", Some(&ts)), now));
    }

    #[test]
    fn naive_iso_is_local_time() {
        let raw = "2025-01-15T12:00:00.250";
        let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").unwrap();
        let stamped = Local.from_local_datetime(&naive).earliest().unwrap().with_timezone(&Utc);
        assert_eq!(parse_timestamp(raw), Some(stamped));

        let e = edge("a", "b", Some(raw));
        assert!(is_live(&e, stamped));
        assert!(is_live(&e, stamped + Duration::milliseconds(4999)));
        assert!(!is_live(&e, stamped + Duration::milliseconds(5000)));
    }

    #[test]
    fn fresh_naive_local_stamp_is_shown_then_fades() {
        let now = Utc::now();
        let raw = now
            .with_timezone(&Local)
            .naive_local()
            .format("%Y-%m-%dT%H:%M:%S%.6f")
            .to_string();
        let e = edge("Manager", "coder", Some(&raw));
        assert!(is_live(&e, now));
        assert!(!is_live(&e, now + Duration::seconds(6)));
    }

    #[test]
    fn offset_stamps_ignore_local_zone() {
        let parsed = parse_timestamp("2025-03-01T12:00:00.250+02:00").unwrap();
        assert_eq!(parsed.to_rfc3339_opts(SecondsFormat::Millis, true), "2025-03-01T10:00:00.250Z");
    }

    #[test]
    fn edges_to_unknown_agents_are_hidden() {
        let now = Utc::now();
        let mut graph = small_swarm();
        graph.edges = vec![
            edge("Manager", "coder", Some(&at(now, 10))),
            edge("Manager", "ghost", Some(&at(now, 10))),
        ];
        let shown = visible_edges(&graph, now);
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].target, "coder");
    }
}
