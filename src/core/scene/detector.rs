//=========================================================================
// Scene Detector
//=========================================================================
//
// Finds the highest-priority scene marker in the host's scene graph.
//
// A full-hierarchy search is expensive, so the last result is kept in a
// one-slot cache keyed by the host's scene generation. The cache is
// trusted until the generation changes or its marker dies.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::SceneKind;
use crate::core::host::{GameHost, MarkerHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CachedScene {
    generation: u64,
    kind: SceneKind,
    /// `None` for [`SceneKind::Other`].
    marker: Option<MarkerHandle>,
}

//=== SceneDetector =======================================================

#[derive(Debug, Default)]
pub struct SceneDetector {
    cache: Option<CachedScene>,
}

impl SceneDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// The host's current gameplay mode.
    pub fn detect(&mut self, host: &dyn GameHost) -> SceneKind {
        let generation = host.scene_generation();

        if let Some(cached) = self.cache {
            let alive = cached.marker.map_or(true, |m| host.is_marker_alive(m));
            if cached.generation == generation && alive {
                return cached.kind;
            }
        }

        let (kind, marker) = SceneKind::DETECTION_ORDER
            .iter()
            .find_map(|kind| {
                let name = kind.marker_name()?;
                host.find_marker(name).map(|marker| (*kind, Some(marker)))
            })
            .unwrap_or((SceneKind::Other, None));

        debug!("Scene search at generation {} found {:?}", generation, kind);
        self.cache = Some(CachedScene {
            generation,
            kind,
            marker,
        });
        kind
    }

    /// Forces a full search on the next call.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::host::mock::MockHost;

    #[test]
    fn empty_graph_is_other() {
        let host = MockHost::new();
        assert_eq!(SceneDetector::new().detect(&host), SceneKind::Other);
    }

    #[test]
    fn interaction_outranks_action_regardless_of_load_order() {
        for order in [["ActionScene", "HScene"], ["HScene", "ActionScene"]] {
            let mut host = MockHost::new();
            for (i, name) in order.iter().enumerate() {
                host.load_marker(name, i as u64 + 1);
            }
            assert_eq!(SceneDetector::new().detect(&host), SceneKind::Interaction);
        }
    }

    #[test]
    fn full_priority_chain() {
        let mut host = MockHost::new();
        let mut detector = SceneDetector::new();
        let names = ["CustomScene", "NightMenuScene", "TalkScene", "ActionScene", "HScene"];
        let expected = [
            SceneKind::Custom,
            SceneKind::NightMenu,
            SceneKind::Talk,
            SceneKind::Action,
            SceneKind::Interaction,
        ];

        for (i, (name, kind)) in names.iter().zip(expected).enumerate() {
            host.load_marker(name, i as u64 + 1);
            assert_eq!(detector.detect(&host), kind);
        }
    }

    #[test]
    fn cache_skips_search_within_generation() {
        let mut host = MockHost::new();
        host.load_marker("TalkScene", 1);
        let mut detector = SceneDetector::new();

        detector.detect(&host);
        let searches = host.find_calls.get();
        assert_eq!(detector.detect(&host), SceneKind::Talk);
        assert_eq!(host.find_calls.get(), searches);
    }

    #[test]
    fn other_is_cached_too() {
        let host = MockHost::new();
        let mut detector = SceneDetector::new();
        detector.detect(&host);
        let searches = host.find_calls.get();
        detector.detect(&host);
        assert_eq!(host.find_calls.get(), searches);
    }

    #[test]
    fn generation_change_triggers_search() {
        let mut host = MockHost::new();
        host.load_marker("ActionScene", 1);
        let mut detector = SceneDetector::new();
        assert_eq!(detector.detect(&host), SceneKind::Action);

        host.load_marker("TalkScene", 2);
        assert_eq!(detector.detect(&host), SceneKind::Action);

        host.unload_marker("ActionScene");
        assert_eq!(detector.detect(&host), SceneKind::Talk);
    }

    #[test]
    fn dead_marker_invalidates_cache() {
        let mut host = MockHost::new();
        host.load_marker("TalkScene", 1);
        let mut detector = SceneDetector::new();
        detector.detect(&host);

        // Marker destroyed without the host reporting a reload.
        host.markers.clear();
        host.dead_markers.insert(MarkerHandle(1));
        assert_eq!(detector.detect(&host), SceneKind::Other);
    }
}
