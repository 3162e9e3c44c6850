// ── Panel visibility ──
//
// The center region shows one panel at a time. Which one is visible is
// tracked here rather than read back from the widgets.

use indexmap::IndexMap;

/// Panels that can occupy the center region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelId {
    Welcome,
    DeviceDetail,
}

impl PanelId {
    pub const ALL: [Self; 2] = [Self::Welcome, Self::DeviceDetail];

    pub fn title(self) -> &'static str {
        match self {
            Self::Welcome => "Welcome",
            Self::DeviceDetail => "Device",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelRegistry {
    visible: IndexMap<PanelId, bool>,
}

impl Default for PanelRegistry {
    /// Welcome shown, everything else hidden.
    fn default() -> Self {
        let mut registry = Self {
            visible: PanelId::ALL.into_iter().map(|id| (id, false)).collect(),
        };
        registry.show_exclusive(PanelId::Welcome);
        registry
    }
}

impl PanelRegistry {
    /// Show `id` and hide every other panel.
    pub fn show_exclusive(&mut self, id: PanelId) {
        for (panel, visible) in &mut self.visible {
            *visible = *panel == id;
        }
    }

    /// The visible panel, if any.
    pub fn visible(&self) -> Option<PanelId> {
        self.visible
            .iter()
            .find_map(|(id, visible)| visible.then_some(*id))
    }
}
