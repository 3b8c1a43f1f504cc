//! Terminal chart surfaces
//!
//! The results panel is the single container charts are drawn into. Each
//! render gets a fresh [`TerminalSurface`]; the widget in
//! [`crate::tui::widgets::chart`] paints whatever option the live surface holds.

use tracing::debug;

use crate::chart::{ChartOption, Surface, SurfaceFactory};

#[derive(Debug)]
pub struct TerminalSurface {
    pub id: u64,
    option: Option<ChartOption>,
    size: (u16, u16),
    disposed: bool,
}

impl TerminalSurface {
    /// The option to paint, or `None` once disposed
    pub fn option(&self) -> Option<&ChartOption> {
        if self.disposed {
            None
        } else {
            self.option.as_ref()
        }
    }

    pub fn size(&self) -> (u16, u16) {
        self.size
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Surface for TerminalSurface {
    fn set_option(&mut self, option: &ChartOption) {
        self.option = Some(option.clone());
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.size = (width, height);
    }

    fn dispose(&mut self) {
        debug!(surface = self.id, "Disposing chart surface");
        self.option = None;
        self.disposed = true;
    }
}

/// Hands out surfaces sized to the current viewport
#[derive(Debug, Default)]
pub struct TerminalSurfaceFactory {
    viewport: (u16, u16),
    created: u64,
}

impl TerminalSurfaceFactory {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            viewport: (width, height),
            created: 0,
        }
    }

    pub fn set_viewport(&mut self, width: u16, height: u16) {
        self.viewport = (width, height);
    }

    pub fn created(&self) -> u64 {
        self.created
    }
}

impl SurfaceFactory for TerminalSurfaceFactory {
    type Surface = TerminalSurface;

    fn create(&mut self) -> TerminalSurface {
        self.created += 1;
        debug!(surface = self.created, "Creating chart surface");
        TerminalSurface {
            id: self.created,
            option: None,
            size: self.viewport,
            disposed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{adapt, ChartHost, ChartSpec};
    use serde_json::json;

    fn option(kind: &str) -> ChartOption {
        let spec = ChartSpec::from_value(json!({"type": kind, "data": [["a", 1], ["b", 2]]})).unwrap();
        adapt(&spec).unwrap()
    }

    #[test]
    fn test_host_keeps_one_live_surface() {
        let mut host = ChartHost::new(TerminalSurfaceFactory::new(80, 24));
        host.render(&option("bar"));
        host.render(&option("line"));

        let surface = host.surface().unwrap();
        assert_eq!(surface.id, 2);
        assert_eq!(surface.size(), (80, 24));
        assert!(!surface.is_disposed());
        assert_eq!(surface.option(), Some(&option("line")));
        assert_eq!(host.factory().created(), 2);
    }

    #[test]
    fn test_viewport_changes_reach_surfaces() {
        let mut host = ChartHost::new(TerminalSurfaceFactory::new(80, 24));
        host.render(&option("bar"));
        host.resize(120, 40);
        assert_eq!(host.surface().unwrap().size(), (120, 40));

        host.factory_mut().set_viewport(100, 30);
        host.render(&option("bar"));
        assert_eq!(host.surface().unwrap().size(), (100, 30));

        host.clear();
        assert!(host.surface().is_none());
    }

    #[test]
    fn test_disposed_surface_paints_nothing() {
        let mut surface = TerminalSurfaceFactory::default().create();
        surface.set_option(&option("bar"));
        assert!(surface.option().is_some());
        surface.dispose();
        assert!(surface.option().is_none());
    }
}
