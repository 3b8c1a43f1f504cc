//! Renderer host
//!
//! Binds one drawing container to at most one live surface. Rendering a new
//! option disposes the previous surface first; viewport resizes are
//! forwarded to the live surface.

use tracing::debug;

use super::option::ChartOption;

/// A drawing surface created for one chart
pub trait Surface {
    fn set_option(&mut self, option: &ChartOption);
    fn resize(&mut self, width: u16, height: u16);
    fn dispose(&mut self);
}

/// Creates surfaces bound to a single container
pub trait SurfaceFactory {
    type Surface: Surface;

    fn create(&mut self) -> Self::Surface;
}

pub struct ChartHost<F: SurfaceFactory> {
    factory: F,
    active: Option<F::Surface>,
}

impl<F: SurfaceFactory> ChartHost<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            active: None,
        }
    }

    /// Dispose the current surface (if any) and draw `option` on a new one.
    pub fn render(&mut self, option: &ChartOption) {
        self.clear();
        let mut surface = self.factory.create();
        surface.set_option(option);
        self.active = Some(surface);
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        if let Some(surface) = self.active.as_mut() {
            debug!(width, height, "Resizing chart surface");
            surface.resize(width, height);
        }
    }

    pub fn clear(&mut self) {
        if let Some(mut previous) = self.active.take() {
            previous.dispose();
        }
    }

    pub fn surface(&self) -> Option<&F::Surface> {
        self.active.as_ref()
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }
}

impl<F: SurfaceFactory> Drop for ChartHost<F> {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::adapter::adapt;
    use crate::chart::spec::ChartSpec;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        created: usize,
        disposed: Vec<usize>,
        resized: Vec<(usize, u16, u16)>,
    }

    struct RecordingSurface {
        id: usize,
        log: Rc<RefCell<Log>>,
    }

    impl Surface for RecordingSurface {
        fn set_option(&mut self, _option: &ChartOption) {}

        fn resize(&mut self, width: u16, height: u16) {
            self.log.borrow_mut().resized.push((self.id, width, height));
        }

        fn dispose(&mut self) {
            self.log.borrow_mut().disposed.push(self.id);
        }
    }

    struct RecordingFactory {
        log: Rc<RefCell<Log>>,
    }

    impl SurfaceFactory for RecordingFactory {
        type Surface = RecordingSurface;

        fn create(&mut self) -> RecordingSurface {
            let mut log = self.log.borrow_mut();
            log.created += 1;
            RecordingSurface {
                id: log.created,
                log: self.log.clone(),
            }
        }
    }

    fn option() -> ChartOption {
        let spec = ChartSpec::from_value(serde_json::json!({"type": "bar", "data": [["a", 1]]}))
            .unwrap();
        adapt(&spec).unwrap()
    }

    #[test]
    fn test_previous_surface_disposed_before_new_one() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut host = ChartHost::new(RecordingFactory { log: log.clone() });

        host.render(&option());
        assert!(log.borrow().disposed.is_empty());

        host.render(&option());
        host.render(&option());
        assert_eq!(log.borrow().created, 3);
        assert_eq!(log.borrow().disposed, vec![1, 2]);
        assert_eq!(host.surface().unwrap().id, 3);
    }

    #[test]
    fn test_resize_reaches_only_live_surface() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut host = ChartHost::new(RecordingFactory { log: log.clone() });

        host.resize(80, 24);
        assert!(log.borrow().resized.is_empty());

        host.render(&option());
        host.resize(100, 30);
        assert_eq!(log.borrow().resized, vec![(1, 100, 30)]);

        drop(host);
        assert_eq!(log.borrow().disposed, vec![1]);
    }
}
