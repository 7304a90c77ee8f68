//! Event callbacks of a plot extension and the render broker

use serde::Deserialize;

use crate::context::DrawingContext;
use crate::drawing::Drawing;
use crate::error::Result;

/// Events the host raises on an extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventName {
    Load,
    Render,
    DataBindingChanged,
    DataChanged,
    PrepareRender,
}

impl EventName {
    /// Name of the event as the host spells it
    pub fn as_str(self) -> &'static str {
        match self {
            EventName::Load => "load",
            EventName::Render => "render",
            EventName::DataBindingChanged => "dataBindingChanged",
            EventName::DataChanged => "dataChanged",
            EventName::PrepareRender => "prepareRender",
        }
    }
}

type Callback = Box<dyn FnMut() -> Result<()>>;
type RenderCallback = Box<dyn FnMut(&mut DrawingContext<'_>) -> Result<()>>;

/// Registered callbacks, invoked in registration order
#[derive(Default)]
pub struct Events {
    callbacks: Vec<(EventName, Callback)>,
    render: Vec<RenderCallback>,
}

impl std::fmt::Debug for Events {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Events")
            .field("callbacks", &self.callbacks.len())
            .field("render", &self.render.len())
            .finish()
    }
}

impl Events {
    /// No callbacks registered
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `callback` whenever `name` is emitted
    pub fn on<F>(&mut self, name: EventName, callback: F)
    where
        F: FnMut() -> Result<()> + 'static,
    {
        self.callbacks.push((name, Box::new(callback)));
    }

    /// Draw with `callback` whenever a drawing is rendered
    pub fn on_render<F>(&mut self, callback: F)
    where
        F: FnMut(&mut DrawingContext<'_>) -> Result<()> + 'static,
    {
        self.render.push(Box::new(callback));
    }

    /// Run the callbacks registered for `name`. The first failing callback
    /// stops the emission.
    pub fn emit(&mut self, name: EventName) -> Result<()> {
        tracing::debug!(event = name.as_str(), "emit");

        for (_, callback) in self
            .callbacks
            .iter_mut()
            .filter(|(event, _)| *event == name)
        {
            callback()?;
        }

        Ok(())
    }

    /// Prepare, record and close a new drawing with the render callbacks. A
    /// callback may close the drawing itself; later callbacks then fail to
    /// draw into it.
    pub fn render(&mut self) -> Result<Drawing> {
        self.emit(EventName::PrepareRender)?;

        let mut drawing = Drawing::new();
        let mut context = drawing.open()?;
        for callback in &mut self.render {
            callback(&mut context)?;
        }
        if !context.is_closed() {
            context.close()?;
        }

        self.emit(EventName::Render)?;

        Ok(drawing)
    }
}
