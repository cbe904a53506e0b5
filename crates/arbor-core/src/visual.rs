use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::Rc;

use serde::Serialize;

use crate::error::VisualError;
use crate::transform::Transform;

/// The matrix set handed to a visual before it draws.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransformUniforms {
    pub transform_model: Transform,
    pub transform_view: Transform,
    pub transform_projection: Transform,
}

impl TransformUniforms {
    /// Uniform names paired with their values, in shader declaration order.
    pub fn named(&self) -> [(&'static str, &Transform); 3] {
        [
            ("transform_model", &self.transform_model),
            ("transform_view", &self.transform_view),
            ("transform_projection", &self.transform_projection),
        ]
    }
}

/// Something an entity can draw. Scenes never look inside a visual; they
/// only hand it matrices and ask it to draw.
pub trait Visual: Debug {
    /// Receive the model/view/projection set for the upcoming draw.
    fn set_vars(&mut self, _vars: &TransformUniforms) {}

    fn draw(&mut self) -> Result<(), VisualError>;
}

/// Visuals are loaned to entities, not owned by them; the host keeps its own
/// handle.
pub type SharedVisual = Rc<RefCell<dyn Visual>>;
