use arbor_core::{TransformUniforms, Visual, VisualError};

/// Visual double that remembers what it was given.
#[derive(Debug, Default)]
pub struct RecordingVisual {
    pub draws: usize,
    pub last_vars: Option<TransformUniforms>,
    /// When set, `draw` fails with this error.
    pub fail_with: Option<VisualError>,
}

impl Visual for RecordingVisual {
    fn set_vars(&mut self, vars: &TransformUniforms) {
        self.last_vars = Some(*vars);
    }

    fn draw(&mut self) -> Result<(), VisualError> {
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        self.draws += 1;
        Ok(())
    }
}
