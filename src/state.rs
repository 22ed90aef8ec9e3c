/// Where the gesture interpreter is within a single physical touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorState {
    #[default]
    Idle,
    Drawing {
        /// Set once the pan has produced at least one move sample
        moved: bool,
    },
}

impl EditorState {
    pub fn is_drawing(&self) -> bool {
        matches!(self, Self::Drawing { .. })
    }

    pub fn has_moved(&self) -> bool {
        matches!(self, Self::Drawing { moved: true })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Drawing { .. } => "Drawing",
        }
    }
}
