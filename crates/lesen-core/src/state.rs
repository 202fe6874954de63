use lesen_types::PipelineStage;

/// Where the single pipeline run currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Capturing,
    AwaitingSelection,
    Cropping,
    RecognizingText,
    Translating,
    Done,
    Cancelled,
    Errored(PipelineStage),
}

impl RunState {
    /// A hotkey may only start a run from one of these states
    pub fn accepts_activation(&self) -> bool {
        matches!(
            self,
            RunState::Idle | RunState::Done | RunState::Cancelled | RunState::Errored(_)
        )
    }

    /// Whether the orchestrator may move from `self` to `next`
    pub fn can_transition_to(&self, next: RunState) -> bool {
        use RunState::*;

        match (self, next) {
            (Idle | Done | Cancelled | Errored(_), Capturing) => true,
            (Capturing, AwaitingSelection) => true,
            (Capturing, Errored(PipelineStage::Capture)) => true,
            (AwaitingSelection, Cropping | Cancelled) => true,
            (AwaitingSelection, Errored(PipelineStage::Capture)) => true,
            (Cropping, RecognizingText | Cancelled) => true,
            (Cropping, Errored(PipelineStage::Capture)) => true,
            (RecognizingText, Translating | Done) => true,
            (RecognizingText, Errored(PipelineStage::Ocr)) => true,
            (Translating, Done) => true,
            (Translating, Errored(PipelineStage::Translation)) => true,
            _ => false,
        }
    }
}
