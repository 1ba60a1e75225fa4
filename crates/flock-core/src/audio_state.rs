//! Lifecycle of the lazily built audio graph.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AudioGraphState {
    #[default]
    Uninitialized,
    Initializing,
    Ready,
    Failed,
}

impl AudioGraphState {
    /// Claim the right to build the graph. Returns `false` while another
    /// build is in flight or the graph already exists; a failed graph may be
    /// retried.
    pub fn begin(&mut self) -> bool {
        match self {
            AudioGraphState::Uninitialized | AudioGraphState::Failed => {
                *self = AudioGraphState::Initializing;
                true
            }
            AudioGraphState::Initializing | AudioGraphState::Ready => false,
        }
    }

    pub fn finish(&mut self, ok: bool) {
        *self = if ok {
            AudioGraphState::Ready
        } else {
            AudioGraphState::Failed
        };
    }

    pub fn is_ready(self) -> bool {
        self == AudioGraphState::Ready
    }
}
