use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChannelState {
    /// No timer running.
    #[default]
    Idle,
    /// Capturing and recognizing on a fixed cadence.
    Sampling,
    /// An outcome was just reported. Transient, immediately followed by `Cooldown`.
    Resolved,
    /// Holding the reported outcome on screen; no sampling.
    Cooldown,
}

impl fmt::Display for ChannelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Sampling => "sampling",
            Self::Resolved => "resolved",
            Self::Cooldown => "cooldown",
        })
    }
}
