use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastKind {
    #[default]
    Error,
    Success,
    Info,
    Warning,
}

impl ToastKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "error" => Some(Self::Error),
            "success" => Some(Self::Success),
            "info" => Some(Self::Info),
            "warning" => Some(Self::Warning),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastRequest {
    pub message: String,
    pub kind: ToastKind,
}

impl ToastRequest {
    pub fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }
}

/// Which timer the displayed toast is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    /// Fully shown; the hold timer is pending.
    Visible,
    /// Exit transition running; the exit timer is pending.
    Leaving,
}

/// What the caller has to arm after driving the sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastTimer {
    Hold,
    Exit,
}

/// FIFO presentation queue for toasts. At most one toast is displayed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ToastSequencer {
    #[default]
    Idle,
    Displaying {
        current: ToastRequest,
        phase: ToastPhase,
        queue: VecDeque<ToastRequest>,
    },
}

impl ToastSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a request. Returns `Some(ToastTimer::Hold)` when the request
    /// went straight to display.
    pub fn enqueue(&mut self, request: ToastRequest) -> Option<ToastTimer> {
        match self {
            Self::Idle => {
                *self = Self::Displaying {
                    current: request,
                    phase: ToastPhase::Visible,
                    queue: VecDeque::new(),
                };
                Some(ToastTimer::Hold)
            }
            Self::Displaying { queue, .. } => {
                queue.push_back(request);
                None
            }
        }
    }

    /// The hold timer fired: start the exit transition.
    pub fn hold_elapsed(&mut self) -> Option<ToastTimer> {
        match self {
            Self::Displaying { phase, .. } if *phase == ToastPhase::Visible => {
                *phase = ToastPhase::Leaving;
                Some(ToastTimer::Exit)
            }
            _ => None,
        }
    }

    /// The exit timer fired: show the next pending request or go idle.
    pub fn exit_elapsed(&mut self) -> Option<ToastTimer> {
        let Self::Displaying { phase, queue, .. } = self else {
            return None;
        };
        if *phase != ToastPhase::Leaving {
            return None;
        }
        match queue.pop_front() {
            Some(next) => {
                let queue = std::mem::take(queue);
                *self = Self::Displaying {
                    current: next,
                    phase: ToastPhase::Visible,
                    queue,
                };
                Some(ToastTimer::Hold)
            }
            None => {
                *self = Self::Idle;
                None
            }
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn current(&self) -> Option<(&ToastRequest, ToastPhase)> {
        match self {
            Self::Idle => None,
            Self::Displaying { current, phase, .. } => Some((current, *phase)),
        }
    }

    pub fn pending(&self) -> usize {
        match self {
            Self::Idle => 0,
            Self::Displaying { queue, .. } => queue.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stray_timers_are_ignored() {
        let mut seq = ToastSequencer::new();
        assert_eq!(seq.hold_elapsed(), None);
        assert_eq!(seq.exit_elapsed(), None);
        assert!(seq.is_idle());

        seq.enqueue(ToastRequest::new("a", ToastKind::Info));
        // Exit before hold does nothing.
        assert_eq!(seq.exit_elapsed(), None);
        assert_eq!(seq.current().map(|(_, phase)| phase), Some(ToastPhase::Visible));
    }

    #[test]
    fn kind_parse_is_case_insensitive() {
        assert_eq!(ToastKind::parse("Warning"), Some(ToastKind::Warning));
        assert_eq!(ToastKind::parse(" success "), Some(ToastKind::Success));
        assert_eq!(ToastKind::parse("fatal"), None);
    }
}
