use super::Responder;
use parking_lot::Mutex;

pub const STATUS_FORBIDDEN: u16 = 403;

#[derive(Debug, Default)]
struct ResponseState {
    status: Option<u16>,
    forbidden: usize,
}

/// Responder that records the status it was asked to send
#[derive(Debug, Default)]
pub struct StatusRecorder {
    state: Mutex<ResponseState>,
}

impl StatusRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last status set, if any
    pub fn status(&self) -> Option<u16> {
        self.state.lock().status
    }

    /// Number of forbidden responses sent
    pub fn forbidden_count(&self) -> usize {
        self.state.lock().forbidden
    }

    pub fn reset(&self) {
        *self.state.lock() = ResponseState::default();
    }
}

impl Responder for StatusRecorder {
    fn send_forbidden(&self) {
        let mut state = self.state.lock();
        state.status = Some(STATUS_FORBIDDEN);
        state.forbidden += 1;
    }
}
