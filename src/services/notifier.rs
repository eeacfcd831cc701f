#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

/// Sink for user-facing messages. Passed explicitly to every service that
/// reports to the user.
pub trait Notifier: Send {
    fn notify(&mut self, notice: Notice);

    fn success(&mut self, message: &str) {
        self.notify(Notice {
            kind: NoticeKind::Success,
            message: message.to_string(),
        });
    }

    fn error(&mut self, message: &str) {
        self.notify(Notice {
            kind: NoticeKind::Error,
            message: message.to_string(),
        });
    }
}

/// Notices waiting to be shown on the next rendered page of a session.
#[derive(Debug, Default)]
pub struct FlashMessages {
    pending: Vec<Notice>,
}

impl FlashMessages {
    pub fn take(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.pending)
    }
}

impl Notifier for FlashMessages {
    fn notify(&mut self, notice: Notice) {
        self.pending.push(notice);
    }
}
