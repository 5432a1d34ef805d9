/// Entity-agnostic yes/no prompt. Holds the action it guards until answered;
/// only an explicit "yes" hands it back. Dismissing counts as "no".
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmDialog<A> {
    pub title: Option<String>,
    pub message: String,
    pending: A,
}

impl<A> ConfirmDialog<A> {
    pub fn new(message: impl Into<String>, pending: A) -> Self {
        Self { title: None, message: message.into(), pending }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn resolve(self, confirmed: bool) -> Option<A> {
        confirmed.then_some(self.pending)
    }
}
