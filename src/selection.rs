/// Detail overlay state
#[derive(Debug, Clone, PartialEq)]
pub enum Selection<T> {
    Closed,
    Open(T),
}

#[derive(Debug)]
pub struct SelectionController<T> {
    state: Selection<T>,
}

impl<T> SelectionController<T> {
    pub fn new() -> Self {
        Self {
            state: Selection::Closed,
        }
    }

    /// Open the overlay on `item`, replacing whatever was open.
    pub fn select(&mut self, item: T) {
        self.state = Selection::Open(item);
    }

    /// Close the overlay. No-op when already closed.
    pub fn dismiss(&mut self) {
        self.state = Selection::Closed;
    }

    pub fn state(&self) -> &Selection<T> {
        &self.state
    }

    pub fn selected(&self) -> Option<&T> {
        match &self.state {
            Selection::Open(item) => Some(item),
            Selection::Closed => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, Selection::Open(_))
    }
}
