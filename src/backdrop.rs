//! Search-and-select overlay state.
//!
//! A backdrop starts closed, opens with a set of results and closes again
//! either by picking the highlighted result or by being dismissed.

#[derive(Debug, Clone, PartialEq)]
pub enum BackdropState<T> {
    Closed,
    Open { results: Vec<T>, cursor: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Backdrop<T> {
    state: BackdropState<T>,
}

impl<T> Default for Backdrop<T> {
    fn default() -> Self {
        Self {
            state: BackdropState::Closed,
        }
    }
}

impl<T> Backdrop<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &BackdropState<T> {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, BackdropState::Open { .. })
    }

    /// Opens (or reopens) with fresh results and the cursor on the first one.
    pub fn open(&mut self, results: Vec<T>) {
        self.state = BackdropState::Open { results, cursor: 0 };
    }

    pub fn results(&self) -> &[T] {
        match &self.state {
            BackdropState::Open { results, .. } => results,
            BackdropState::Closed => &[],
        }
    }

    pub fn cursor(&self) -> Option<usize> {
        match &self.state {
            BackdropState::Open { results, cursor } if !results.is_empty() => Some(*cursor),
            _ => None,
        }
    }

    pub fn select_next(&mut self) {
        if let BackdropState::Open { results, cursor } = &mut self.state {
            if !results.is_empty() {
                *cursor = (*cursor + 1) % results.len();
            }
        }
    }

    pub fn select_previous(&mut self) {
        if let BackdropState::Open { results, cursor } = &mut self.state {
            if !results.is_empty() {
                *cursor = if *cursor == 0 {
                    results.len() - 1
                } else {
                    *cursor - 1
                };
            }
        }
    }

    /// Takes the highlighted result and closes. With nothing to pick the
    /// backdrop stays as it is.
    pub fn pick(&mut self) -> Option<T> {
        let picked = match &mut self.state {
            BackdropState::Open { results, cursor } if *cursor < results.len() => {
                Some(results.swap_remove(*cursor))
            }
            _ => None,
        };
        if picked.is_some() {
            self.state = BackdropState::Closed;
        }
        picked
    }

    /// Closes without a selection.
    pub fn dismiss(&mut self) {
        self.state = BackdropState::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_closed() {
        let backdrop: Backdrop<&str> = Backdrop::new();
        assert!(!backdrop.is_open());
        assert!(backdrop.results().is_empty());
        assert_eq!(backdrop.cursor(), None);
    }

    #[test]
    fn test_pick_returns_highlighted_and_closes() {
        let mut backdrop = Backdrop::new();
        backdrop.open(vec!["Jane", "John", "Joan"]);
        backdrop.select_next();
        backdrop.select_next();
        backdrop.select_next();
        assert_eq!(backdrop.cursor(), Some(0));
        backdrop.select_previous();
        assert_eq!(backdrop.pick(), Some("Joan"));
        assert!(!backdrop.is_open());
        assert_eq!(backdrop.pick(), None);
    }

    #[test]
    fn test_dismiss_closes_without_selection() {
        let mut backdrop = Backdrop::new();
        backdrop.open(vec![1, 2]);
        backdrop.dismiss();
        assert_eq!(backdrop.state(), &BackdropState::Closed);
    }

    #[test]
    fn test_empty_results_stay_open_on_pick() {
        let mut backdrop: Backdrop<u8> = Backdrop::new();
        backdrop.open(Vec::new());
        assert_eq!(backdrop.pick(), None);
        assert!(backdrop.is_open());
    }
}
