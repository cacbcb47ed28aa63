use std::fmt::Display;
use std::future::Future;

/// Loading, error and data of a single view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState<T> {
    pub loading: bool,
    pub error: Option<String>,
    pub data: Option<T>,
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self {
            loading: false,
            error: None,
            data: None,
        }
    }
}

/// What the renderer should draw for a view.
#[derive(Debug, PartialEq)]
pub enum Screen<'a, T> {
    Error(&'a str),
    Loading,
    Content(&'a T),
}

impl<T> ViewState<T> {
    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn resolve<E: Display>(&mut self, result: Result<T, E>) {
        match result {
            Ok(data) => self.data = Some(data),
            Err(e) => self.error = Some(e.to_string()),
        }
        self.loading = false;
    }

    /// Error wins over loading, loading wins over content.
    pub fn screen(&self) -> Screen<'_, T> {
        if let Some(error) = &self.error {
            return Screen::Error(error);
        }
        match (&self.data, self.loading) {
            (Some(data), false) => Screen::Content(data),
            _ => Screen::Loading,
        }
    }
}

type Render<T> = Box<dyn FnMut(&ViewState<T>) + Send>;

/// View state plus the callback that redraws it after every transition.
pub struct Store<T> {
    state: ViewState<T>,
    render: Render<T>,
}

impl<T> Store<T> {
    /// Renders the initial state immediately.
    pub fn new(render: impl FnMut(&ViewState<T>) + Send + 'static) -> Self {
        let mut store = Self {
            state: ViewState::default(),
            render: Box::new(render),
        };
        (store.render)(&store.state);
        store
    }

    pub fn state(&self) -> &ViewState<T> {
        &self.state
    }

    pub fn update(&mut self, change: impl FnOnce(&mut ViewState<T>)) {
        change(&mut self.state);
        (self.render)(&self.state);
    }

    /// Runs one fetch through the loading cycle. Dropping the future
    /// discards the result without touching the state.
    pub async fn load<E, F>(&mut self, fetch: F)
    where
        E: Display,
        F: Future<Output = Result<T, E>>,
    {
        self.update(ViewState::begin_load);
        let result = fetch.await;
        self.update(|state| state.resolve(result));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording_store() -> (Store<u32>, Arc<Mutex<Vec<ViewState<u32>>>>) {
        let frames = Arc::new(Mutex::new(Vec::new()));
        let sink = frames.clone();
        let store = Store::new(move |state: &ViewState<u32>| {
            sink.lock().unwrap().push(state.clone());
        });
        (store, frames)
    }

    #[test]
    fn test_screen_priority() {
        let mut state = ViewState::<u32>::default();
        assert_eq!(state.screen(), Screen::Loading);

        state.data = Some(7);
        assert_eq!(state.screen(), Screen::Content(&7));

        state.begin_load();
        assert_eq!(state.screen(), Screen::Loading);

        state.error = Some("Trip not found".to_string());
        assert_eq!(state.screen(), Screen::Error("Trip not found"));
    }

    #[test]
    fn test_resolve_clears_loading() {
        let mut state = ViewState::<u32>::default();
        state.begin_load();
        state.resolve::<String>(Err("boom".to_string()));

        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("boom"));
        assert_eq!(state.data, None);

        state.begin_load();
        assert_eq!(state.error, None);
        state.resolve::<String>(Ok(3));
        assert_eq!(state.data, Some(3));
    }

    #[tokio::test]
    async fn test_store_renders_every_transition() {
        let (mut store, frames) = recording_store();

        store.load(async { Ok::<_, String>(42) }).await;

        let frames = frames.lock().unwrap();
        assert_eq!(frames.len(), 3);
        assert!(!frames[0].loading);
        assert!(frames[1].loading);
        assert_eq!(frames[2].data, Some(42));
        assert!(!frames[2].loading);
        assert_eq!(store.state().screen(), Screen::Content(&42));
    }

    #[tokio::test]
    async fn test_store_keeps_failure_message() {
        let (mut store, frames) = recording_store();

        store
            .load(async { Err::<u32, _>("Network error".to_string()) })
            .await;

        assert_eq!(store.state().screen(), Screen::Error("Network error"));
        assert_eq!(frames.lock().unwrap().len(), 3);
    }
}
