use crate::word_source::WordSource;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) words: WordSource,
}
