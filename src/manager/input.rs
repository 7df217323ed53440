/// Single-line text input state of a prompt dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    value: String,
    select_all: bool,
}

impl InputState {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            select_all: false,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn selected_all(&self) -> bool {
        self.select_all
    }

    pub fn select_all(&mut self) {
        self.select_all = true;
    }

    pub fn clear_selection(&mut self) {
        self.select_all = false;
    }

    /// Typing over a full selection replaces it.
    pub fn insert(&mut self, c: char) {
        if self.select_all {
            self.value.clear();
            self.select_all = false;
        }
        self.value.push(c);
    }

    pub fn insert_str(&mut self, text: &str) {
        if self.select_all {
            self.value.clear();
            self.select_all = false;
        }
        // single-line input
        self.value
            .extend(text.chars().filter(|c| *c != '\n' && *c != '\r'));
    }

    pub fn delete_backward(&mut self) {
        if self.select_all {
            self.value.clear();
            self.select_all = false;
        } else {
            self.value.pop();
        }
    }
}
