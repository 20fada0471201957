//! Scoped release of session resources.

/// Release actions for resources acquired by an owner of type `C`.
///
/// Actions run in reverse acquisition order, each at most once.
pub struct Teardown<C> {
    actions: Vec<(&'static str, Box<dyn FnOnce(&mut C)>)>,
}

impl<C> Default for Teardown<C> {
    fn default() -> Self {
        Self {
            actions: Vec::new(),
        }
    }
}

impl<C> std::fmt::Debug for Teardown<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let labels: Vec<&str> = self.actions.iter().map(|(label, _)| *label).collect();
        f.debug_struct("Teardown").field("actions", &labels).finish()
    }
}

impl<C> Teardown<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn defer(&mut self, label: &'static str, action: impl FnOnce(&mut C) + 'static) {
        self.actions.push((label, Box::new(action)));
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn run(&mut self, owner: &mut C) {
        while let Some((label, action)) = self.actions.pop() {
            tracing::debug!(resource = label, "Releasing session resource");
            action(owner);
        }
    }
}
