use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InspectorMode {
    /// Forward sync active
    #[default]
    Normal,
    /// Replay in progress; watchers must not forward
    Travel,
}

#[derive(Debug, Default)]
pub(crate) struct ModeFlag {
    mode: Mutex<InspectorMode>,
}

impl ModeFlag {
    pub(crate) fn get(&self) -> InspectorMode {
        *self.mode.lock()
    }

    pub(crate) fn is_travel(&self) -> bool {
        self.get() == InspectorMode::Travel
    }

    /// Switches to `Travel` until the guard drops, then restores the previous
    /// mode. Early returns and panics inside replay still reset the flag.
    pub(crate) fn travel(&self) -> TravelGuard<'_> {
        let previous = std::mem::replace(&mut *self.mode.lock(), InspectorMode::Travel);
        TravelGuard {
            flag: self,
            previous,
        }
    }
}

pub(crate) struct TravelGuard<'a> {
    flag: &'a ModeFlag,
    previous: InspectorMode,
}

impl Drop for TravelGuard<'_> {
    fn drop(&mut self) {
        *self.flag.mode.lock() = self.previous;
    }
}
